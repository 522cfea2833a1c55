use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use inistrs_io::{Component, ConversionReport, InistrsError, JobConfig, OverflowPolicy};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Convert casting-simulation stress exports into an OptiStruct INISTRS block.
#[derive(Debug, Parser)]
#[command(name = "inistrs-cli", version, about)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read the six component tables and write the INISTRS block
    Convert(ConvertArgs),
    /// Write a job configuration with the default export file names
    InitConfig {
        /// Where to write the JSON configuration
        path: PathBuf,
        /// Directory holding the component exports
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Parse a single component table and summarize it
    Inspect {
        file: PathBuf,
        #[arg(long, default_value = "XX")]
        component: Component,
        #[arg(long, default_value = "$")]
        comment: String,
    },
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// JSON job configuration; other flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the component exports under their default names
    #[arg(long)]
    dir: Option<PathBuf>,
    #[arg(long)]
    xx: Option<PathBuf>,
    #[arg(long)]
    yy: Option<PathBuf>,
    #[arg(long)]
    zz: Option<PathBuf>,
    #[arg(long)]
    xy: Option<PathBuf>,
    #[arg(long)]
    yz: Option<PathBuf>,
    #[arg(long)]
    zx: Option<PathBuf>,
    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Comment marker in the source tables
    #[arg(long)]
    comment: Option<String>,
    /// Sub-case identifier written in the header
    #[arg(long)]
    subcase: Option<u32>,
    /// Fail instead of truncating values wider than 8 columns
    #[arg(long)]
    strict: bool,
    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

impl ConvertArgs {
    fn job_config(&self) -> Result<JobConfig, InistrsError> {
        let mut config = match (&self.config, &self.dir) {
            (Some(path), _) => JobConfig::load(path)?,
            (None, Some(dir)) => JobConfig::in_directory(dir),
            (None, None) => JobConfig::in_directory("."),
        };

        let overrides = [
            (Component::Xx, &self.xx),
            (Component::Yy, &self.yy),
            (Component::Zz, &self.zz),
            (Component::Xy, &self.xy),
            (Component::Yz, &self.yz),
            (Component::Zx, &self.zx),
        ];
        for (component, path) in overrides {
            if let Some(path) = path {
                config.sources.insert(component, path.clone());
            }
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(comment) = &self.comment {
            config.comment_marker = comment.clone();
        }
        if let Some(subcase) = self.subcase {
            config.subcase = subcase;
        }
        if self.strict {
            config.overflow = OverflowPolicy::Strict;
        }
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn convert(args: &ConvertArgs) -> Result<(), InistrsError> {
    let config = args.job_config()?;
    let mut report = inistrs_io::run(&config)?;
    report.generated_at = Some(chrono::Utc::now().to_rfc3339());

    print_report(&report);
    if let Some(path) = &args.report {
        report.save(path)?;
    }

    println!("Combined data saved to {}", config.output.display());
    Ok(())
}

fn inspect(file: &Path, component: Component, comment: &str) -> Result<(), InistrsError> {
    let table = inistrs_io::read_component(file, component, comment)?;
    println!("component: {component}");
    println!("rows: {}", table.len());

    let ids = table.rows.iter().map(|r| r.element_id);
    if let (Some(min), Some(max)) = (ids.clone().min(), ids.max()) {
        println!("element_ids: {min}..={max}");
    }
    let values = table.rows.iter().map(|r| r.value);
    if let (Some(min), Some(max)) = (
        values.clone().reduce(f64::min),
        values.reduce(f64::max),
    ) {
        println!("values: {min} .. {max}");
    }
    Ok(())
}

fn print_report(report: &ConversionReport) {
    match serde_json::to_string(report) {
        Ok(json) => debug!(report = %json, "run report"),
        Err(err) => debug!("cannot serialize run report: {err}"),
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logging(cli.verbose);

    let result = match &cli.command {
        Command::Convert(args) => convert(args),
        Command::InitConfig { path, dir } => {
            let config = JobConfig::in_directory(dir);
            config.save(path).map(|()| {
                println!("wrote {}", path.display());
            })
        }
        Command::Inspect {
            file,
            component,
            comment,
        } => inspect(file, *component, comment),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}
