//! Job configuration: which files to read, where to write, how to format.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::block::{BlockOptions, DEFAULT_SUBCASE};
use crate::component::Component;
use crate::emit::write_atomic;
use crate::error::{InistrsError, Result};
use crate::field::OverflowPolicy;
use crate::reader::DEFAULT_COMMENT_MARKER;

pub const DEFAULT_OUTPUT: &str = "mapped_stress_data.fem";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Source file of each stress component.
    pub sources: BTreeMap<Component, PathBuf>,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_comment_marker")]
    pub comment_marker: String,
    #[serde(default = "default_subcase")]
    pub subcase: u32,
    #[serde(default)]
    pub overflow: OverflowPolicy,
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_comment_marker() -> String {
    DEFAULT_COMMENT_MARKER.to_string()
}

fn default_subcase() -> u32 {
    DEFAULT_SUBCASE
}

impl JobConfig {
    /// Configuration reading the casting tool's default export names from
    /// `dir` and writing the default output file into it.
    pub fn in_directory(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let sources = Component::ALL
            .into_iter()
            .map(|c| (c, dir.join(c.default_file_name())))
            .collect();
        Self {
            sources,
            output: dir.join(DEFAULT_OUTPUT),
            comment_marker: default_comment_marker(),
            subcase: DEFAULT_SUBCASE,
            overflow: OverflowPolicy::default(),
        }
    }

    /// Load a JSON configuration. Relative paths inside it are taken relative
    /// to the directory holding the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| {
            InistrsError::Config(format!("cannot read {}: {err}", path.display()))
        })?;
        let mut config: JobConfig = serde_json::from_slice(&bytes)?;

        if let Some(base) = path.parent()
            && !base.as_os_str().is_empty()
        {
            for source in config.sources.values_mut() {
                if source.is_relative() {
                    *source = base.join(&*source);
                }
            }
            if config.output.is_relative() {
                config.output = base.join(&config.output);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = serde_json::to_vec_pretty(self)?;
        write_atomic(path, &bytes).map_err(|source| InistrsError::DestinationWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = Component::ALL
            .into_iter()
            .filter(|c| !self.sources.contains_key(c))
            .map(Component::label)
            .collect();
        if !missing.is_empty() {
            return Err(InistrsError::Config(format!(
                "no source file given for component(s) {}",
                missing.join(", ")
            )));
        }
        if self.comment_marker.is_empty() || self.comment_marker.chars().any(char::is_whitespace) {
            return Err(InistrsError::Config(format!(
                "comment marker '{}' must be non-empty and contain no whitespace",
                self.comment_marker
            )));
        }
        Ok(())
    }

    pub fn source(&self, component: Component) -> Result<&Path> {
        self.sources
            .get(&component)
            .map(PathBuf::as_path)
            .ok_or_else(|| InistrsError::Config(format!("no source file given for {component}")))
    }

    pub fn block_options(&self) -> BlockOptions {
        BlockOptions {
            subcase: self.subcase,
            overflow: self.overflow,
        }
    }
}
