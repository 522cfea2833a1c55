//! Casting-simulation stress export to OptiStruct INISTRS conversion.
//!
//! The casting tool exports one two-column table per stress-tensor component
//! (XX, YY, ZZ, XY, YZ, ZX). This crate provides:
//! - **Reader** for the `element_id value` tables with `$` comments
//! - **Joiner** combining the six tables on element id (inner join)
//! - **Fixed-width formatter** for 8-column text, integer and decimal fields
//! - **INISTRS block** assembly and atomic output writing
//! - **JSON job configuration** and run reports
//!
//! ## Usage
//!
//! ```rust,no_run
//! use inistrs_io::{JobConfig, run};
//!
//! let config = JobConfig::in_directory("casting_results");
//! let report = run(&config)?;
//! println!("{} elements written", report.joined_records);
//! # Ok::<(), inistrs_io::InistrsError>(())
//! ```

pub mod block;
pub mod component;
mod config;
mod emit;
pub mod error;
pub mod field;
pub mod join;
mod pipeline;
pub mod reader;
mod report;

pub use block::{BlockOptions, OutputBlock};
pub use component::{Component, ComponentRow, ComponentTable};
pub use config::JobConfig;
pub use emit::write_block;
pub use error::{InistrsError, Result};
pub use field::{Field, OverflowPolicy, natural_decimal};
pub use join::{JoinOutcome, JoinedRecord, join_tables};
pub use pipeline::{Conversion, convert_tables, read_sources, run};
pub use reader::{parse_component, read_component};
pub use report::ConversionReport;
