//! Error types for inistrs-io

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::component::Component;

pub type Result<T> = std::result::Result<T, InistrsError>;

#[derive(Error, Debug)]
pub enum InistrsError {
    #[error("cannot read source '{}': {source}", .path.display())]
    SourceUnavailable { path: PathBuf, source: io::Error },

    #[error("{origin}:{line}: {message}")]
    Parse {
        origin: String,
        line: usize,
        message: String,
    },

    #[error(
        "element {element_id} appears more than once in the {component} table (lines {first_line} and {line})"
    )]
    DuplicateKey {
        component: Component,
        element_id: u64,
        first_line: usize,
        line: usize,
    },

    #[error("{kind} field '{text}' does not fit in {width} columns")]
    FieldOverflow {
        kind: &'static str,
        text: String,
        width: usize,
    },

    #[error("expected the {expected} table at position {position}, found {found}")]
    ComponentMismatch {
        position: usize,
        expected: Component,
        found: Component,
    },

    #[error("cannot write output '{}': {source}", .path.display())]
    DestinationWrite { path: PathBuf, source: io::Error },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
