use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::emit::write_atomic;
use crate::error::{InistrsError, Result};

/// Summary of one conversion run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConversionReport {
    pub rows_read: BTreeMap<Component, usize>,
    pub joined_records: usize,
    /// Elements left out because at least one component table lacks them.
    pub dropped_elements: Vec<u64>,
    pub overflowed_fields: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

impl ConversionReport {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = serde_json::to_vec_pretty(self)?;
        write_atomic(path, &bytes).map_err(|source| InistrsError::DestinationWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}
