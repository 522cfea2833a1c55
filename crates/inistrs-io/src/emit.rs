use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::block::OutputBlock;
use crate::error::{InistrsError, Result};

/// Write `block` to `path` in one piece.
///
/// The text goes to a temporary file next to `path` which is then renamed
/// over it, so a failed run never leaves a half-written deck behind.
pub fn write_block(path: impl AsRef<Path>, block: &OutputBlock) -> Result<()> {
    let path = path.as_ref();
    write_atomic(path, block.render().as_bytes()).map_err(|source| {
        InistrsError::DestinationWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!(
        path = %path.display(),
        lines = block.lines().len(),
        "wrote INISTRS block"
    );
    Ok(())
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
