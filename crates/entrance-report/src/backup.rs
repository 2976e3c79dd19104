//! Binary backup of the record file.

use std::path::Path;

use anyhow::{Context, Result};

/// Byte-for-byte copy of the store at `source` into `dest`. Returns bytes copied.
pub fn write_backup(source: &Path, dest: &Path) -> Result<u64> {
    anyhow::ensure!(
        source.exists(),
        "record file {} does not exist",
        source.display()
    );
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let bytes = std::fs::copy(source, dest).with_context(|| {
        format!(
            "failed to copy {} to {}",
            source.display(),
            dest.display()
        )
    })?;
    tracing::info!("backed up {bytes} bytes to {}", dest.display());
    Ok(bytes)
}
