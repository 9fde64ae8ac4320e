//! Writes generated artifacts into the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Creates `out_dir` if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_dir(out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create directory: {}", out_dir.display()))
}

/// Writes one artifact to `out_dir/name` and returns its path.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_artifact(out_dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = out_dir.join(name);
    fs::write(&path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    debug!(path = %path.display(), bytes = content.len(), "wrote artifact");
    Ok(path)
}
