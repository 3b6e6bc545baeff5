//! # File I/O Module
//!
//! Reading and whole-file replacement for the processor. A file is either
//! fully rewritten or left untouched: new content goes to a temporary file in
//! the same directory, which is then renamed over the original.

use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// File I/O operations for the processor.
pub struct FileIO;

impl FileIO {
  /// Read full file content.
  pub fn read_full_content(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
  }

  /// Atomically replaces `path` with `content`, keeping its permissions.
  pub fn write_file(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };

    let permissions = std::fs::metadata(path)
      .with_context(|| format!("Failed to read metadata: {}", path.display()))?
      .permissions();

    let mut temp =
      NamedTempFile::new_in(dir).with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    temp
      .write_all(content.as_bytes())
      .with_context(|| format!("Failed to write temporary file for {}", path.display()))?;
    temp
      .as_file()
      .set_permissions(permissions)
      .with_context(|| format!("Failed to set permissions for {}", path.display()))?;

    temp
      .persist(path)
      .map_err(|e| e.error)
      .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(())
  }
}
