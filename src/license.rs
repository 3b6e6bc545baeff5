//! # License Module
//!
//! Loads the license notice that closes every generated header. The text is
//! read once per run and then shared by reference with every file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::verbose_log;

/// The license notice, split into lines.
///
/// Trailing whitespace is stripped from every line and leading/trailing blank
/// lines are removed, so [`first_line`](Self::first_line) and
/// [`last_line`](Self::last_line) are always non-blank. These two lines are
/// how a stale license block is recognised in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseText {
  lines: Vec<String>,
}

impl LicenseText {
  /// Reads the license text from `path`.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or contains no text.
  pub fn load(path: &Path) -> Result<Self> {
    verbose_log!("Loading license text from: {}", path.display());

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read license file: {}", path.display()))?;

    Self::parse(&content).with_context(|| format!("Invalid license file: {}", path.display()))
  }

  /// Builds the license text from an in-memory string.
  pub fn parse(content: &str) -> Result<Self> {
    let lines: Vec<String> = content.lines().map(|line| line.trim_end().to_string()).collect();

    let Some(start) = lines.iter().position(|line| !line.is_empty()) else {
      bail!("License text is empty");
    };
    // `start` exists, so a last non-empty line exists too
    let end = lines.iter().rposition(|line| !line.is_empty()).unwrap_or(start);

    Ok(Self {
      lines: lines[start..=end].to_vec(),
    })
  }

  pub fn lines(&self) -> &[String] {
    &self.lines
  }

  pub fn first_line(&self) -> &str {
    self.lines.first().map_or("", String::as_str)
  }

  pub fn last_line(&self) -> &str {
    self.lines.last().map_or("", String::as_str)
  }
}
