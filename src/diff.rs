//! # Diff Module
//!
//! Renders line diffs between a file's current content and its rewritten
//! header, for `--show-diff` and `--save-diff`.

use std::fmt::Write as _;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use similar::{ChangeTag, TextDiff};

/// Manages diff creation and rendering for header rewrites.
///
/// Diffs can be shown on stderr, appended to a single consolidated file, or
/// both.
#[derive(Debug, Clone, Default)]
pub struct DiffManager {
  /// Whether to print diffs to stderr
  pub show_diff: bool,

  /// File that collects the diffs of every rewritten file
  pub save_diff_path: Option<PathBuf>,
}

impl DiffManager {
  pub const fn new(show_diff: bool, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      save_diff_path,
    }
  }

  /// Whether any diff output was requested.
  pub const fn is_enabled(&self) -> bool {
    self.show_diff || self.save_diff_path.is_some()
  }

  /// Truncates the diff file so a run never appends to a previous run's
  /// output.
  pub fn init(&self) -> Result<()> {
    if let Some(ref diff_path) = self.save_diff_path {
      File::create(diff_path).with_context(|| format!("Failed to create diff file: {}", diff_path.display()))?;
    }
    Ok(())
  }

  /// Displays and/or saves the diff between `original` and `new` for `path`.
  ///
  /// Saved diffs are appended, so one file accumulates every rewritten file of
  /// the run. Colors only apply to stderr; the saved file is plain text.
  pub fn display_diff(&self, path: &Path, original: &str, new: &str) -> Result<()> {
    let diff = TextDiff::from_lines(original, new);

    let mut diff_content = String::new();
    let _ = writeln!(diff_content, "Diff for {}:", path.display());

    if self.show_diff {
      eprintln!("Diff for {}:", path.display());
    }

    for change in diff.iter_all_changes() {
      let sign = match change.tag() {
        ChangeTag::Delete => "-",
        ChangeTag::Insert => "+",
        ChangeTag::Equal => " ",
      };
      let line = format!("{}{}", sign, change.value());

      if self.show_diff {
        match change.tag() {
          ChangeTag::Delete => eprint!("{}", line.if_supports_color(Stream::Stderr, |l| l.red())),
          ChangeTag::Insert => eprint!("{}", line.if_supports_color(Stream::Stderr, |l| l.green())),
          ChangeTag::Equal => eprint!("{}", line),
        }
        if change.missing_newline() {
          eprintln!();
        }
      }

      diff_content.push_str(&line);
      if change.missing_newline() {
        diff_content.push('\n');
      }
    }

    if self.show_diff {
      eprintln!();
    }
    diff_content.push('\n');

    if let Some(ref diff_path) = self.save_diff_path {
      let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(diff_path)
        .with_context(|| format!("Failed to open diff file: {}", diff_path.display()))?;
      file
        .write_all(diff_content.as_bytes())
        .with_context(|| format!("Failed to write diff file: {}", diff_path.display()))?;
    }

    Ok(())
  }
}
