//! # Output Module
//!
//! This module centralizes all user-facing output for the edcopyright tool.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! ## Design Goals
//!
//! - **Informative**: Show actionable information without requiring flags
//! - **Scannable**: Use formatting to make output easy to parse visually
//! - **Progressive**: More detail with `-v`, silence with `-q`
//! - **Scriptable**: Keep stdout predictable for piping/automation

use std::path::Path;
use std::time::Duration;

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::processor::{FileAction, FileReport};

/// Symbols used in output
pub mod symbols {
  /// Up to date
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Outdated
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Skipped
  pub const IGNORED: &str = "-";
  /// Header rewritten
  pub const UPDATED: &str = "\u{21bb}"; // ↻
}

/// Maximum number of files to show in the default output before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Print the initial "Checking N files..." or "Updating N files..." message.
pub fn print_start_message(file_count: usize, check_only: bool) {
  if is_quiet() {
    return;
  }

  let verb = if check_only { "Checking" } else { "Updating" };
  println!("{} {} {}...", verb, file_count, plural(file_count, "file", "files"));
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print the files whose header changed, or would change in check mode.
///
/// In quiet check mode only the bare paths are printed, one per line, so the
/// output can be piped.
pub fn print_updated_files(files: &[&FileReport], check_only: bool, workspace_root: Option<&Path>) {
  if files.is_empty() {
    return;
  }

  if is_quiet() {
    if check_only {
      for file in files {
        println!("{}", make_relative_path(&file.path, workspace_root));
      }
    }
    return;
  }

  let count = files.len();
  let header = if check_only {
    format!(
      "{} {} {} with outdated copyright headers:",
      symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
      count,
      plural(count, "file", "files")
    )
  } else {
    format!(
      "{} Updated copyright headers in {} {}:",
      symbols::UPDATED.if_supports_color(Stream::Stdout, |s| s.yellow()),
      count,
      plural(count, "file", "files")
    )
  };
  println!("{}", header);

  print_file_list(files, workspace_root);
}

/// Print the files skipped because no line could be attributed.
pub fn print_skipped_files(files: &[&FileReport], workspace_root: Option<&Path>) {
  if is_quiet() || files.is_empty() {
    return;
  }

  let count = files.len();
  println!(
    "{} {} {} without committed history skipped:",
    symbols::IGNORED.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    count,
    plural(count, "file", "files")
  );

  print_file_list(files, workspace_root);
}

fn print_file_list(files: &[&FileReport], workspace_root: Option<&Path>) {
  let count = files.len();
  let limit = if is_verbose() { count } else { DEFAULT_FILE_LIST_LIMIT };

  for file in files.iter().take(limit) {
    println!("  {}", make_relative_path(&file.path, workspace_root));
  }

  if count > limit {
    println!(
      "  {} ... and {} more (use -v to see all)",
      "".if_supports_color(Stream::Stdout, |s| s.dimmed()),
      count - limit
    );
  }
}

/// Print the success message when every header is current.
pub fn print_all_files_ok() {
  if is_quiet() {
    return;
  }

  println!(
    "{} All copyright headers are up to date.",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

/// Counts per [`FileAction`], plus elapsed time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
  pub updated: usize,
  pub unchanged: usize,
  pub skipped: usize,
  pub processing_time: Duration,
}

impl ProcessingSummary {
  pub fn from_reports(reports: &[FileReport], processing_time: Duration) -> Self {
    let mut summary = Self {
      processing_time,
      ..Self::default()
    };

    for report in reports {
      match report.action {
        FileAction::Updated => summary.updated += 1,
        FileAction::Unchanged => summary.unchanged += 1,
        FileAction::NoAuthorship => summary.skipped += 1,
      }
    }

    summary
  }
}

/// Print the processing summary.
///
/// Format: "Summary: X updated, Y up to date, Z skipped". In check mode the
/// first count reads "outdated". In verbose mode, also shows timing.
pub fn print_summary(summary: &ProcessingSummary, check_only: bool) {
  if is_quiet() {
    return;
  }

  let changed_label = if check_only { "outdated" } else { "updated" };
  let changed_str = if check_only && summary.updated > 0 {
    summary.updated.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else {
    summary.updated.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
  };
  let unchanged_str = summary.unchanged.if_supports_color(Stream::Stdout, |s| s.cyan());
  let skipped_str = summary.skipped.if_supports_color(Stream::Stdout, |s| s.dimmed());

  let mut summary_line = format!(
    "Summary: {} {}, {} up to date, {} skipped",
    changed_str, changed_label, unchanged_str, skipped_str
  );

  if is_verbose() {
    summary_line.push_str(&format!(" ({:.2}s)", summary.processing_time.as_secs_f64()));
  }

  println!("{}", summary_line);
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

/// Reports grouped by action, each group in path order.
pub struct CategorizedReports<'a> {
  pub updated: Vec<&'a FileReport>,
  pub unchanged: Vec<&'a FileReport>,
  pub skipped: Vec<&'a FileReport>,
}

impl<'a> CategorizedReports<'a> {
  /// Categorize a slice of file reports.
  pub fn from_reports(reports: &'a [FileReport]) -> Self {
    let mut sorted: Vec<&FileReport> = reports.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    let mut updated = Vec::new();
    let mut unchanged = Vec::new();
    let mut skipped = Vec::new();

    for report in sorted {
      match report.action {
        FileAction::Updated => updated.push(report),
        FileAction::Unchanged => unchanged.push(report),
        FileAction::NoAuthorship => skipped.push(report),
      }
    }

    Self {
      updated,
      unchanged,
      skipped,
    }
  }
}

const fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
  if count == 1 { one } else { many }
}

/// Make a repository-relative path relative to the current directory for
/// display, so printed paths can be pasted back into the shell.
fn make_relative_path(path: &Path, workspace_root: Option<&Path>) -> String {
  let Some(root) = workspace_root else {
    return path.to_string_lossy().to_string();
  };

  let absolute = root.join(path);
  std::env::current_dir()
    .ok()
    .and_then(|cwd| pathdiff::diff_paths(&absolute, cwd))
    .unwrap_or_else(|| path.to_path_buf())
    .to_string_lossy()
    .to_string()
}
