//! # Selection Module
//!
//! Decides which tracked files get a header, from include and exclude glob
//! patterns over repository-relative paths. Matching follows shell `fnmatch`
//! rules: `*` also matches `/`, so `*.py` selects Python files at any depth.

use std::path::Path;

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: true,
  require_literal_separator: false,
  require_literal_leading_dot: false,
};

/// Result of a file filtering operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
  /// Whether the file should be processed
  pub should_process: bool,
  /// Reason why the file should not be processed (if any)
  pub reason: Option<String>,
}

impl FilterResult {
  pub const fn process() -> Self {
    Self {
      should_process: true,
      reason: None,
    }
  }

  pub fn skip(reason: impl Into<String>) -> Self {
    Self {
      should_process: false,
      reason: Some(reason.into()),
    }
  }
}

/// Trait for components that filter files.
pub trait FileFilter: Send + Sync {
  /// Determines whether a repository-relative path should be processed.
  fn should_process(&self, path: &Path) -> FilterResult;
}

/// Include/exclude glob selection. Exclude patterns always take precedence;
/// an empty include list selects everything.
#[derive(Debug, Clone, Default)]
pub struct Selection {
  include: Vec<Pattern>,
  exclude: Vec<Pattern>,
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
  patterns
    .iter()
    .map(|p| {
      let normalized = p.replace('\\', "/");
      Pattern::new(&normalized).with_context(|| format!("Invalid glob pattern: {}", p))
    })
    .collect()
}

fn first_match<'p>(patterns: &'p [Pattern], path: &str) -> Option<&'p Pattern> {
  patterns.iter().find(|p| p.matches_with(path, MATCH_OPTIONS))
}

impl Selection {
  /// Compiles the include and exclude patterns.
  ///
  /// # Errors
  ///
  /// Returns an error if any pattern is not a valid glob.
  pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
    Ok(Self {
      include: compile(include)?,
      exclude: compile(exclude)?,
    })
  }
}

impl FileFilter for Selection {
  fn should_process(&self, path: &Path) -> FilterResult {
    let path_str = path.to_string_lossy().replace('\\', "/");

    if let Some(pattern) = first_match(&self.exclude, &path_str) {
      return FilterResult::skip(format!("Matches exclude pattern '{}'", pattern));
    }

    if !self.include.is_empty() && first_match(&self.include, &path_str).is_none() {
      return FilterResult::skip("Does not match any include pattern");
    }

    FilterResult::process()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn strings(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| p.to_string()).collect()
  }

  fn selected(selection: &Selection, path: &str) -> bool {
    selection.should_process(Path::new(path)).should_process
  }

  #[test]
  fn test_default_selects_everything() {
    let selection = Selection::new(&[], &[]).unwrap();
    assert!(selected(&selection, "a.py"));
    assert!(selected(&selection, "deep/nested/README.md"));
  }

  #[test]
  fn test_include_star_crosses_directories() {
    let selection = Selection::new(&strings(&["*.py"]), &[]).unwrap();
    assert!(selected(&selection, "setup.py"));
    assert!(selected(&selection, "pkg/sub/mod.py"));
    assert!(!selected(&selection, "docs/index.rst"));
  }

  #[test]
  fn test_exclude_takes_precedence() {
    let selection = Selection::new(&strings(&["*.py", "*.rst"]), &strings(&["docs/examples/*"])).unwrap();
    assert!(selected(&selection, "docs/index.rst"));
    assert!(!selected(&selection, "docs/examples/led.py"));

    let result = selection.should_process(Path::new("docs/examples/led.py"));
    assert!(!result.should_process);
    assert_eq!(result.reason.as_deref(), Some("Matches exclude pattern 'docs/examples/*'"));

    let result = selection.should_process(Path::new("README.md"));
    assert_eq!(result.reason.as_deref(), Some("Does not match any include pattern"));
  }

  #[test]
  fn test_exclude_without_include() {
    let selection = Selection::new(&[], &strings(&["LICENSE*", ".*"])).unwrap();
    assert!(!selected(&selection, "LICENSE.txt"));
    assert!(!selected(&selection, ".gitignore"));
    assert!(selected(&selection, "src/lib.py"));
  }

  #[test]
  fn test_invalid_pattern() {
    assert!(Selection::new(&strings(&["[unclosed"]), &[]).is_err());
  }
}
