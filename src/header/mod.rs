//! # Header Module
//!
//! This module locates and regenerates the copyright header of a source file.
//!
//! The work is split in two:
//! - [`parser`] classifies each line of the file into preamble, stale header
//!   and body, and emits a single [`ParsedLine::InsertionMarker`] where the new
//!   header belongs
//! - [`writer`] replaces that marker with the rendered header
//!
//! Both sides are driven by a [`HeaderSpec`], so a header written by
//! [`rewrite`] is always recognised as stale by the next run. Running
//! [`rewrite`] twice with the same contributors yields identical output.

pub mod parser;
pub mod writer;

pub use parser::{ParsedLine, ParserState, parse};
pub use writer::render;

use crate::contributions::FileHeaderPlan;
use crate::license::LicenseText;

/// Errors detected while parsing an existing header.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
  /// A stale license block starts but its final line never appears. Rewriting
  /// such a file would silently drop everything after the block.
  #[error("stale license block starting at line {start_line} is never terminated")]
  UnterminatedLicense { start_line: usize },
}

/// Everything needed to recognise and render the header for one comment
/// style.
#[derive(Debug, Clone, Copy)]
pub struct HeaderSpec<'a> {
  prefix: &'a str,
  banner: &'a str,
  license: &'a LicenseText,
}

impl<'a> HeaderSpec<'a> {
  /// Creates a header spec. Trailing whitespace in `prefix` is ignored.
  pub fn new(prefix: &'a str, banner: &'a str, license: &'a LicenseText) -> Self {
    Self {
      prefix: prefix.trim_end(),
      banner: banner.trim(),
      license,
    }
  }

  pub const fn prefix(&self) -> &'a str {
    self.prefix
  }

  pub const fn banner(&self) -> &'a str {
    self.banner
  }

  pub const fn license(&self) -> &'a LicenseText {
    self.license
  }

  /// Renders `text` as a comment line, without a line terminator.
  pub fn comment(&self, text: &str) -> String {
    format!("{} {}", self.prefix, text).trim_end().to_string()
  }

  /// Returns the text following the comment prefix (and one separating
  /// space), or `None` if `text` is not a comment.
  pub(crate) fn comment_body<'t>(&self, text: &'t str) -> Option<&'t str> {
    text
      .strip_prefix(self.prefix)
      .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
  }
}

/// Parses `content` and renders it back with a freshly generated header.
///
/// # Errors
///
/// Returns [`HeaderError::UnterminatedLicense`] if the file contains the start
/// of a stale license block without its end.
pub fn rewrite(content: &str, spec: &HeaderSpec<'_>, plan: &FileHeaderPlan) -> Result<String, HeaderError> {
  let parsed = parse(content, spec)?;
  Ok(render(&parsed, spec, plan))
}
