//! # Header Parser
//!
//! A line-oriented state machine that splits a source file into:
//!
//! ```text
//! Preamble -> (License) -> Blank -> Body
//! ```
//!
//! - `Preamble` keeps interpreter directives and encoding declarations, and
//!   drops the pieces of a previously generated header (blank comment lines,
//!   the banner, copyright lines).
//! - `License` drops a stale license block up to and including its last line.
//! - `Blank` guarantees a blank line between the header and the body.
//! - `Body` passes everything through.
//!
//! Exactly one [`ParsedLine::InsertionMarker`] is produced for every input.

use std::sync::LazyLock;

use regex::Regex;

use super::{HeaderError, HeaderSpec};
use crate::contributions::COPYRIGHT_NOTICE;

/// Encoding declarations are only honoured within this many leading lines.
const ENCODING_SEARCH_LINES: usize = 9;

/// Matches PEP 263 style declarations (`coding: utf-8`, `coding=utf-8`), which
/// also covers emacs and vim modelines. Only applied to comment lines.
static ENCODING_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"coding[:=]\s*[-\w.]+").expect("encoding regex must compile"));

/// Parser state. `start_line` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
  Preamble,
  License { start_line: usize },
  Blank,
  Body,
}

/// One element of the parser's output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedLine<'a> {
  /// An input line, verbatim including its line terminator
  Line(&'a str),
  /// A blank line separating the header from the body
  BlankSeparator,
  /// Where the generated header goes
  InsertionMarker,
}

/// How a line seen in the preamble is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PreambleLine {
  Directive,
  Encoding,
  BlankComment,
  Banner,
  Copyright,
  LicenseStart,
  Other,
}

fn classify_preamble(index: usize, text: &str, spec: &HeaderSpec<'_>) -> PreambleLine {
  if index == 0 && text.starts_with("#!") {
    return PreambleLine::Directive;
  }
  if text == spec.prefix() {
    return PreambleLine::BlankComment;
  }
  let Some(body) = spec.comment_body(text) else {
    return PreambleLine::Other;
  };

  // Exact renderings of the banner and license start take priority over the
  // prefix matches below.
  if body == spec.banner() {
    return PreambleLine::Banner;
  }
  if body == spec.license().first_line() {
    return PreambleLine::LicenseStart;
  }
  if index < ENCODING_SEARCH_LINES && ENCODING_REGEX.is_match(body) {
    return PreambleLine::Encoding;
  }

  if body.starts_with(spec.banner()) {
    PreambleLine::Banner
  } else if body.starts_with(COPYRIGHT_NOTICE) {
    PreambleLine::Copyright
  } else if body.starts_with(spec.license().first_line()) {
    PreambleLine::LicenseStart
  } else {
    PreambleLine::Other
  }
}

fn is_license_end(text: &str, spec: &HeaderSpec<'_>) -> bool {
  spec.comment_body(text) == Some(spec.license().last_line())
}

/// Advances the state machine by one input line, appending any output to
/// `out`, and returns the next state.
///
/// `index` is the 0-based line number and `line` includes its terminator.
pub fn step<'a>(
  state: ParserState,
  index: usize,
  line: &'a str,
  spec: &HeaderSpec<'_>,
  out: &mut Vec<ParsedLine<'a>>,
) -> ParserState {
  let text = line.trim_end();

  match state {
    ParserState::Preamble => match classify_preamble(index, text, spec) {
      PreambleLine::Directive | PreambleLine::Encoding => {
        out.push(ParsedLine::Line(line));
        ParserState::Preamble
      }
      PreambleLine::BlankComment | PreambleLine::Banner | PreambleLine::Copyright => ParserState::Preamble,
      PreambleLine::LicenseStart => {
        // A one-line license starts and ends on the same line
        if spec.license().lines().len() == 1 {
          out.push(ParsedLine::InsertionMarker);
          ParserState::Blank
        } else {
          ParserState::License { start_line: index + 1 }
        }
      }
      PreambleLine::Other => {
        // The marker goes before this line, which is then handled as the
        // first line after the header.
        out.push(ParsedLine::InsertionMarker);
        step(ParserState::Blank, index, line, spec, out)
      }
    },
    ParserState::License { start_line } => {
      if is_license_end(text, spec) {
        out.push(ParsedLine::InsertionMarker);
        ParserState::Blank
      } else {
        ParserState::License { start_line }
      }
    }
    ParserState::Blank => {
      if !text.is_empty() {
        out.push(ParsedLine::BlankSeparator);
      }
      out.push(ParsedLine::Line(line));
      ParserState::Body
    }
    ParserState::Body => {
      out.push(ParsedLine::Line(line));
      ParserState::Body
    }
  }
}

/// Handles end of input, appending any output still owed to `out`.
pub fn finish(state: ParserState, out: &mut Vec<ParsedLine<'_>>) -> Result<(), HeaderError> {
  match state {
    ParserState::Preamble => {
      out.push(ParsedLine::InsertionMarker);
      out.push(ParsedLine::BlankSeparator);
      Ok(())
    }
    ParserState::License { start_line } => Err(HeaderError::UnterminatedLicense { start_line }),
    ParserState::Blank => {
      out.push(ParsedLine::BlankSeparator);
      Ok(())
    }
    ParserState::Body => Ok(()),
  }
}

/// Parses `content` into a stream of lines with a single insertion marker.
///
/// # Errors
///
/// Returns [`HeaderError::UnterminatedLicense`] if a stale license block is
/// never closed.
pub fn parse<'a>(content: &'a str, spec: &HeaderSpec<'_>) -> Result<Vec<ParsedLine<'a>>, HeaderError> {
  let mut out = Vec::new();
  let mut state = ParserState::Preamble;

  for (index, line) in content.split_inclusive('\n').enumerate() {
    state = step(state, index, line, spec, &mut out);
  }
  finish(state, &mut out)?;

  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::license::LicenseText;

  const BANNER: &str = "Widgets: a library for making widgets";

  fn license() -> LicenseText {
    LicenseText::parse("SPDX-License-Identifier: BSD-3-Clause\n\nSee the LICENSE file for details.").unwrap()
  }

  fn markers(parsed: &[ParsedLine<'_>]) -> usize {
    parsed.iter().filter(|p| **p == ParsedLine::InsertionMarker).count()
  }

  #[test]
  fn test_classify_preamble() {
    let license = license();
    let spec = HeaderSpec::new("#", BANNER, &license);

    assert_eq!(classify_preamble(0, "#!/bin/sh", &spec), PreambleLine::Directive);
    assert_eq!(classify_preamble(0, "# -*- coding: utf-8 -*-", &spec), PreambleLine::Encoding);
    assert_eq!(classify_preamble(1, "# vim: set fileencoding=utf-8:", &spec), PreambleLine::Encoding);
    assert_eq!(classify_preamble(1, "#", &spec), PreambleLine::BlankComment);
    assert_eq!(classify_preamble(1, "# Widgets: a library for making widgets", &spec), PreambleLine::Banner);
    assert_eq!(classify_preamble(1, "# Copyright (c) 2015 A <a@x>", &spec), PreambleLine::Copyright);
    assert_eq!(classify_preamble(1, "# SPDX-License-Identifier: BSD-3-Clause", &spec), PreambleLine::LicenseStart);
    assert_eq!(classify_preamble(1, "import os", &spec), PreambleLine::Other);
    assert_eq!(classify_preamble(1, "", &spec), PreambleLine::Other);
  }

  #[test]
  fn test_license_starting_with_copyright_notice() {
    let license = LicenseText::parse("Copyright (c) The Widgets Authors.\nAll rights reserved.").unwrap();
    let spec = HeaderSpec::new("#", BANNER, &license);

    assert_eq!(
      classify_preamble(3, "# Copyright (c) The Widgets Authors.", &spec),
      PreambleLine::LicenseStart
    );
    assert_eq!(classify_preamble(1, "# Copyright (c) 2015 A <a@x>", &spec), PreambleLine::Copyright);
  }

  #[test]
  fn test_encoding_requires_comment_and_yields_to_banner() {
    let license = license();
    let spec = HeaderSpec::new("#", "Transcoding: tools for media", &license);

    assert_eq!(classify_preamble(1, "# Transcoding: tools for media", &spec), PreambleLine::Banner);
    assert_eq!(classify_preamble(1, "x = 'coding: utf-8'", &spec), PreambleLine::Other);
    assert_eq!(classify_preamble(1, "# -*- coding: utf-8 -*-", &spec), PreambleLine::Encoding);
  }

  #[test]
  fn test_directive_only_on_first_line() {
    let license = license();
    let spec = HeaderSpec::new("#", BANNER, &license);
    assert_eq!(classify_preamble(1, "#!/bin/sh", &spec), PreambleLine::Other);
  }

  #[test]
  fn test_encoding_only_in_leading_lines() {
    let license = license();
    let spec = HeaderSpec::new("#", BANNER, &license);
    assert_eq!(classify_preamble(8, "# coding: latin-1", &spec), PreambleLine::Encoding);
    assert_eq!(classify_preamble(9, "# coding: latin-1", &spec), PreambleLine::Other);
  }

  #[test]
  fn test_other_line_emits_marker_and_separator_on_same_input() {
    let license = license();
    let spec = HeaderSpec::new("#", BANNER, &license);
    let mut out = Vec::new();

    let next = step(ParserState::Preamble, 0, "import os\n", &spec, &mut out);

    assert_eq!(next, ParserState::Body);
    assert_eq!(
      out,
      vec![
        ParsedLine::InsertionMarker,
        ParsedLine::BlankSeparator,
        ParsedLine::Line("import os\n"),
      ]
    );
  }

  #[test]
  fn test_blank_line_after_marker_is_not_doubled() {
    let license = license();
    let spec = HeaderSpec::new("#", BANNER, &license);
    let mut out = Vec::new();

    let next = step(ParserState::Blank, 3, "\n", &spec, &mut out);

    assert_eq!(next, ParserState::Body);
    assert_eq!(out, vec![ParsedLine::Line("\n")]);
  }

  #[test]
  fn test_license_terminator_is_consumed() {
    let license = license();
    let spec = HeaderSpec::new("#", BANNER, &license);
    let mut out = Vec::new();

    let state = ParserState::License { start_line: 1 };
    let state = step(state, 1, "#\n", &spec, &mut out);
    assert_eq!(state, ParserState::License { start_line: 1 });
    assert!(out.is_empty());

    let state = step(state, 2, "# See the LICENSE file for details.\n", &spec, &mut out);
    assert_eq!(state, ParserState::Blank);
    assert_eq!(out, vec![ParsedLine::InsertionMarker]);
  }

  #[test]
  fn test_single_line_license_terminates_immediately() {
    let license = LicenseText::parse("SPDX-License-Identifier: MIT").unwrap();
    let spec = HeaderSpec::new("#", BANNER, &license);

    let parsed = parse("# SPDX-License-Identifier: MIT\nx = 1\n", &spec).unwrap();
    assert_eq!(
      parsed,
      vec![
        ParsedLine::InsertionMarker,
        ParsedLine::BlankSeparator,
        ParsedLine::Line("x = 1\n"),
      ]
    );
  }

  #[test]
  fn test_preserves_directive_and_body() {
    let license = license();
    let spec = HeaderSpec::new("#", BANNER, &license);

    let parsed = parse("#!/usr/bin/x\nprint(1)\n", &spec).unwrap();
    assert_eq!(
      parsed,
      vec![
        ParsedLine::Line("#!/usr/bin/x\n"),
        ParsedLine::InsertionMarker,
        ParsedLine::BlankSeparator,
        ParsedLine::Line("print(1)\n"),
      ]
    );
  }

  #[test]
  fn test_body_lines_are_never_touched() {
    let license = license();
    let spec = HeaderSpec::new("#", BANNER, &license);

    let content = "x = 1\n#\n# Copyright (c) 2000 Not <a@header>\n# Widgets: a library for making widgets\n";
    let parsed = parse(content, &spec).unwrap();
    let body: String = parsed
      .iter()
      .filter_map(|p| match p {
        ParsedLine::Line(line) => Some(*line),
        _ => None,
      })
      .collect();
    assert_eq!(body, content);
  }

  #[test]
  fn test_exactly_one_marker() {
    let license = license();
    let spec = HeaderSpec::new("#", BANNER, &license);

    let inputs = [
      "",
      "\n",
      "#\n#\n#\n",
      "#!/bin/sh\n",
      "x = 1\ny = 2\n",
      "# Widgets: a library for making widgets\n# Copyright (c) 2015 A <a@x>\n",
      "# SPDX-License-Identifier: BSD-3-Clause\n#\n# See the LICENSE file for details.\n",
      "# SPDX-License-Identifier: BSD-3-Clause\n#\n# See the LICENSE file for details.\nx = 1",
    ];

    for input in inputs {
      let parsed = parse(input, &spec).unwrap();
      assert_eq!(markers(&parsed), 1, "expected one marker for {:?}", input);
    }
  }

  #[test]
  fn test_empty_input() {
    let license = license();
    let spec = HeaderSpec::new("#", BANNER, &license);

    let parsed = parse("", &spec).unwrap();
    assert_eq!(parsed, vec![ParsedLine::InsertionMarker, ParsedLine::BlankSeparator]);
  }

  #[test]
  fn test_unterminated_license_reports_start_line() {
    let license = license();
    let spec = HeaderSpec::new("#", BANNER, &license);

    let result = parse("#!/bin/sh\n# SPDX-License-Identifier: BSD-3-Clause\necho hi\n", &spec);
    assert_eq!(result, Err(HeaderError::UnterminatedLicense { start_line: 2 }));
  }

  #[test]
  fn test_crlf_lines() {
    let license = license();
    let spec = HeaderSpec::new("#", BANNER, &license);

    let parsed = parse("#\r\n# Copyright (c) 2015 A <a@x>\r\nx = 1\r\n", &spec).unwrap();
    assert_eq!(
      parsed,
      vec![
        ParsedLine::InsertionMarker,
        ParsedLine::BlankSeparator,
        ParsedLine::Line("x = 1\r\n"),
      ]
    );
  }
}
