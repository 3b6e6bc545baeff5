//! # Header Writer
//!
//! Renders the parser's output stream back into file content, replacing the
//! insertion marker with the generated header:
//!
//! ```text
//! #                      <- only if something (shebang, encoding) precedes it
//! # <banner>
//! # Copyright (c) <years> <author> <<email>>
//! # ...
//! #
//! # <license lines>
//! ```

use super::{HeaderSpec, ParsedLine};
use crate::contributions::FileHeaderPlan;

/// Picks the line ending for generated lines from the first terminated input
/// line, defaulting to `\n`.
fn detect_newline(parsed: &[ParsedLine<'_>]) -> &'static str {
  parsed
    .iter()
    .find_map(|p| match p {
      ParsedLine::Line(line) if line.ends_with('\n') => Some(if line.ends_with("\r\n") { "\r\n" } else { "\n" }),
      _ => None,
    })
    .unwrap_or("\n")
}

/// Builds the header lines, without line terminators.
pub fn header_lines(spec: &HeaderSpec<'_>, plan: &FileHeaderPlan) -> Vec<String> {
  let mut lines = Vec::with_capacity(plan.contributors().len() + spec.license().lines().len() + 2);

  lines.push(spec.comment(spec.banner()));
  lines.extend(plan.contributors().iter().map(|c| spec.comment(&c.to_string())));
  lines.push(spec.prefix().to_string());
  lines.extend(spec.license().lines().iter().map(|line| spec.comment(line)));

  lines
}

/// Renders the parsed stream into the final file content.
pub fn render(parsed: &[ParsedLine<'_>], spec: &HeaderSpec<'_>, plan: &FileHeaderPlan) -> String {
  let newline = detect_newline(parsed);
  let mut out = String::new();

  let push_generated = |out: &mut String, line: &str| {
    if !out.is_empty() && !out.ends_with('\n') {
      out.push_str(newline);
    }
    out.push_str(line);
    out.push_str(newline);
  };

  for item in parsed {
    match item {
      ParsedLine::Line(line) => out.push_str(line),
      ParsedLine::BlankSeparator => push_generated(&mut out, ""),
      ParsedLine::InsertionMarker => {
        if !out.is_empty() {
          push_generated(&mut out, spec.prefix());
        }
        for line in header_lines(spec, plan) {
          push_generated(&mut out, &line);
        }
      }
    }
  }

  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::contributions::{ContributorRecord, Years};
  use crate::license::LicenseText;

  fn plan() -> FileHeaderPlan {
    FileHeaderPlan::new(vec![
      ContributorRecord {
        author: "Bob".to_string(),
        email: "bob@x".to_string(),
        years: Years::Single(2016),
      },
      ContributorRecord {
        author: "Alice".to_string(),
        email: "alice@x".to_string(),
        years: Years::Range(2015, 2021),
      },
    ])
  }

  #[test]
  fn test_header_lines_order() {
    let license = LicenseText::parse("Line one  \n\nLine three").unwrap();
    let spec = HeaderSpec::new("//", "Project", &license);

    assert_eq!(
      header_lines(&spec, &plan()),
      vec![
        "// Project",
        "// Copyright (c) 2015-2021 Alice <alice@x>",
        "// Copyright (c) 2016 Bob <bob@x>",
        "//",
        "// Line one",
        "//",
        "// Line three",
      ]
    );
  }

  #[test]
  fn test_no_leading_blank_comment_at_top_of_file() {
    let license = LicenseText::parse("L").unwrap();
    let spec = HeaderSpec::new("#", "Project", &license);

    let rendered = render(&[ParsedLine::InsertionMarker, ParsedLine::BlankSeparator], &spec, &plan());
    assert!(rendered.starts_with("# Project\n"));
    assert!(rendered.ends_with("# L\n\n"));
  }

  #[test]
  fn test_unterminated_preamble_line_gets_newline() {
    let license = LicenseText::parse("L").unwrap();
    let spec = HeaderSpec::new("#", "Project", &license);

    let rendered = render(
      &[ParsedLine::Line("#!/bin/sh"), ParsedLine::InsertionMarker],
      &spec,
      &FileHeaderPlan::default(),
    );
    assert_eq!(rendered, "#!/bin/sh\n#\n# Project\n#\n# L\n");
  }

  #[test]
  fn test_crlf_is_preserved() {
    let license = LicenseText::parse("L").unwrap();
    let spec = HeaderSpec::new("#", "Project", &license);

    let rendered = render(
      &[
        ParsedLine::InsertionMarker,
        ParsedLine::BlankSeparator,
        ParsedLine::Line("x = 1\r\n"),
      ],
      &spec,
      &FileHeaderPlan::default(),
    );
    assert_eq!(rendered, "# Project\r\n#\r\n# L\r\n\r\nx = 1\r\n");
  }
}
