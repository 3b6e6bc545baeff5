//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing.

mod update;

use clap::Parser;
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
pub use update::{UpdateArgs, run_update};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

const LONG_VERSION: &str = concat!(
  env!("CARGO_PKG_VERSION"),
  " (",
  env!("GIT_HASH"),
  " ",
  env!("GIT_DATE"),
  ")"
);

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  long_version = LONG_VERSION,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Rewrite the headers of every Python and reST file
  edcopyright --banner \"Widgets: a library for making widgets\" -f LICENSE.txt \"*.py\" \"*.rst\"

  # Fail (exit 1) if any header is out of date, without touching files
  edcopyright --check --banner \"Widgets\" -f LICENSE.txt \"*.py\"

  # Show what would change
  edcopyright --check --show-diff \"*.py\"

  # Save the pending changes as a diff
  edcopyright --check --save-diff headers.diff \"*.py\"

  # Skip vendored code and canonicalise authors through .mailmap
  edcopyright --exclude \"vendor/*\" --use-mailmap \"*.py\"

  # Give an unknown extension a comment prefix
  edcopyright --comment-style \"pyw:#\" \"*.py\" \"*.pyw\"
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(flatten)]
  pub update_args: UpdateArgs,
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
