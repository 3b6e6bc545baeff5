//! # Logging Module
//!
//! Two kinds of console output sit next to the `tracing` diagnostics:
//!
//! - [`verbose_log!`] narrates a run (which files were skipped, which config
//!   was loaded, how long blaming took). It prints to stderr and only with
//!   `-v`, so it never mixes with the file list a `--check --quiet` run prints
//!   on stdout.
//! - [`info_log!`] reports a result the user asked for, such as where a diff
//!   was saved. It prints to stdout, highlighted, unless `--quiet` is set.
//!
//! `tracing` stays the channel for developer diagnostics, filtered through
//! `RUST_LOG` (see [`init_tracing`]).
//!
//! ```rust
//! use edcopyright::logging::{ColorMode, set_verbose};
//! use edcopyright::{info_log, verbose_log};
//!
//! set_verbose();
//! ColorMode::Never.apply();
//!
//! verbose_log!("Skipping: {} ({})", "docs/conf.py", "Does not match any include pattern");
//! info_log!("Saved diff to {}", "headers.diff");
//! ```

mod modes;

pub use modes::{ColorMode, init_tracing, is_quiet, is_verbose, set_quiet, set_verbose};
use owo_colors::{OwoColorize, Stream};

/// Prints a progress message to stderr when `-v` is given.
#[macro_export]
macro_rules! verbose_log {
  ($($arg:tt)*) => {
    if $crate::logging::is_verbose() {
      eprintln!($($arg)*);
    }
  };
}

/// Prints a result message to stdout unless `--quiet` is given.
#[macro_export]
macro_rules! info_log {
  ($($arg:tt)*) => {
    if !$crate::logging::is_quiet() {
      $crate::logging::print_info_log(&format!($($arg)*));
    }
  };
}

/// Backs [`info_log!`]; yellow when stdout supports color.
pub fn print_info_log(message: &str) {
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.yellow()));
}
