//! # edcopyright
//!
//! A tool that keeps the copyright header of every tracked source file in a
//! git repository in sync with the repository's history.
//!
//! For each selected file, `edcopyright` blames the current content, groups
//! the lines by author, and regenerates a header of the form:
//!
//! ```text
//! # <project banner>
//! # Copyright (c) 2015-2021 Alice <alice@example.com>
//! # Copyright (c) 2016 Bob <bob@example.com>
//! #
//! # <license notice>
//! ```
//!
//! A stale header written by a previous run is recognised and replaced, so
//! running the tool twice yields the same content. Interpreter directives
//! (`#!`) and encoding declarations stay above the header.
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//! use std::sync::Arc;
//!
//! use edcopyright::comment_styles::BuiltinResolver;
//! use edcopyright::git::{GitHistory, get_git_tracked_files};
//! use edcopyright::license::LicenseText;
//! use edcopyright::processor::{Processor, ProcessorConfig};
//! use edcopyright::selection::Selection;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let root = PathBuf::from(".");
//!
//!     let processor = Processor::new(ProcessorConfig {
//!         root: root.clone(),
//!         banner: "Widgets: a library for making widgets".to_string(),
//!         license: LicenseText::load(Path::new("LICENSE.txt"))?,
//!         selection: Selection::new(&["*.py".to_string()], &[])?,
//!         resolver: Box::new(BuiltinResolver),
//!         history: Arc::new(GitHistory::new(root.clone(), false)),
//!         jobs: 4,
//!         check_only: false,
//!         diff_manager: None,
//!     })?;
//!
//!     let reports = processor.run(&get_git_tracked_files(&root)?).await?;
//!     println!("{} files processed", reports.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`contributions`] - Aggregating blame facts into contributor records
//! * [`header`] - Recognising a stale header and rendering a fresh one
//! * [`processor`] - Orchestrating a run over the tracked files
//! * [`git`] - File enumeration and blame
//! * [`logging`] - Logging utilities for verbose output

pub mod cli;
pub mod comment_styles;
pub mod config;
pub mod contributions;
pub mod diff;
pub mod git;
pub mod header;
pub mod license;
pub mod logging;
pub mod output;
pub mod processor;
pub mod selection;
