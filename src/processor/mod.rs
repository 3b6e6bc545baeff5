//! # Processor Module
//!
//! Orchestrates a run over the tracked files of a repository:
//!
//! 1. [`Processor::plan`] applies the selection and resolves every file's
//!    comment prefix. Unknown file types abort here, before any history is
//!    read.
//! 2. [`Processor::collect_histories`] blames each planned file, bounded by
//!    the configured number of jobs, and aggregates the facts into one
//!    [`FileHeaderPlan`] per file.
//! 3. [`Processor::apply`] renders every new header, then writes the files
//!    whose content changed.
//!
//! Every failure is fatal and surfaces before the first write.

mod file_io;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

pub use self::file_io::FileIO;
use crate::comment_styles::CommentPrefixResolver;
use crate::contributions::{FileHeaderPlan, aggregate_file};
use crate::diff::DiffManager;
use crate::git::HistorySource;
use crate::header::{self, HeaderSpec};
use crate::license::LicenseText;
use crate::selection::{FileFilter, Selection};
use crate::verbose_log;

/// Errors that stop a run before any file is touched.
#[derive(Debug, Error)]
pub enum ProcessError {
  /// A selected file has no known comment prefix.
  #[error("No comment style known for '{path}'; add one with --comment-style EXT:PREFIX or exclude the file")]
  UnknownCommentStyle { path: PathBuf },

  /// No banner was configured.
  #[error("A banner is required; pass --banner or set `banner` in the config file")]
  MissingBanner,

  /// No license file was configured.
  #[error("A license file is required; pass --license-file or set `license-file` in the config file")]
  MissingLicenseFile,
}

/// Everything a [`Processor`] needs for one run.
pub struct ProcessorConfig {
  /// Repository working directory; file paths are relative to it
  pub root: PathBuf,
  /// Project line placed at the top of every header
  pub banner: String,
  /// License text appended after the copyright lines
  pub license: LicenseText,
  /// Which tracked files get a header
  pub selection: Selection,
  /// Comment prefix lookup
  pub resolver: Box<dyn CommentPrefixResolver>,
  /// Per-line authorship source
  pub history: Arc<dyn HistorySource>,
  /// Maximum number of concurrent blames
  pub jobs: usize,
  /// Report outdated headers without writing
  pub check_only: bool,
  /// Optional diff output for every changed file
  pub diff_manager: Option<DiffManager>,
}

/// A selected file together with its comment prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
  pub path: PathBuf,
  pub prefix: String,
}

/// What happened to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
  /// The header changed (written, or would be written in check mode)
  Updated,
  /// The header was already current
  Unchanged,
  /// No committed line could be attributed, so the file was left alone
  NoAuthorship,
}

/// Outcome of a run for a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
  pub path: PathBuf,
  pub action: FileAction,
}

pub struct Processor {
  config: ProcessorConfig,
}

impl Processor {
  /// Creates a processor.
  ///
  /// # Errors
  ///
  /// Returns [`ProcessError::MissingBanner`] if the banner is blank.
  pub fn new(mut config: ProcessorConfig) -> Result<Self> {
    if config.banner.trim().is_empty() {
      return Err(ProcessError::MissingBanner.into());
    }
    config.jobs = config.jobs.max(1);
    Ok(Self { config })
  }

  pub const fn is_check_only(&self) -> bool {
    self.config.check_only
  }

  /// Selects files and resolves their comment prefixes.
  ///
  /// # Errors
  ///
  /// Fails with [`ProcessError::UnknownCommentStyle`] for the first selected
  /// file whose type is not recognised.
  pub fn plan(&self, files: &[PathBuf]) -> Result<Vec<PlannedFile>> {
    let mut planned = Vec::new();

    for path in files {
      let filter = self.config.selection.should_process(path);
      if !filter.should_process {
        if let Some(reason) = filter.reason {
          verbose_log!("Skipping: {} ({})", path.display(), reason);
        }
        continue;
      }

      let prefix = self
        .config
        .resolver
        .resolve(path)
        .ok_or_else(|| ProcessError::UnknownCommentStyle { path: path.clone() })?;

      planned.push(PlannedFile {
        path: path.clone(),
        prefix,
      });
    }

    debug!("Planned {} of {} tracked files", planned.len(), files.len());
    Ok(planned)
  }

  /// Blames every planned file and aggregates its contributors.
  ///
  /// Blames run on the blocking thread pool, at most `jobs` at a time. The
  /// first failure is returned and the blames still waiting for a slot are
  /// cancelled.
  pub async fn collect_histories(&self, planned: &[PlannedFile]) -> Result<BTreeMap<PathBuf, FileHeaderPlan>> {
    let start = Instant::now();
    let semaphore = Arc::new(Semaphore::new(self.config.jobs));
    let mut tasks = JoinSet::new();

    for file in planned {
      let semaphore = Arc::clone(&semaphore);
      let history = Arc::clone(&self.config.history);
      let path = file.path.clone();

      tasks.spawn(async move {
        let _permit = semaphore.acquire_owned().await.context("Blame scheduler closed")?;
        verbose_log!("Blaming: {}", path.display());

        let blame_path = path.clone();
        let facts = tokio::task::spawn_blocking(move || history.blame(&blame_path))
          .await
          .context("Blame task failed")??;

        Ok::<_, anyhow::Error>((path, FileHeaderPlan::new(aggregate_file(facts))))
      });
    }

    let mut plans = BTreeMap::new();
    while let Some(joined) = tasks.join_next().await {
      let (path, plan) = joined.context("Blame task failed")??;
      plans.insert(path, plan);
    }

    debug!("Collected {} histories in {}ms", plans.len(), start.elapsed().as_millis());
    Ok(plans)
  }

  /// Rewrites headers in path order.
  ///
  /// All new contents are computed before the first write, so a malformed
  /// header anywhere leaves every file untouched. In check mode nothing is
  /// written.
  pub fn apply(&self, planned: &[PlannedFile], plans: &BTreeMap<PathBuf, FileHeaderPlan>) -> Result<Vec<FileReport>> {
    let mut ordered: Vec<&PlannedFile> = planned.iter().collect();
    ordered.sort_by(|a, b| a.path.cmp(&b.path));

    let mut reports = Vec::with_capacity(ordered.len());
    let mut pending = Vec::new();

    for file in ordered {
      let path = &file.path;
      let plan = plans
        .get(path)
        .with_context(|| format!("No history collected for {}", path.display()))?;

      if plan.is_empty() {
        verbose_log!("Skipping: {} (no committed lines)", path.display());
        reports.push(FileReport {
          path: path.clone(),
          action: FileAction::NoAuthorship,
        });
        continue;
      }

      let full_path = self.config.root.join(path);
      let original = FileIO::read_full_content(&full_path)?;
      let spec = HeaderSpec::new(&file.prefix, &self.config.banner, &self.config.license);
      let updated = header::rewrite(&original, &spec, plan)
        .with_context(|| format!("Failed to parse existing header in {}", path.display()))?;

      if updated == original {
        reports.push(FileReport {
          path: path.clone(),
          action: FileAction::Unchanged,
        });
        continue;
      }

      if let Some(ref diff_manager) = self.config.diff_manager {
        diff_manager.display_diff(path, &original, &updated)?;
      }

      reports.push(FileReport {
        path: path.clone(),
        action: FileAction::Updated,
      });
      pending.push((path, full_path, updated));
    }

    if !self.config.check_only {
      for (path, full_path, content) in &pending {
        FileIO::write_file(full_path, content)?;
        verbose_log!("Updated header in: {}", path.display());
      }
    }

    Ok(reports)
  }

  /// Runs all three phases over the given tracked files.
  pub async fn run(&self, files: &[PathBuf]) -> Result<Vec<FileReport>> {
    let planned = self.plan(files)?;
    let plans = self.collect_histories(&planned).await?;
    self.apply(&planned, &plans)
  }
}
