//! # Update Command
//!
//! Regenerates the copyright header of every selected tracked file from git
//! history. With `--check`, reports outdated headers and exits non-zero
//! instead of writing.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::debug;

use crate::comment_styles::create_resolver;
use crate::config::{Config, load_config, parse_comment_style_overrides};
use crate::diff::DiffManager;
use crate::git::{GitHistory, discover_repo_root, get_git_tracked_files};
use crate::info_log;
use crate::license::LicenseText;
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{
  CategorizedReports, ProcessingSummary, print_all_files_ok, print_blank_line, print_hint, print_skipped_files,
  print_start_message, print_summary, print_updated_files,
};
use crate::processor::{ProcessError, Processor, ProcessorConfig};
use crate::selection::Selection;

/// Arguments for the update command
#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
  /// Additional include glob patterns, matched against repository-relative
  /// paths (`*` also matches `/`)
  #[arg(required = false)]
  pub patterns: Vec<String>,

  /// Path to config file (default: .edcopyright.toml in the repository root)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Project line placed at the top of every header
  #[arg(long, value_name = "TEXT")]
  pub banner: Option<String>,

  /// License notice appended to every header
  #[arg(long, short = 'f', value_name = "FILE")]
  pub license_file: Option<PathBuf>,

  /// Only process files matching these glob patterns (repeatable)
  #[arg(long, short = 'i', value_name = "GLOB")]
  pub include: Vec<String>,

  /// Skip files matching these glob patterns (repeatable, wins over include)
  #[arg(long, short = 'e', value_name = "GLOB")]
  pub exclude: Vec<String>,

  /// Override the comment prefix for an extension (repeatable, format:
  /// EXT:PREFIX). Example: --comment-style "pyw:#"
  #[arg(long, value_name = "EXT:PREFIX")]
  pub comment_style: Vec<String>,

  /// Check mode: report outdated headers and exit 1 without modifying files
  #[arg(long)]
  pub check: bool,

  /// Show a diff of every header change on stderr
  #[arg(long)]
  pub show_diff: bool,

  /// Save the diff of every header change to a file
  #[arg(long, short = 'o', value_name = "FILE")]
  pub save_diff: Option<PathBuf>,

  /// Number of files blamed concurrently [default: number of CPUs]
  #[arg(long, short = 'j', value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
  pub jobs: Option<u16>,

  /// Canonicalise author names and emails through the repository's .mailmap
  #[arg(long, value_name = "BOOL", default_missing_value = "true", num_args = 0..=1)]
  pub use_mailmap: Option<bool>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,

  /// Skip git repository ownership check. Useful when running in Docker or
  /// other containerized environments where the repository may be owned by a
  /// different user.
  #[arg(long)]
  pub skip_git_owner_check: bool,
}

/// Command line and config file values merged into one set of settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  pub banner: String,
  pub license_file: PathBuf,
  pub include: Vec<String>,
  pub exclude: Vec<String>,
  pub use_mailmap: bool,
  pub jobs: usize,
}

impl Settings {
  /// Merges `args` over `config`.
  ///
  /// Scalars from the command line win; include and exclude lists are
  /// concatenated. A license file named on the command line is used as given,
  /// one from the config file is relative to `root`.
  pub fn resolve(args: &UpdateArgs, config: Option<&Config>, root: &Path) -> Result<Self> {
    let banner = args
      .banner
      .clone()
      .or_else(|| config.and_then(|c| c.banner.clone()))
      .filter(|b| !b.trim().is_empty())
      .ok_or(ProcessError::MissingBanner)?;

    let license_file = match (&args.license_file, config.and_then(|c| c.license_file.as_ref())) {
      (Some(path), _) => path.clone(),
      (None, Some(path)) => root.join(path),
      (None, None) => return Err(ProcessError::MissingLicenseFile.into()),
    };

    let mut include: Vec<String> = config.map(|c| c.include.clone()).unwrap_or_default();
    include.extend(args.include.iter().cloned());
    include.extend(args.patterns.iter().cloned());

    let mut exclude: Vec<String> = config.map(|c| c.exclude.clone()).unwrap_or_default();
    exclude.extend(args.exclude.iter().cloned());

    let use_mailmap = args
      .use_mailmap
      .or_else(|| config.and_then(|c| c.use_mailmap))
      .unwrap_or(false);

    let jobs = args
      .jobs
      .map(usize::from)
      .or_else(|| config.and_then(|c| c.jobs))
      .unwrap_or_else(num_cpus::get);

    Ok(Self {
      banner,
      license_file,
      include,
      exclude,
      use_mailmap,
      jobs,
    })
  }
}

/// Run the update command with the given arguments
pub async fn run_update(args: UpdateArgs) -> Result<()> {
  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  if args.skip_git_owner_check {
    debug!("Disabling git repository ownership check");
    // SAFETY: No git operation has started yet; the option is set before the
    // first Repository is opened.
    unsafe { git2::opts::set_verify_owner_validation(false) }
      .with_context(|| "Failed to disable git repository ownership check")?;
  }

  let current_dir = std::env::current_dir().with_context(|| "Failed to get current directory")?;
  let Some(root) = discover_repo_root(&current_dir)? else {
    bail!("Not inside a git repository: {}", current_dir.display());
  };
  debug!("Using repository root: {}", root.display());

  let mut config = load_config(args.config.as_deref(), &root, args.no_config)?;

  let overrides = parse_comment_style_overrides(&args.comment_style)?;
  if !overrides.is_empty() {
    config.get_or_insert_with(Config::default).merge_cli_overrides(overrides);
  }

  let settings = Settings::resolve(&args, config.as_ref(), &root)?;
  debug!("Resolved settings: {:?}", settings);

  // Loaded once, before any history is read
  let license = LicenseText::load(&settings.license_file)?;
  let selection = Selection::new(&settings.include, &settings.exclude)?;

  let diff_manager = DiffManager::new(args.show_diff, args.save_diff.clone());
  diff_manager.init()?;

  let check_only = args.check;
  let processor = Processor::new(ProcessorConfig {
    root: root.clone(),
    banner: settings.banner,
    license,
    selection,
    resolver: create_resolver(config),
    history: Arc::new(GitHistory::new(root.clone(), settings.use_mailmap)),
    jobs: settings.jobs,
    check_only,
    diff_manager: diff_manager.is_enabled().then_some(diff_manager),
  })?;

  let tracked = get_git_tracked_files(&root)?;
  let planned = processor.plan(&tracked)?;

  print_start_message(planned.len(), check_only);

  if planned.is_empty() {
    print_blank_line();
    print_all_files_ok();
    return Ok(());
  }

  let start_time = Instant::now();
  let plans = processor.collect_histories(&planned).await?;
  let reports = processor.apply(&planned, &plans)?;
  let elapsed = start_time.elapsed();

  let summary = ProcessingSummary::from_reports(&reports, elapsed);
  let categorized = CategorizedReports::from_reports(&reports);
  let has_updates = !categorized.updated.is_empty();

  print_blank_line();
  if has_updates {
    print_updated_files(&categorized.updated, check_only, Some(&root));
  } else {
    print_all_files_ok();
  }

  if !categorized.skipped.is_empty() {
    print_blank_line();
    print_skipped_files(&categorized.skipped, Some(&root));
  }

  print_blank_line();
  print_summary(&summary, check_only);

  if let Some(ref diff_path) = args.save_diff
    && has_updates
  {
    info_log!("Saved diff to {}", diff_path.display());
  }

  if check_only && has_updates {
    print_blank_line();
    print_hint("Run without --check to update them.");
    process::exit(1);
  }

  Ok(())
}
