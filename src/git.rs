//! # Git Module
//!
//! This module talks to the git repository: locating it, listing the files
//! tracked at `HEAD`, and producing per-line authorship facts through blame.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Datelike, FixedOffset};
use git2::{BlameOptions, ErrorCode, Mailmap, ObjectType, Oid, Repository, TreeWalkMode, TreeWalkResult};
use tracing::{debug, trace};

use crate::contributions::RawFact;

/// Tree entry mode of a symbolic link.
const SYMLINK_FILEMODE: i32 = 0o120000;

/// A source of per-line authorship facts for tracked files.
pub trait HistorySource: Send + Sync {
  /// Returns one fact per line of the file's content at `HEAD`, attributing
  /// each line to the commit that last touched it.
  ///
  /// `path` is relative to the repository root.
  fn blame(&self, path: &Path) -> Result<Vec<RawFact>>;
}

/// Finds the working directory of the repository containing `path`.
///
/// Returns `Ok(None)` when `path` is not inside a git repository.
pub fn discover_repo_root(path: &Path) -> Result<Option<PathBuf>> {
  match Repository::discover(path) {
    Ok(repo) => Ok(repo.workdir().map(Path::to_path_buf)),
    Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
    Err(e) => Err(e).with_context(|| format!("Failed to open git repository at {}", path.display())),
  }
}

/// Lists every regular file in the `HEAD` tree, relative to the repository
/// root and sorted. Symlinks and submodules are left out.
pub fn get_git_tracked_files(root: &Path) -> Result<Vec<PathBuf>> {
  let repo = Repository::open(root).with_context(|| format!("Failed to open git repository at {}", root.display()))?;

  let tree = repo
    .head()
    .with_context(|| "Failed to get HEAD reference")?
    .peel_to_tree()
    .with_context(|| "Failed to get tree for HEAD commit")?;

  let mut files = Vec::new();
  tree
    .walk(TreeWalkMode::PreOrder, |dir, entry| {
      if entry.kind() == Some(ObjectType::Blob)
        && entry.filemode() != SYMLINK_FILEMODE
        && let Some(name) = entry.name()
      {
        files.push(PathBuf::from(format!("{dir}{name}")));
      }
      TreeWalkResult::Ok
    })
    .with_context(|| "Failed to walk HEAD tree")?;

  files.sort();
  debug!("Found {} tracked files", files.len());

  Ok(files)
}

/// Converts a git timestamp to a calendar year in the author's own timezone.
pub fn commit_year(time: git2::Time) -> Option<i32> {
  let offset = FixedOffset::east_opt(time.offset_minutes() * 60)?;
  let utc = DateTime::from_timestamp(time.seconds(), 0)?;
  Some(utc.with_timezone(&offset).year())
}

/// Author identity and year of one commit.
#[derive(Debug, Clone)]
struct Attribution {
  author: String,
  email: String,
  year: i32,
}

/// [`HistorySource`] backed by `git blame` of the `HEAD` revision.
#[derive(Debug, Clone)]
pub struct GitHistory {
  root: PathBuf,
  use_mailmap: bool,
}

impl GitHistory {
  /// Creates a history source for the repository whose working directory is
  /// `root`. With `use_mailmap`, identities are canonicalised through the
  /// repository's `.mailmap`.
  pub const fn new(root: PathBuf, use_mailmap: bool) -> Self {
    Self { root, use_mailmap }
  }

  fn attribution(
    repo: &Repository,
    mailmap: Option<&Mailmap>,
    cache: &mut HashMap<Oid, Attribution>,
    id: Oid,
  ) -> Result<Attribution> {
    if let Some(found) = cache.get(&id) {
      return Ok(found.clone());
    }

    let commit = repo.find_commit(id).with_context(|| format!("Failed to find commit {}", id))?;
    let signature = match mailmap {
      Some(mailmap) => commit
        .author_with_mailmap(mailmap)
        .with_context(|| format!("Failed to resolve mailmap for commit {}", id))?,
      None => commit.author().to_owned(),
    };

    let year = commit_year(signature.when()).ok_or_else(|| anyhow!("Commit {} has an invalid author date", id))?;
    let found = Attribution {
      author: String::from_utf8_lossy(signature.name_bytes()).into_owned(),
      email: String::from_utf8_lossy(signature.email_bytes()).into_owned(),
      year,
    };

    cache.insert(id, found.clone());
    Ok(found)
  }
}

impl HistorySource for GitHistory {
  fn blame(&self, path: &Path) -> Result<Vec<RawFact>> {
    let repo =
      Repository::open(&self.root).with_context(|| format!("Failed to open git repository at {}", self.root.display()))?;

    let mailmap = if self.use_mailmap {
      Some(repo.mailmap().with_context(|| "Failed to load mailmap")?)
    } else {
      None
    };

    let mut opts = BlameOptions::new();
    opts.use_mailmap(self.use_mailmap);

    let blame = repo
      .blame_file(path, Some(&mut opts))
      .with_context(|| format!("Failed to blame {}", path.display()))?;

    let mut cache = HashMap::new();
    let mut facts = Vec::new();

    for hunk in blame.iter() {
      let id = hunk.final_commit_id();
      if id.is_zero() {
        trace!("Skipping uncommitted hunk in {}", path.display());
        continue;
      }

      let found = Self::attribution(&repo, mailmap.as_ref(), &mut cache, id)?;
      for _ in 0..hunk.lines_in_hunk() {
        facts.push(RawFact {
          author: found.author.clone(),
          email: found.email.clone(),
          year: found.year,
          file: path.to_path_buf(),
        });
      }
    }

    trace!("Blamed {}: {} lines", path.display(), facts.len());
    Ok(facts)
  }
}
