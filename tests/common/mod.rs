#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};

/// Checks if git is available on the system.
pub fn is_git_available() -> bool {
  Command::new("git").arg("--version").status().is_ok()
}

/// Runs a git command in the given directory, returning an error with stderr on
/// failure.
pub fn run_git(dir: &Path, args: &[&str]) -> Result<()> {
  run_git_with_env(dir, args, &[])
}

/// Like [`run_git`], with extra environment variables.
pub fn run_git_with_env(dir: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<()> {
  let output = Command::new("git")
    .args(args)
    .envs(envs.iter().copied())
    .current_dir(dir)
    .output()
    .with_context(|| format!("Failed to execute git {:?}", args))?;

  if !output.status.success() {
    anyhow::bail!("git {:?} failed: {}", args, String::from_utf8_lossy(&output.stderr));
  }
  Ok(())
}

/// Initializes a git repository in the given directory with deterministic
/// settings.
///
/// Configures:
/// - Default branch name set to `main`
/// - User name and email for commits
/// - Disables commit signing for test isolation
pub fn init_git_repo(dir: &Path) -> Result<()> {
  run_git(dir, &["init"])?;
  run_git(dir, &["config", "init.defaultBranch", "main"])?;
  run_git(dir, &["branch", "-M", "main"])?;
  run_git(dir, &["config", "user.name", "Test User"])?;
  run_git(dir, &["config", "user.email", "test@example.com"])?;
  // Disable commit signing for test isolation
  run_git(dir, &["config", "commit.gpgsign", "false"])?;
  Ok(())
}

/// An author identity and the date its commits are recorded at.
#[derive(Debug, Clone, Copy)]
pub struct Author<'a> {
  pub name: &'a str,
  pub email: &'a str,
  /// Any date git accepts, e.g. `2015-06-01T12:00:00+00:00`
  pub date: &'a str,
}

/// Writes `content` to `file` and commits it as `author`.
pub fn commit_as(dir: &Path, file: &str, content: &str, author: Author<'_>) -> Result<()> {
  let path = dir.join(file);
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(&path, content)?;

  run_git(dir, &["add", file])?;
  run_git_with_env(
    dir,
    &["commit", "-m", &format!("Update {}", file)],
    &[
      ("GIT_AUTHOR_NAME", author.name),
      ("GIT_AUTHOR_EMAIL", author.email),
      ("GIT_AUTHOR_DATE", author.date),
      ("GIT_COMMITTER_NAME", author.name),
      ("GIT_COMMITTER_EMAIL", author.email),
      ("GIT_COMMITTER_DATE", author.date),
    ],
  )
}

pub const ALICE_2015: Author<'static> = Author {
  name: "Alice",
  email: "alice@example.com",
  date: "2015-06-01T12:00:00+00:00",
};

pub const ALICE_2021: Author<'static> = Author {
  name: "Alice",
  email: "alice@example.com",
  date: "2021-03-15T12:00:00+00:00",
};

pub const BOB_2016: Author<'static> = Author {
  name: "Bob",
  email: "bob@example.com",
  date: "2016-09-20T12:00:00+00:00",
};
