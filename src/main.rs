//! # edcopyright
//!
//! Keeps per-file copyright headers in sync with git history.

use anyhow::Result;
use edcopyright::cli::{Cli, run_update};

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse_args();
  run_update(cli.update_args).await
}
