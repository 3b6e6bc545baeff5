//! # Configuration Module
//!
//! This module provides configuration support for edcopyright: the project
//! banner, the license file, which files to select, and comment prefix
//! overrides.
//!
//! Configuration can be specified in a `.edcopyright.toml` file in the
//! repository root or via the `EDCOPYRIGHT_CONFIG` environment variable.
//!
//! ```toml
//! banner = "Widgets: a library for making widgets"
//! license-file = "LICENSE.txt"
//! include = ["*.py", "*.rst"]
//! exclude = ["docs/examples/*"]
//! use-mailmap = true
//!
//! [comment-styles]
//! pyw = "#"
//!
//! [filenames]
//! "Justfile" = "#"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".edcopyright.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "EDCOPYRIGHT_CONFIG";

/// Main configuration struct, loaded from a `.edcopyright.toml` file.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Config {
  /// Project name line placed at the top of every header.
  #[serde(default)]
  pub banner: Option<String>,

  /// License notice file, relative to the repository root.
  #[serde(default, rename = "license-file")]
  pub license_file: Option<PathBuf>,

  /// Glob patterns of files to include. Empty means everything.
  #[serde(default)]
  pub include: Vec<String>,

  /// Glob patterns of files to exclude. Always wins over `include`.
  #[serde(default)]
  pub exclude: Vec<String>,

  /// Resolve authors through the repository's `.mailmap`.
  #[serde(default, rename = "use-mailmap")]
  pub use_mailmap: Option<bool>,

  /// Number of files blamed concurrently.
  #[serde(default)]
  pub jobs: Option<usize>,

  /// Comment prefixes by file extension, without the leading dot.
  #[serde(default, rename = "comment-styles")]
  pub comment_styles: HashMap<String, String>,

  /// Comment prefixes by exact file name or file name glob.
  #[serde(default)]
  pub filenames: HashMap<String, String>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A comment style configuration is invalid.
  #[error("Invalid comment style for '{extension}': {message}")]
  InvalidCommentStyle { extension: String, message: String },

  /// A scalar setting is invalid.
  #[error("Invalid value for '{key}': {message}")]
  InvalidValue { key: &'static str, message: String },
}

impl Config {
  /// Load configuration from a file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    let config = config.normalize();

    verbose_log!("Loaded {} comment style overrides", config.comment_styles.len());

    Ok(config)
  }

  /// Validate the configuration.
  ///
  /// Checks that:
  /// - The banner, if present, is not blank
  /// - `jobs`, if present, is positive
  /// - All prefixes are non-empty
  /// - Extension names don't include the leading dot
  pub fn validate(&self) -> Result<(), ConfigError> {
    if let Some(ref banner) = self.banner
      && banner.trim().is_empty()
    {
      return Err(ConfigError::InvalidValue {
        key: "banner",
        message: "banner cannot be empty".to_string(),
      });
    }

    if self.jobs == Some(0) {
      return Err(ConfigError::InvalidValue {
        key: "jobs",
        message: "jobs must be at least 1".to_string(),
      });
    }

    for (ext, prefix) in &self.comment_styles {
      if prefix.trim().is_empty() {
        return Err(ConfigError::InvalidCommentStyle {
          extension: ext.clone(),
          message: "prefix cannot be empty".to_string(),
        });
      }

      if ext.starts_with('.') {
        return Err(ConfigError::InvalidCommentStyle {
          extension: ext.clone(),
          message: "extension should not include leading dot".to_string(),
        });
      }
    }

    for (filename, prefix) in &self.filenames {
      if prefix.trim().is_empty() {
        return Err(ConfigError::InvalidCommentStyle {
          extension: filename.clone(),
          message: "prefix cannot be empty".to_string(),
        });
      }
    }

    Ok(())
  }

  /// Merge `EXT:PREFIX` overrides from the command line. CLI values replace
  /// config values for the same extension.
  pub fn merge_cli_overrides(&mut self, overrides: HashMap<String, String>) {
    self.comment_styles.extend(overrides);
  }

  /// Lowercase the lookup keys so that matching is case-insensitive.
  fn normalize(self) -> Self {
    let comment_styles = self
      .comment_styles
      .into_iter()
      .map(|(k, v)| (k.to_lowercase(), v))
      .collect();

    let filenames = self.filenames.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect();

    Self {
      comment_styles,
      filenames,
      ..self
    }
  }
}

/// Parses `--comment-style EXT:PREFIX` arguments.
pub fn parse_comment_style_overrides(args: &[String]) -> Result<HashMap<String, String>, ConfigError> {
  let mut overrides = HashMap::with_capacity(args.len());

  for arg in args {
    let Some((ext, prefix)) = arg.split_once(':') else {
      return Err(ConfigError::InvalidCommentStyle {
        extension: arg.clone(),
        message: "expected EXT:PREFIX".to_string(),
      });
    };

    let ext = ext.trim().to_lowercase();
    if ext.is_empty() || ext.starts_with('.') {
      return Err(ConfigError::InvalidCommentStyle {
        extension: ext,
        message: "extension must be non-empty and without a leading dot".to_string(),
      });
    }
    if prefix.trim().is_empty() {
      return Err(ConfigError::InvalidCommentStyle {
        extension: ext,
        message: "prefix cannot be empty".to_string(),
      });
    }

    overrides.insert(ext, prefix.to_string());
  }

  Ok(overrides)
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `EDCOPYRIGHT_CONFIG` environment variable
/// 3. `.edcopyright.toml` in the repository root
pub fn discover_config_path(explicit_path: Option<&Path>, workspace_root: &Path) -> Option<PathBuf> {
  // An explicit path is returned even if missing, so loading it fails loudly
  if let Some(path) = explicit_path {
    verbose_log!("Using explicit config path: {}", path.display());
    return Some(path.to_path_buf());
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let workspace_config = workspace_root.join(DEFAULT_CONFIG_FILENAME);
  if workspace_config.exists() {
    verbose_log!("Using workspace config: {}", workspace_config.display());
    return Some(workspace_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path.
///
/// Returns `None` if discovery is disabled or no file is found.
pub fn load_config(explicit_path: Option<&Path>, workspace_root: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(None);
  }

  match discover_config_path(explicit_path, workspace_root) {
    Some(path) => {
      let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}
