//! # Comment Styles Module
//!
//! Maps files to the line-comment prefix used to render their header.
//!
//! The module includes:
//! - [`CommentPrefixResolver`], the lookup trait
//! - [`BuiltinResolver`], a static extension table
//! - [`ConfigurableResolver`], which checks user overrides before falling
//!   back to the builtin table
//!
//! A file whose type is not recognised resolves to `None`; the processor
//! refuses to run rather than silently skipping it.

use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::verbose_log;

/// Trait for resolving the comment prefix of a file.
pub trait CommentPrefixResolver: Send + Sync {
  /// Returns the comment prefix for `path` (e.g. `"#"`), or `None` if the file
  /// type is not recognised.
  fn resolve(&self, path: &Path) -> Option<String>;
}

/// Default resolver using the builtin table.
#[derive(Debug, Default)]
pub struct BuiltinResolver;

impl CommentPrefixResolver for BuiltinResolver {
  fn resolve(&self, path: &Path) -> Option<String> {
    builtin_prefix_for_file(path).map(str::to_string)
  }
}

/// Resolver that checks user configuration first, then the builtin table.
pub struct ConfigurableResolver {
  config: Arc<Config>,
}

impl std::fmt::Debug for ConfigurableResolver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ConfigurableResolver")
      .field("config", &"<config>")
      .finish()
  }
}

impl ConfigurableResolver {
  pub fn new(config: Config) -> Self {
    Self {
      config: Arc::new(config),
    }
  }
}

impl CommentPrefixResolver for ConfigurableResolver {
  fn resolve(&self, path: &Path) -> Option<String> {
    let file_name = path
      .file_name()
      .and_then(|name| name.to_str())
      .unwrap_or("")
      .to_lowercase();

    // 1. Exact filename
    if let Some(prefix) = self.config.filenames.get(&file_name) {
      verbose_log!("Using config filename override for: {}", file_name);
      return Some(prefix.clone());
    }

    // 2. Filename globs
    for (pattern, prefix) in &self.config.filenames {
      if pattern.contains('*')
        && let Ok(glob_pattern) = glob::Pattern::new(pattern)
        && glob_pattern.matches(&file_name)
      {
        verbose_log!("Using config filename glob override '{}' for: {}", pattern, file_name);
        return Some(prefix.clone());
      }
    }

    // 3. Extension
    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .unwrap_or("")
      .to_lowercase();

    if let Some(prefix) = self.config.comment_styles.get(&extension) {
      verbose_log!("Using config extension override for: .{}", extension);
      return Some(prefix.clone());
    }

    // 4. Builtin table
    builtin_prefix_for_file(path).map(str::to_string)
  }
}

/// Creates a resolver for the given configuration.
pub fn create_resolver(config: Option<Config>) -> Box<dyn CommentPrefixResolver> {
  match config {
    Some(cfg) => Box::new(ConfigurableResolver::new(cfg)),
    None => Box::new(BuiltinResolver),
  }
}

/// Looks up the builtin comment prefix for a file.
///
/// Script-like and configuration files use `#`, reStructuredText uses the
/// `..` comment directive, C-family sources use `//`.
fn builtin_prefix_for_file(path: &Path) -> Option<&'static str> {
  let file_name = path
    .file_name()
    .and_then(|name| name.to_str())
    .unwrap_or("")
    .to_lowercase();

  let extension = path
    .extension()
    .and_then(|ext| ext.to_str())
    .unwrap_or("")
    .to_lowercase();

  match extension.as_str() {
    "py" | "pyi" | "pyx" | "sh" | "bash" | "zsh" | "rb" | "pl" | "pm" | "r" | "toml" | "yaml" | "yml" | "cfg"
    | "ini" | "conf" | "cmake" | "tf" | "nix" => Some("#"),
    "rst" => Some(".."),
    "rs" | "c" | "h" | "cc" | "cpp" | "hpp" | "go" | "java" | "js" | "ts" | "jsx" | "tsx" | "kt" | "scala"
    | "swift" | "dart" | "proto" | "cs" => Some("//"),
    "sql" | "hs" | "lua" => Some("--"),
    "el" | "lisp" | "clj" => Some(";;"),
    "tex" | "erl" => Some("%"),
    _ => match file_name.as_str() {
      "makefile" | "dockerfile" | "cmakelists.txt" => Some("#"),
      _ => None,
    },
  }
}
