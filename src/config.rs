//! Versioning options and the configuration file they can be loaded from.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

use crate::references::{IgnoreMatching, IgnoreRules};

/// File name searched for in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "res-version.config.json";

/// Query parameter injected when none is configured.
pub const DEFAULT_QUERY_KEY: &str = "v";

/// Per-invocation options consumed by [`crate::Versioner`].
#[derive(Debug, Clone)]
pub struct VersionerOptions {
  /// Base for root-relative references. Relative values are joined under the working
  /// directory; `None` means the working directory itself.
  pub root_dir: Option<PathBuf>,
  /// References matching these rules are left alone.
  pub ignore: IgnoreRules,
  /// Name of the query parameter carrying the fingerprint.
  pub query_key: String,
}

impl Default for VersionerOptions {
  fn default() -> Self {
    Self {
      root_dir: None,
      ignore: IgnoreRules::default(),
      query_key: DEFAULT_QUERY_KEY.into(),
    }
  }
}

impl VersionerOptions {
  /// Directory root-relative references resolve against for the given working directory.
  pub fn root_dir_for(&self, working_dir: &Path) -> PathBuf {
    match &self.root_dir {
      Some(root) => working_dir.join(root),
      None => working_dir.to_path_buf(),
    }
  }
}

/// Serialised configuration, read from JSON or YAML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionerConfig {
  /// Directory that `/`-prefixed references are anchored at.
  pub root_dir: Option<String>,
  /// Regular expressions for references that should not be versioned.
  pub ignore: Vec<String>,
  /// Query parameter name. Empty means [`DEFAULT_QUERY_KEY`].
  pub query_key: String,
  /// How multiple ignore patterns combine.
  pub ignore_matching: IgnoreMatching,
}

impl VersionerConfig {
  /// Load the default config file from `dir`, falling back to defaults when it is absent.
  pub fn discover(dir: &Path) -> Result<Self> {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    if !candidate.is_file() {
      return Ok(Self::default());
    }
    Self::from_path(&candidate)
  }

  /// Read configuration from a JSON, YAML or YML file.
  pub fn from_path(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path)
      .with_context(|| format!("failed to read config at {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
      Some("yaml" | "yml") => serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse YAML config {}", path.display())),
      _ => serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON config {}", path.display())),
    }
  }

  /// Compile patterns and apply defaults.
  pub fn into_options(self) -> Result<VersionerOptions> {
    let patterns = self
      .ignore
      .iter()
      .map(|pattern| {
        Regex::new(pattern).with_context(|| format!("invalid ignore pattern `{pattern}`"))
      })
      .collect::<Result<Vec<_>>>()?;

    let query_key = if self.query_key.trim().is_empty() {
      DEFAULT_QUERY_KEY.to_string()
    } else {
      self.query_key
    };

    Ok(VersionerOptions {
      root_dir: self
        .root_dir
        .filter(|root| !root.trim().is_empty())
        .map(PathBuf::from),
      ignore: IgnoreRules::new(patterns, self.ignore_matching),
      query_key,
    })
  }
}
