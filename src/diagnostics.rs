//! Warning sinks receiving per-reference failures.

use std::fmt;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::error::VersionError;

/// Tag prefixed to every warning line.
pub const PLUGIN_NAME: &str = "res-version";

/// A reference that was left untouched because it could not be versioned.
#[derive(Debug)]
pub struct Warning {
  /// Raw reference as it appears in the document.
  pub reference: String,
  /// Path of the document containing the reference.
  pub document: PathBuf,
  /// Why the reference was skipped.
  pub reason: VersionError,
}

impl fmt::Display for Warning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{PLUGIN_NAME}: Load file failed: \"{}\" in \"{}\" ({})",
      self.reference,
      self.document.display(),
      self.reason
    )
  }
}

/// Receiver for non-fatal warnings raised while versioning.
pub trait WarningSink: Send + Sync {
  /// Record a warning. Processing continues afterwards.
  fn warn(&self, warning: &Warning);
}

/// Sink forwarding warnings to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl WarningSink for TracingSink {
  fn warn(&self, warning: &Warning) {
    tracing::warn!(
      plugin = PLUGIN_NAME,
      reference = %warning.reference,
      document = %warning.document.display(),
      reason = %warning.reason,
      "Load file failed"
    );
  }
}

/// Sink keeping every warning in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
  entries: Mutex<Vec<(String, String)>>,
}

impl CollectingSink {
  /// Create an empty sink.
  pub fn new() -> Self {
    Self::default()
  }

  /// Rendered warning lines in arrival order.
  pub fn lines(&self) -> Vec<String> {
    self.entries.lock().iter().map(|(_, line)| line.clone()).collect()
  }

  /// References that produced warnings, in arrival order.
  pub fn references(&self) -> Vec<String> {
    self
      .entries
      .lock()
      .iter()
      .map(|(reference, _)| reference.clone())
      .collect()
  }

  /// Returns `true` when no warning was recorded.
  pub fn is_empty(&self) -> bool {
    self.entries.lock().is_empty()
  }
}

impl WarningSink for CollectingSink {
  fn warn(&self, warning: &Warning) {
    self
      .entries
      .lock()
      .push((warning.reference.clone(), warning.to_string()));
  }
}
