//! Error kinds produced while versioning documents.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the versioning engine.
///
/// Only [`VersionError::UnsupportedInputKind`] aborts a document. Every other variant is
/// scoped to a single reference and reported through a [`crate::WarningSink`].
#[derive(Debug, Error)]
pub enum VersionError {
  /// The document contents arrived as a stream instead of a complete buffer.
  #[error("streaming not supported: {}", path.display())]
  UnsupportedInputKind {
    /// Path of the rejected document.
    path: PathBuf,
  },
  /// The resolved file could not be read.
  #[error("failed to read {}: {source}", path.display())]
  ReferenceRead {
    /// Resolved path that failed to load.
    path: PathBuf,
    /// Underlying I/O error.
    #[source]
    source: std::io::Error,
  },
  /// The reference does not match any resolution rule.
  #[error("cannot resolve reference \"{reference}\" to a file path")]
  UnresolvableReference {
    /// Raw reference text.
    reference: String,
  },
  /// A user pattern or substitution pattern failed to compile.
  #[error("invalid pattern: {0}")]
  InvalidPattern(#[from] regex::Error),
}
