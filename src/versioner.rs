//! Versioning engine tying extraction, resolution, hashing and rewriting together.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::config::VersionerOptions;
use crate::diagnostics::{TracingSink, Warning, WarningSink};
use crate::error::VersionError;
use crate::fingerprint::{FingerprintCache, fingerprint};
use crate::models::DocumentKind;
use crate::references::extract_references;
use crate::resolve::resolve_reference;
use crate::rewrite::rewrite_reference;

/// Rewrites asset references in a document's text to carry content fingerprints.
#[derive(Clone)]
pub struct Versioner {
  options: VersionerOptions,
  cache: Option<Arc<FingerprintCache>>,
  sink: Arc<dyn WarningSink>,
}

impl Versioner {
  /// Create a versioner without a cache, reporting warnings through `tracing`.
  pub fn new(options: VersionerOptions) -> Self {
    Self {
      options,
      cache: None,
      sink: Arc::new(TracingSink),
    }
  }

  /// Share fingerprints through `cache`, computing each path at most once.
  pub fn with_cache(mut self, cache: Arc<FingerprintCache>) -> Self {
    self.cache = Some(cache);
    self
  }

  /// Send warnings to `sink` instead of `tracing`.
  pub fn with_sink(mut self, sink: Arc<dyn WarningSink>) -> Self {
    self.sink = sink;
    self
  }

  /// Options this versioner was built with.
  pub fn options(&self) -> &VersionerOptions {
    &self.options
  }

  /// Return `text` with every resolvable reference fingerprinted.
  ///
  /// References that cannot be resolved or read are reported to the warning sink and left
  /// verbatim. A repeated reference is rewritten once, covering all of its occurrences.
  pub fn version_text(
    &self,
    text: &str,
    document_path: &Path,
    working_dir: &Path,
    kind: DocumentKind,
  ) -> String {
    let references = extract_references(text, kind, &self.options.ignore);
    let mut content = text.to_string();
    let mut seen = HashSet::new();

    for reference in references {
      if !seen.insert(reference.to_lowercase()) {
        continue;
      }

      let rewritten = self
        .fingerprint_reference(&reference, document_path, working_dir)
        .and_then(|hash| {
          rewrite_reference(&content, &reference, &hash, &self.options.query_key)
        });

      match rewritten {
        Ok(updated) => {
          tracing::debug!(reference = %reference, document = %document_path.display(), "versioned reference");
          content = updated;
        }
        Err(reason) => self.sink.warn(&Warning {
          reference,
          document: document_path.to_path_buf(),
          reason,
        }),
      }
    }

    content
  }

  fn fingerprint_reference(
    &self,
    reference: &str,
    document_path: &Path,
    working_dir: &Path,
  ) -> Result<String, VersionError> {
    let root_dir = self.options.root_dir.as_deref().unwrap_or(Path::new(""));
    let path = resolve_reference(reference, document_path, working_dir, root_dir)?;

    if let Some(cache) = &self.cache
      && let Some(hit) = cache.get(&path)
    {
      tracing::trace!(path = %path.display(), "fingerprint cache hit");
      return Ok(hit);
    }

    let bytes = fs::read(&path).map_err(|source| VersionError::ReferenceRead {
      path: path.clone(),
      source,
    })?;
    let hash = fingerprint(&bytes);

    Ok(match &self.cache {
      Some(cache) => cache.insert_if_absent(path, hash),
      None => hash,
    })
  }
}
