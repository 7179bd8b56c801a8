//! Content fingerprints and the optional cache shared between documents.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};
use parking_lot::RwLock;

/// Number of hex characters kept from the digest.
pub const FINGERPRINT_LEN: usize = 8;

/// Compute the cache-busting token for a file's bytes.
///
/// The token is the first eight lowercase hex characters of the MD5 digest.
pub fn fingerprint(bytes: &[u8]) -> String {
  let digest = Md5::digest(bytes);
  let mut hex = format!("{digest:x}");
  hex.truncate(FINGERPRINT_LEN);
  hex
}

/// Map from resolved file path to fingerprint, safe to share across threads.
///
/// Entries are written once; later inserts for the same path keep the first value.
#[derive(Debug, Default)]
pub struct FingerprintCache {
  entries: RwLock<HashMap<PathBuf, String>>,
}

impl FingerprintCache {
  /// Create an empty cache.
  pub fn new() -> Self {
    Self::default()
  }

  /// Look up a previously computed fingerprint.
  pub fn get(&self, path: &Path) -> Option<String> {
    self.entries.read().get(path).cloned()
  }

  /// Store `fingerprint` unless an entry already exists, returning the stored value.
  pub fn insert_if_absent(&self, path: PathBuf, fingerprint: String) -> String {
    self.entries.write().entry(path).or_insert(fingerprint).clone()
  }

  /// Number of cached paths.
  pub fn len(&self) -> usize {
    self.entries.read().len()
  }

  /// Returns `true` when nothing has been cached yet.
  pub fn is_empty(&self) -> bool {
    self.entries.read().is_empty()
  }

  /// Drop every cached entry.
  pub fn clear(&self) {
    self.entries.write().clear();
  }

  /// Sorted copy of the cache contents.
  pub fn snapshot(&self) -> BTreeMap<PathBuf, String> {
    self
      .entries
      .read()
      .iter()
      .map(|(path, value)| (path.clone(), value.clone()))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;
  use std::thread;

  #[test]
  fn produces_truncated_lowercase_md5() {
    // md5("hello world") = 5eb63bbbe01eeed093cb22bb8f5acdc3
    assert_eq!(fingerprint(b"hello world"), "5eb63bbb");
    // md5("") = d41d8cd98f00b204e9800998ecf8427e
    assert_eq!(fingerprint(b""), "d41d8cd9");
  }

  #[test]
  fn is_deterministic() {
    let bytes = b"console.log('app');";
    let first = fingerprint(bytes);
    assert_eq!(first, fingerprint(bytes));
    assert_eq!(first.len(), FINGERPRINT_LEN);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
  }

  #[test]
  fn keeps_the_first_inserted_value() {
    let cache = FingerprintCache::new();
    let path = PathBuf::from("/work/app.js");

    assert!(cache.is_empty());
    assert_eq!(cache.insert_if_absent(path.clone(), "aaaaaaaa".into()), "aaaaaaaa");
    assert_eq!(cache.insert_if_absent(path.clone(), "bbbbbbbb".into()), "aaaaaaaa");
    assert_eq!(cache.get(&path).as_deref(), Some("aaaaaaaa"));
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.get(&path).is_none());
  }

  #[test]
  fn concurrent_writers_agree_on_one_value() {
    let cache = Arc::new(FingerprintCache::new());
    let path = PathBuf::from("/work/shared.css");

    let handles: Vec<_> = (0..8)
      .map(|index| {
        let cache = Arc::clone(&cache);
        let path = path.clone();
        thread::spawn(move || cache.insert_if_absent(path, format!("{index:08}")))
      })
      .collect();

    let results: Vec<String> = handles
      .into_iter()
      .map(|handle| handle.join().unwrap())
      .collect();
    let stored = cache.get(&path).unwrap();

    assert!(results.iter().all(|value| *value == stored));
    assert_eq!(cache.snapshot().len(), 1);
  }
}
