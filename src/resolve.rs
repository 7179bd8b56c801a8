//! Map raw references onto filesystem paths.

use std::path::{Component, Path, PathBuf};

use crate::error::VersionError;

/// Resolve a raw reference to the absolute file it points at.
///
/// Relative references (`./`, `../` or bare names) are anchored at the directory holding the
/// document, taken as given. Root-relative references (`/...`) are anchored at `root_dir`, which
/// is joined under `working_dir` exactly once. Query strings and fragments never take part in the
/// lookup.
pub fn resolve_reference(
  reference: &str,
  document_path: &Path,
  working_dir: &Path,
  root_dir: &Path,
) -> Result<PathBuf, VersionError> {
  let unresolvable = || VersionError::UnresolvableReference {
    reference: reference.to_string(),
  };

  let path_only = strip_query_and_fragment(reference);
  if path_only.is_empty() {
    return Err(unresolvable());
  }

  let implicit;
  let candidate = if path_only.starts_with('.') || path_only.starts_with('/') {
    path_only
  } else {
    implicit = format!("./{path_only}");
    implicit.as_str()
  };

  let resolved = if candidate.starts_with("./") || candidate.starts_with("../") {
    let document_dir = document_path.parent().unwrap_or(working_dir);
    document_dir.join(candidate)
  } else if let Some(rest) = candidate.strip_prefix('/') {
    if rest.starts_with('/') {
      return Err(unresolvable());
    }
    working_dir.join(root_dir).join(rest)
  } else {
    return Err(unresolvable());
  };

  Ok(normalize_path(&resolved))
}

/// Slice of `reference` before any `?` or `#`.
pub(crate) fn strip_query_and_fragment(reference: &str) -> &str {
  reference
    .find(['?', '#'])
    .map_or(reference, |index| &reference[..index])
}

/// Collapse `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();

  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        let at_root = matches!(
          normalized.components().next_back(),
          None | Some(Component::RootDir) | Some(Component::Prefix(_))
        );
        if !at_root {
          normalized.pop();
        }
      }
      other => normalized.push(other.as_os_str()),
    }
  }

  normalized
}
