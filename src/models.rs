//! Data structures flowing through the versioning stage.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Extraction strategy selected from the document extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
  /// HTML documents, scanned for `script`, `img` and `link` tags.
  Markup,
  /// CSS documents, scanned for `url(...)` calls.
  Stylesheet,
  /// Anything else. No references are extracted.
  Unknown,
}

impl DocumentKind {
  /// Infer the kind from the path extension (`html` or `css`, matched exactly).
  pub fn from_path(path: &Path) -> Self {
    match path.extension().and_then(|ext| ext.to_str()) {
      Some("html") => Self::Markup,
      Some("css") => Self::Stylesheet,
      _ => Self::Unknown,
    }
  }
}

/// Contents carried by a [`Document`].
pub enum DocumentContents {
  /// No contents at all (directories, placeholder entries).
  Empty,
  /// Fully materialised bytes.
  Buffered(Vec<u8>),
  /// Incremental reader. Rejected by the stage.
  Streamed(Box<dyn Read + Send>),
}

impl fmt::Debug for DocumentContents {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Empty => f.write_str("Empty"),
      Self::Buffered(bytes) => f.debug_tuple("Buffered").field(&bytes.len()).finish(),
      Self::Streamed(_) => f.write_str("Streamed"),
    }
  }
}

/// A single unit of work handed to the stage by the upstream pipeline.
#[derive(Debug)]
pub struct Document {
  /// Absolute source path of the document.
  pub path: PathBuf,
  /// Working directory root-relative references are anchored under.
  pub cwd: PathBuf,
  /// Base directory used to compute output paths.
  pub base: PathBuf,
  /// Current contents, replaced in place after processing.
  pub contents: DocumentContents,
}

impl Document {
  /// Create a buffered document whose base defaults to the working directory.
  pub fn new(path: impl Into<PathBuf>, cwd: impl Into<PathBuf>, contents: Vec<u8>) -> Self {
    let cwd = cwd.into();
    Self {
      path: path.into(),
      base: cwd.clone(),
      cwd,
      contents: DocumentContents::Buffered(contents),
    }
  }

  /// Override the base directory.
  pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
    self.base = base.into();
    self
  }

  /// Kind inferred from the document path.
  pub fn kind(&self) -> DocumentKind {
    DocumentKind::from_path(&self.path)
  }

  /// Buffered bytes, if any.
  pub fn bytes(&self) -> Option<&[u8]> {
    match &self.contents {
      DocumentContents::Buffered(bytes) => Some(bytes),
      _ => None,
    }
  }

  /// Path of the document relative to its base, falling back to the file name.
  pub fn relative(&self) -> PathBuf {
    match self.path.strip_prefix(&self.base) {
      Ok(relative) => relative.to_path_buf(),
      Err(_) => self
        .path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| self.path.clone()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn infers_kind_from_exact_extension() {
    assert_eq!(DocumentKind::from_path(Path::new("/a/index.html")), DocumentKind::Markup);
    assert_eq!(DocumentKind::from_path(Path::new("/a/site.css")), DocumentKind::Stylesheet);
    assert_eq!(DocumentKind::from_path(Path::new("/a/page.htm")), DocumentKind::Unknown);
    assert_eq!(DocumentKind::from_path(Path::new("/a/SITE.CSS")), DocumentKind::Unknown);
    assert_eq!(DocumentKind::from_path(Path::new("/a/README")), DocumentKind::Unknown);
  }

  #[test]
  fn computes_paths_relative_to_base() {
    let document = Document::new("/work/src/pages/index.html", "/work", Vec::new())
      .with_base("/work/src");
    assert_eq!(document.relative(), PathBuf::from("pages/index.html"));

    let outside = Document::new("/elsewhere/app.css", "/work", Vec::new());
    assert_eq!(outside.relative(), PathBuf::from("app.css"));
  }
}
