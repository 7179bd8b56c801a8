//! Pipeline stage applying the versioner to whole documents.

use crate::error::VersionError;
use crate::models::{Document, DocumentContents, DocumentKind};
use crate::versioner::Versioner;

/// Documents returned by [`VersionStage::process_all`].
#[derive(Debug, Default)]
pub struct StageOutput {
  /// Documents that went through the stage, rewritten or passed through.
  pub processed: Vec<Document>,
  /// Documents rejected by the stage along with the reason. Their contents are untouched.
  pub rejected: Vec<(Document, VersionError)>,
}

/// Stream-processing stage: one document in, the same document out.
#[derive(Clone)]
pub struct VersionStage {
  versioner: Versioner,
}

impl VersionStage {
  /// Wrap a configured versioner.
  pub fn new(versioner: Versioner) -> Self {
    Self { versioner }
  }

  /// Rewrite the document contents in place.
  ///
  /// Empty documents and unknown kinds pass through. Streamed contents are rejected with
  /// [`VersionError::UnsupportedInputKind`] and left as they were.
  pub fn process(&self, document: &mut Document) -> Result<(), VersionError> {
    let bytes = match &document.contents {
      DocumentContents::Empty => return Ok(()),
      DocumentContents::Streamed(_) => {
        return Err(VersionError::UnsupportedInputKind {
          path: document.path.clone(),
        });
      }
      DocumentContents::Buffered(bytes) => bytes,
    };

    let kind = document.kind();
    if kind == DocumentKind::Unknown {
      return Ok(());
    }

    let text = String::from_utf8_lossy(bytes);
    let versioned = self
      .versioner
      .version_text(&text, &document.path, &document.cwd, kind);

    if versioned.as_str() != text.as_ref() {
      document.contents = DocumentContents::Buffered(versioned.into_bytes());
    }

    Ok(())
  }

  /// Process a batch in order, separating rejected documents from the rest.
  pub fn process_all<I>(&self, documents: I) -> StageOutput
  where
    I: IntoIterator<Item = Document>,
  {
    let mut output = StageOutput::default();

    for mut document in documents {
      match self.process(&mut document) {
        Ok(()) => output.processed.push(document),
        Err(err) => {
          tracing::error!(document = %document.path.display(), error = %err, "document rejected");
          output.rejected.push((document, err));
        }
      }
    }

    output
  }
}
