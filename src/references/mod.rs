//! Reference extraction for markup and stylesheet documents.
//!
//! Each document kind owns a focused scanner so that the tag tokenizer, the `url(...)`
//! matcher and the ignore filter can be tested independently. [`extract_references`]
//! dispatches on [`DocumentKind`] and is the only entry point the versioner needs.

mod filters;
mod markup;
mod stylesheet;

pub use filters::{IgnoreMatching, IgnoreRules};
pub use markup::extract_markup_references;
pub use stylesheet::extract_stylesheet_references;

use crate::models::DocumentKind;

/// Extract raw references from `text` in first-seen order, duplicates included.
pub fn extract_references(text: &str, kind: DocumentKind, rules: &IgnoreRules) -> Vec<String> {
    match kind {
        DocumentKind::Markup => extract_markup_references(text, rules),
        DocumentKind::Stylesheet => extract_stylesheet_references(text, rules),
        DocumentKind::Unknown => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_documents_yield_nothing() {
        let text = r#"<script src="app.js"></script> url(a.png)"#;
        assert!(extract_references(text, DocumentKind::Unknown, &IgnoreRules::default()).is_empty());
    }

    #[test]
    fn dispatches_on_document_kind() {
        let text = r#"<script src="app.js"></script> .a { background: url(a.png) }"#;
        let rules = IgnoreRules::default();

        assert_eq!(extract_references(text, DocumentKind::Markup, &rules), vec![
            "app.js".to_string()
        ]);
        assert_eq!(extract_references(text, DocumentKind::Stylesheet, &rules), vec![
            "a.png".to_string()
        ]);
    }
}
