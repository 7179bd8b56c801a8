//! Substitute fingerprinted references back into document text.

use regex::{NoExpand, RegexBuilder};

use crate::error::VersionError;

/// Reference split into its path, query and fragment parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceParts<'a> {
  /// Everything before the query or fragment.
  pub path: &'a str,
  /// Query string without the leading `?`.
  pub query: Option<&'a str>,
  /// Fragment without the leading `#`.
  pub fragment: Option<&'a str>,
}

impl<'a> ReferenceParts<'a> {
  /// Split a raw reference the way a URL parser would.
  pub fn parse(reference: &'a str) -> Self {
    let (rest, fragment) = match reference.split_once('#') {
      Some((rest, fragment)) => (rest, Some(fragment)),
      None => (reference, None),
    };
    let (path, query) = match rest.split_once('?') {
      Some((path, query)) => (path, Some(query)),
      None => (rest, None),
    };

    Self {
      path,
      query,
      fragment,
    }
  }

  /// Serialise with the query replaced by `key=value`.
  pub fn with_query(&self, key: &str, value: &str) -> String {
    let mut result = format!("{}?{key}={value}", self.path);
    if let Some(fragment) = self.fragment {
      result.push('#');
      result.push_str(fragment);
    }
    result
  }
}

/// Build the rewritten form of `reference` carrying `query_key=fingerprint`.
///
/// Any existing query parameters are dropped; a fragment is kept.
pub fn versioned_reference(reference: &str, fingerprint: &str, query_key: &str) -> String {
  ReferenceParts::parse(reference).with_query(query_key, fingerprint)
}

/// Replace every occurrence of `reference` in `text`, ignoring case.
///
/// The replacement is literal. Any unrelated text that happens to contain the reference is
/// rewritten too.
pub fn rewrite_reference(
  text: &str,
  reference: &str,
  fingerprint: &str,
  query_key: &str,
) -> Result<String, VersionError> {
  let target = versioned_reference(reference, fingerprint, query_key);
  let pattern = RegexBuilder::new(&regex::escape(reference))
    .case_insensitive(true)
    .build()?;

  Ok(pattern.replace_all(text, NoExpand(&target)).into_owned())
}
