use std::sync::OnceLock;

use regex::Regex;

use super::IgnoreRules;

fn block_comment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("invalid comment regex"))
}

fn url_function_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)url\(\s*['"]?([^'":;,\s}]*)['"]?\s*\)"#).expect("invalid url() regex")
    })
}

/// Collect `url(...)` arguments from a stylesheet after removing block comments.
pub fn extract_stylesheet_references(text: &str, rules: &IgnoreRules) -> Vec<String> {
    let stripped = block_comment_pattern().replace_all(text, "");

    url_function_pattern()
        .captures_iter(&stripped)
        .map(|caps| caps[1].trim().to_string())
        .filter(|reference| !rules.is_ignored(reference))
        .collect()
}
