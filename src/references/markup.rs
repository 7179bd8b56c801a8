use std::sync::OnceLock;

use regex::Regex;

use super::IgnoreRules;

fn markup_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?is)<!--.*?-->|<([a-z][a-z0-9-]*)((?:"[^"]*"|'[^']*'|=\s*[^\s"'>][^\s>]*|[^'">])*)>"#)
            .expect("invalid markup token regex")
    })
}

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`][^\s>]*)))?"#)
            .expect("invalid attribute regex")
    })
}

/// Collect `script[src]`, `img[src]` and `link[href*=".css"]` values in document order.
///
/// Comments are skipped and the raw text of `script` and `style` elements is never scanned
/// for tags.
pub fn extract_markup_references(text: &str, rules: &IgnoreRules) -> Vec<String> {
    let lowered = text.to_ascii_lowercase();
    let mut references = Vec::new();
    let mut cursor = 0;

    while let Some(caps) = markup_token_pattern().captures_at(text, cursor) {
        let Some(token) = caps.get(0) else {
            break;
        };
        cursor = token.end();

        let Some(name) = caps.get(1) else {
            continue;
        };
        let tag = name.as_str().to_ascii_lowercase();
        let attributes = caps.get(2).map_or("", |m| m.as_str());

        let candidate = match tag.as_str() {
            "script" | "img" => attribute_value(attributes, "src"),
            "link" => attribute_value(attributes, "href").filter(|href| href.contains(".css")),
            _ => None,
        };

        if let Some(value) = candidate {
            let value = value.trim();
            if !rules.is_ignored(value) {
                references.push(value.to_string());
            }
        }

        if tag == "script" || tag == "style" {
            let closing = format!("</{tag}");
            cursor = lowered[cursor..]
                .find(&closing)
                .map_or(text.len(), |offset| cursor + offset);
        }
    }

    references
}

/// Entity-decoded value of the first attribute named `wanted`.
fn attribute_value(attributes: &str, wanted: &str) -> Option<String> {
    for caps in attribute_pattern().captures_iter(attributes) {
        let name = &caps[1];
        if !name.eq_ignore_ascii_case(wanted) {
            continue;
        }

        let raw = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or("", |m| m.as_str());
        return Some(html_escape::decode_html_entities(raw).into_owned());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<String> {
        extract_markup_references(text, &IgnoreRules::default())
    }

    #[test]
    fn collects_script_image_and_stylesheet_references_in_order() {
        let html = r#"
      <html>
        <head>
          <link rel="stylesheet" href="css/site.css">
          <link rel="icon" href="favicon.ico">
          <script src="js/app.js"></script>
        </head>
        <body>
          <IMG SRC='img/logo.png' alt="logo">
          <img src=img/plain.gif>
        </body>
      </html>
    "#;

        assert_eq!(extract(html), vec![
            "css/site.css".to_string(),
            "js/app.js".to_string(),
            "img/logo.png".to_string(),
            "img/plain.gif".to_string(),
        ]);
    }

    #[test]
    fn keeps_duplicates() {
        let html = r#"<img src="a.png"><img src="a.png">"#;
        assert_eq!(extract(html), vec!["a.png".to_string(), "a.png".to_string()]);
    }

    #[test]
    fn trims_and_decodes_attribute_values() {
        let html = r#"<script src="  lib.js?a=1&amp;b=2  "></script>"#;
        assert_eq!(extract(html), vec!["lib.js?a=1&b=2".to_string()]);
    }

    #[test]
    fn skips_tags_without_relevant_attributes() {
        let html = r#"<script>console.log(1)</script><img alt="x"><link href="feed.xml">"#;
        assert!(extract(html).is_empty());
    }

    #[test]
    fn skips_comments_and_script_bodies() {
        let html = r#"
      <!-- <script src="old.js"></script> -->
      <script>var tpl = "<img src='inline.png'>";</script>
      <style>.a { content: "<img src='style.png'>"; }</style>
      <img src="real.png">
    "#;
        assert_eq!(extract(html), vec!["real.png".to_string()]);
    }

    #[test]
    fn first_duplicate_attribute_wins() {
        let html = r#"<img src="first.png" src="second.png">"#;
        assert_eq!(extract(html), vec!["first.png".to_string()]);
    }

    #[test]
    fn tolerates_quotes_inside_unquoted_values() {
        let html = r#"<img alt=don't src="a.png"><script data-x=it's src=b.js></script>"#;
        assert_eq!(extract(html), vec!["a.png".to_string(), "b.js".to_string()]);
    }

    #[test]
    fn does_not_confuse_data_src_with_src() {
        let html = r#"<img data-src="lazy.png" src="eager.png">"#;
        assert_eq!(extract(html), vec!["eager.png".to_string()]);
    }

    #[test]
    fn filters_ignored_references() {
        let html = r#"
      <script src="https://cdn.example.com/lib.js"></script>
      <img src="data:image/gif;base64,R0lGOD">
      <img src="about:blank">
      <img src="">
      <script src="local.js"></script>
    "#;
        assert_eq!(extract(html), vec!["local.js".to_string()]);
    }
}
