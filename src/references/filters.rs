use regex::Regex;
use serde::Deserialize;

fn builtin_reference_ignores() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^http|^data:|about:blank").expect("invalid builtin ignore regex")
    })
}

/// How configured ignore patterns combine when more than one is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IgnoreMatching {
    /// Every pattern is evaluated and only the last one decides.
    ///
    /// This keeps the behaviour of the gulp plugin, where the loop overwrote its result on
    /// every iteration.
    #[default]
    LastMatchWins,
    /// A reference is ignored as soon as any pattern matches.
    AnyMatch,
}

/// Filter deciding which extracted references bypass rewriting.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<Regex>,
    matching: IgnoreMatching,
}

impl IgnoreRules {
    /// Build rules from compiled user patterns.
    pub fn new(patterns: Vec<Regex>, matching: IgnoreMatching) -> Self {
        Self { patterns, matching }
    }

    /// User patterns in evaluation order.
    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    /// Combination mode for user patterns.
    pub fn matching(&self) -> IgnoreMatching {
        self.matching
    }

    /// Determine whether a raw reference should be left alone.
    ///
    /// Blank values, remote URLs, data URIs and `about:blank` are always ignored.
    pub fn is_ignored(&self, reference: &str) -> bool {
        if reference.trim().is_empty() || builtin_reference_ignores().is_match(reference) {
            return true;
        }

        match self.matching {
            IgnoreMatching::LastMatchWins => self
                .patterns
                .iter()
                .fold(false, |_, pattern| pattern.is_match(reference)),
            IgnoreMatching::AnyMatch => self
                .patterns
                .iter()
                .any(|pattern| pattern.is_match(reference)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(patterns: &[&str], matching: IgnoreMatching) -> IgnoreRules {
        let compiled = patterns
            .iter()
            .map(|pattern| Regex::new(pattern).unwrap())
            .collect();
        IgnoreRules::new(compiled, matching)
    }

    #[test]
    fn ignores_remote_and_inline_references() {
        let rules = IgnoreRules::default();
        assert!(rules.is_ignored("http://cdn.example.com/app.js"));
        assert!(rules.is_ignored("HTTPS://cdn.example.com/app.js"));
        assert!(rules.is_ignored("data:image/png;base64,abc"));
        assert!(rules.is_ignored("about:blank"));
        assert!(rules.is_ignored("frame.html#about:blank"));
    }

    #[test]
    fn ignores_blank_references() {
        let rules = IgnoreRules::default();
        assert!(rules.is_ignored(""));
        assert!(rules.is_ignored("   "));
    }

    #[test]
    fn keeps_local_paths() {
        let rules = IgnoreRules::default();
        assert!(!rules.is_ignored("app.js"));
        assert!(!rules.is_ignored("/static/site.css"));
        assert!(!rules.is_ignored("../img/logo.png?x=1"));
    }

    #[test]
    fn builtin_rules_apply_regardless_of_user_patterns() {
        let rules = rules(&["^nothing$"], IgnoreMatching::AnyMatch);
        assert!(rules.is_ignored("http://example.com/a.js"));
    }

    #[test]
    fn last_matching_pattern_decides_by_default() {
        let rules = rules(&[r"^vendor/", r"\.min\.js$"], IgnoreMatching::default());

        // First pattern matches, second does not: the reference is still rewritten.
        assert!(!rules.is_ignored("vendor/jquery.js"));
        assert!(rules.is_ignored("vendor/jquery.min.js"));
        assert!(rules.is_ignored("lib/app.min.js"));
    }

    #[test]
    fn any_matching_pattern_ignores_when_requested() {
        let rules = rules(&[r"^vendor/", r"\.min\.js$"], IgnoreMatching::AnyMatch);

        assert!(rules.is_ignored("vendor/jquery.js"));
        assert!(rules.is_ignored("lib/app.min.js"));
        assert!(!rules.is_ignored("lib/app.js"));
    }

    #[test]
    fn single_pattern_behaves_the_same_in_both_modes() {
        for matching in [IgnoreMatching::LastMatchWins, IgnoreMatching::AnyMatch] {
            let rules = rules(&[r"^vendor/"], matching);
            assert!(rules.is_ignored("vendor/jquery.js"));
            assert!(!rules.is_ignored("app.js"));
        }
    }
}
