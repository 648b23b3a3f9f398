//! Ordered literal replacement rules.
//!
//! Substitution is literal, case-sensitive, non-overlapping, and replaces
//! every occurrence. Rules apply sequentially to the same string, so a
//! later rule may match text that an earlier rule just produced within the
//! same pass. That cascade is deliberate: the hosted content pipeline
//! depends on it (e.g. "Dribbble" becomes "GitHub" before the contact
//! fixers look for GitHub labels), so it must not be "fixed" into a
//! single-scan substitution.

use serde::{Deserialize, Serialize};

/// One literal substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementRule {
    pub from: String,
    pub to: String,
}

impl ReplacementRule {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// An ordered, immutable rule list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<ReplacementRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<ReplacementRule>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReplacementRule> {
        self.rules.iter()
    }

    /// Apply every rule in order. Returns the rewritten string only when it
    /// differs from the input, so callers can skip no-op write-backs.
    pub fn apply(&self, text: &str) -> Option<String> {
        let mut next = text.to_string();
        for rule in &self.rules {
            if next.contains(&rule.from) {
                next = next.replace(&rule.from, &rule.to);
            }
        }
        if next != text {
            Some(next)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(pairs: &[(&str, &str)]) -> RuleSet {
        RuleSet::new(
            pairs
                .iter()
                .map(|(f, t)| ReplacementRule::new(f, t))
                .collect(),
        )
    }

    #[test]
    fn replaces_all_occurrences_literally() {
        let rs = rules(&[("Visual designer", "Software Engineer")]);
        assert_eq!(
            rs.apply("Visual designer and Visual designer").as_deref(),
            Some("Software Engineer and Software Engineer")
        );
    }

    #[test]
    fn case_sensitive_no_spurious_match() {
        let rs = rules(&[("Visual designer", "Software Engineer")]);
        assert_eq!(rs.apply("visual Designer"), None);
        assert_eq!(rs.apply("unrelated text"), None);
    }

    #[test]
    fn cascade_matches_earlier_output() {
        // Rule two fires on text produced by rule one within the same pass.
        let rs = rules(&[("Dribbble", "GitHub"), ("GitHub profile", "GitHub page")]);
        assert_eq!(
            rs.apply("Dribbble profile").as_deref(),
            Some("GitHub page")
        );
    }

    #[test]
    fn converges_after_one_pass() {
        let rs = rules(&[("Landon Aguirre", "Yousuf Bukhari")]);
        let once = rs.apply("About Landon Aguirre").unwrap();
        assert_eq!(rs.apply(&once), None);
    }

    #[test]
    fn identity_rule_is_a_noop() {
        let rs = rules(&[("LinkedIn", "LinkedIn")]);
        assert_eq!(rs.apply("LinkedIn"), None);
    }
}
