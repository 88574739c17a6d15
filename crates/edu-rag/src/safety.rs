//! Keyword gate for generated text
//!
//! A minimal substring gate, not a classifier. Kept synchronous and
//! side-effect-free so it runs on every response without added latency risk.

use crate::types::SafetyReport;

/// Disallowed keyword categories
const SENSITIVE_KEYWORDS: &[&str] = &["暴力", "极端", "违法"];

/// Scan generated text for disallowed keywords.
///
/// `flags` lists every matched category, sorted.
pub fn evaluate(content: &str) -> SafetyReport {
    let mut flags: Vec<String> = SENSITIVE_KEYWORDS
        .iter()
        .filter(|keyword| content.contains(*keyword))
        .map(|keyword| keyword.to_string())
        .collect();
    flags.sort();

    SafetyReport {
        is_safe: flags.is_empty(),
        flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_disallowed_keyword() {
        let report = evaluate("this text mentions 暴力 and nothing else");

        assert!(!report.is_safe);
        assert_eq!(report.flags, vec!["暴力".to_string()]);
    }

    #[test]
    fn test_clean_text_is_safe() {
        let report = evaluate("a perfectly safe sentence");

        assert!(report.is_safe);
        assert!(report.flags.is_empty());
    }

    #[test]
    fn test_multiple_matches_sorted() {
        let report = evaluate("违法内容与暴力内容");

        assert!(!report.is_safe);
        let mut expected = vec!["暴力".to_string(), "违法".to_string()];
        expected.sort();
        assert_eq!(report.flags, expected);
    }
}
