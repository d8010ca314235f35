//! Whitespace and length canonicalization shared by subject and body.
//!
//! Every function here is pure and idempotent.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::Limits;
use crate::types::ExtractionResult;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref EXCESS_NEWLINES: Regex = Regex::new(r"\n{3,}").unwrap();
    static ref NEWLINE_RUN: Regex = Regex::new(r"\n+").unwrap();
}

/// Collapse whitespace runs to one space, trim, cap at `max_chars`.
///
/// Trailing whitespace exposed by the cut is trimmed too, so a cut never
/// leaves a dangling space.
pub fn normalize_subject(raw: &str, max_chars: usize) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(raw, " ");
    truncate_chars(collapsed.trim(), max_chars)
        .trim_end()
        .to_string()
}

/// Unify line endings, squeeze 3+ consecutive newlines to 2, trim.
pub fn normalize_body(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    EXCESS_NEWLINES
        .replace_all(&unified, "\n\n")
        .trim()
        .to_string()
}

/// First non-blank line of an already-normalized body, capped at `max_chars`.
pub fn derive_subject(normalized_body: &str, max_chars: usize) -> String {
    NEWLINE_RUN
        .split(normalized_body)
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| truncate_chars(line, max_chars).trim_end().to_string())
        .unwrap_or_default()
}

/// Longest prefix of `s` holding at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

impl ExtractionResult {
    /// Apply subject, body and derivation rules to raw harvested text.
    ///
    /// Derivation runs on the normalized body so the length cap applies to
    /// what is actually sent.
    pub fn from_raw(subject_raw: &str, body_raw: &str, limits: &Limits) -> Self {
        let body = normalize_body(body_raw);
        let mut subject = normalize_subject(subject_raw, limits.subject_max_chars);
        if subject.is_empty() && !body.is_empty() {
            subject = derive_subject(&body, limits.derived_subject_max_chars);
        }
        Self { subject, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_subject_collapses_whitespace() {
        assert_eq!(normalize_subject("  Hello   there  ", 200), "Hello there");
        assert_eq!(normalize_subject("a\t\nb", 200), "a b");
        assert_eq!(normalize_subject("   ", 200), "");
    }

    #[test]
    fn test_subject_truncates_to_limit() {
        let long = "x".repeat(250);
        assert_eq!(normalize_subject(&long, 200).chars().count(), 200);
    }

    #[test]
    fn test_subject_truncation_drops_dangling_space() {
        let raw = format!("{} tail", "y".repeat(199));
        let subject = normalize_subject(&raw, 200);
        assert_eq!(subject, "y".repeat(199));
    }

    #[test]
    fn test_subject_truncation_counts_chars_not_bytes() {
        let raw = "é".repeat(300);
        assert_eq!(normalize_subject(&raw, 200), "é".repeat(200));
    }

    #[test]
    fn test_body_squeezes_blank_lines() {
        assert_eq!(
            normalize_body("Body line one\n\n\n\nBody line two"),
            "Body line one\n\nBody line two"
        );
        assert_eq!(normalize_body("a\n\nb"), "a\n\nb");
        assert_eq!(normalize_body("\r\n\r\n\r\nx\r\n"), "x");
    }

    #[test]
    fn test_derived_subject_uses_first_non_blank_line() {
        let body = normalize_body("\n\nHello world\nmore text");
        assert_eq!(derive_subject(&body, 120), "Hello world");
        assert_eq!(derive_subject("", 120), "");
    }

    #[test]
    fn test_derived_subject_capped() {
        let body = "z".repeat(300);
        assert_eq!(derive_subject(&body, 120).chars().count(), 120);
    }

    #[test]
    fn test_from_raw_derives_only_when_subject_empty() {
        let limits = Limits::default();
        let derived = ExtractionResult::from_raw("  ", "Just a note", &limits);
        assert_eq!(derived.subject, "Just a note");

        let explicit = ExtractionResult::from_raw("Explicit", "Just a note", &limits);
        assert_eq!(explicit.subject, "Explicit");

        let empty = ExtractionResult::from_raw("", "\n\n", &limits);
        assert!(empty.is_empty());
    }

    proptest! {
        #[test]
        fn prop_subject_idempotent(s in "\\PC{0,300}") {
            let once = normalize_subject(&s, 200);
            prop_assert_eq!(normalize_subject(&once, 200), once.clone());
            prop_assert!(once.chars().count() <= 200);
        }

        #[test]
        fn prop_body_idempotent(s in "[a-z \\n\\r\\t]{0,200}") {
            let once = normalize_body(&s);
            prop_assert_eq!(normalize_body(&once), once.clone());
            prop_assert!(!once.contains("\n\n\n"));
        }

        #[test]
        fn prop_from_raw_respects_limits(subject in "\\PC{0,300}", body in "\\PC{0,400}") {
            let result = ExtractionResult::from_raw(&subject, &body, &Limits::default());
            prop_assert!(result.subject.chars().count() <= 200);
            if normalize_subject(&subject, 200).is_empty() {
                prop_assert!(result.subject.chars().count() <= 120);
            }
        }
    }
}
