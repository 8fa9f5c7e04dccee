//! Matching keys for fuzzy duplicate detection. Derived on the fly, never stored.

use once_cell::sync::Lazy;
use regex::Regex;

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)|\[[^\]]*\]").expect("bracket pattern is valid"));

static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("punctuation pattern is valid"));

const SENIORITY_QUALIFIERS: &[&str] = &[
    "senior", "sr", "junior", "jr", "lead", "principal", "staff", "mid", "entry", "level", "i",
    "ii", "iii", "iv",
];

/// "Sr. Data Analyst II (Remote)" → "data analyst".
pub fn normalized_title_key(title: &str) -> String {
    let lowered = title.to_lowercase();
    let without_notes = BRACKETED.replace_all(&lowered, " ");
    let spaced = NON_WORD.replace_all(&without_notes, " ");
    spaced
        .split_whitespace()
        .filter(|word| !SENIORITY_QUALIFIERS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lower-cased, whitespace-collapsed company or location. Empty for the placeholder.
pub fn normalized_label(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_key_drops_seniority_and_notes() {
        assert_eq!(normalized_title_key("Sr. Data Analyst II (Remote)"), "data analyst");
        assert_eq!(normalized_title_key("Senior Data Analyst"), "data analyst");
        assert_eq!(normalized_title_key("Data Analyst [Contract]"), "data analyst");
    }

    #[test]
    fn test_title_key_replaces_punctuation() {
        assert_eq!(
            normalized_title_key("Data Scientist - Health/Informatics"),
            "data scientist health informatics"
        );
    }

    #[test]
    fn test_title_key_keeps_distinct_roles_distinct() {
        assert_ne!(
            normalized_title_key("Data Engineer"),
            normalized_title_key("Data Eng")
        );
    }

    #[test]
    fn test_title_key_of_only_qualifiers_is_empty() {
        assert_eq!(normalized_title_key("Senior (TBD)"), "");
        assert_eq!(normalized_title_key(""), "");
    }

    #[test]
    fn test_company_is_collapsed_and_lowercased() {
        assert_eq!(normalized_label("  Mass   General Brigham "), "mass general brigham");
        assert_eq!(normalized_label(""), "");
    }
}
