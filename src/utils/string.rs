//! String utilities for record bodies: tokenizing and log-safe truncation

use once_cell::sync::Lazy;
use regex::Regex;

/// Split text into lower-cased word tokens
///
/// Punctuation and control characters are dropped; underscores stay inside
/// tokens so identifiers like `fx_core` survive intact.
///
/// # Examples
/// ```
/// use triage_core::utils::string::tokenize;
///
/// assert_eq!(tokenize("FxCore: test, code!"), vec!["fxcore", "test", "code"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("Valid word regex"));

    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Truncate a string at a character boundary, adding ellipsis if truncated.
///
/// Used to keep record bodies short in log fields without slicing through a
/// multi-byte character.
///
/// # Examples
/// ```
/// use triage_core::utils::string::truncate_at_char_boundary;
///
/// assert_eq!(truncate_at_char_boundary("hello world", 5), "hello...");
/// assert_eq!(truncate_at_char_boundary("hello", 10), "hello");
/// ```
pub fn truncate_at_char_boundary(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_strips_punctuation() {
        assert_eq!(
            tokenize("Parallel TEST body."),
            vec!["parallel", "test", "body"]
        );
    }

    #[test]
    fn test_tokenize_keeps_identifiers() {
        assert_eq!(tokenize("fx_core\tv2"), vec!["fx_core", "v2"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" ,;- ").is_empty());
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_at_char_boundary("h→llo", 2), "h→...");
    }

    #[test]
    fn test_truncate_exact() {
        assert_eq!(truncate_at_char_boundary("hello", 5), "hello");
    }
}
