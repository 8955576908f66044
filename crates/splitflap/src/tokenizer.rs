//! Splitting titles into display words.

use std::fmt;

use serde::Serialize;

/// A non-empty, whitespace-free, uppercased piece of a title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Word(String);

impl Word {
    /// The word's text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters (not bytes); one flap cell per character.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split a title on whitespace runs and uppercase each piece.
///
/// Punctuation is kept; only whitespace separates words.
///
/// ```
/// use splitflap::tokenizer::split_title;
///
/// let words = split_title("Zero-to-One Builder");
/// let words: Vec<&str> = words.iter().map(|w| w.as_str()).collect();
/// assert_eq!(words, ["ZERO-TO-ONE", "BUILDER"]);
/// ```
#[must_use]
pub fn split_title(title: &str) -> Vec<Word> {
    title
        .split_whitespace()
        .map(|token| Word(token.to_uppercase()))
        .collect()
}

/// The whole title as one display line, uppercased with its spacing kept
/// as written; every space is a cell. Returns `None` for blank titles.
#[must_use]
pub fn whole_title(title: &str) -> Option<String> {
    if title.trim().is_empty() {
        return None;
    }
    Some(title.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(words: &[Word]) -> Vec<&str> {
        words.iter().map(Word::as_str).collect()
    }

    #[test]
    fn test_split_keeps_hyphenated_words() {
        let words = split_title("Zero-to-One Builder");
        assert_eq!(texts(&words), ["ZERO-TO-ONE", "BUILDER"]);
    }

    #[test]
    fn test_split_discards_empty_tokens() {
        let words = split_title("  Full \t Stack\n\nCreator  ");
        assert_eq!(texts(&words), ["FULL", "STACK", "CREATOR"]);
    }

    #[test]
    fn test_split_blank_title() {
        assert!(split_title("").is_empty());
        assert!(split_title("   \t ").is_empty());
    }

    #[test]
    fn test_single_word() {
        assert_eq!(texts(&split_title("Dad")), ["DAD"]);
    }

    #[test]
    fn test_char_count_counts_chars() {
        let words = split_title("café");
        assert_eq!(words[0].as_str(), "CAFÉ");
        assert_eq!(words[0].char_count(), 4);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(split_title("Pizza Chef"), split_title("Pizza Chef"));
    }

    #[test]
    fn test_whole_title_keeps_spacing() {
        assert_eq!(whole_title("Software Seuss").unwrap(), "SOFTWARE SEUSS");

        let line = whole_title("Software   Seuss").unwrap();
        assert_eq!(line, "SOFTWARE   SEUSS");
        assert_eq!(line.chars().count(), 16);
    }

    #[test]
    fn test_whole_title_blank() {
        assert!(whole_title("  ").is_none());
    }

    #[test]
    fn test_word_display() {
        let words = split_title("pizza");
        assert_eq!(words[0].to_string(), "PIZZA");
    }
}
