//! Text normalization and surface-feature extraction
//!
//! Normalization strips markup and collapses whitespace; the original text is
//! never modified in place and is always returned to the caller alongside the
//! cleaned copy. Feature extraction is a single pass over the cleaned text.

use adlens_core::{Error, Result, TextFeatures};
use aho_corasick::AhoCorasick;
use regex::Regex;

/// Call-to-action cues counted into [`TextFeatures::cta_signals`]
const CTA_PHRASES: &[&str] = &[
    "shop now",
    "buy now",
    "get started",
    "learn more",
    "sign up",
    "try free",
    "download",
    "subscribe",
    "register",
    "join",
    "order",
    "purchase",
    "click here",
    "tap here",
    "visit",
    "call now",
    "book now",
];

/// Normalizes raw ad text and derives lightweight surface features
pub struct TextPreprocessor {
    html_tags: Regex,
    urls: Regex,
    whitespace: Regex,
    numbers: Regex,
    percentages: Regex,
    prices: Regex,
    cta: AhoCorasick,
}

impl TextPreprocessor {
    /// Build a preprocessor with its matchers compiled
    pub fn new() -> Result<Self> {
        let cta = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(CTA_PHRASES)
            .map_err(|e| Error::internal(format!("failed to build CTA matcher: {e}")))?;

        Ok(Self {
            html_tags: compile(r"<[^>]+>")?,
            urls: compile(r"https?://\S+")?,
            whitespace: compile(r"\s+")?,
            numbers: compile(r"\d+")?,
            percentages: compile(r"\d+%")?,
            prices: compile(r"\$\d+")?,
            cta,
        })
    }

    /// Normalize raw text: strip HTML tags and URLs, collapse whitespace
    ///
    /// Case is left untouched; case handling lives in the rule set's pattern
    /// compilation, not here.
    pub fn clean(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let text = self.html_tags.replace_all(text, "");
        let text = self.urls.replace_all(&text, "");
        let text = self.whitespace.replace_all(&text, " ");
        text.trim().to_string()
    }

    /// Derive surface features from normalized text
    ///
    /// An empty string yields all-zero features; there are no error
    /// conditions on this path.
    pub fn features(&self, text: &str) -> TextFeatures {
        let word_count = text.split_whitespace().count();
        let all_caps_words = text
            .split_whitespace()
            .filter(|token| is_all_caps(token))
            .count();

        let caps_ratio = if word_count == 0 {
            0.0
        } else {
            all_caps_words as f32 / word_count as f32
        };

        TextFeatures {
            word_count,
            char_count: text.chars().count(),
            exclamation_count: text.matches('!').count(),
            question_count: text.matches('?').count(),
            all_caps_words,
            caps_ratio,
            number_count: self.numbers.find_iter(text).count(),
            percentage_mentions: self.percentages.find_iter(text).count(),
            price_mentions: self.prices.find_iter(text).count(),
            cta_signals: self.cta.find_iter(text).count(),
        }
    }
}

/// A fully uppercase token of at least three characters ("SALE", "DON'T")
fn is_all_caps(token: &str) -> bool {
    token.chars().count() >= 3
        && token.chars().any(|c| c.is_alphabetic())
        && token
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(|c| c.is_uppercase())
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::internal(format!("invalid matcher '{pattern}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_markup_and_urls() {
        let pre = TextPreprocessor::new().unwrap();

        let cleaned = pre.clean("<b>Big   sale</b> at https://example.com/shop today");
        assert_eq!(cleaned, "Big sale at today");
    }

    #[test]
    fn test_empty_text_yields_zero_features() {
        let pre = TextPreprocessor::new().unwrap();

        let features = pre.features("");
        assert_eq!(features, TextFeatures::default());
        assert_eq!(features.word_count, 0);
        assert_eq!(features.caps_ratio, 0.0);
    }

    #[test]
    fn test_feature_counts() {
        let pre = TextPreprocessor::new().unwrap();

        let features = pre.features("HUGE SALE! Save $50 or 20% off. Shop now! Why wait?");
        assert_eq!(features.word_count, 11);
        assert_eq!(features.exclamation_count, 2);
        assert_eq!(features.question_count, 1);
        assert_eq!(features.all_caps_words, 2);
        assert!((features.caps_ratio - 2.0 / 11.0).abs() < f32::EPSILON);
        assert_eq!(features.percentage_mentions, 1);
        assert_eq!(features.price_mentions, 1);
        assert_eq!(features.cta_signals, 1);
    }

    #[test]
    fn test_all_caps_requires_three_chars() {
        assert!(is_all_caps("SALE"));
        assert!(is_all_caps("DON'T"));
        assert!(!is_all_caps("OK"));
        assert!(!is_all_caps("50%"));
        assert!(!is_all_caps("Sale"));
    }

    #[test]
    fn test_unicode_and_emoji_survive_cleaning() {
        let pre = TextPreprocessor::new().unwrap();

        let cleaned = pre.clean("Fête time 🎉  50% off!");
        assert_eq!(cleaned, "Fête time 🎉 50% off!");

        let features = pre.features(&cleaned);
        assert_eq!(features.word_count, 5);
        assert_eq!(features.percentage_mentions, 1);
    }
}
