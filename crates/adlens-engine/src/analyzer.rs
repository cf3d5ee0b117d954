//! The classification facade
//!
//! `Analyzer` wires preprocessor, scoring engine, and label selector over one
//! shared rule set. `classify` never fails for any string input and is
//! deterministic for a fixed rule set.

use adlens_core::{AdInput, ClassificationResult, Result};
use adlens_rules::RuleSet;
use std::sync::Arc;

use crate::preprocess::TextPreprocessor;
use crate::scoring::ScoringEngine;
use crate::select::LabelSelector;

/// Rule-based ad-copy classifier
pub struct Analyzer {
    rules: Arc<RuleSet>,
    preprocessor: TextPreprocessor,
    engine: ScoringEngine,
    selector: LabelSelector,
}

impl Analyzer {
    /// Create an analyzer over a compiled rule set
    pub fn new(rules: RuleSet) -> Result<Self> {
        let rules = Arc::new(rules);
        Ok(Self {
            preprocessor: TextPreprocessor::new()?,
            engine: ScoringEngine::new(Arc::clone(&rules)),
            selector: LabelSelector::new(Arc::clone(&rules)),
            rules,
        })
    }

    /// Create an analyzer over the built-in 8-typology rule set
    pub fn with_builtin_rules() -> Result<Self> {
        Self::new(RuleSet::builtin()?)
    }

    /// The rule set this analyzer evaluates
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Classify a single ad copy text
    ///
    /// Empty input yields an empty label set and all-zero scores — a valid
    /// result, not an error.
    pub fn classify(&self, text: &str, ad_id: Option<&str>) -> ClassificationResult {
        let normalized = self.preprocessor.clean(text);
        let features = self.preprocessor.features(&normalized);
        let report = self.engine.score(&normalized);
        let selected = self.selector.select(&report.scores);

        tracing::debug!(
            ad_id = ad_id.unwrap_or("-"),
            labels = selected.len(),
            "classified ad copy"
        );

        ClassificationResult {
            ad_id: ad_id.map(str::to_string),
            original_text: text.to_string(),
            normalized_text: normalized,
            typology_count: selected.len(),
            typology_labels: selected.into_iter().map(|label| label.name).collect(),
            confidence_scores: report.scores,
            matched_patterns: report.matches,
            features,
        }
    }

    /// Classify a batch of ads, order-preserving and one-to-one with input
    ///
    /// Items without an id get a positional one (`ad_0`, `ad_1`, ...).
    pub fn classify_batch<I>(&self, ads: I) -> Vec<ClassificationResult>
    where
        I: IntoIterator,
        I::Item: Into<AdInput>,
    {
        ads.into_iter()
            .enumerate()
            .map(|(i, ad)| {
                let ad = ad.into();
                let ad_id = ad.ad_id.unwrap_or_else(|| format!("ad_{i}"));
                self.classify(&ad.text, Some(&ad_id))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_empty_text() {
        let analyzer = Analyzer::with_builtin_rules().unwrap();

        let result = analyzer.classify("", None);
        assert!(result.typology_labels.is_empty());
        assert_eq!(result.typology_count, 0);
        assert!(result.confidence_scores.values().all(|&s| s == 0.0));
        assert_eq!(result.features.word_count, 0);
        assert!(result.ad_id.is_none());
    }

    #[test]
    fn test_classify_preserves_original_text() {
        let analyzer = Analyzer::with_builtin_rules().unwrap();

        let raw = "<b>HURRY!</b>   Limited time offer";
        let result = analyzer.classify(raw, Some("ad_42"));
        assert_eq!(result.original_text, raw);
        assert_eq!(result.normalized_text, "HURRY! Limited time offer");
        assert_eq!(result.ad_id.as_deref(), Some("ad_42"));
    }

    #[test]
    fn test_batch_synthesizes_positional_ids() {
        let analyzer = Analyzer::with_builtin_rules().unwrap();

        let results = analyzer.classify_batch([
            AdInput::new("Save 50% today only!"),
            AdInput::with_id("Trusted by thousands of customers", "hero-banner"),
        ]);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].ad_id.as_deref(), Some("ad_0"));
        assert_eq!(results[1].ad_id.as_deref(), Some("hero-banner"));
    }

    #[test]
    fn test_classify_is_deterministic() {
        let analyzer = Analyzer::with_builtin_rules().unwrap();

        let text = "Last chance! Save 50% today only!";
        let first = analyzer.classify(text, Some("a"));
        let second = analyzer.classify(text, Some("a"));
        assert_eq!(first, second);

        let first_json = serde_json::to_string(&first).unwrap();
        let second_json = serde_json::to_string(&second).unwrap();
        assert_eq!(first_json, second_json);
    }
}
