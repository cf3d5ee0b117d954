//! Weighted-pattern scoring engine
//!
//! Scores are raw additive sums of matched pattern weights: unbounded above,
//! not probabilities, and compared against thresholds as-is downstream. A
//! pattern contributes its weight once when it matches at least once;
//! repeated matches of the same pattern do not compound.

use adlens_rules::RuleSet;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-typology raw scores plus the snippets that produced them
#[derive(Debug, Clone, Default)]
pub struct ScoreReport {
    /// Raw score for every typology in the rule set, zeros included
    pub scores: BTreeMap<String, f32>,

    /// First matched snippet per triggered pattern, keyed by typology id;
    /// typologies with no hits are absent
    pub matches: BTreeMap<String, Vec<String>>,
}

/// Evaluates a rule set against normalized text
///
/// Pure function over immutable inputs: no interior state, safe to share.
pub struct ScoringEngine {
    rules: Arc<RuleSet>,
}

impl ScoringEngine {
    /// Create an engine over a compiled rule set
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    /// Score text against every typology
    ///
    /// Total coverage: the returned map contains every typology id, so
    /// callers never special-case "typology absent". A text with zero
    /// pattern hits yields an all-zero map, not an error.
    pub fn score(&self, text: &str) -> ScoreReport {
        let mut report = ScoreReport::default();

        for typology in self.rules.typologies() {
            let mut score = 0.0f32;
            let mut matched = Vec::new();

            for pattern in typology.patterns() {
                if let Some(hit) = pattern.regex().find(text) {
                    score += pattern.weight();
                    matched.push(hit.as_str().to_string());
                }
            }

            report.scores.insert(typology.id().to_string(), score);
            if !matched.is_empty() {
                report.matches.insert(typology.id().to_string(), matched);
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urgency_rules() -> Arc<RuleSet> {
        let yaml = r#"
typologies:
  - id: urgency
    name: Urgency
    patterns:
      - regex: "\\bhurry\\b"
        weight: 1.0
      - regex: "\\btoday\\b"
        weight: 0.5
  - id: quiet
    name: Quiet
    patterns:
      - regex: "\\bserene\\b"
        weight: 1.0
"#;
        Arc::new(RuleSet::from_yaml(yaml).unwrap())
    }

    #[test]
    fn test_total_coverage_with_zeros() {
        let engine = ScoringEngine::new(urgency_rules());

        let report = engine.score("nothing matches here");
        assert_eq!(report.scores.len(), 2);
        assert_eq!(report.scores["urgency"], 0.0);
        assert_eq!(report.scores["quiet"], 0.0);
        assert!(report.matches.is_empty());
    }

    #[test]
    fn test_weight_counted_once_per_pattern() {
        let engine = ScoringEngine::new(urgency_rules());

        // "hurry" appears three times but contributes its weight once
        let report = engine.score("hurry hurry hurry, ends today");
        assert_eq!(report.scores["urgency"], 1.5);
        assert_eq!(report.matches["urgency"], vec!["hurry", "today"]);
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let engine = ScoringEngine::new(urgency_rules());

        let report = engine.score("");
        assert!(report.scores.values().all(|&s| s == 0.0));
    }

    #[test]
    fn test_scores_can_exceed_one() {
        let yaml = r#"
typologies:
  - id: stacked
    name: Stacked
    patterns:
      - regex: "alpha"
        weight: 1.5
      - regex: "beta"
        weight: 1.5
      - regex: "gamma"
        weight: 1.5
"#;
        let engine = ScoringEngine::new(Arc::new(RuleSet::from_yaml(yaml).unwrap()));

        let report = engine.score("alpha beta gamma");
        assert_eq!(report.scores["stacked"], 4.5);
    }
}
