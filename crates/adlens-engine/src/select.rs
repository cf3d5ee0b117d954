//! Multi-label selection under threshold and cardinality constraints

use adlens_rules::RuleSet;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A typology that cleared its threshold, with the score that selected it
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedLabel {
    /// Typology id
    pub id: String,

    /// Typology display name
    pub name: String,

    /// The raw score that cleared the threshold
    pub score: f32,
}

/// Converts per-typology scores into the final ordered label set
pub struct LabelSelector {
    rules: Arc<RuleSet>,
}

impl LabelSelector {
    /// Create a selector over a compiled rule set
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    /// Select labels from a score map
    ///
    /// Candidates must clear max(per-typology threshold, global
    /// min_confidence). Ordering is score-descending with ties broken by
    /// declared typology order, then truncated to `max_labels_per_ad`. An
    /// empty result is a valid outcome, not a failure.
    pub fn select(&self, scores: &BTreeMap<String, f32>) -> Vec<SelectedLabel> {
        let settings = self.rules.settings();

        let mut candidates: Vec<(usize, SelectedLabel)> = self
            .rules
            .typologies()
            .iter()
            .enumerate()
            .filter_map(|(position, typology)| {
                let score = scores.get(typology.id()).copied().unwrap_or(0.0);
                let floor = typology.threshold().max(settings.min_confidence);
                (score >= floor).then(|| {
                    (
                        position,
                        SelectedLabel {
                            id: typology.id().to_string(),
                            name: typology.name().to_string(),
                            score,
                        },
                    )
                })
            })
            .collect();

        candidates.sort_by(|(pos_a, a), (pos_b, b)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(pos_a.cmp(pos_b))
        });
        candidates.truncate(settings.max_labels_per_ad);

        candidates.into_iter().map(|(_, label)| label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Arc<RuleSet> {
        let yaml = r#"
typologies:
  - id: first
    name: First
    threshold: 0.8
    patterns:
      - regex: "a"
  - id: second
    name: Second
    threshold: 0.8
    patterns:
      - regex: "b"
  - id: third
    name: Third
    threshold: 0.3
    patterns:
      - regex: "c"
settings:
  min_confidence: 0.5
  max_labels_per_ad: 2
"#;
        Arc::new(RuleSet::from_yaml(yaml).unwrap())
    }

    fn scores(entries: &[(&str, f32)]) -> BTreeMap<String, f32> {
        entries
            .iter()
            .map(|(id, score)| (id.to_string(), *score))
            .collect()
    }

    #[test]
    fn test_threshold_and_floor_both_apply() {
        let selector = LabelSelector::new(rules());

        // third's own threshold is 0.3, but min_confidence 0.5 still floors it
        let selected = selector.select(&scores(&[("first", 0.0), ("second", 0.0), ("third", 0.4)]));
        assert!(selected.is_empty());

        let selected = selector.select(&scores(&[("first", 0.0), ("second", 0.0), ("third", 0.5)]));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "third");
    }

    #[test]
    fn test_ordered_by_score_descending() {
        let selector = LabelSelector::new(rules());

        let selected = selector.select(&scores(&[("first", 0.9), ("second", 1.4), ("third", 0.1)]));
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].id, "second");
        assert_eq!(selected[1].id, "first");
    }

    #[test]
    fn test_ties_break_by_declared_order() {
        let selector = LabelSelector::new(rules());

        let selected = selector.select(&scores(&[("first", 1.0), ("second", 1.0), ("third", 0.0)]));
        assert_eq!(selected[0].id, "first");
        assert_eq!(selected[1].id, "second");
    }

    #[test]
    fn test_truncated_to_max_labels() {
        let selector = LabelSelector::new(rules());

        let selected = selector.select(&scores(&[("first", 1.0), ("second", 1.0), ("third", 2.0)]));
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].id, "third");
        assert_eq!(selected[1].id, "first");
    }
}
