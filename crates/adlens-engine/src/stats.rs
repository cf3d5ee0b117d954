//! Corpus-level distribution statistics
//!
//! Aggregates a batch of classification results into per-typology shares,
//! pairwise co-occurrence counts, and summary figures.

use adlens_core::ClassificationResult;
use adlens_rules::RuleSet;
use serde::Serialize;
use std::collections::BTreeMap;

/// Share of a corpus labeled with one typology
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypologyShare {
    /// Ads labeled with this typology
    pub count: usize,

    /// `count / total_ads`, as a percentage
    pub percentage: f32,

    /// Mean raw confidence across the ads that carried the label
    pub average_confidence: f32,
}

/// Summary figures over a whole batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DistributionSummary {
    /// Mean label count per ad
    pub avg_labels_per_ad: f32,

    /// Largest label count on any single ad
    pub max_labels_per_ad: usize,

    /// Ads where no typology cleared its threshold
    pub ads_with_no_labels: usize,

    /// Display name of the most frequently assigned typology
    pub most_common_typology: Option<String>,
}

/// Typology distribution across a set of classification results
#[derive(Debug, Clone, Default, Serialize)]
pub struct TypologyDistribution {
    /// Number of ads aggregated
    pub total_ads: usize,

    /// Distinct typologies that appeared at least once
    pub typologies_found: usize,

    /// Per-typology share, keyed by display name
    pub distribution: BTreeMap<String, TypologyShare>,

    /// Pairwise label co-occurrence counts, keyed `"A + B"` in declared order
    pub co_occurrence: BTreeMap<String, usize>,

    /// Summary figures
    pub summary: DistributionSummary,
}

impl TypologyDistribution {
    /// Aggregate a batch of results against the rule set that produced them
    pub fn from_results(rules: &RuleSet, results: &[ClassificationResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }

        let total_ads = results.len();
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut confidence_totals: BTreeMap<String, f32> = BTreeMap::new();
        let mut co_occurrence: BTreeMap<String, usize> = BTreeMap::new();

        for result in results {
            for label in &result.typology_labels {
                *counts.entry(label.clone()).or_default() += 1;

                // mean confidence needs the id behind the display name
                if let Some(typology) = rules
                    .typologies()
                    .iter()
                    .find(|typology| typology.name() == label)
                {
                    *confidence_totals.entry(label.clone()).or_default() +=
                        result.score(typology.id());
                }
            }

            for (i, first) in result.typology_labels.iter().enumerate() {
                for second in &result.typology_labels[i + 1..] {
                    let (a, b) = if first <= second {
                        (first, second)
                    } else {
                        (second, first)
                    };
                    *co_occurrence.entry(format!("{a} + {b}")).or_default() += 1;
                }
            }
        }

        let distribution: BTreeMap<String, TypologyShare> = counts
            .iter()
            .map(|(label, &count)| {
                let share = TypologyShare {
                    count,
                    percentage: count as f32 / total_ads as f32 * 100.0,
                    average_confidence: confidence_totals.get(label).copied().unwrap_or(0.0)
                        / count as f32,
                };
                (label.clone(), share)
            })
            .collect();

        let label_counts: Vec<usize> = results.iter().map(|r| r.typology_count).collect();
        let most_common_typology = counts
            .iter()
            .max_by_key(|entry| *entry.1)
            .map(|(label, _)| label.clone());

        let summary = DistributionSummary {
            avg_labels_per_ad: label_counts.iter().sum::<usize>() as f32 / total_ads as f32,
            max_labels_per_ad: label_counts.iter().copied().max().unwrap_or(0),
            ads_with_no_labels: label_counts.iter().filter(|&&count| count == 0).count(),
            most_common_typology,
        };

        Self {
            total_ads,
            typologies_found: counts.len(),
            distribution,
            co_occurrence,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;

    #[test]
    fn test_empty_batch_yields_default() {
        let rules = RuleSet::builtin().unwrap();
        let distribution = TypologyDistribution::from_results(&rules, &[]);
        assert_eq!(distribution.total_ads, 0);
        assert!(distribution.distribution.is_empty());
    }

    #[test]
    fn test_distribution_counts_and_co_occurrence() {
        let analyzer = Analyzer::with_builtin_rules().unwrap();
        let results = analyzer.classify_batch([
            "Last chance! Save 50% today only!",
            "Hurry, limited time! Ends today!",
            "Our quiet little shop",
        ]);

        let distribution = TypologyDistribution::from_results(analyzer.rules(), &results);

        assert_eq!(distribution.total_ads, 3);
        assert_eq!(distribution.summary.ads_with_no_labels, 1);

        let urgency = &distribution.distribution["Urgency / Scarcity"];
        assert_eq!(urgency.count, 2);
        assert!((urgency.percentage - 2.0 / 3.0 * 100.0).abs() < 0.01);
        assert!(urgency.average_confidence > 0.8);

        assert_eq!(
            distribution.summary.most_common_typology.as_deref(),
            Some("Urgency / Scarcity")
        );

        // first ad carries both urgency and value labels
        assert!(distribution
            .co_occurrence
            .keys()
            .any(|pair| pair.contains("Urgency / Scarcity")));
    }
}
