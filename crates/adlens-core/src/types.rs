//! Shared record types for classification and enhancement
//!
//! These types cross crate boundaries: the engine produces
//! [`ClassificationResult`]s, the enhancement orchestrator wraps them into
//! [`EnrichedResult`]s without ever mutating the base record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Surface features derived once per input text, read-only thereafter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextFeatures {
    /// Whitespace-delimited token count
    pub word_count: usize,

    /// Character count of the normalized text
    pub char_count: usize,

    /// Literal `!` occurrences
    pub exclamation_count: usize,

    /// Literal `?` occurrences
    pub question_count: usize,

    /// Tokens that are fully uppercase and at least three characters long
    pub all_caps_words: usize,

    /// `all_caps_words / word_count`, 0 when the text is empty
    pub caps_ratio: f32,

    /// Digit runs (`50`, `2024`)
    pub number_count: usize,

    /// Percentage mentions (`50%`)
    pub percentage_mentions: usize,

    /// Price mentions (`$99`)
    pub price_mentions: usize,

    /// Call-to-action cues ("shop now", "sign up", ...)
    pub cta_signals: usize,
}

/// One ad to classify: text plus an optional caller-supplied identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdInput {
    /// Raw ad copy
    pub text: String,

    /// Caller-supplied identifier; synthesized positionally in batches when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_id: Option<String>,
}

impl AdInput {
    /// Create an input without an identifier
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ad_id: None,
        }
    }

    /// Create an input with an identifier
    pub fn with_id(text: impl Into<String>, ad_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ad_id: Some(ad_id.into()),
        }
    }
}

impl From<&str> for AdInput {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for AdInput {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Result of rule-based classification for a single ad
///
/// Immutable after creation. Enhancement never alters these fields; it wraps
/// the record into an [`EnrichedResult`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Ad identifier, if one was supplied or synthesized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_id: Option<String>,

    /// The text exactly as the caller passed it
    pub original_text: String,

    /// Cleaned text the patterns were evaluated against
    pub normalized_text: String,

    /// Display names of assigned typologies, ordered confidence-descending
    pub typology_labels: Vec<String>,

    /// Number of assigned labels
    pub typology_count: usize,

    /// Raw additive score for every typology in the rule set, zeros included
    pub confidence_scores: BTreeMap<String, f32>,

    /// First matched snippet per triggered pattern, keyed by typology id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub matched_patterns: BTreeMap<String, Vec<String>>,

    /// Surface features of the normalized text
    pub features: TextFeatures,
}

impl ClassificationResult {
    /// Raw confidence score for a typology, 0 when the id is unknown
    pub fn score(&self, typology_id: &str) -> f32 {
        self.confidence_scores
            .get(typology_id)
            .copied()
            .unwrap_or(0.0)
    }

    /// Whether any typology cleared its threshold
    pub fn is_labeled(&self) -> bool {
        !self.typology_labels.is_empty()
    }
}

/// Model-derived insight bundle; every field is independently optional
///
/// Providers across versions may omit fields, and out-of-range values are
/// dropped during validation rather than failing the whole bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightBundle {
    /// Emotional tone (confident, playful, urgent, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,

    /// Target audience (young_professionals, families, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,

    /// Emotional intensity, 1-10 inclusive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,

    /// Brand personality (premium, budget, casual, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,

    /// Persuasion approach (logical, emotional, social, urgency-based)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approach: Option<String>,
}

impl InsightBundle {
    /// True when no field validated
    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    /// Number of populated fields
    pub fn field_count(&self) -> usize {
        [
            self.tone.is_some(),
            self.audience.is_some(),
            self.intensity.is_some(),
            self.personality.is_some(),
            self.approach.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

/// Outcome of an enhancement attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnhancementOutcome {
    /// The call succeeded and at least one insight field validated
    Enriched {
        /// Validated insight fields
        insights: InsightBundle,
    },

    /// The call failed or returned nothing usable; no charge was committed
    Failed {
        /// Human-readable failure reason
        reason: String,
    },

    /// The ledger refused admission before the call was made
    BudgetExhausted,

    /// Enhancement was not requested for this item
    Skipped,
}

impl EnhancementOutcome {
    /// Whether this outcome carries insights
    pub fn is_enriched(&self) -> bool {
        matches!(self, Self::Enriched { .. })
    }

    /// The insight bundle, when present
    pub fn insights(&self) -> Option<&InsightBundle> {
        match self {
            Self::Enriched { insights } => Some(insights),
            _ => None,
        }
    }
}

impl std::fmt::Display for EnhancementOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enriched { .. } => write!(f, "enriched"),
            Self::Failed { reason } => write!(f, "enhancement failed: {reason}"),
            Self::BudgetExhausted => write!(f, "budget exhausted"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Spend position at the moment a record was produced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSnapshot {
    /// Cumulative session spend in USD
    pub spent: f64,

    /// Hard budget ceiling in USD
    pub ceiling: f64,

    /// `ceiling - spent`, clamped at zero
    pub remaining: f64,

    /// Number of committed enhancement calls
    pub calls_made: u64,
}

/// A classification wrapped with enhancement output and a cost snapshot
///
/// The base classification fields are always identical to what rule-based
/// analysis alone would have produced for the same text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedResult {
    /// The unmodified base classification
    pub classification: ClassificationResult,

    /// What happened when enhancement was attempted
    pub enhancement: EnhancementOutcome,

    /// Session spend position after this item was processed
    pub cost: CostSnapshot,
}

impl EnrichedResult {
    /// Whether enhancement succeeded for this item
    pub fn is_enriched(&self) -> bool {
        self.enhancement.is_enriched()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_result() -> ClassificationResult {
        ClassificationResult {
            ad_id: Some("ad_1".to_string()),
            original_text: "Save 50% today!".to_string(),
            normalized_text: "Save 50% today!".to_string(),
            typology_labels: vec!["Value Proposition / Deal".to_string()],
            typology_count: 1,
            confidence_scores: [("value_proposition".to_string(), 1.2)].into(),
            matched_patterns: BTreeMap::new(),
            features: TextFeatures::default(),
        }
    }

    #[test]
    fn test_score_lookup_defaults_to_zero() {
        let result = base_result();
        assert_eq!(result.score("value_proposition"), 1.2);
        assert_eq!(result.score("unknown_typology"), 0.0);
    }

    #[test]
    fn test_insight_bundle_field_count() {
        let empty = InsightBundle::default();
        assert!(empty.is_empty());

        let partial = InsightBundle {
            tone: Some("urgent".to_string()),
            intensity: Some(8),
            ..Default::default()
        };
        assert_eq!(partial.field_count(), 2);
        assert!(!partial.is_empty());
    }

    #[test]
    fn test_outcome_serde_tags() {
        let exhausted = serde_json::to_value(EnhancementOutcome::BudgetExhausted).unwrap();
        assert_eq!(exhausted["status"], "budget_exhausted");

        let failed = serde_json::to_value(EnhancementOutcome::Failed {
            reason: "timeout".to_string(),
        })
        .unwrap();
        assert_eq!(failed["status"], "failed");
        assert_eq!(failed["reason"], "timeout");
    }

    #[test]
    fn test_outcome_display_markers() {
        assert_eq!(
            EnhancementOutcome::BudgetExhausted.to_string(),
            "budget exhausted"
        );
        assert!(EnhancementOutcome::Failed {
            reason: "timeout".to_string()
        }
        .to_string()
        .starts_with("enhancement failed"));
    }

    #[test]
    fn test_enriched_result_round_trip() {
        let enriched = EnrichedResult {
            classification: base_result(),
            enhancement: EnhancementOutcome::Enriched {
                insights: InsightBundle {
                    tone: Some("confident".to_string()),
                    ..Default::default()
                },
            },
            cost: CostSnapshot {
                spent: 0.0002,
                ceiling: 5.0,
                remaining: 4.9998,
                calls_made: 1,
            },
        };

        let json = serde_json::to_string(&enriched).unwrap();
        let back: EnrichedResult = serde_json::from_str(&json).unwrap();
        assert!(back.is_enriched());
        assert_eq!(back.cost.calls_made, 1);
        assert_eq!(back.classification, enriched.classification);
    }
}
