//! The abstract enhancement capability
//!
//! Given text and instructions, a provider returns structured fields or
//! fails. Providers across versions omit fields, so the raw payload is
//! bounds-validated into an [`InsightBundle`] with each field independently
//! present-or-absent.

use adlens_core::{InsightBundle, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Optional context forwarded to the model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnhancementContext {
    /// Industry the ad belongs to ("radio equipment retail")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

impl EnhancementContext {
    /// Context carrying only an industry hint
    pub fn industry(industry: impl Into<String>) -> Self {
        Self {
            industry: Some(industry.into()),
        }
    }
}

/// Structured fields exactly as the provider returned them
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInsights {
    #[serde(default, alias = "emotional_tone")]
    pub tone: Option<String>,

    #[serde(default, alias = "target_audience")]
    pub audience: Option<String>,

    #[serde(default, alias = "emotional_intensity")]
    pub intensity: Option<i64>,

    #[serde(default, alias = "brand_personality")]
    pub personality: Option<String>,

    #[serde(default, alias = "persuasion_approach")]
    pub approach: Option<String>,
}

impl RawInsights {
    /// Bounds-validate into a bundle, dropping fields that fail
    ///
    /// Intensity must lie in 1-10 inclusive; blank strings count as absent.
    /// An empty bundle signals the call produced nothing usable.
    pub fn validate(self) -> InsightBundle {
        InsightBundle {
            tone: non_blank(self.tone),
            audience: non_blank(self.audience),
            intensity: self
                .intensity
                .filter(|i| (1..=10).contains(i))
                .map(|i| i as u8),
            personality: non_blank(self.personality),
            approach: non_blank(self.approach),
        }
    }
}

fn non_blank(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

/// What a provider reports back for one successful call
#[derive(Debug, Clone)]
pub struct EnhancerReply {
    /// Raw structured fields, not yet validated
    pub insights: RawInsights,

    /// Confirmed provider-side cost of the call in USD
    pub cost: f64,
}

/// Abstract model capability behind enhancement
///
/// An `Err` from [`invoke`] means the call failed or its outcome is unknown;
/// the orchestrator treats both identically and commits no charge.
///
/// [`invoke`]: Self::invoke
#[async_trait]
pub trait Enhancer: Send + Sync {
    /// Request insight fields for one ad text
    async fn invoke(
        &self,
        text: &str,
        context: Option<&EnhancementContext>,
    ) -> Result<EnhancerReply>;

    /// Expected cost of a call for this text, used for budget admission
    fn estimate_cost(&self, text: &str) -> f64;

    /// Provider name, for logging
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_drops_out_of_range_intensity() {
        let raw = RawInsights {
            tone: Some("urgent".to_string()),
            intensity: Some(42),
            ..Default::default()
        };

        let bundle = raw.validate();
        assert_eq!(bundle.tone.as_deref(), Some("urgent"));
        assert!(bundle.intensity.is_none());
        assert_eq!(bundle.field_count(), 1);
    }

    #[test]
    fn test_validate_keeps_in_range_intensity() {
        for intensity in [1, 5, 10] {
            let raw = RawInsights {
                intensity: Some(intensity),
                ..Default::default()
            };
            assert_eq!(raw.validate().intensity, Some(intensity as u8));
        }
        for intensity in [0, 11, -3] {
            let raw = RawInsights {
                intensity: Some(intensity),
                ..Default::default()
            };
            assert!(raw.validate().intensity.is_none());
        }
    }

    #[test]
    fn test_validate_treats_blank_strings_as_absent() {
        let raw = RawInsights {
            tone: Some("  ".to_string()),
            audience: Some("families".to_string()),
            ..Default::default()
        };

        let bundle = raw.validate();
        assert!(bundle.tone.is_none());
        assert_eq!(bundle.audience.as_deref(), Some("families"));
    }

    #[test]
    fn test_raw_insights_accept_provider_field_names() {
        let payload = r#"{
            "emotional_tone": "confident",
            "target_audience": "entrepreneurs",
            "emotional_intensity": 7,
            "brand_personality": "premium",
            "persuasion_approach": "logical"
        }"#;

        let raw: RawInsights = serde_json::from_str(payload).unwrap();
        let bundle = raw.validate();
        assert_eq!(bundle.field_count(), 5);
        assert_eq!(bundle.intensity, Some(7));
    }
}
