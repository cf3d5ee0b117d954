//! Serde specifications for YAML rule files
//!
//! These structs mirror the on-disk rule format. They are plain data:
//! compilation into a matchable [`crate::RuleSet`] happens separately, so a
//! file can be inspected and validated without touching the regex engine.

use adlens_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// A complete rule file: typology definitions plus global settings
///
/// Typologies are an ordered list; that declared order is the deterministic
/// tie-breaker for label selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleFileSpec {
    /// Typology definitions, in declared order
    pub typologies: Vec<TypologySpec>,

    /// Global classification settings
    #[serde(default)]
    pub settings: SettingsSpec,
}

impl RuleFileSpec {
    /// Load a rule file from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("failed to parse rule file: {e}")))
    }

    /// Load a rule file from disk
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Validate the spec without compiling it
    ///
    /// Returns one message per problem; an empty list means the spec will
    /// compile. This is the non-fatal counterpart of
    /// [`crate::RuleSet::from_spec`].
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen = std::collections::HashSet::new();

        if self.settings.min_confidence < 0.0 || !self.settings.min_confidence.is_finite() {
            problems.push(format!(
                "settings: min_confidence must be a non-negative finite number, got {}",
                self.settings.min_confidence
            ));
        }
        if self.settings.max_labels_per_ad == 0 {
            problems.push("settings: max_labels_per_ad must be at least 1".to_string());
        }

        for typology in &self.typologies {
            if typology.id.trim().is_empty() {
                problems.push("typology with empty id".to_string());
                continue;
            }
            if !seen.insert(typology.id.as_str()) {
                problems.push(format!("{}: duplicate typology id", typology.id));
            }
            if typology.threshold < 0.0 || !typology.threshold.is_finite() {
                problems.push(format!(
                    "{}: threshold must be a non-negative finite number, got {}",
                    typology.id, typology.threshold
                ));
            }

            for (i, pattern) in typology.patterns.iter().enumerate() {
                if pattern.regex.is_empty() {
                    problems.push(format!("{}: pattern {i} has an empty regex", typology.id));
                    continue;
                }
                if let Err(e) = regex::Regex::new(&pattern.regex) {
                    problems.push(format!(
                        "{}: pattern {i} invalid regex '{}': {e}",
                        typology.id, pattern.regex
                    ));
                }
                if pattern.weight < 0.0 || !pattern.weight.is_finite() {
                    problems.push(format!(
                        "{}: pattern {i} invalid weight: {}",
                        typology.id, pattern.weight
                    ));
                }
            }
        }

        problems
    }
}

/// One typology definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypologySpec {
    /// Stable identifier used in score maps (`urgency_scarcity`)
    pub id: String,

    /// Display name used in label lists (`Urgency / Scarcity`)
    pub name: String,

    /// What this typology captures
    #[serde(default)]
    pub description: String,

    /// Minimum raw score for this typology to be labeled
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Weighted patterns, in declared order
    pub patterns: Vec<PatternSpec>,
}

/// One weighted pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSpec {
    /// Regular expression evaluated against the normalized text
    pub regex: String,

    /// Score contribution when the pattern matches at least once
    #[serde(default = "default_weight")]
    pub weight: f32,
}

/// Global classification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSpec {
    /// Floor below which a typology is never labeled, regardless of its own
    /// threshold
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    /// Cap on simultaneously assigned labels
    #[serde(default = "default_max_labels")]
    pub max_labels_per_ad: usize,

    /// Match patterns case-sensitively
    #[serde(default)]
    pub case_sensitive: bool,
}

impl Default for SettingsSpec {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            max_labels_per_ad: default_max_labels(),
            case_sensitive: false,
        }
    }
}

fn default_threshold() -> f32 {
    0.5
}

fn default_weight() -> f32 {
    1.0
}

fn default_min_confidence() -> f32 {
    0.5
}

fn default_max_labels() -> usize {
    3
}
