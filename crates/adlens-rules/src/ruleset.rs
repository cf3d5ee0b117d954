//! Compiled, immutable rule sets
//!
//! A [`RuleSet`] is the matchable form of a [`RuleFileSpec`]: every pattern
//! compiled, every invariant checked. Construction is the only fallible step
//! in the classification path; once built, a rule set never changes.

use adlens_core::{Error, Result};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

use crate::{RuleFileSpec, SettingsSpec};

const DEFAULT_RULES: &str = include_str!("../rules/default_rules.yml");

/// A compiled matcher with its score contribution
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    weight: f32,
}

impl Pattern {
    /// The compiled matcher
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Score contribution when this pattern matches at least once
    pub fn weight(&self) -> f32 {
        self.weight
    }
}

/// One persuasion typology with its compiled patterns
#[derive(Debug, Clone)]
pub struct Typology {
    id: String,
    name: String,
    description: String,
    threshold: f32,
    patterns: Vec<Pattern>,
}

impl Typology {
    /// Stable identifier used in score maps
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name used in label lists
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What this typology captures
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Minimum raw score for this typology to be labeled
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Compiled patterns in declared order
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

/// Global classification settings
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    /// Floor below which a typology is never labeled; applied in addition to
    /// per-typology thresholds, never instead of them
    pub min_confidence: f32,

    /// Cap on simultaneously assigned labels
    pub max_labels_per_ad: usize,

    /// Whether patterns were compiled case-sensitively
    pub case_sensitive: bool,
}

/// An immutable set of typologies plus global settings
///
/// Declared typology order is preserved; it is the deterministic tie-breaker
/// when two typologies score identically.
#[derive(Debug, Clone)]
pub struct RuleSet {
    typologies: Vec<Typology>,
    index: HashMap<String, usize>,
    settings: Settings,
}

impl RuleSet {
    /// Compile a parsed spec into a rule set
    ///
    /// Fails on the first malformed definition: empty or duplicate ids,
    /// invalid regexes, negative or non-finite weights and thresholds. This
    /// is the fatal counterpart of [`RuleFileSpec::validate`].
    pub fn from_spec(spec: RuleFileSpec) -> Result<Self> {
        let settings = compile_settings(&spec.settings)?;

        let mut typologies = Vec::with_capacity(spec.typologies.len());
        let mut index = HashMap::with_capacity(spec.typologies.len());

        for typology in spec.typologies {
            let id = typology.id.trim().to_string();
            if id.is_empty() {
                return Err(Error::rules("typology with empty id"));
            }
            if index.contains_key(&id) {
                return Err(Error::rules(format!("duplicate typology id '{id}'")));
            }
            if typology.threshold < 0.0 || !typology.threshold.is_finite() {
                return Err(Error::rules(format!(
                    "{id}: threshold must be a non-negative finite number, got {}",
                    typology.threshold
                )));
            }

            let mut patterns = Vec::with_capacity(typology.patterns.len());
            for (i, pattern) in typology.patterns.iter().enumerate() {
                if pattern.regex.is_empty() {
                    return Err(Error::rules(format!("{id}: pattern {i} has an empty regex")));
                }
                if pattern.weight < 0.0 || !pattern.weight.is_finite() {
                    return Err(Error::rules(format!(
                        "{id}: pattern {i} invalid weight: {}",
                        pattern.weight
                    )));
                }

                let regex = RegexBuilder::new(&pattern.regex)
                    .case_insensitive(!settings.case_sensitive)
                    .build()
                    .map_err(|e| {
                        Error::rules(format!(
                            "{id}: pattern {i} invalid regex '{}': {e}",
                            pattern.regex
                        ))
                    })?;

                patterns.push(Pattern {
                    regex,
                    weight: pattern.weight,
                });
            }

            index.insert(id.clone(), typologies.len());
            typologies.push(Typology {
                id,
                name: typology.name,
                description: typology.description,
                threshold: typology.threshold,
                patterns,
            });
        }

        tracing::debug!(
            typologies = typologies.len(),
            case_sensitive = settings.case_sensitive,
            "compiled rule set"
        );

        Ok(Self {
            typologies,
            index,
            settings,
        })
    }

    /// Compile a rule set from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::from_spec(RuleFileSpec::from_yaml(yaml)?)
    }

    /// Compile a rule set from a YAML file on disk
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::from_spec(RuleFileSpec::from_file(path)?)
    }

    /// The built-in rule set: 8 persuasion typologies
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(DEFAULT_RULES)
    }

    /// Typologies in declared order
    pub fn typologies(&self) -> &[Typology] {
        &self.typologies
    }

    /// Look up a typology by id
    pub fn get(&self, id: &str) -> Option<&Typology> {
        self.index.get(id).map(|&i| &self.typologies[i])
    }

    /// Declared position of a typology, for deterministic tie-breaking
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Global settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Number of typologies
    pub fn len(&self) -> usize {
        self.typologies.len()
    }

    /// True when the rule set has no typologies
    pub fn is_empty(&self) -> bool {
        self.typologies.is_empty()
    }
}

fn compile_settings(spec: &SettingsSpec) -> Result<Settings> {
    if spec.min_confidence < 0.0 || !spec.min_confidence.is_finite() {
        return Err(Error::rules(format!(
            "min_confidence must be a non-negative finite number, got {}",
            spec.min_confidence
        )));
    }
    if spec.max_labels_per_ad == 0 {
        return Err(Error::rules("max_labels_per_ad must be at least 1"));
    }

    Ok(Settings {
        min_confidence: spec.min_confidence,
        max_labels_per_ad: spec.max_labels_per_ad,
        case_sensitive: spec.case_sensitive,
    })
}
