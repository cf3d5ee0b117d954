//! AdLens Rules
//!
//! YAML-defined persuasion typology rules: weighted regex patterns,
//! per-typology thresholds, and global classification settings.
//!
//! Typologies are uniform data evaluated by one generic engine — adding a
//! typology never requires new code, only new rule entries.

pub mod ruleset;
pub mod spec;

pub use ruleset::{Pattern, RuleSet, Settings, Typology};
pub use spec::{PatternSpec, RuleFileSpec, SettingsSpec, TypologySpec};
