//! AdLens Engine
//!
//! Rule-based ad-copy typology classification.
//!
//! The pipeline is deterministic and infallible per input: normalize text,
//! derive surface features, score every typology by summing matched pattern
//! weights, then select labels under threshold and cardinality constraints.
//! Rule set construction is the only fallible step.

pub mod analyzer;
pub mod preprocess;
pub mod scoring;
pub mod select;
pub mod stats;

pub use analyzer::Analyzer;
pub use preprocess::TextPreprocessor;
pub use scoring::{ScoreReport, ScoringEngine};
pub use select::{LabelSelector, SelectedLabel};
pub use stats::{DistributionSummary, TypologyDistribution, TypologyShare};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analyzer::Analyzer;
    pub use crate::preprocess::TextPreprocessor;
    pub use crate::scoring::{ScoreReport, ScoringEngine};
    pub use crate::select::{LabelSelector, SelectedLabel};
    pub use crate::stats::TypologyDistribution;
    pub use adlens_core::prelude::*;
    pub use adlens_rules::RuleSet;
}
