//! AdLens Core
//!
//! Core types and error handling shared across AdLens components.
//!
//! This crate provides:
//! - Classification and enhancement record types
//! - Error types and result handling
//! - The text-feature value object derived by the preprocessor

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    AdInput, ClassificationResult, CostSnapshot, EnhancementOutcome, EnrichedResult,
    InsightBundle, TextFeatures,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        AdInput, ClassificationResult, CostSnapshot, EnhancementOutcome, EnrichedResult,
        InsightBundle, TextFeatures,
    };
}
