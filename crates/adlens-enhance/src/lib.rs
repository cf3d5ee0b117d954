//! AdLens Enhance
//!
//! Budget-gated LLM enhancement for ad-copy classifications.
//!
//! The spend ledger enforces a hard ceiling across a session; the
//! orchestrator admits calls against it, validates provider replies, and
//! degrades gracefully — a failed or refused enhancement still yields a
//! complete, unaltered base classification.

pub mod budget;
pub mod enhancer;
pub mod hybrid;
pub mod openai;
pub mod orchestrator;

pub use budget::{BudgetLedger, Reservation};
pub use enhancer::{EnhancementContext, Enhancer, EnhancerReply, RawInsights};
pub use hybrid::HybridAnalyzer;
pub use openai::OpenAiEnhancer;
pub use orchestrator::EnhancementOrchestrator;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::budget::BudgetLedger;
    pub use crate::enhancer::{EnhancementContext, Enhancer, EnhancerReply, RawInsights};
    pub use crate::hybrid::HybridAnalyzer;
    pub use crate::openai::OpenAiEnhancer;
    pub use crate::orchestrator::EnhancementOrchestrator;
    pub use adlens_core::prelude::*;
}
