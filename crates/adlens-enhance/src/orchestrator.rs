//! Budget-gated enhancement orchestration
//!
//! For each item: estimate the call's cost, reserve budget, invoke the
//! provider, validate the reply, and only then commit the charge
//! (charge-on-confirmed-success). Every failure path degrades to an
//! unenhanced record; nothing on this path is fatal to a batch.

use adlens_core::{ClassificationResult, EnhancementOutcome, EnrichedResult};
use std::sync::Arc;

use crate::budget::BudgetLedger;
use crate::enhancer::{EnhancementContext, Enhancer};

/// Wraps classifications with model-derived insights under a spend ceiling
pub struct EnhancementOrchestrator {
    enhancer: Arc<dyn Enhancer>,
    ledger: BudgetLedger,
}

impl EnhancementOrchestrator {
    /// Create an orchestrator over a provider and a shared ledger
    pub fn new(enhancer: Arc<dyn Enhancer>, ledger: BudgetLedger) -> Self {
        Self { enhancer, ledger }
    }

    /// Create an orchestrator with a fresh ledger for the given ceiling
    pub fn with_budget(enhancer: Arc<dyn Enhancer>, ceiling: f64) -> Self {
        Self::new(enhancer, BudgetLedger::new(ceiling))
    }

    /// The ledger this orchestrator charges against
    pub fn ledger(&self) -> &BudgetLedger {
        &self.ledger
    }

    /// Enhance one classification
    ///
    /// Always returns a record; the base classification is cloned untouched
    /// into it. Refused admission yields a `BudgetExhausted` marker, a failed
    /// or unusable call yields `Failed` — neither commits a charge.
    pub async fn enhance(
        &self,
        base: &ClassificationResult,
        context: Option<&EnhancementContext>,
    ) -> EnrichedResult {
        let estimate = self.enhancer.estimate_cost(&base.original_text);

        let Some(reservation) = self.ledger.reserve(estimate) else {
            tracing::debug!(
                ad_id = base.ad_id.as_deref().unwrap_or("-"),
                estimate,
                "enhancement refused: budget exhausted"
            );
            return EnrichedResult {
                classification: base.clone(),
                enhancement: EnhancementOutcome::BudgetExhausted,
                cost: self.ledger.snapshot(),
            };
        };

        let enhancement = match self.enhancer.invoke(&base.original_text, context).await {
            Ok(reply) => {
                let insights = reply.insights.validate();
                if insights.is_empty() {
                    // nothing validated: treat as failure, release the hold
                    drop(reservation);
                    tracing::warn!(
                        provider = self.enhancer.name(),
                        ad_id = base.ad_id.as_deref().unwrap_or("-"),
                        "enhancement reply carried no usable fields"
                    );
                    EnhancementOutcome::Failed {
                        reason: "no usable insight fields".to_string(),
                    }
                } else {
                    let snapshot = reservation.commit(reply.cost);
                    tracing::debug!(
                        provider = self.enhancer.name(),
                        ad_id = base.ad_id.as_deref().unwrap_or("-"),
                        fields = insights.field_count(),
                        spent = snapshot.spent,
                        "enhancement committed"
                    );
                    EnhancementOutcome::Enriched { insights }
                }
            }
            Err(e) => {
                // covers timeouts and unknown outcomes alike: no charge
                drop(reservation);
                tracing::warn!(
                    provider = self.enhancer.name(),
                    ad_id = base.ad_id.as_deref().unwrap_or("-"),
                    error = %e,
                    "enhancement call failed"
                );
                EnhancementOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        EnrichedResult {
            classification: base.clone(),
            enhancement,
            cost: self.ledger.snapshot(),
        }
    }

    /// Enhance a batch, one output record per input
    ///
    /// Items are processed independently; one item's exhaustion or failure
    /// never aborts the rest.
    pub async fn enhance_batch(
        &self,
        results: &[ClassificationResult],
        context: Option<&EnhancementContext>,
    ) -> Vec<EnrichedResult> {
        let mut enriched = Vec::with_capacity(results.len());
        for result in results {
            enriched.push(self.enhance(result, context).await);
        }
        enriched
    }
}
