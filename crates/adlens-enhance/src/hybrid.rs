//! Hybrid analyzer: rules always, enhancement when budget allows
//!
//! Rule-based classification runs first for every item and its output is
//! never altered by enhancement; an enhanced record wraps the exact result
//! rule-only analysis would have produced.

use adlens_core::{AdInput, ClassificationResult, CostSnapshot, EnhancementOutcome, EnrichedResult};
use adlens_engine::Analyzer;
use std::sync::Arc;

use crate::enhancer::{EnhancementContext, Enhancer};
use crate::orchestrator::EnhancementOrchestrator;

/// Rule-based classification with optional budget-gated LLM enhancement
pub struct HybridAnalyzer {
    analyzer: Analyzer,
    orchestrator: Option<EnhancementOrchestrator>,
}

impl HybridAnalyzer {
    /// A hybrid analyzer with enhancement disabled
    pub fn rule_based(analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            orchestrator: None,
        }
    }

    /// A hybrid analyzer charging the given provider against a fresh ledger
    pub fn new(analyzer: Analyzer, enhancer: Arc<dyn Enhancer>, budget_ceiling: f64) -> Self {
        Self {
            analyzer,
            orchestrator: Some(EnhancementOrchestrator::with_budget(
                enhancer,
                budget_ceiling,
            )),
        }
    }

    /// A hybrid analyzer over an existing orchestrator (shared ledgers)
    pub fn with_orchestrator(analyzer: Analyzer, orchestrator: EnhancementOrchestrator) -> Self {
        Self {
            analyzer,
            orchestrator: Some(orchestrator),
        }
    }

    /// The underlying rule-based analyzer
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Session spend position; all zeros when enhancement is disabled
    pub fn cost_report(&self) -> CostSnapshot {
        match &self.orchestrator {
            Some(orchestrator) => orchestrator.ledger().snapshot(),
            None => CostSnapshot {
                spent: 0.0,
                ceiling: 0.0,
                remaining: 0.0,
                calls_made: 0,
            },
        }
    }

    /// Rule-based classification only
    pub fn classify(&self, text: &str, ad_id: Option<&str>) -> ClassificationResult {
        self.analyzer.classify(text, ad_id)
    }

    /// Classify one ad and attempt enhancement
    ///
    /// With enhancement disabled the record is marked `Skipped`, not failed.
    pub async fn classify_enhanced(
        &self,
        text: &str,
        ad_id: Option<&str>,
        context: Option<&EnhancementContext>,
    ) -> EnrichedResult {
        let base = self.analyzer.classify(text, ad_id);
        match &self.orchestrator {
            Some(orchestrator) => orchestrator.enhance(&base, context).await,
            None => EnrichedResult {
                classification: base,
                enhancement: EnhancementOutcome::Skipped,
                cost: self.cost_report(),
            },
        }
    }

    /// Classify a batch, enhancing at most `enhance_fraction` of the items
    ///
    /// The fraction (0.0-1.0) caps how many items are *attempted*; items past
    /// the quota are classified and marked `Skipped`. Order-preserving,
    /// one output record per input, and never aborted by a single item's
    /// budget exhaustion or call failure.
    pub async fn classify_batch_enhanced<I>(
        &self,
        ads: I,
        context: Option<&EnhancementContext>,
        enhance_fraction: f32,
    ) -> Vec<EnrichedResult>
    where
        I: IntoIterator,
        I::Item: Into<AdInput>,
    {
        let ads: Vec<AdInput> = ads.into_iter().map(Into::into).collect();
        let quota = (ads.len() as f32 * enhance_fraction.clamp(0.0, 1.0)).floor() as usize;

        let mut enriched = Vec::with_capacity(ads.len());
        for (i, ad) in ads.into_iter().enumerate() {
            let ad_id = ad.ad_id.unwrap_or_else(|| format!("ad_{i}"));
            let record = if i < quota {
                self.classify_enhanced(&ad.text, Some(&ad_id), context).await
            } else {
                EnrichedResult {
                    classification: self.analyzer.classify(&ad.text, Some(&ad_id)),
                    enhancement: EnhancementOutcome::Skipped,
                    cost: self.cost_report(),
                }
            };
            enriched.push(record);
        }

        enriched
    }
}
