//! Orchestration boundary for AI feedback enrichment.
//!
//! The engine never talks to a text-generation service itself; callers
//! inject an [`AnnotationEnricher`] implementation. What lives here is the
//! per-item independence contract: one question's failed enrichment keeps
//! its original feedback and never blocks or rolls back the others.
//! Throttling, retries, and timeouts belong to the enricher implementation,
//! not to this module.

use thiserror::Error;

use crate::markup::{MarkupOptions, normalize_with};

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("enrichment provider is not configured")]
    ProviderUnavailable,
    #[error("enrichment provider returned empty output")]
    EmptyOutput,
    #[error("enrichment provider call failed: {0}")]
    Provider(String),
}

/// One enrichment call's inputs. Question and correct answer are context
/// for the provider; only the feedback text is rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentItem {
    pub question: String,
    pub correct_answer: String,
    pub feedback: String,
}

/// Produces a markup-enriched version of an item's feedback.
///
/// Implementations wrap an external text-generation service and own all of
/// its transport concerns. Output may be imperfect; it is normalized before
/// being reported back.
pub trait AnnotationEnricher {
    fn enrich(&self, item: &EnrichmentItem) -> Result<String, EnrichmentError>;
}

/// Result of one item's enrichment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// Provider output, passed through the normalizer.
    Enriched { markup: String },
    /// Item had no feedback to enrich; nothing was called.
    Skipped,
    /// Provider failed; the original feedback is kept untouched.
    Failed { original: String, reason: String },
}

/// Enriches a batch of items, one outcome per item, in order.
///
/// Outcomes are independent: failures are recorded and iteration continues.
pub fn enrich_all<E: AnnotationEnricher>(
    enricher: &E,
    items: &[EnrichmentItem],
    options: &MarkupOptions,
) -> Vec<EnrichmentOutcome> {
    items
        .iter()
        .map(|item| {
            if item.feedback.trim().is_empty() {
                return EnrichmentOutcome::Skipped;
            }
            match enricher.enrich(item) {
                Ok(markup) => EnrichmentOutcome::Enriched {
                    markup: normalize_with(&markup, options),
                },
                Err(e) => EnrichmentOutcome::Failed {
                    original: item.feedback.clone(),
                    reason: e.to_string(),
                },
            }
        })
        .collect()
}
