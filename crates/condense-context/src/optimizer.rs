//! The [`ContextOptimizer`] facade.
//!
//! Wires the estimator, scorer, selector and summarizer together from a
//! resolved [`CondenseSettings`]. Scoring runs over every message before
//! any deduplication or ranking starts.

use tracing::{debug, info};

use condense_core::Message;
use condense_settings::CondenseSettings;
use condense_tokens::{CharRatioEstimator, TokenEstimator, compression_ratio};

use crate::analyzer::{ConversationStats, analyze};
use crate::errors::Result;
use crate::facts::{Fact, extract_facts};
use crate::scoring::PriorityScorer;
use crate::selector::{BudgetSelector, Selection};
use crate::summarizer::{DigestSummarizer, PassThrough, Summarizer};
use crate::types::{ScoredMessage, total_tokens};

/// Before/after figures for one optimization run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptimizationReport {
    /// Input message count.
    pub original_messages: usize,
    /// Input token total.
    pub original_tokens: u64,
    /// Output message count (including any summary).
    pub optimized_messages: usize,
    /// Output token total (including any summary).
    pub optimized_tokens: u64,
    /// Messages kept by recency.
    pub preserved: usize,
    /// Candidates removed as duplicates.
    pub deduplicated: usize,
    /// Candidates removed for low priority.
    pub below_priority: usize,
    /// Eligible candidates that did not fit.
    pub evicted: usize,
    /// Whether a summary message was inserted.
    pub summarized: bool,
}

impl OptimizationReport {
    /// Percentage of tokens removed.
    pub fn compression(&self) -> f64 {
        compression_ratio(self.original_tokens, self.optimized_tokens)
    }
}

/// Output of [`ContextOptimizer::optimize`].
#[derive(Clone, Debug, PartialEq)]
pub struct Optimized {
    /// Reduced conversation with derived fields.
    pub messages: Vec<ScoredMessage>,
    /// Run figures.
    pub report: OptimizationReport,
}

/// Conversation optimizer.
pub struct ContextOptimizer {
    estimator: Box<dyn TokenEstimator + Send + Sync>,
    scorer: PriorityScorer,
    selector: BudgetSelector,
    summarizer: Box<dyn Summarizer>,
    high_threshold: f64,
    low_threshold: f64,
}

impl std::fmt::Debug for ContextOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextOptimizer")
            .field("scorer", &self.scorer)
            .field("selector", &self.selector)
            .field("high_threshold", &self.high_threshold)
            .field("low_threshold", &self.low_threshold)
            .finish_non_exhaustive()
    }
}

impl ContextOptimizer {
    /// Build an optimizer from validated settings.
    ///
    /// Uses [`DigestSummarizer`] when `summarizer.enabled`, else [`PassThrough`].
    pub fn new(settings: &CondenseSettings) -> Result<Self> {
        settings.validate()?;
        let estimator = CharRatioEstimator::new(settings.estimator.chars_per_token)?;
        let scorer = PriorityScorer::new(&settings.scoring)?;
        let summarizer: Box<dyn Summarizer> = if settings.summarizer.enabled {
            Box::new(DigestSummarizer::new())
        } else {
            Box::new(PassThrough)
        };

        Ok(Self {
            estimator: Box::new(estimator),
            scorer,
            selector: BudgetSelector {
                target_tokens: settings.optimizer.target_tokens,
                preserve_recent: settings.optimizer.preserve_recent,
                min_priority: settings.optimizer.min_priority,
                max_summary_sources: settings.summarizer.max_sources,
            },
            summarizer,
            high_threshold: settings.thresholds.high,
            low_threshold: settings.thresholds.low,
        })
    }

    /// Replace the summarizer.
    #[must_use]
    pub fn with_summarizer(mut self, summarizer: Box<dyn Summarizer>) -> Self {
        self.summarizer = summarizer;
        self
    }

    /// Replace the token estimator.
    #[must_use]
    pub fn with_estimator(mut self, estimator: Box<dyn TokenEstimator + Send + Sync>) -> Self {
        self.estimator = estimator;
        self
    }

    /// Selection parameters in effect.
    pub fn selector(&self) -> &BudgetSelector {
        &self.selector
    }

    /// Attach priority, token cost and fingerprint to every message.
    pub fn score(&self, messages: &[Message]) -> Vec<ScoredMessage> {
        messages
            .iter()
            .enumerate()
            .map(|(position, message)| {
                ScoredMessage::new(
                    message.clone(),
                    position,
                    self.scorer.score(message),
                    self.estimator.tokens_for(message),
                )
            })
            .collect()
    }

    /// Reduce `messages` to fit the token budget.
    pub fn optimize(&self, messages: &[Message]) -> Optimized {
        let scored = self.score(messages);
        let original_tokens = total_tokens(&scored);
        debug!(messages = scored.len(), tokens = original_tokens, "scored conversation");

        let selection: Selection =
            self.selector
                .select(scored, self.summarizer.as_ref(), self.estimator.as_ref());

        let report = OptimizationReport {
            original_messages: messages.len(),
            original_tokens,
            optimized_messages: selection.kept.len() + usize::from(selection.summary.is_some()),
            optimized_tokens: selection.tokens(),
            preserved: selection.preserved,
            deduplicated: selection.deduplicated,
            below_priority: selection.below_priority,
            evicted: selection.evicted,
            summarized: selection.summary.is_some(),
        };

        info!(
            original_messages = report.original_messages,
            original_tokens = report.original_tokens,
            optimized_messages = report.optimized_messages,
            optimized_tokens = report.optimized_tokens,
            summarized = report.summarized,
            "optimization complete"
        );

        Optimized {
            messages: selection.into_messages(),
            report,
        }
    }

    /// Statistics over the whole conversation.
    pub fn analyze(&self, messages: &[Message]) -> ConversationStats {
        analyze(&self.score(messages), self.high_threshold, self.low_threshold)
    }

    /// Messages with priority `>= threshold`, in input order.
    pub fn extract_facts(&self, messages: &[Message], threshold: f64) -> Vec<Fact> {
        extract_facts(&self.score(messages), threshold)
    }

    /// Default fact threshold (the high-priority threshold).
    pub fn high_threshold(&self) -> f64 {
        self.high_threshold
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
