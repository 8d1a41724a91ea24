//! Budget-fit selection.
//!
//! ## Algorithm
//!
//! 1. Split off the last `preserve_recent` messages; they are always kept.
//! 2. Deduplicate the remaining candidates, and drop any candidate that
//!    repeats a preserved message.
//! 3. Drop candidates below `min_priority`.
//! 4. Rank by priority (desc), then recency (desc).
//! 5. Greedily accept candidates into `target_tokens - preserved_tokens`,
//!    skipping any that do not fit.
//! 6. If fewer than half the eligible candidates were accepted, ask the
//!    summarizer for a stand-in; insert it only if it fits what is left.
//! 7. Reassemble accepted and preserved messages in original order.

use std::collections::HashSet;

use tracing::{debug, trace};

use condense_core::constants::clamp_priority;
use condense_tokens::TokenEstimator;

use crate::constants::{DEFAULT_MAX_SUMMARY_SOURCES, SUMMARY_PRIORITY};
use crate::dedup::deduplicate;
use crate::summarizer::Summarizer;
use crate::types::{ScoredMessage, total_tokens};

/// Selection parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetSelector {
    /// Token ceiling.
    pub target_tokens: u64,
    /// Trailing messages that are always kept.
    pub preserve_recent: usize,
    /// Candidates strictly below this are dropped.
    pub min_priority: f64,
    /// Most evicted messages passed to the summarizer.
    pub max_summary_sources: usize,
}

impl Default for BudgetSelector {
    fn default() -> Self {
        Self {
            target_tokens: 50_000,
            preserve_recent: 10,
            min_priority: 5.0,
            max_summary_sources: DEFAULT_MAX_SUMMARY_SOURCES,
        }
    }
}

/// Outcome of [`BudgetSelector::select`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    /// Synthetic summary, emitted before everything else.
    pub summary: Option<ScoredMessage>,
    /// Accepted and preserved messages in original order.
    pub kept: Vec<ScoredMessage>,
    /// Number of preserved messages.
    pub preserved: usize,
    /// Candidates removed as duplicates.
    pub deduplicated: usize,
    /// Candidates removed for scoring below `min_priority`.
    pub below_priority: usize,
    /// Eligible candidates that did not fit the budget.
    pub evicted: usize,
}

impl Selection {
    /// Output messages: summary first, then kept messages.
    pub fn into_messages(self) -> Vec<ScoredMessage> {
        self.summary.into_iter().chain(self.kept).collect()
    }

    /// Token cost of the output.
    pub fn tokens(&self) -> u64 {
        self.summary.as_ref().map_or(0, |s| s.tokens) + total_tokens(&self.kept)
    }
}

impl BudgetSelector {
    /// Select messages from a fully scored conversation.
    ///
    /// `scored` must be in original order. `estimator` prices the summary.
    pub fn select(
        &self,
        scored: Vec<ScoredMessage>,
        summarizer: &dyn Summarizer,
        estimator: &dyn TokenEstimator,
    ) -> Selection {
        if scored.is_empty() {
            return Selection::default();
        }

        // ── Split ─────────────────────────────────────────────────────
        let (candidates, preserved) = split_preserved(scored, self.preserve_recent);
        let preserved_tokens = total_tokens(&preserved);
        let budget = self.target_tokens.saturating_sub(preserved_tokens);

        // ── Dedup ─────────────────────────────────────────────────────
        let before_dedup = candidates.len();
        let preserved_prints: HashSet<_> = preserved.iter().map(|m| &m.fingerprint).collect();
        let unique = deduplicate(candidates).kept;
        let unique: Vec<ScoredMessage> = unique
            .into_iter()
            .filter(|m| !preserved_prints.contains(&m.fingerprint))
            .collect();
        let deduplicated = before_dedup - unique.len();

        // ── Filter ────────────────────────────────────────────────────
        let (mut eligible, below): (Vec<_>, Vec<_>) = unique
            .into_iter()
            .partition(|m| m.priority >= self.min_priority);

        // ── Rank ──────────────────────────────────────────────────────
        eligible.sort_by(|a, b| {
            b.priority
                .total_cmp(&a.priority)
                .then_with(|| b.position.cmp(&a.position))
        });

        // ── Greedy fill ───────────────────────────────────────────────
        let eligible_count = eligible.len();
        let mut used = 0u64;
        let mut accepted = Vec::new();
        let mut evicted = Vec::new();
        for msg in eligible {
            if used.saturating_add(msg.tokens) <= budget {
                used += msg.tokens;
                accepted.push(msg);
            } else {
                trace!(position = msg.position, tokens = msg.tokens, "evicted candidate");
                evicted.push(msg);
            }
        }

        debug!(
            preserved = preserved.len(),
            preserved_tokens,
            budget,
            deduplicated,
            below_priority = below.len(),
            accepted = accepted.len(),
            evicted = evicted.len(),
            "budget selection"
        );

        // ── Summarize ─────────────────────────────────────────────────
        let summary = if accepted.len() < eligible_count / 2 {
            self.summarize(&mut evicted, summarizer, estimator, budget - used)
        } else {
            None
        };

        // ── Reassemble ────────────────────────────────────────────────
        let preserved_count = preserved.len();
        let mut kept = accepted;
        kept.extend(preserved);
        kept.sort_by_key(|m| m.position);

        Selection {
            summary,
            kept,
            preserved: preserved_count,
            deduplicated,
            below_priority: below.len(),
            evicted: evicted.len(),
        }
    }

    fn summarize(
        &self,
        evicted: &mut [ScoredMessage],
        summarizer: &dyn Summarizer,
        estimator: &dyn TokenEstimator,
        remaining: u64,
    ) -> Option<ScoredMessage> {
        evicted.sort_by_key(|m| m.position);
        let sources = &evicted[..evicted.len().min(self.max_summary_sources)];
        let message = summarizer.summarize(sources)?;

        let tokens = estimator.tokens_for(&message);
        if tokens > remaining {
            debug!(tokens, remaining, "summary does not fit, dropping");
            return None;
        }

        let priority = clamp_priority(message.priority_override.unwrap_or(SUMMARY_PRIORITY));
        let position = sources.first().map_or(0, |m| m.position);
        debug!(sources = sources.len(), tokens, "inserted summary");
        Some(ScoredMessage::new(message, position, priority, tokens))
    }
}

/// Split into `(candidates, preserved)` where `preserved` is the last
/// `preserve_recent` messages.
fn split_preserved(
    mut messages: Vec<ScoredMessage>,
    preserve_recent: usize,
) -> (Vec<ScoredMessage>, Vec<ScoredMessage>) {
    let split_at = messages.len().saturating_sub(preserve_recent);
    let preserved = messages.split_off(split_at);
    (messages, preserved)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
