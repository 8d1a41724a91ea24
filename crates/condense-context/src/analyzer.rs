//! Conversation statistics.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::types::{ScoredMessage, total_tokens};

/// Aggregate statistics over a scored (non-deduplicated) conversation.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ConversationStats {
    /// Number of messages.
    pub total_messages: usize,
    /// Sum of token costs.
    pub total_tokens: u64,
    /// `total_tokens / total_messages`, integer division; 0 when empty.
    pub avg_tokens_per_message: u64,
    /// Mean priority; 0.0 when empty.
    pub priority_avg: f64,
    /// Messages at or above the high threshold.
    pub priority_high_count: usize,
    /// Messages at or below the low threshold.
    pub priority_low_count: usize,
    /// Message count per role, sorted by role name.
    pub role_distribution: BTreeMap<String, usize>,
    /// Number of distinct fingerprints.
    pub unique_semantic_groups: usize,
    /// Seconds between the earliest and latest parseable timestamps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_seconds: Option<i64>,
}

/// Compute statistics. `high` and `low` are the priority thresholds.
#[allow(clippy::cast_precision_loss)]
pub fn analyze(scored: &[ScoredMessage], high: f64, low: f64) -> ConversationStats {
    if scored.is_empty() {
        return ConversationStats::default();
    }

    let total_messages = scored.len();
    let total_tokens = total_tokens(scored);

    let mut role_distribution = BTreeMap::new();
    for m in scored {
        *role_distribution
            .entry(m.message.role.as_str().to_owned())
            .or_insert(0) += 1;
    }

    let timestamps: Vec<i64> = scored
        .iter()
        .filter_map(|m| m.message.parsed_timestamp())
        .map(|ts| ts.timestamp())
        .collect();
    let span_seconds = match (timestamps.iter().min(), timestamps.iter().max()) {
        (Some(first), Some(last)) if timestamps.len() >= 2 => Some(last - first),
        _ => None,
    };

    ConversationStats {
        total_messages,
        total_tokens,
        avg_tokens_per_message: total_tokens / total_messages as u64,
        priority_avg: scored.iter().map(|m| m.priority).sum::<f64>() / total_messages as f64,
        priority_high_count: scored.iter().filter(|m| m.priority >= high).count(),
        priority_low_count: scored.iter().filter(|m| m.priority <= low).count(),
        role_distribution,
        unique_semantic_groups: scored
            .iter()
            .map(|m| &m.fingerprint)
            .collect::<HashSet<_>>()
            .len(),
        span_seconds,
    }
}
