//! High-value message extraction.

use serde::Serialize;

use condense_core::Role;

use crate::types::ScoredMessage;

/// A message at or above the fact threshold.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Fact {
    /// Message content.
    pub content: String,
    /// Message role.
    pub role: Role,
    /// Effective priority.
    pub priority: f64,
    /// Original timestamp, if any.
    pub timestamp: Option<String>,
    /// Index in the input sequence.
    pub position: usize,
}

impl From<&ScoredMessage> for Fact {
    fn from(scored: &ScoredMessage) -> Self {
        Self {
            content: scored.message.content.clone(),
            role: scored.message.role.clone(),
            priority: scored.priority,
            timestamp: scored.message.timestamp.clone(),
            position: scored.position,
        }
    }
}

/// Messages with priority `>= threshold`, in input order.
pub fn extract_facts(scored: &[ScoredMessage], threshold: f64) -> Vec<Fact> {
    scored
        .iter()
        .filter(|m| m.priority >= threshold)
        .map(Fact::from)
        .collect()
}
