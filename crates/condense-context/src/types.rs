//! Pipeline data types.

use serde::Serialize;

use condense_core::Message;

use crate::fingerprint::{Fingerprint, fingerprint};

/// A message with its derived fields.
///
/// `position` is the index in the input sequence and is the tie-breaker for
/// every recency rule in the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredMessage {
    /// The original message, unmodified.
    pub message: Message,
    /// Index in the input sequence.
    pub position: usize,
    /// Effective priority in `[1, 10]`.
    pub priority: f64,
    /// Effective token cost.
    pub tokens: u64,
    /// Semantic-equivalence key of the content.
    pub fingerprint: Fingerprint,
}

impl ScoredMessage {
    /// Wrap a message, computing its fingerprint.
    pub fn new(message: Message, position: usize, priority: f64, tokens: u64) -> Self {
        let fingerprint = fingerprint(&message.content);
        Self {
            message,
            position,
            priority,
            tokens,
            fingerprint,
        }
    }

    /// Derived fields in the shape written by `--emit-computed`.
    pub fn computed(&self) -> ComputedFields<'_> {
        ComputedFields {
            computed_priority: self.priority,
            computed_tokens: self.tokens,
            fingerprint: &self.fingerprint,
        }
    }
}

/// Serializable view of a message's derived fields.
#[derive(Debug, Serialize)]
pub struct ComputedFields<'a> {
    /// Effective priority.
    pub computed_priority: f64,
    /// Effective token cost.
    pub computed_tokens: u64,
    /// Semantic fingerprint.
    pub fingerprint: &'a Fingerprint,
}

/// Sum of token costs.
pub fn total_tokens(messages: &[ScoredMessage]) -> u64 {
    messages.iter().map(|m| m.tokens).sum()
}
