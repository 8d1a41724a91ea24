//! Fingerprint deduplication.
//!
//! Messages with the same [`Fingerprint`](crate::fingerprint::Fingerprint)
//! collapse to one representative: the highest priority, and among equal
//! priorities the most recent. Survivors keep their original order.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::types::ScoredMessage;

/// Result of [`deduplicate`].
#[derive(Clone, Debug, PartialEq)]
pub struct Deduplicated {
    /// Surviving messages in original order.
    pub kept: Vec<ScoredMessage>,
    /// How many messages were dropped.
    pub dropped: usize,
}

/// Whether `candidate` should replace `current` as its group's representative.
fn outranks(candidate: &ScoredMessage, current: &ScoredMessage) -> bool {
    match candidate.priority.total_cmp(&current.priority) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => candidate.position > current.position,
    }
}

/// Collapse fingerprint-equivalent messages.
pub fn deduplicate(messages: Vec<ScoredMessage>) -> Deduplicated {
    let mut best: HashMap<&str, usize> = HashMap::with_capacity(messages.len());
    for (idx, msg) in messages.iter().enumerate() {
        let slot = best.entry(msg.fingerprint.as_str()).or_insert(idx);
        if outranks(msg, &messages[*slot]) {
            *slot = idx;
        }
    }

    let mut winners: Vec<usize> = best.into_values().collect();
    winners.sort_unstable();

    let total = messages.len();
    let mut winners = winners.into_iter().peekable();
    let kept: Vec<ScoredMessage> = messages
        .into_iter()
        .enumerate()
        .filter_map(|(idx, msg)| winners.next_if_eq(&idx).map(|_| msg))
        .collect();

    let dropped = total - kept.len();
    if dropped > 0 {
        debug!(total, dropped, "deduplicated messages");
    }
    Deduplicated { kept, dropped }
}
