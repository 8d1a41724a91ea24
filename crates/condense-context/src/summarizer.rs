//! Summarization of evicted messages.
//!
//! When the budget forces the selector to drop more than half of the
//! eligible history, it hands the evicted messages to a [`Summarizer`].
//! A returned message is inserted at the front of the output if it fits.
//!
//! - [`PassThrough`] (default) never summarizes.
//! - [`DigestSummarizer`] builds an extractive digest from keyword matches.

use serde_json::{Map, Value};

use condense_core::{Message, Role};

use crate::constants::{
    DIGEST_MAX_DECISIONS, DIGEST_MAX_FACTS, DIGEST_MAX_QUESTIONS, SUMMARY_FALLBACK_TEXT,
    SUMMARY_METADATA_TYPE, SUMMARY_PREFIX, SUMMARY_PRIORITY,
};
use crate::types::ScoredMessage;

// =============================================================================
// Summarizer Trait
// =============================================================================

/// Produces a stand-in message for evicted history.
pub trait Summarizer: Send + Sync {
    /// Summarize `evicted` (chronological). `None` means no summary.
    fn summarize(&self, evicted: &[ScoredMessage]) -> Option<Message>;
}

/// Summarizer that never produces a summary.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThrough;

impl Summarizer for PassThrough {
    fn summarize(&self, _evicted: &[ScoredMessage]) -> Option<Message> {
        None
    }
}

// =============================================================================
// Digest Summarizer
// =============================================================================

const DECISION_TERMS: &[&str] = &["decide", "will", "going to"];
const FACT_TERMS: &[&str] = &["fact", "data", "result"];

/// Extractive, rule-based summarizer.
///
/// Each evicted message lands in at most one bucket, checked in order:
/// decisions, then questions, then facts. The digest quotes the first few
/// of each.
#[derive(Clone, Copy, Debug, Default)]
pub struct DigestSummarizer;

impl DigestSummarizer {
    /// Create a digest summarizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Summarizer for DigestSummarizer {
    fn summarize(&self, evicted: &[ScoredMessage]) -> Option<Message> {
        if evicted.is_empty() {
            return None;
        }

        let mut decisions = Vec::new();
        let mut questions = Vec::new();
        let mut facts = Vec::new();

        for scored in evicted {
            let content = scored.message.content.as_str();
            let lowered = content.to_lowercase();
            if DECISION_TERMS.iter().any(|t| lowered.contains(t)) {
                decisions.push(content);
            } else if content.contains('?') {
                questions.push(content);
            } else if FACT_TERMS.iter().any(|t| lowered.contains(t)) {
                facts.push(content);
            }
        }

        let mut parts = Vec::new();
        if !decisions.is_empty() {
            parts.push(section("Decisions", &decisions, DIGEST_MAX_DECISIONS));
        }
        if !facts.is_empty() {
            parts.push(section("Key facts", &facts, DIGEST_MAX_FACTS));
        }
        if !questions.is_empty() {
            parts.push(section("Questions", &questions, DIGEST_MAX_QUESTIONS));
        }

        let body = if parts.is_empty() {
            SUMMARY_FALLBACK_TEXT.to_owned()
        } else {
            parts.join("\n")
        };

        let mut metadata = Map::new();
        let _ = metadata.insert("type".into(), Value::from(SUMMARY_METADATA_TYPE));
        let _ = metadata.insert("source_count".into(), Value::from(evicted.len()));

        Some(
            Message::new(Role::System, format!("{SUMMARY_PREFIX} {body}"))
                .with_priority(SUMMARY_PRIORITY)
                .with_metadata(metadata),
        )
    }
}

fn section(title: &str, items: &[&str], limit: usize) -> String {
    let quoted: Vec<&str> = items.iter().take(limit).copied().collect();
    format!("**{title}:** {}", quoted.join("; "))
}

// =============================================================================
// Tests
// =============================================================================
