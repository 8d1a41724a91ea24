//! Error types for record ingestion.
//!
//! Record errors are reported per line and never abort the whole run on
//! their own; the caller decides whether to skip or stop.

use thiserror::Error;

/// A single input record that could not become a [`crate::Message`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RecordError {
    /// The record is not valid JSON, is not an object, or lacks a required
    /// field (`role`, non-empty `content`).
    #[error("line {line}: malformed record: {reason}")]
    MalformedRecord {
        /// 1-based line number in the input.
        line: usize,
        /// What was wrong with the record.
        reason: String,
    },
    /// A `priority` or `tokens` override is outside its valid range.
    ///
    /// Overrides are rejected rather than clamped.
    #[error("line {line}: invalid {field} override: {value}")]
    InvalidOverride {
        /// 1-based line number in the input.
        line: usize,
        /// Offending field (`priority` or `tokens`).
        field: &'static str,
        /// The rejected value as it appeared in the record.
        value: String,
    },
}

impl RecordError {
    /// Line number the error refers to.
    pub fn line(&self) -> usize {
        match self {
            Self::MalformedRecord { line, .. } | Self::InvalidOverride { line, .. } => *line,
        }
    }

    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

/// Result type for record parsing.
pub type RecordResult<T> = std::result::Result<T, RecordError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
