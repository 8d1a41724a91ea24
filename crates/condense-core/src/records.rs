//! Line-delimited JSON records.
//!
//! Each non-blank input line is one JSON object describing a [`Message`].
//! Validation is per record: a bad line yields a [`RecordError`] carrying its
//! 1-based line number and never affects its neighbours.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::constants::is_valid_priority;
use crate::errors::{RecordError, RecordResult};
use crate::messages::{Message, Role};

/// Wire shape of a record before validation. Unknown fields are ignored.
#[derive(Deserialize)]
struct RawRecord {
    role: Option<String>,
    content: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
    #[serde(default)]
    priority: Option<Value>,
    #[serde(default)]
    tokens: Option<Value>,
}

/// Outcome of parsing a whole JSONL document.
#[derive(Debug, Default)]
pub struct ParsedRecords {
    /// Valid messages in input order.
    pub messages: Vec<Message>,
    /// Rejected records in input order.
    pub errors: Vec<RecordError>,
}

impl ParsedRecords {
    /// Whether every non-blank line produced a message.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate one record.
///
/// `line` is the 1-based line number used in error reports.
pub fn parse_record(raw: &str, line: usize) -> RecordResult<Message> {
    let record: RawRecord =
        serde_json::from_str(raw).map_err(|e| RecordError::malformed(line, e.to_string()))?;

    let role = record
        .role
        .ok_or_else(|| RecordError::malformed(line, "missing field `role`"))?;
    let content = record
        .content
        .ok_or_else(|| RecordError::malformed(line, "missing field `content`"))?;
    if content.trim().is_empty() {
        return Err(RecordError::malformed(line, "empty `content`"));
    }

    let priority_override = match record.priority {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            value
                .as_f64()
                .filter(|p| is_valid_priority(*p))
                .ok_or_else(|| invalid_override(line, "priority", &value))?,
        ),
    };

    let tokens_override = match record.tokens {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            value
                .as_u64()
                .ok_or_else(|| invalid_override(line, "tokens", &value))?,
        ),
    };

    let message = Message {
        role: Role::from(role),
        content,
        timestamp: record.timestamp,
        metadata: record.metadata,
        priority_override,
        tokens_override,
    };

    if message.timestamp.is_some() && message.parsed_timestamp().is_none() {
        warn!(
            line,
            timestamp = message.timestamp.as_deref().unwrap_or_default(),
            "timestamp is not RFC 3339, passing through"
        );
    }

    Ok(message)
}

/// Parse a JSONL document, skipping blank lines.
///
/// Invalid records are collected in [`ParsedRecords::errors`]; the caller
/// decides whether to skip or abort.
pub fn parse_jsonl(input: &str) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();
    for (idx, raw) in input.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        match parse_record(raw, idx + 1) {
            Ok(message) => parsed.messages.push(message),
            Err(err) => parsed.errors.push(err),
        }
    }
    debug!(
        messages = parsed.messages.len(),
        rejected = parsed.errors.len(),
        "parsed records"
    );
    parsed
}

fn invalid_override(line: usize, field: &'static str, value: &Value) -> RecordError {
    RecordError::InvalidOverride {
        line,
        field,
        value: value.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
