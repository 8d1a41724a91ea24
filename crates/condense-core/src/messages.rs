//! Message types for the condense conversation model.
//!
//! A conversation is an ordered list of [`Message`]s. Each message has a
//! [`Role`], non-empty text content, and optional pass-through fields
//! (timestamp, metadata) plus optional caller-supplied overrides for the
//! priority and token count the pipeline would otherwise compute.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Role
// ─────────────────────────────────────────────────────────────────────────────

/// Speaker of a message.
///
/// The three well-known roles get their own variants; any other string is
/// kept verbatim in [`Role::Other`] so unusual logs round-trip unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Human turn.
    User,
    /// Model turn.
    Assistant,
    /// System instruction or injected context.
    System,
    /// Any other role string.
    Other(String),
}

impl Role {
    /// Wire representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "user" => Self::User,
            "assistant" => Self::Assistant,
            "system" => Self::System,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(s) => s,
            other => other.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Message
// ─────────────────────────────────────────────────────────────────────────────

/// One conversation turn.
///
/// Field names match the JSONL record format: the overrides serialize as
/// `priority` and `tokens`. Optional fields are omitted when `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who produced the message.
    pub role: Role,
    /// Text content (non-empty for validated records).
    pub content: String,
    /// ISO-8601 timestamp, passed through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Arbitrary metadata, passed through unmodified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// Caller-supplied priority; wins over the computed score.
    ///
    /// Record parsing rejects values outside `[1, 10]`. Messages built in
    /// code are clamped into that range when scored.
    #[serde(default, rename = "priority", skip_serializing_if = "Option::is_none")]
    pub priority_override: Option<f64>,
    /// Caller-supplied token count; wins over the estimate.
    #[serde(default, rename = "tokens", skip_serializing_if = "Option::is_none")]
    pub tokens_override: Option<u64>,
}

impl Message {
    /// Create a message with no optional fields.
    pub fn new(role: impl Into<Role>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            timestamp: None,
            metadata: None,
            priority_override: None,
            tokens_override: None,
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Set the priority override.
    #[must_use]
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority_override = Some(priority);
        self
    }

    /// Set the token override.
    #[must_use]
    pub fn with_tokens(mut self, tokens: u64) -> Self {
        self.tokens_override = Some(tokens);
        self
    }

    /// Set the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Set the metadata map.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Parse the timestamp as RFC 3339, if present and well-formed.
    pub fn parsed_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
