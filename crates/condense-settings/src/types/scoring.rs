//! Priority scoring rule table.
//!
//! A rule pairs a [`Signal`] with a signed weight. Every rule whose signal
//! matches contributes its weight to the base score. Rules are data so the
//! table can be replaced from the settings file without code changes.
//!
//! ```json
//! {"name": "question", "signal": {"kind": "pattern", "regex": "\\?\\s*$"}, "weight": 1.5}
//! ```

use serde::{Deserialize, Serialize};

/// Scoring settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringSettings {
    /// Neutral score before any rule applies.
    pub base_score: f64,
    /// Ordered rule table. Replaces the defaults wholesale when set.
    pub rules: Vec<ScoringRule>,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            base_score: 5.0,
            rules: default_rules(),
        }
    }
}

/// One named scoring rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    /// Rule name, reported in debug logs.
    pub name: String,
    /// What the rule looks for.
    pub signal: Signal,
    /// Added to the score when the signal matches (may be negative).
    pub weight: f64,
}

impl ScoringRule {
    /// Create a rule.
    pub fn new(name: impl Into<String>, signal: Signal, weight: f64) -> Self {
        Self {
            name: name.into(),
            signal,
            weight,
        }
    }
}

/// Content or role signal tested by a rule.
///
/// Text signals match against the lowercased content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Signal {
    /// Content contains any of the terms as a substring.
    ContainsAny {
        /// Lowercase substrings.
        terms: Vec<String>,
    },
    /// Trimmed content equals one of the terms.
    ExactAny {
        /// Lowercase phrases.
        terms: Vec<String>,
    },
    /// Content matches a regular expression.
    Pattern {
        /// Regex source; compiled when the scorer is built.
        regex: String,
    },
    /// Content has fewer than `chars` characters.
    ShorterThan {
        /// Character count threshold.
        chars: usize,
    },
    /// Content contains `ch` more than `count` times.
    CharCountAbove {
        /// Character to count.
        ch: char,
        /// Occurrences that must be exceeded.
        count: usize,
    },
    /// Message role equals `role`.
    Role {
        /// Role string, e.g. `system`.
        role: String,
    },
}

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| (*t).to_owned()).collect()
}

/// The built-in rule table.
pub fn default_rules() -> Vec<ScoringRule> {
    vec![
        ScoringRule::new(
            "decision",
            Signal::ContainsAny {
                terms: terms(&["decide", "important", "remember", "prefer", "always", "never"]),
            },
            2.0,
        ),
        ScoringRule::new(
            "question",
            Signal::Pattern {
                regex: r"\?\s*$".to_owned(),
            },
            1.5,
        ),
        ScoringRule::new(
            "fact",
            Signal::ContainsAny {
                terms: terms(&["data", "fact", "result", "conclusion"]),
            },
            1.5,
        ),
        ScoringRule::new(
            "problem",
            Signal::ContainsAny {
                terms: terms(&["error", "bug", "fix", "issue", "problem"]),
            },
            1.0,
        ),
        ScoringRule::new(
            "numeric",
            Signal::Pattern {
                regex: r"\d".to_owned(),
            },
            0.5,
        ),
        ScoringRule::new(
            "greeting",
            Signal::ContainsAny {
                terms: terms(&["hello", "hi ", "bye", "thanks", "thank you"]),
            },
            -2.5,
        ),
        ScoringRule::new(
            "acknowledgment",
            Signal::ExactAny {
                terms: terms(&["ok", "okay", "yes", "no", "sure", "got it", "understood"]),
            },
            -2.5,
        ),
        ScoringRule::new("short", Signal::ShorterThan { chars: 20 }, -1.0),
        ScoringRule::new("excitement", Signal::CharCountAbove { ch: '!', count: 2 }, -0.5),
        ScoringRule::new(
            "system_role",
            Signal::Role {
                role: "system".to_owned(),
            },
            1.0,
        ),
    ]
}
