//! Semantic fingerprints.
//!
//! Two messages are treated as saying the same thing when they use the same
//! set of words, regardless of order, case, punctuation or repetition.
//! "Use option B." and "b OPTION use" share a fingerprint.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::FINGERPRINT_HEX_LEN;

/// Opaque semantic-equivalence key (16 lowercase hex digits).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hex representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sorted, space-joined set of lowercase word tokens.
///
/// A word is a maximal run of alphanumeric characters or `_`.
pub fn normalized_words(text: &str) -> String {
    let lowered = text.to_lowercase();
    let words: BTreeSet<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .collect();
    words.into_iter().collect::<Vec<_>>().join(" ")
}

/// Fingerprint of `text`.
pub fn fingerprint(text: &str) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(normalized_words(text).as_bytes());
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(FINGERPRINT_HEX_LEN);
    Fingerprint(hex)
}
