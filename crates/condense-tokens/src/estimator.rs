//! Token estimation.
//!
//! The pipeline only needs a deterministic count that grows with content
//! length; it never tokenizes for real. [`CharRatioEstimator`] divides the
//! character count by a fixed ratio and rounds up.

use condense_core::Message;

use crate::errors::{Result, TokenError};

/// Derives a token count from message text.
pub trait TokenEstimator {
    /// Estimated token count for `text`.
    ///
    /// Must be deterministic and non-decreasing in `text` length.
    fn estimate(&self, text: &str) -> u64;

    /// Token count for a message: the caller-supplied override when present,
    /// otherwise [`TokenEstimator::estimate`] over the content.
    fn tokens_for(&self, message: &Message) -> u64 {
        message
            .tokens_override
            .unwrap_or_else(|| self.estimate(&message.content))
    }
}

/// `ceil(chars / chars_per_token)` estimator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharRatioEstimator {
    chars_per_token: u64,
}

impl CharRatioEstimator {
    /// Default characters per token.
    pub const DEFAULT_CHARS_PER_TOKEN: u64 = 4;

    /// Create an estimator with the given ratio.
    pub fn new(chars_per_token: u64) -> Result<Self> {
        if chars_per_token == 0 {
            return Err(TokenError::InvalidRatio(chars_per_token));
        }
        Ok(Self { chars_per_token })
    }

    /// Characters per token.
    pub fn chars_per_token(&self) -> u64 {
        self.chars_per_token
    }
}

impl Default for CharRatioEstimator {
    fn default() -> Self {
        Self {
            chars_per_token: Self::DEFAULT_CHARS_PER_TOKEN,
        }
    }
}

impl TokenEstimator for CharRatioEstimator {
    fn estimate(&self, text: &str) -> u64 {
        let chars = text.chars().count() as u64;
        chars.div_ceil(self.chars_per_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_zero() {
        assert_eq!(CharRatioEstimator::default().estimate(""), 0);
    }

    #[test]
    fn rounds_up() {
        let est = CharRatioEstimator::default();
        assert_eq!(est.estimate("a"), 1);
        assert_eq!(est.estimate("abcd"), 1);
        assert_eq!(est.estimate("abcde"), 2);
    }

    #[test]
    fn counts_chars_not_bytes() {
        let est = CharRatioEstimator::default();
        assert_eq!(est.estimate("ééééé"), 2);
    }

    #[test]
    fn custom_ratio() {
        let est = CharRatioEstimator::new(1).unwrap();
        assert_eq!(est.estimate("hello"), 5);
        assert_eq!(est.chars_per_token(), 1);
    }

    #[test]
    fn zero_ratio_rejected() {
        assert_eq!(CharRatioEstimator::new(0), Err(TokenError::InvalidRatio(0)));
    }

    #[test]
    fn override_wins() {
        let est = CharRatioEstimator::default();
        let msg = Message::user("a fairly long message body").with_tokens(3);
        assert_eq!(est.tokens_for(&msg), 3);
        assert_eq!(est.tokens_for(&Message::user("abcdefgh")), 2);
    }

    #[test]
    fn zero_override_is_respected() {
        let msg = Message::user("content").with_tokens(0);
        assert_eq!(CharRatioEstimator::default().tokens_for(&msg), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn monotonic_in_length(base in ".{0,200}", extra in ".{0,50}", ratio in 1u64..16) {
                let est = CharRatioEstimator::new(ratio).unwrap();
                let longer = format!("{base}{extra}");
                prop_assert!(est.estimate(&longer) >= est.estimate(&base));
            }

            #[test]
            fn deterministic(text in ".{0,200}") {
                let est = CharRatioEstimator::default();
                prop_assert_eq!(est.estimate(&text), est.estimate(&text));
            }

            #[test]
            fn bounded_by_char_count(text in ".{0,200}") {
                let est = CharRatioEstimator::default();
                prop_assert!(est.estimate(&text) <= text.chars().count() as u64);
            }
        }
    }
}
