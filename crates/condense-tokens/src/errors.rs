//! Token estimation errors.

use thiserror::Error;

/// Errors from building a token estimator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// A char-ratio estimator needs at least one character per token.
    #[error("chars per token must be at least 1, got {0}")]
    InvalidRatio(u64),
}

/// Result type for token operations.
pub type Result<T> = std::result::Result<T, TokenError>;
