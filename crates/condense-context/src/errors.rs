//! Error types for building the optimization pipeline.
//!
//! Running the pipeline itself is infallible; every error here comes from
//! turning settings into a working optimizer.

use condense_settings::SettingsError;
use condense_tokens::TokenError;
use thiserror::Error;

/// A scoring rule that could not be compiled.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// A `pattern` signal holds an invalid regular expression.
    #[error("scoring rule `{rule}` has an invalid pattern: {source}")]
    InvalidPattern {
        /// Rule name.
        rule: String,
        /// Regex compile error.
        #[source]
        source: regex::Error,
    },
}

/// Top-level error for constructing a [`crate::ContextOptimizer`].
#[derive(Debug, Error)]
pub enum CondenseError {
    /// Settings failed validation.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The scoring rule table could not be compiled.
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    /// The token estimator could not be built.
    #[error(transparent)]
    Tokens(#[from] TokenError),
}

/// Result type for pipeline construction.
pub type Result<T> = std::result::Result<T, CondenseError>;
