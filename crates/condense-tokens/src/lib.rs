//! # condense-tokens
//!
//! Token estimation for condense.
//!
//! - [`TokenEstimator`]: the pluggable estimation seam
//! - [`CharRatioEstimator`]: `ceil(chars / chars_per_token)`, the default
//! - [`format_tokens`] / [`compression_ratio`]: report formatting

#![deny(unsafe_code)]

pub mod errors;
pub mod estimator;
pub mod format;

pub use errors::{Result, TokenError};
pub use estimator::{CharRatioEstimator, TokenEstimator};
pub use format::{compression_ratio, format_tokens};
