//! Package-level constants.

/// Current version of condense (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name.
pub const NAME: &str = "condense";

/// Lowest priority a message can carry.
pub const MIN_PRIORITY: f64 = 1.0;

/// Highest priority a message can carry.
pub const MAX_PRIORITY: f64 = 10.0;

/// Clamp a raw score into the `[MIN_PRIORITY, MAX_PRIORITY]` range.
#[must_use]
pub fn clamp_priority(score: f64) -> f64 {
    score.clamp(MIN_PRIORITY, MAX_PRIORITY)
}

/// Whether `value` is a valid priority (finite and within range).
#[must_use]
pub fn is_valid_priority(value: f64) -> bool {
    value.is_finite() && (MIN_PRIORITY..=MAX_PRIORITY).contains(&value)
}
