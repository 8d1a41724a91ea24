//! Pipeline constants.

// =============================================================================
// Fingerprint
// =============================================================================

/// Hex digits kept from the SHA-256 digest of the normalized word set.
pub const FINGERPRINT_HEX_LEN: usize = 16;

// =============================================================================
// Summarizer
// =============================================================================

/// Prefix on every synthetic summary message.
pub const SUMMARY_PREFIX: &str = "[SUMMARY]";

/// Body used when no evicted message matched a digest category.
pub const SUMMARY_FALLBACK_TEXT: &str = "General conversation summary.";

/// Priority assigned to synthetic summary messages.
pub const SUMMARY_PRIORITY: f64 = 8.0;

/// `metadata.type` value marking a synthetic summary.
pub const SUMMARY_METADATA_TYPE: &str = "summary";

/// Most decisions quoted in a digest.
pub const DIGEST_MAX_DECISIONS: usize = 3;

/// Most facts quoted in a digest.
pub const DIGEST_MAX_FACTS: usize = 3;

/// Most questions quoted in a digest.
pub const DIGEST_MAX_QUESTIONS: usize = 2;

/// Default cap on evicted messages handed to the summarizer.
pub const DEFAULT_MAX_SUMMARY_SOURCES: usize = 20;
