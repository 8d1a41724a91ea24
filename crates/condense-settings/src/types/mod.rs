//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` for the JSON file
//! format. Each type implements [`Default`] with the compiled defaults, and
//! `#[serde(default)]` lets a file specify only the fields it changes.

mod optimizer;
mod scoring;

pub use optimizer::*;
pub use scoring::*;

use serde::{Deserialize, Serialize};

use condense_core::constants::is_valid_priority;

use crate::errors::{Result, SettingsError};

/// Root settings type for condense.
///
/// ```json
/// {
///   "optimizer": { "targetTokens": 8000, "preserveRecent": 4 },
///   "summarizer": { "enabled": true }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CondenseSettings {
    /// Budget-fit selection.
    pub optimizer: OptimizerSettings,
    /// High/low priority thresholds.
    pub thresholds: ThresholdSettings,
    /// Token estimation.
    pub estimator: EstimatorSettings,
    /// Priority scoring rules.
    pub scoring: ScoringSettings,
    /// Summarization of evicted messages.
    pub summarizer: SummarizerSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default filter directive when neither `-v` nor `RUST_LOG` is given.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl CondenseSettings {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.optimizer.target_tokens == 0 {
            return Err(SettingsError::InvalidValue(
                "optimizer.targetTokens must be greater than 0".into(),
            ));
        }
        if self.estimator.chars_per_token == 0 {
            return Err(SettingsError::InvalidValue(
                "estimator.charsPerToken must be at least 1".into(),
            ));
        }
        for (name, value) in [
            ("optimizer.minPriority", self.optimizer.min_priority),
            ("thresholds.high", self.thresholds.high),
            ("thresholds.low", self.thresholds.low),
        ] {
            if !is_valid_priority(value) {
                return Err(SettingsError::InvalidValue(format!(
                    "{name} must be within [1, 10], got {value}"
                )));
            }
        }
        if !self.scoring.base_score.is_finite() {
            return Err(SettingsError::InvalidValue(
                "scoring.baseScore must be finite".into(),
            ));
        }
        if let Some(rule) = self.scoring.rules.iter().find(|r| !r.weight.is_finite()) {
            return Err(SettingsError::InvalidValue(format!(
                "scoring rule `{}` has a non-finite weight",
                rule.name
            )));
        }
        Ok(())
    }
}
