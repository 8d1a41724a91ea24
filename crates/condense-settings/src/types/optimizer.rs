//! Optimizer, threshold, estimator and summarizer settings.

use serde::{Deserialize, Serialize};

/// Budget-fit selection settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizerSettings {
    /// Token ceiling for the optimized conversation.
    pub target_tokens: u64,
    /// Number of trailing messages that are always kept.
    pub preserve_recent: usize,
    /// Candidates scoring strictly below this are dropped before ranking.
    pub min_priority: f64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            target_tokens: 50_000,
            preserve_recent: 10,
            min_priority: 5.0,
        }
    }
}

/// Analytics and fact-extraction thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThresholdSettings {
    /// Priority at or above which a message counts as high value.
    pub high: f64,
    /// Priority at or below which a message counts as low value.
    pub low: f64,
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self { high: 7.0, low: 4.0 }
    }
}

/// Token estimation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimatorSettings {
    /// Characters per token for the char-ratio estimator.
    pub chars_per_token: u64,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self { chars_per_token: 4 }
    }
}

/// Summarization of evicted messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummarizerSettings {
    /// Use the extractive digest summarizer instead of the no-op one.
    pub enabled: bool,
    /// Most evicted messages handed to the summarizer.
    pub max_sources: usize,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_sources: 20,
        }
    }
}
