//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`CondenseSettings::default()`]
//! 2. Deep-merge the JSON settings file over the defaults, if present
//! 3. Apply `CONDENSE_*` environment variable overrides
//!
//! Steps 1 and 2 are [`load_settings`]; step 3 is [`apply_env_overrides`],
//! which hands back the variables it ignored so the caller can report them
//! once logging is up. CLI flags are applied by the binary after this,
//! followed by [`CondenseSettings::validate`].
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use condense_core::constants::{MAX_PRIORITY, MIN_PRIORITY};

use crate::errors::{Result, SettingsError};
use crate::types::CondenseSettings;

/// Resolve the default settings file (`~/.condense/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".condense").join("settings.json")
}

/// Load defaults merged with the settings file.
///
/// An explicit `config` path must exist. Without one, the default path is
/// used when present and compiled defaults otherwise.
pub fn load_settings(config: Option<&Path>) -> Result<CondenseSettings> {
    match config {
        Some(path) => {
            let user = read_settings_file(path)?;
            finish(deep_merge(default_value()?, user))
        }
        None => load_settings_from_path(&settings_path()),
    }
}

/// Load settings from `path`, falling back to defaults if it does not exist.
pub fn load_settings_from_path(path: &Path) -> Result<CondenseSettings> {
    let defaults = default_value()?;

    let merged = if path.exists() {
        deep_merge(defaults, read_settings_file(path)?)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    finish(merged)
}

fn default_value() -> Result<Value> {
    Ok(serde_json::to_value(CondenseSettings::default())?)
}

fn read_settings_file(path: &Path) -> Result<Value> {
    debug!(?path, "loading settings from file");
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn finish(merged: Value) -> Result<CondenseSettings> {
    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// A `CONDENSE_*` variable whose value could not be used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidEnvVar {
    /// Variable name.
    pub key: &'static str,
    /// Raw value as set.
    pub value: String,
    /// Expected type.
    pub kind: &'static str,
}

impl fmt::Display for InvalidEnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?} is not a valid {}", self.key, self.value, self.kind)
    }
}

/// Apply `CONDENSE_*` overrides from the process environment.
pub fn apply_env_overrides(settings: &mut CondenseSettings) -> Vec<InvalidEnvVar> {
    apply_overrides_with(settings, |name| std::env::var(name).ok())
}

/// Apply `CONDENSE_*` overrides using `lookup` to read variables.
///
/// Values are parsed strictly; anything unparseable or out of range keeps
/// the file/default value and is returned for [`warn_invalid_env`].
pub fn apply_overrides_with<F>(settings: &mut CondenseSettings, lookup: F) -> Vec<InvalidEnvVar>
where
    F: Fn(&str) -> Option<String>,
{
    let env = EnvReader {
        lookup,
        rejected: RefCell::default(),
    };

    // ── Optimizer ───────────────────────────────────────────────────
    if let Some(v) = env.u64("CONDENSE_TARGET_TOKENS", 1, u64::MAX) {
        settings.optimizer.target_tokens = v;
    }
    if let Some(v) = env.usize("CONDENSE_PRESERVE_RECENT", 0, 1_000_000) {
        settings.optimizer.preserve_recent = v;
    }
    if let Some(v) = env.f64("CONDENSE_MIN_PRIORITY", MIN_PRIORITY, MAX_PRIORITY) {
        settings.optimizer.min_priority = v;
    }

    // ── Thresholds ──────────────────────────────────────────────────
    if let Some(v) = env.f64("CONDENSE_HIGH_THRESHOLD", MIN_PRIORITY, MAX_PRIORITY) {
        settings.thresholds.high = v;
    }
    if let Some(v) = env.f64("CONDENSE_LOW_THRESHOLD", MIN_PRIORITY, MAX_PRIORITY) {
        settings.thresholds.low = v;
    }

    // ── Estimator / summarizer / logging ────────────────────────────
    if let Some(v) = env.u64("CONDENSE_CHARS_PER_TOKEN", 1, 1_000) {
        settings.estimator.chars_per_token = v;
    }
    if let Some(v) = env.bool("CONDENSE_SUMMARIZE") {
        settings.summarizer.enabled = v;
    }
    if let Some(v) = env.string("CONDENSE_LOG_LEVEL") {
        settings.logging.level = v;
    }

    env.rejected.into_inner()
}

/// Log each ignored variable at `warn`.
pub fn warn_invalid_env(rejected: &[InvalidEnvVar]) {
    for var in rejected {
        warn!(key = var.key, value = %var.value, kind = var.kind, "invalid env var, ignoring");
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a finite `f64` within a range.
pub fn parse_f64_range(val: &str, min: f64, max: f64) -> Option<f64> {
    let n: f64 = val.parse().ok()?;
    (n.is_finite() && n >= min && n <= max).then_some(n)
}

// ── Env var readers ─────────────────────────────────────────────────────────

struct EnvReader<F> {
    lookup: F,
    rejected: RefCell<Vec<InvalidEnvVar>>,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.is_empty())
    }

    fn parsed<T>(
        &self,
        name: &'static str,
        kind: &'static str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let val = (self.lookup)(name)?;
        let result = parse(&val);
        if result.is_none() {
            self.rejected.borrow_mut().push(InvalidEnvVar {
                key: name,
                value: val,
                kind,
            });
        }
        result
    }

    fn bool(&self, name: &'static str) -> Option<bool> {
        self.parsed(name, "bool", parse_bool)
    }

    fn u64(&self, name: &'static str, min: u64, max: u64) -> Option<u64> {
        self.parsed(name, "u64", |v| parse_u64_range(v, min, max))
    }

    fn usize(&self, name: &'static str, min: usize, max: usize) -> Option<usize> {
        self.parsed(name, "usize", |v| parse_usize_range(v, min, max))
    }

    fn f64(&self, name: &'static str, min: f64, max: f64) -> Option<f64> {
        self.parsed(name, "f64", |v| parse_f64_range(v, min, max))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
