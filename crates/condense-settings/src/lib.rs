//! # condense-settings
//!
//! Layered configuration for condense.
//!
//! Settings are resolved from these layers (later wins):
//! 1. **Compiled defaults**: [`CondenseSettings::default()`]
//! 2. **Settings file**: `--config FILE` or `~/.condense/settings.json`, deep-merged
//! 3. **Environment variables**: `CONDENSE_*` overrides
//! 4. **CLI flags**: applied by the binary
//!
//! There is no global instance; the resolved value is passed explicitly to
//! whatever needs it.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    InvalidEnvVar, apply_env_overrides, apply_overrides_with, deep_merge, load_settings,
    load_settings_from_path, settings_path, warn_invalid_env,
};
pub use types::*;
