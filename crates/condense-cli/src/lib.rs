//! # condense-cli
//!
//! The `condense` binary: reads a JSONL conversation, runs one of the
//! pipeline operations, and writes JSONL or JSON.
//!
//! Settings resolve as defaults, then the settings file, then `CONDENSE_*`
//! variables, then command-line flags.

#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod io;

use std::io::Write;

use anyhow::{Context, Result};

use condense_settings::{CondenseSettings, InvalidEnvVar, apply_overrides_with, load_settings};

use crate::cli::{Cli, Command};

/// Settings for one invocation.
#[derive(Debug)]
pub struct ResolvedSettings {
    /// Validated settings.
    pub settings: CondenseSettings,
    /// `CONDENSE_*` variables that were ignored. Logging is not installed
    /// while settings resolve, so the binary reports these afterwards.
    pub invalid_env: Vec<InvalidEnvVar>,
}

/// Resolve settings from the process environment.
pub fn resolve_settings(cli: &Cli) -> Result<ResolvedSettings> {
    resolve_settings_with(cli, |name| std::env::var(name).ok())
}

/// Resolve settings, reading `CONDENSE_*` variables through `lookup`.
pub fn resolve_settings_with<F>(cli: &Cli, lookup: F) -> Result<ResolvedSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = load_settings(cli.config.as_deref()).context("failed to load settings")?;
    let invalid_env = apply_overrides_with(&mut settings, lookup);

    if let Command::Optimize(args) = &cli.command {
        if let Some(target) = args.target {
            settings.optimizer.target_tokens = target;
        }
        if let Some(preserve) = args.preserve_recent {
            settings.optimizer.preserve_recent = preserve;
        }
        if let Some(min_priority) = args.min_priority {
            settings.optimizer.min_priority = min_priority;
        }
        if args.summarize {
            settings.summarizer.enabled = true;
        }
    }

    settings.validate().context("invalid configuration")?;
    Ok(ResolvedSettings {
        settings,
        invalid_env,
    })
}

/// Run the selected subcommand.
pub fn run(
    cli: &Cli,
    settings: &CondenseSettings,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    match &cli.command {
        Command::Optimize(args) => commands::optimize(args, settings, cli.strict, stdout, stderr),
        Command::Analyze(input) => commands::analyze(input, settings, cli.strict, stdout),
        Command::ExtractFacts(args) => commands::extract(args, settings, cli.strict, stdout),
    }
}
