//! # condense
//!
//! Binary entry point: parse arguments, resolve settings, install logging,
//! and run the subcommand.

#![deny(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use condense_cli::cli::Cli;
use condense_core::logging::{init_subscriber, level_for_verbosity};
use condense_settings::warn_invalid_env;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let resolved = condense_cli::resolve_settings(&cli)?;
    let settings = &resolved.settings;

    let level = level_for_verbosity(cli.verbose, cli.quiet, &settings.logging.level);
    init_subscriber(&level);
    warn_invalid_env(&resolved.invalid_env);
    debug!(?settings, input = %cli.command.input().path.display(), "starting");

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    condense_cli::run(&cli, settings, &mut stdout.lock(), &mut stderr.lock())
}
