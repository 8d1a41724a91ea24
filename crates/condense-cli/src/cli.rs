//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Compress conversation logs to fit a token budget.
#[derive(Parser, Debug)]
#[command(name = "condense", version, about = "Compress conversation logs to fit a token budget")]
pub struct Cli {
    /// Settings file (default: ~/.condense/settings.json if present).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Abort on the first invalid record instead of skipping it.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reduce a conversation to fit the token budget and write JSONL.
    Optimize(OptimizeArgs),
    /// Print conversation statistics as JSON.
    Analyze(InputArgs),
    /// Print high-priority messages as JSON.
    ExtractFacts(FactsArgs),
}

impl Command {
    /// Input path of the subcommand.
    pub fn input(&self) -> &InputArgs {
        match self {
            Self::Optimize(args) => &args.input,
            Self::Analyze(input) => input,
            Self::ExtractFacts(args) => &args.input,
        }
    }
}

/// Input selection shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// JSONL conversation file, or `-` for stdin.
    #[arg(value_name = "INPUT")]
    pub path: PathBuf,
}

/// Arguments for `optimize`.
#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    /// Input selection.
    #[command(flatten)]
    pub input: InputArgs,

    /// Target token count.
    #[arg(long)]
    pub target: Option<u64>,

    /// Number of recent messages always kept.
    #[arg(long)]
    pub preserve_recent: Option<usize>,

    /// Minimum priority for older messages.
    #[arg(long)]
    pub min_priority: Option<f64>,

    /// Write JSONL here and print a report to stderr (default: stdout).
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Insert a digest of evicted messages when most history is dropped.
    #[arg(long)]
    pub summarize: bool,

    /// Add computed_priority, computed_tokens and fingerprint to each record.
    #[arg(long)]
    pub emit_computed: bool,
}

/// Arguments for `extract-facts`.
#[derive(Args, Debug, Clone)]
pub struct FactsArgs {
    /// Input selection.
    #[command(flatten)]
    pub input: InputArgs,

    /// Minimum priority (default: the high-priority threshold).
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Collapse semantically duplicate messages first.
    #[arg(long)]
    pub dedup: bool,
}
