//! Subcommand implementations.

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result, ensure};

use condense_context::{ContextOptimizer, OptimizationReport, deduplicate, extract_facts};
use condense_core::constants::is_valid_priority;
use condense_settings::CondenseSettings;
use condense_tokens::format_tokens;

use crate::cli::{FactsArgs, InputArgs, OptimizeArgs};
use crate::io::{load_messages, write_jsonl, write_pretty_json};

/// `condense optimize`.
pub fn optimize(
    args: &OptimizeArgs,
    settings: &CondenseSettings,
    strict: bool,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let optimizer = ContextOptimizer::new(settings).context("invalid configuration")?;
    let messages = load_messages(&args.input.path, strict)?;
    let optimized = optimizer.optimize(&messages);

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_jsonl(&mut writer, &optimized.messages, args.emit_computed)?;
            write_report(
                stderr,
                &optimized.report,
                settings.optimizer.target_tokens,
                &path.display().to_string(),
            )?;
        }
        None => write_jsonl(stdout, &optimized.messages, args.emit_computed)?,
    }
    Ok(())
}

/// `condense analyze`.
pub fn analyze(
    input: &InputArgs,
    settings: &CondenseSettings,
    strict: bool,
    stdout: &mut dyn Write,
) -> Result<()> {
    let optimizer = ContextOptimizer::new(settings).context("invalid configuration")?;
    let messages = load_messages(&input.path, strict)?;
    write_pretty_json(stdout, &optimizer.analyze(&messages))
}

/// `condense extract-facts`.
pub fn extract(
    args: &FactsArgs,
    settings: &CondenseSettings,
    strict: bool,
    stdout: &mut dyn Write,
) -> Result<()> {
    let optimizer = ContextOptimizer::new(settings).context("invalid configuration")?;
    let threshold = args.threshold.unwrap_or_else(|| optimizer.high_threshold());
    ensure!(
        is_valid_priority(threshold),
        "--threshold must be within [1, 10], got {threshold}"
    );

    let messages = load_messages(&args.input.path, strict)?;
    let mut scored = optimizer.score(&messages);
    if args.dedup {
        scored = deduplicate(scored).kept;
    }
    write_pretty_json(stdout, &extract_facts(&scored, threshold))
}

fn write_report(
    out: &mut dyn Write,
    report: &OptimizationReport,
    target_tokens: u64,
    output: &str,
) -> Result<()> {
    writeln!(out, "Optimization complete:")?;
    writeln!(
        out,
        "  Original: {} messages, {} tokens",
        report.original_messages,
        group_digits(report.original_tokens)
    )?;
    writeln!(
        out,
        "  Optimized: {} messages, {} tokens (target {})",
        report.optimized_messages,
        group_digits(report.optimized_tokens),
        format_tokens(target_tokens)
    )?;
    writeln!(out, "  Compression: {:.1}%", report.compression())?;
    if report.summarized {
        writeln!(out, "  Summary: inserted")?;
    }
    writeln!(out, "  Output: {output}")?;
    Ok(())
}

/// `1234567` -> `"1,234,567"`.
fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
