//! JSONL input and output.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, warn};

use condense_context::{ComputedFields, ScoredMessage};
use condense_core::{Message, parse_jsonl};

/// Read the whole input, treating `-` as stdin.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        let _ = std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

/// Parse JSONL into messages.
///
/// Invalid records are logged and skipped, or abort the run when `strict`.
pub fn parse_messages(input: &str, strict: bool) -> Result<Vec<Message>> {
    let parsed = parse_jsonl(input);
    if let Some(first) = parsed.errors.first() {
        if strict {
            bail!("invalid input record: {first}");
        }
        for err in &parsed.errors {
            warn!(line = err.line(), error = %err, "skipping invalid record");
        }
    }
    info!(
        messages = parsed.messages.len(),
        skipped = parsed.errors.len(),
        "loaded conversation"
    );
    Ok(parsed.messages)
}

/// Read and parse a conversation file.
pub fn load_messages(path: &Path, strict: bool) -> Result<Vec<Message>> {
    let input = read_input(path)?;
    parse_messages(&input, strict).with_context(|| format!("in '{}'", path.display()))
}

#[derive(Serialize)]
struct OutputRecord<'a> {
    #[serde(flatten)]
    message: &'a Message,
    #[serde(flatten)]
    computed: Option<ComputedFields<'a>>,
}

/// Write messages as JSONL, one record per line.
pub fn write_jsonl(
    out: &mut dyn Write,
    messages: &[ScoredMessage],
    emit_computed: bool,
) -> Result<()> {
    for scored in messages {
        let record = OutputRecord {
            message: &scored.message,
            computed: emit_computed.then(|| scored.computed()),
        };
        serde_json::to_writer(&mut *out, &record).context("failed to serialize record")?;
        out.write_all(b"\n").context("failed to write output")?;
    }
    out.flush().context("failed to flush output")?;
    Ok(())
}

/// Write a value as pretty JSON followed by a newline.
pub fn write_pretty_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to serialize JSON")?;
    out.write_all(b"\n").context("failed to write output")?;
    Ok(())
}
