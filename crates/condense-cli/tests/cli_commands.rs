#![allow(missing_docs, unused_results)]

use std::path::{Path, PathBuf};

use clap::Parser;
use condense_cli::cli::Cli;
use condense_cli::{resolve_settings_with, run};
use condense_core::logging::capture_logs;
use condense_settings::warn_invalid_env;
use serde_json::Value;
use tracing::Level;

const CONVERSATION: &str = r#"{"role":"user","content":"Hi there","tokens":3}
{"role":"assistant","content":"Hello! How can I help?","tokens":6}
{"role":"user","content":"I decided to use option B, remember that.","tokens":10}
"#;

struct Workspace {
    _dir: tempfile::TempDir,
    root: PathBuf,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let config = root.join("settings.json");
        std::fs::write(&config, "{}").unwrap();
        Self {
            _dir: dir,
            root,
            config,
        }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cli(&self, args: &[&str]) -> anyhow::Result<Cli> {
        let mut argv = vec!["condense", "--config", self.config.to_str().unwrap()];
        argv.extend_from_slice(args);
        Ok(Cli::try_parse_from(argv)?)
    }

    fn run(&self, args: &[&str]) -> anyhow::Result<(String, String)> {
        self.run_with_env(args, &[])
    }

    fn run_with_env(
        &self,
        args: &[&str],
        vars: &[(&str, &str)],
    ) -> anyhow::Result<(String, String)> {
        let cli = self.cli(args)?;
        let resolved = resolve_settings_with(&cli, env(vars))?;
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        run(&cli, &resolved.settings, &mut stdout, &mut stderr)?;
        Ok((
            String::from_utf8(stdout).unwrap(),
            String::from_utf8(stderr).unwrap(),
        ))
    }
}

fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |name| vars.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn jsonl(text: &str) -> Vec<Value> {
    text.lines().map(|l| serde_json::from_str(l).unwrap()).collect()
}

#[test]
fn optimize_to_stdout_keeps_decision() {
    let ws = Workspace::new();
    let input = ws.file("chat.jsonl", CONVERSATION);
    let (stdout, stderr) = ws
        .run(&["optimize", path_str(&input), "--target", "10", "--preserve-recent", "1"])
        .unwrap();

    let records = jsonl(&stdout);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["content"], "I decided to use option B, remember that.");
    assert_eq!(records[0]["tokens"], 10);
    assert!(records[0].get("computed_priority").is_none());
    assert!(stderr.is_empty());
}

#[test]
fn optimize_to_file_prints_report() {
    let ws = Workspace::new();
    let input = ws.file("chat.jsonl", CONVERSATION);
    let output = ws.root.join("out.jsonl");
    let (stdout, stderr) = ws
        .run(&[
            "optimize",
            path_str(&input),
            "--target",
            "10",
            "--preserve-recent",
            "1",
            "--output",
            path_str(&output),
        ])
        .unwrap();

    assert!(stdout.is_empty());
    assert!(stderr.starts_with("Optimization complete:\n"));
    assert!(stderr.contains("  Original: 3 messages, 19 tokens\n"));
    assert!(stderr.contains("  Optimized: 1 messages, 10 tokens"));
    assert!(stderr.contains("  Compression: 47.4%\n"));
    assert!(stderr.contains(&format!("  Output: {}\n", output.display())));

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(jsonl(&written).len(), 1);
}

#[test]
fn optimize_emits_computed_fields() {
    let ws = Workspace::new();
    let input = ws.file("chat.jsonl", CONVERSATION);
    let (stdout, _) = ws
        .run(&["optimize", path_str(&input), "--emit-computed"])
        .unwrap();

    let records = jsonl(&stdout);
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["computed_priority"], 1.5);
    assert_eq!(records[1]["computed_priority"], 4.0);
    assert_eq!(records[2]["computed_priority"], 7.0);
    assert_eq!(records[2]["computed_tokens"], 10);
    assert_eq!(records[2]["fingerprint"].as_str().unwrap().len(), 16);
}

#[test]
fn analyze_prints_stats() {
    let ws = Workspace::new();
    let input = ws.file(
        "chat.jsonl",
        r#"{"role":"user","content":"what is the plan"}
{"role":"assistant","content":"we ship on monday"}
{"role":"user","content":"who reviews it"}
{"role":"assistant","content":"the platform team does"}
"#,
    );
    let (stdout, _) = ws.run(&["analyze", path_str(&input)]).unwrap();
    let stats: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["total_messages"], 4);
    assert_eq!(stats["role_distribution"]["user"], 2);
    assert_eq!(stats["role_distribution"]["assistant"], 2);
    assert_eq!(stats["unique_semantic_groups"], 4);
}

#[test]
fn analyze_empty_input_is_zeroed() {
    let ws = Workspace::new();
    let input = ws.file("empty.jsonl", "\n\n");
    let (stdout, _) = ws.run(&["analyze", path_str(&input)]).unwrap();
    let stats: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["total_messages"], 0);
    assert_eq!(stats["priority_avg"], 0.0);
    assert_eq!(stats["avg_tokens_per_message"], 0);
}

#[test]
fn extract_facts_default_threshold() {
    let ws = Workspace::new();
    let input = ws.file("chat.jsonl", CONVERSATION);
    let (stdout, _) = ws.run(&["extract-facts", path_str(&input)]).unwrap();
    let facts: Value = serde_json::from_str(&stdout).unwrap();
    let facts = facts.as_array().unwrap();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0]["position"], 2);
    assert_eq!(facts[0]["role"], "user");
    assert_eq!(facts[0]["timestamp"], Value::Null);
}

#[test]
fn extract_facts_with_dedup() {
    let ws = Workspace::new();
    let input = ws.file(
        "chat.jsonl",
        r#"{"role":"user","content":"Remember: we always deploy on Fridays"}
{"role":"assistant","content":"we always deploy on fridays, remember"}
"#,
    );
    let (plain, _) = ws.run(&["extract-facts", path_str(&input)]).unwrap();
    let (deduped, _) = ws
        .run(&["extract-facts", path_str(&input), "--dedup"])
        .unwrap();

    let plain: Value = serde_json::from_str(&plain).unwrap();
    let deduped: Value = serde_json::from_str(&deduped).unwrap();
    assert_eq!(plain.as_array().unwrap().len(), 2);
    let deduped = deduped.as_array().unwrap();
    assert_eq!(deduped.len(), 1);
    assert_eq!(deduped[0]["position"], 1);
}

#[test]
fn extract_facts_rejects_bad_threshold() {
    let ws = Workspace::new();
    let input = ws.file("chat.jsonl", CONVERSATION);
    let err = ws
        .run(&["extract-facts", path_str(&input), "--threshold", "12"])
        .unwrap_err();
    assert!(err.to_string().contains("--threshold"));
}

#[test]
fn bad_records_skipped_unless_strict() {
    let ws = Workspace::new();
    let input = ws.file(
        "chat.jsonl",
        "{\"role\":\"user\",\"content\":\"keep me around please\"}\n{broken\n{\"role\":\"user\",\"content\":\"x\",\"priority\":42}\n",
    );

    let (stdout, _) = ws.run(&["optimize", path_str(&input)]).unwrap();
    assert_eq!(jsonl(&stdout).len(), 1);

    let err = ws.run(&["--strict", "optimize", path_str(&input)]).unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("line 2"), "{chain}");
}

#[test]
fn config_file_applies_and_flags_win() {
    let ws = Workspace::new();
    std::fs::write(
        &ws.config,
        r#"{"optimizer": {"targetTokens": 10, "preserveRecent": 1, "minPriority": 9}}"#,
    )
    .unwrap();
    let input = ws.file("chat.jsonl", CONVERSATION);

    let (stdout, _) = ws.run(&["optimize", path_str(&input)]).unwrap();
    assert_eq!(jsonl(&stdout).len(), 1);

    let (stdout, _) = ws
        .run(&["optimize", path_str(&input), "--target", "100", "--preserve-recent", "0", "--min-priority", "1"])
        .unwrap();
    assert_eq!(jsonl(&stdout).len(), 3);
}

#[test]
fn invalid_flag_values_rejected() {
    let ws = Workspace::new();
    let input = ws.file("chat.jsonl", CONVERSATION);
    let err = ws
        .run(&["optimize", path_str(&input), "--target", "0"])
        .unwrap_err();
    assert!(format!("{err:#}").contains("targetTokens"));
}

#[test]
fn missing_input_is_an_error() {
    let ws = Workspace::new();
    let missing = ws.root.join("nope.jsonl");
    let err = ws.run(&["analyze", path_str(&missing)]).unwrap_err();
    assert!(format!("{err:#}").contains("nope.jsonl"));
}

#[test]
fn summarize_flag_inserts_digest() {
    let ws = Workspace::new();
    let input = ws.file(
        "chat.jsonl",
        r#"{"role":"user","content":"We will move billing to the new cluster","tokens":200}
{"role":"assistant","content":"Which region should host the cluster?","tokens":200}
{"role":"user","content":"The latency data favours eu-west","tokens":200}
{"role":"user","content":"thanks","tokens":1}
"#,
    );
    let (stdout, _) = ws
        .run(&[
            "optimize",
            path_str(&input),
            "--target",
            "100",
            "--preserve-recent",
            "1",
            "--summarize",
        ])
        .unwrap();
    let records = jsonl(&stdout);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["role"], "system");
    assert_eq!(records[0]["metadata"]["type"], "summary");
    assert_eq!(records[0]["metadata"]["source_count"], 3);
    assert_eq!(records[1]["content"], "thanks");
}

#[test]
fn env_overrides_sit_between_file_and_flags() {
    let ws = Workspace::new();
    let input = ws.file("chat.jsonl", CONVERSATION);
    let vars = [("CONDENSE_TARGET_TOKENS", "10"), ("CONDENSE_PRESERVE_RECENT", "1")];

    let (stdout, _) = ws.run_with_env(&["optimize", path_str(&input)], &vars).unwrap();
    assert_eq!(jsonl(&stdout).len(), 1);

    let (stdout, _) = ws
        .run_with_env(
            &["optimize", path_str(&input), "--target", "100", "--min-priority", "1"],
            &vars,
        )
        .unwrap();
    assert_eq!(jsonl(&stdout).len(), 3);
}

#[test]
fn invalid_env_var_is_kept_for_reporting() {
    let ws = Workspace::new();
    let input = ws.file("chat.jsonl", CONVERSATION);
    let cli = ws.cli(&["analyze", path_str(&input)]).unwrap();

    let (logs, _guard) = capture_logs();
    let resolved = resolve_settings_with(&cli, env(&[("CONDENSE_TARGET_TOKENS", "abc")])).unwrap();
    assert_eq!(resolved.settings.optimizer.target_tokens, 50_000);
    assert_eq!(resolved.invalid_env.len(), 1);
    assert_eq!(resolved.invalid_env[0].key, "CONDENSE_TARGET_TOKENS");
    assert_eq!(resolved.invalid_env[0].value, "abc");
    assert_eq!(logs.count_at_level(Level::WARN), 0);

    warn_invalid_env(&resolved.invalid_env);
    assert!(logs.has_event(Level::WARN, "invalid env var, ignoring"));
    let warning = logs
        .events()
        .into_iter()
        .find(|e| e.level == Level::WARN)
        .unwrap();
    assert_eq!(warning.field("key"), Some("CONDENSE_TARGET_TOKENS"));
    assert_eq!(warning.field("value"), Some("abc"));
}
