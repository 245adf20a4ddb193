//! The `rulecheck` binary against rules files on disk.

use serde_json::Value;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const RULES: &str = r#"
[[rules]]
name = "api"
conditions = "if {path} starts_with /api"

[[rules]]
name = "post"
conditions = "if {method} is POST"
"#;

fn write_rules(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("rules.toml");
    std::fs::write(&path, content).unwrap();
    path
}

fn rulecheck(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rulecheck"))
        .args(args)
        .output()
        .expect("failed to run rulecheck")
}

#[test]
fn test_check_only() {
    let dir = TempDir::new().unwrap();
    let path = write_rules(&dir, RULES);

    let out = rulecheck(&["--config", path.to_str().unwrap(), "--check"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("2 rule(s) OK"), "{stdout}");
}

#[test]
fn test_json_report() {
    let dir = TempDir::new().unwrap();
    let path = write_rules(&dir, RULES);

    let out = rulecheck(&["--config", path.to_str().unwrap(), "-X", "POST", "/api/users"]);
    assert!(out.status.success());

    let report: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["method"], "POST");
    assert_eq!(report["uri"], "/api/users");
    assert_eq!(report["rules"][0]["matched"], true);
    assert_eq!(report["rules"][1]["matched"], true);
}

#[test]
fn test_load_failure_exits_non_zero() {
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("missing.toml");
    let out = rulecheck(&["--config", missing.to_str().unwrap(), "--check"]);
    assert!(!out.status.success());

    let path = write_rules(&dir, "[[rules]]\nname = \"bad\"\nconditions = \"if a ss b\"\n");
    let out = rulecheck(&["--config", path.to_str().unwrap(), "--check"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("bad"), "{stderr}");
}
