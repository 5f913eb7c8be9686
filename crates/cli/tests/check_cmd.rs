//! CLI tests for `argot check` and `argot explain`.

use std::fs;
use std::process::Command;

use assert_cmd::cargo;

fn argot_cmd() -> Command {
    Command::new(cargo::cargo_bin!("argot"))
}

fn write_grammar(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("grammar.json");
    fs::write(&path, content).expect("write temp grammar");
    (dir, path.to_string_lossy().to_string())
}

#[test]
fn check_lists_keywords() {
    let (_dir, path) = write_grammar(
        r#"{
            "name": "git",
            "options": [{"name": "--verbose|-v"}],
            "subcommands": [{"name": "add", "options": [{"name": "--force"}]}]
        }"#,
    );
    let output = argot_cmd()
        .args(["check", &path, "--output", "json"])
        .output()
        .expect("run check command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["success"], true);
    assert_eq!(json["name"], "git");
    assert_eq!(
        json["keywords"],
        serde_json::json!(["--force", "--verbose", "-v", "add"])
    );
}

#[test]
fn check_invalid_pattern_reports_grammar_diagnostic() {
    let (_dir, path) =
        write_grammar(r#"{"name": "x", "args": [{"name": "a", "pattern": "(oops"}]}"#);
    let output = argot_cmd()
        .args(["check", &path, "--output", "json"])
        .output()
        .expect("run check command");

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["error"], "invalid_grammar");
    assert_eq!(json["diagnostic"]["id"], "ARGOT2006");
}

#[test]
fn check_duplicate_option_reports_code() {
    let (_dir, path) = write_grammar(
        r#"{"name": "x", "options": [{"name": "-a"}, {"name": "--all|-a"}]}"#,
    );
    let output = argot_cmd()
        .args(["check", &path, "--output", "json"])
        .output()
        .expect("run check command");

    assert!(!output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["diagnostic"]["id"], "ARGOT2003");
}

#[test]
fn explain_known_code_json_returns_explanation() {
    let output = argot_cmd()
        .args(["explain", "ARGOT1004", "--output", "json"])
        .output()
        .expect("run explain command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["id"], "ARGOT1004");
    assert!(json["explanation"].is_string());
}

#[test]
fn explain_unknown_code_json_returns_null_explanation() {
    let output = argot_cmd()
        .args(["explain", "ARGOT9999", "--output", "json"])
        .output()
        .expect("run explain command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json");
    assert!(json["explanation"].is_null());
}
