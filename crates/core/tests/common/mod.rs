//! Shared test helpers for `argot_core` integration tests.

#![allow(unreachable_pub)]

use argot_core::{Command, ErrorKind, Input, ParseResult};

/// The `greet <who:word> [--loud|-l]` grammar.
#[allow(dead_code)]
pub const GREET: &str = r#"{
    "name": "greet",
    "args": [{"name": "who", "pattern": "word"}],
    "options": [{"name": "--loud", "aliases": ["-l"]}]
}"#;

/// Build a command from a JSON grammar, panicking with the grammar error.
#[allow(dead_code)]
pub fn load(json: &str) -> Command {
    Command::from_json(json).unwrap_or_else(|e| panic!("invalid grammar: {e}\n{json}"))
}

/// Analyse and require a successful match.
#[allow(dead_code)]
pub fn matched(command: &Command, input: impl Into<Input>) -> ParseResult {
    let result = command
        .analyse(input)
        .unwrap_or_else(|e| panic!("unexpected error: {e}"));
    assert!(result.matched, "expected a match, got {:?}", result.error);
    result
}

/// Analyse and return the failure kind, whichever way it was reported.
#[allow(dead_code)]
pub fn failure(command: &Command, input: impl Into<Input>) -> ErrorKind {
    match command.analyse(input) {
        Ok(result) => {
            assert!(!result.matched, "expected a failure, got {result:?}");
            result
                .error
                .unwrap_or_else(|| panic!("failed result without error"))
                .kind
        }
        Err(err) => err.kind,
    }
}
