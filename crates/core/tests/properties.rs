//! Behavioural guarantees of the matcher: header precedence, wildcards,
//! union negation and variadic reservation.

mod common;

use argot_core::analysis::cursor::Cursor;
use argot_core::{
    ArgPattern, ArgSlot, Args, CommandConfig, ErrorKind, Input, Strategy, Token, Trigger, Union,
    Value,
};
use common::{failure, load, matched};

// ─── Header alternation ─────────────────────────────────────────────────────

#[test]
fn header_prefix_alternation() {
    let go = CommandConfig::new("go")
        .trigger(Trigger::literal("!"))
        .trigger(Trigger::literal("#"))
        .build()
        .unwrap();
    for input in ["!go", "#go", "go"] {
        assert!(matched(&go, input).matched, "{input}");
    }
    assert_eq!(
        failure(&go, "?go"),
        ErrorKind::HeaderMismatch { found: "?go".into() }
    );
}

#[test]
fn header_failure_leaves_input_untouched() {
    let go = load(r#"{"name": "go", "triggers": ["!"]}"#);
    let result = go.analyse("stop now").unwrap();
    assert_eq!(result.header, Value::Bool(false));
    assert_eq!(result.remainder, vec![Token::from("stop now")]);
}

// ─── Wildcard sentinel ──────────────────────────────────────────────────────

#[test]
fn placeholder_text_captures_wildcard() {
    let cmd = CommandConfig::new("w")
        .args(Args::from_slots(vec![ArgSlot::new("x", Strategy::pattern("foo").unwrap())]).unwrap())
        .build()
        .unwrap();
    let result = matched(&cmd, "w foo");
    assert_eq!(result.main_args["x"], Value::Wildcard);
    assert_ne!(result.main_args["x"], Value::from("foo"));
    assert_eq!(
        serde_json::to_value(&result).unwrap()["main_args"]["x"],
        "..."
    );
}

// ─── Union negation symmetry ────────────────────────────────────────────────

fn union_command(negated: bool) -> argot_core::Command {
    let union = Union {
        equals: vec!["a".into()],
        patterns: vec![ArgPattern::new(r"\d+").unwrap()],
        kinds: vec![],
        negated,
    };
    CommandConfig::new("u")
        .args(Args::from_slots(vec![ArgSlot::new("v", Strategy::Union(union))]).unwrap())
        .build()
        .unwrap()
}

#[test]
fn union_deny_list() {
    let cmd = union_command(false);
    for rejected in ["a", "42"] {
        let input = format!("u {rejected}");
        assert!(
            matches!(failure(&cmd, input.as_str()), ErrorKind::ParamsUnmatched { .. }),
            "{rejected}"
        );
    }
    assert_eq!(matched(&cmd, "u xyz").main_args["v"], Value::from("xyz"));
}

#[test]
fn union_negated_inverts_exactly() {
    let cmd = union_command(true);
    assert_eq!(matched(&cmd, "u a").main_args["v"], Value::from("a"));
    assert_eq!(matched(&cmd, "u 42").main_args["v"], Value::from("42"));
    assert!(matches!(
        failure(&cmd, "u xyz"),
        ErrorKind::ParamsUnmatched { .. }
    ));
}

// ─── Variadic reservation ───────────────────────────────────────────────────

const SUM: &str = r#"{
    "name": "sum",
    "args": [
        {"name": "ns", "pattern": {"multi": "int"}},
        {"name": "unit", "pattern": "word"}
    ]
}"#;

#[test]
fn variadic_leaves_room_for_required_slot() {
    let sum = load(SUM);
    let result = matched(&sum, "sum 1 2 3 cm");
    assert_eq!(
        result.main_args["ns"],
        Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
    assert_eq!(result.main_args["unit"], Value::from("cm"));

    let result = matched(&sum, "sum 1 2 3");
    assert_eq!(
        result.main_args["ns"],
        Value::List(vec![Value::Int(1), Value::Int(2)])
    );
    assert_eq!(result.main_args["unit"], Value::from("3"));
}

#[test]
fn variadic_alone_takes_everything_matching() {
    let cmd = load(r#"{"name": "sum", "args": [{"name": "ns", "pattern": {"multi": "int"}}]}"#);
    let result = matched(&cmd, "sum 1 2 3");
    assert_eq!(result.main_args["ns"].as_list().map(<[Value]>::len), Some(3));
}

// ─── Cursor round trip ──────────────────────────────────────────────────────

#[test]
fn fetch_then_push_back_restores_position() {
    let mut cursor = Cursor::tokenize(Input::from("a b c d"), " ", &[], true).unwrap();
    cursor.fetch(" ");
    let start = cursor.position();
    let taken: Vec<Token> = (0..3).filter_map(|_| cursor.fetch(" ")).collect();
    assert_eq!(taken.len(), 3);
    for token in taken.iter().rev() {
        cursor.push_back(token);
    }
    assert_eq!(cursor.position(), start);
}
