//! End-to-end analyser scenarios driven by JSON grammars.

mod common;

use argot_core::{ErrorKind, Token, Unit, Value, to_pretty_json};
use common::{GREET, failure, load, matched};
use serde_json::json;

// ─── The greet scenario ─────────────────────────────────────────────────────

#[test]
fn greet_with_flag() {
    let greet = load(GREET);
    let result = matched(&greet, "greet Alice -l");
    assert_eq!(result.header, Value::Bool(true));
    assert_eq!(result.main_args["who"], Value::from("Alice"));
    assert!(result.has_option("--loud"));
    assert!(result.remainder.is_empty());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["matched"], true);
    assert_eq!(json["main_args"], json!({"who": "Alice"}));
    assert_eq!(json["options"], json!({"--loud": {}}));
}

#[test]
fn greet_without_name_is_argument_missing() {
    let greet = load(GREET);
    assert_eq!(
        failure(&greet, "greet"),
        ErrorKind::ArgumentMissing { slot: "who".into() }
    );
}

#[test]
fn greet_wrong_header() {
    let greet = load(GREET);
    assert_eq!(
        failure(&greet, "farewell Alice"),
        ErrorKind::HeaderMismatch {
            found: "farewell".into()
        }
    );
}

#[test]
fn keyword_in_argument_position_is_missing_argument() {
    let greet = load(GREET);
    let result = greet.analyse("greet -l").unwrap();
    assert!(!result.matched);
    let err = result.error.unwrap();
    assert_eq!(err.kind, ErrorKind::ArgumentMissing { slot: "who".into() });
    assert_eq!(err.remainder, vec![Token::from("-l")]);
}

#[test]
fn unknown_token_is_left_in_remainder() {
    let greet = load(GREET);
    let result = matched(&greet, "greet Alice bob -l");
    assert!(!result.has_option("--loud"));
    assert_eq!(result.remainder, vec![Token::from("bob -l")]);
}

#[test]
fn empty_input_fails() {
    let greet = load(GREET);
    assert_eq!(failure(&greet, "   "), ErrorKind::EmptyInput);
    assert_eq!(failure(&greet, Vec::<Token>::new()), ErrorKind::EmptyInput);
}

// ─── Raise vs. suppress ─────────────────────────────────────────────────────

#[test]
fn raise_on_failure_returns_err() {
    let greet = load(
        r#"{
            "name": "greet",
            "raise_on_failure": true,
            "args": [{"name": "who", "pattern": "word"}]
        }"#,
    );
    let err = greet.analyse("greet").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ArgumentMissing { slot: "who".into() });
    assert_eq!(err.code(), argot_core::codes::PARSE_ARGUMENT_MISSING);
    assert!(greet.analyse("greet Bob").unwrap().matched);
}

#[test]
fn failed_result_keeps_partial_captures() {
    let cmd = load(
        r#"{
            "name": "move",
            "args": [
                {"name": "x", "pattern": "int"},
                {"name": "y", "pattern": "int"}
            ]
        }"#,
    );
    let result = cmd.analyse("move 3 up").unwrap();
    assert!(!result.matched);
    assert_eq!(result.main_args["x"], Value::Int(3));
    assert_eq!(
        result.error.unwrap().kind,
        ErrorKind::ParamsUnmatched {
            slot: "y".into(),
            found: "up".into()
        }
    );
    assert_eq!(result.remainder, vec![Token::from("up")]);
}

// ─── Defaults and optional slots ────────────────────────────────────────────

#[test]
fn defaults_fill_missing_slots() {
    let roll = load(r#"{"name": "roll", "args": [{"name": "sides", "pattern": "int", "default": 6}]}"#);
    assert_eq!(matched(&roll, "roll").main_args["sides"], Value::Int(6));
    assert_eq!(matched(&roll, "roll 20").main_args["sides"], Value::Int(20));

    let result = matched(&roll, "roll x");
    assert_eq!(result.main_args["sides"], Value::Int(6));
    assert_eq!(result.remainder, vec![Token::from("x")]);
}

#[test]
fn explicit_null_default() {
    let cmd = load(r#"{"name": "find", "args": [{"name": "q", "pattern": "int", "default": null}]}"#);
    assert_eq!(matched(&cmd, "find").main_args["q"], Value::Null);
}

#[test]
fn optional_slot_stays_absent() {
    let count = load(r#"{"name": "count", "args": [{"name": "n", "pattern": "int", "optional": true}]}"#);
    assert!(matched(&count, "count").main_args.is_empty());
    assert_eq!(matched(&count, "count 4").main_args["n"], Value::Int(4));
    assert!(matched(&count, "count x").main_args.is_empty());
}

#[test]
fn header_capture_group() {
    let roll = load(r#"{"name": "roll(\\d+)"}"#);
    assert_eq!(matched(&roll, "roll20").header, Value::from("20"));
}

// ─── Strategies in a full grammar ───────────────────────────────────────────

#[test]
fn negated_pattern_slot() {
    let kick = load(r#"{"name": "kick", "args": [{"name": "target", "pattern": "!int"}]}"#);
    assert_eq!(matched(&kick, "kick bob").main_args["target"], Value::from("bob"));
    assert_eq!(
        failure(&kick, "kick 42"),
        ErrorKind::ParamsUnmatched {
            slot: "target".into(),
            found: "42".into()
        }
    );
}

#[test]
fn all_collects_the_rest() {
    let echo = load(r#"{"name": "echo", "args": [{"name": "rest", "pattern": "all"}]}"#);
    assert_eq!(
        matched(&echo, "echo a b c").main_args["rest"],
        Value::List(vec!["a".into(), "b".into(), "c".into()])
    );
    assert_eq!(matched(&echo, "echo").main_args["rest"], Value::List(vec![]));
}

#[test]
fn multi_map_collects_pairs() {
    let set = load(r#"{"name": "env", "args": [{"name": "vars", "pattern": {"multi": "str", "mode": "map"}}]}"#);
    let result = matched(&set, "env A=1 B=two");
    let vars = result.main_args["vars"].as_map().unwrap();
    assert_eq!(vars["A"], Value::from("1"));
    assert_eq!(vars["B"], Value::from("two"));
}

#[test]
fn multi_stops_at_keyword() {
    let cmd = load(
        r#"{
            "name": "add",
            "args": [{"name": "ns", "pattern": {"multi": "int"}}],
            "options": [{"name": "--round"}]
        }"#,
    );
    let result = matched(&cmd, "add 1 2 --round");
    assert_eq!(
        result.main_args["ns"],
        Value::List(vec![Value::Int(1), Value::Int(2)])
    );
    assert!(result.has_option("--round"));
}

#[test]
fn quoted_arguments() {
    let say = load(r#"{"name": "say", "args": [{"name": "msg", "pattern": "str"}]}"#);
    assert_eq!(
        matched(&say, r#"say "hello world""#).main_args["msg"],
        Value::from("hello world")
    );
}

#[test]
fn custom_separator() {
    let go = load(
        r#"{
            "name": "go",
            "separator": ",",
            "args": [{"name": "a", "pattern": "word"}, {"name": "b", "pattern": "word"}]
        }"#,
    );
    let result = matched(&go, "go,x,y");
    assert_eq!(result.main_args["a"], Value::from("x"));
    assert_eq!(result.main_args["b"], Value::from("y"));
}

// ─── Options ────────────────────────────────────────────────────────────────

const SET: &str = r#"{
    "name": "set",
    "options": [
        {"name": "--level", "separator": "=", "args": [{"name": "n", "pattern": "int"}]},
        {"name": "--tag|-t", "args": [{"name": "t", "pattern": "word"}]}
    ]
}"#;

#[test]
fn option_with_own_separator() {
    let set = load(SET);
    let result = matched(&set, "set --level=3");
    assert_eq!(result.get("--level.n"), Some(&Value::Int(3)));

    let result = matched(&set, "set --level 4");
    assert_eq!(result.get("--level"), Some(&Value::Int(4)));
}

#[test]
fn later_option_overwrites_earlier() {
    let set = load(SET);
    let result = matched(&set, "set -t a --level=1 --tag b");
    assert_eq!(result.get("--tag.t"), Some(&Value::from("b")));
    assert_eq!(result.get("--level.n"), Some(&Value::Int(1)));
}

#[test]
fn option_argument_failure() {
    let set = load(SET);
    assert_eq!(
        failure(&set, "set --level=high"),
        ErrorKind::ParamsUnmatched {
            slot: "n".into(),
            found: "high".into()
        }
    );
}

// ─── Sub-commands ───────────────────────────────────────────────────────────

const GIT: &str = r#"{
    "name": "git",
    "options": [{"name": "--verbose|-v"}],
    "subcommands": [
        {
            "name": "add",
            "args": [{"name": "path", "pattern": "str"}],
            "options": [{"name": "--force|-f"}]
        },
        {
            "name": "commit",
            "options": [{"name": "--message|-m", "args": [{"name": "text", "pattern": "str"}]}]
        }
    ]
}"#;

#[test]
fn subcommand_with_child_option_then_root_option() {
    let git = load(GIT);
    let result = matched(&git, "git add a.txt -f -v");
    assert!(result.has_subcommand("add"));
    assert_eq!(result.get("add.path"), Some(&Value::from("a.txt")));
    assert!(result.subcommands["add"].options.contains_key("--force"));
    assert!(result.has_option("--verbose"));
}

#[test]
fn subcommand_child_option_argument() {
    let git = load(GIT);
    let result = matched(&git, r#"git commit -m "first commit""#);
    assert_eq!(
        result.get("commit.--message.text"),
        Some(&Value::from("first commit"))
    );
    assert_eq!(
        to_pretty_json(&result).lines().next(),
        Some("{")
    );
}

#[test]
fn subcommand_argument_missing() {
    let git = load(GIT);
    assert_eq!(
        failure(&git, "git add"),
        ErrorKind::ArgumentMissing { slot: "path".into() }
    );
}

const PAIRS: &str = r#"{
    "name": "git",
    "options": [{"name": "--lvl", "args": [{"name": "a", "pattern": "int"}, {"name": "b", "pattern": "int"}]}],
    "subcommands": [{
        "name": "add",
        "args": [{"name": "p", "pattern": "int"}, {"name": "q", "pattern": "int"}]
    }]
}"#;

#[test]
fn failed_subcommand_keeps_partial_arguments() {
    let git = load(PAIRS);
    let result = git.analyse("git add 1").unwrap();
    assert!(!result.matched);
    assert_eq!(
        result.error.as_ref().map(|e| &e.kind),
        Some(&ErrorKind::ArgumentMissing { slot: "q".into() })
    );
    assert!(result.has_subcommand("add"));
    assert_eq!(result.get("add.p"), Some(&Value::Int(1)));
    assert!(!result.subcommands["add"].args.contains_key("q"));
}

#[test]
fn failed_option_keeps_partial_arguments() {
    let git = load(PAIRS);
    let result = git.analyse("git --lvl 1").unwrap();
    assert!(!result.matched);
    assert_eq!(
        result.error.as_ref().map(|e| &e.kind),
        Some(&ErrorKind::ArgumentMissing { slot: "b".into() })
    );
    assert_eq!(result.get("--lvl.a"), Some(&Value::Int(1)));
    assert!(!result.options["--lvl"].args.contains_key("b"));
}

#[test]
fn child_options_do_not_leak_to_root() {
    let git = load(GIT);
    let result = matched(&git, "git -f");
    assert!(result.subcommands.is_empty());
    assert_eq!(result.remainder, vec![Token::from("-f")]);
}

// ─── Chains and units ───────────────────────────────────────────────────────

#[test]
fn unit_argument_via_union_kind() {
    let show = load(
        r#"{
            "name": "show",
            "args": [{"name": "img", "pattern": {"union": {"kinds": ["image"], "negated": true}}}]
        }"#,
    );
    let image = Unit::new("image").with_data(json!({"id": 7}));
    let result = matched(&show, vec![Token::from("show"), Token::Unit(image.clone())]);
    assert_eq!(result.main_args["img"], Value::Unit(image));
    assert!(matches!(
        failure(&show, "show cat"),
        ErrorKind::ParamsUnmatched { .. }
    ));
}

#[test]
fn text_chunks_are_split() {
    let greet = load(GREET);
    let chain = vec![Token::from("greet Alice"), Token::from("-l")];
    let result = matched(&greet, chain);
    assert!(result.has_option("--loud"));
}

#[test]
fn filtered_units_are_dropped_when_not_raising() {
    let ping = load(r#"{"name": "ping", "filter_out": ["voice"]}"#);
    let chain = vec![Token::from("ping"), Token::Unit(Unit::new("voice"))];
    let result = matched(&ping, chain);
    assert!(result.remainder.is_empty());
}

#[test]
fn filtered_units_raise() {
    let ping = load(r#"{"name": "ping", "filter_out": ["voice"], "raise_on_failure": true}"#);
    let chain = vec![Token::from("ping"), Token::Unit(Unit::new("voice"))];
    let err = ping.analyse(chain).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnrecognisedUnit {
            unit_type: "voice".into()
        }
    );
}

#[test]
fn mixed_header_takes_mention_or_prefix_then_name() {
    let go = load(r#"{"name": "go", "triggers": [{"unit": "at"}, "!"], "args": [{"name": "to", "pattern": "word"}]}"#);
    let with_mention = vec![Token::Unit(Unit::new("at")), Token::from("go north")];
    assert_eq!(matched(&go, with_mention).main_args["to"], Value::from("north"));
    assert_eq!(matched(&go, "! go north").main_args["to"], Value::from("north"));

    for bare in ["go north", "!go north"] {
        let found = bare.split(' ').next().unwrap_or_default();
        assert_eq!(
            failure(&go, bare),
            ErrorKind::HeaderMismatch { found: found.into() },
            "{bare}"
        );
    }
}

#[test]
fn unit_header_requires_unit() {
    let ping = load(r#"{"name": "ping", "triggers": [{"unit": "at"}]}"#);
    let with_mention = vec![Token::Unit(Unit::new("at")), Token::from("ping")];
    assert!(matched(&ping, with_mention).matched);
    assert!(matches!(
        failure(&ping, "ping"),
        ErrorKind::HeaderMismatch { .. }
    ));
}
