use std::collections::BTreeMap;

use serde::Serialize;

use super::error::ParseError;
use super::input::Token;
use crate::grammar::value::Value;

/// Captured arguments, keyed by slot name.
pub type ArgMap = BTreeMap<String, Value>;

/// Arguments captured for one matched option.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OptionResult {
    /// Captured arguments.
    pub args: ArgMap,
}

/// Arguments and options captured for one matched sub-command.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubcommandResult {
    /// The sub-command's own arguments.
    pub args: ArgMap,
    /// Options matched inside the sub-command, by canonical name.
    pub options: BTreeMap<String, OptionResult>,
}

/// Outcome of one parse attempt.
///
/// On failure `matched` is false, `error` is set and the accumulators hold
/// whatever was captured before the failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    /// Whether the input matched the grammar.
    pub matched: bool,
    /// Header value: a capture, `true` on a plain match, `false` otherwise.
    pub header: Value,
    /// Main arguments.
    pub main_args: ArgMap,
    /// Matched options, by canonical name.
    pub options: BTreeMap<String, OptionResult>,
    /// Matched sub-commands, by canonical name.
    pub subcommands: BTreeMap<String, SubcommandResult>,
    /// Input left unconsumed.
    pub remainder: Vec<Token>,
    /// The failure, when `matched` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ParseError>,
}

impl Default for ParseResult {
    fn default() -> Self {
        Self {
            matched: false,
            header: Value::Bool(false),
            main_args: ArgMap::new(),
            options: BTreeMap::new(),
            subcommands: BTreeMap::new(),
            remainder: Vec::new(),
            error: None,
        }
    }
}

impl ParseResult {
    /// Whether the option with canonical name `name` matched.
    pub fn has_option(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// Whether the sub-command with canonical name `name` matched.
    pub fn has_subcommand(&self, name: &str) -> bool {
        self.subcommands.contains_key(name)
    }

    /// Look up a captured value by dotted path.
    ///
    /// - `"who"`: a main argument
    /// - `"--level.n"`: argument `n` of option `--level`
    /// - `"--level"`: the argument of a single-argument option
    /// - `"add.path"`, `"add.--force.n"`: the same inside a sub-command
    ///
    /// Main arguments shadow options and sub-commands of the same name.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        if rest.is_none() {
            if let Some(value) = self.main_args.get(head) {
                return Some(value);
            }
        }
        if let Some(option) = self.options.get(head) {
            return option_value(option, rest);
        }
        let sub = self.subcommands.get(head)?;
        let rest = rest?;
        if let Some(value) = sub.args.get(rest) {
            return Some(value);
        }
        let (name, arg) = match rest.split_once('.') {
            Some((name, arg)) => (name, Some(arg)),
            None => (rest, None),
        };
        option_value(sub.options.get(name)?, arg)
    }
}

fn option_value<'r>(option: &'r OptionResult, arg: Option<&str>) -> Option<&'r Value> {
    match arg {
        Some(arg) => option.args.get(arg),
        None if option.args.len() == 1 => option.args.values().next(),
        None => None,
    }
}
