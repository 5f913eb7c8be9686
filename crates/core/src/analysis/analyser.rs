use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, trace};

use super::cursor::Cursor;
use super::error::{ErrorKind, ParseError};
use super::handlers::{SlotCtx, dispatch};
use super::input::{Input, Token};
use super::result::{ArgMap, OptionResult, ParseResult, SubcommandResult};
use crate::grammar::args::Args;
use crate::grammar::command::Command;
use crate::grammar::node::{Node, Param, Subcommand};

/// Stage of one parse attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    Header,
    MainArgs,
    Loop,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Init => "init",
            Phase::Header => "header",
            Phase::MainArgs => "main-args",
            Phase::Loop => "loop",
            Phase::Done => "done",
        })
    }
}

/// What a token in the option loop resolved to.
enum Hit<'g> {
    Option(&'g Node),
    Subcommand(&'g Subcommand),
}

/// Per-parse state. Built fresh for every attempt and consumed by
/// [`run`](Self::run).
pub(crate) struct Analyser<'g> {
    command: &'g Command,
    cursor: Cursor,
    phase: Phase,
    result: ParseResult,
}

impl<'g> Analyser<'g> {
    pub(crate) fn new(command: &'g Command) -> Self {
        Self {
            command,
            cursor: Cursor::default(),
            phase: Phase::Init,
            result: ParseResult::default(),
        }
    }

    /// Run every phase and build the result. Never fails; a failure is
    /// recorded in the result.
    pub(crate) fn run(mut self, input: Input) -> ParseResult {
        let outcome = self.drive(input);
        self.enter(Phase::Done);

        let remainder = self.cursor.drain();
        self.result.remainder = remainder.clone();
        match outcome {
            Ok(()) => {
                self.result.matched = true;
                debug!(command = %self.command.name(), remainder = remainder.len(), "matched");
            }
            Err(kind) => {
                debug!(command = %self.command.name(), error = %kind, "no match");
                self.result.matched = false;
                self.result.error = Some(ParseError { kind, remainder });
            }
        }
        self.result
    }

    fn enter(&mut self, phase: Phase) {
        trace!(from = %self.phase, to = %phase, "phase");
        self.phase = phase;
    }

    fn drive(&mut self, input: Input) -> Result<(), ErrorKind> {
        let command = self.command;
        let separator = command.separator();

        self.cursor = Cursor::tokenize(
            input,
            separator,
            command.filter_out(),
            command.raises_on_failure(),
        )?;

        self.enter(Phase::Header);
        match command.header().matches(&mut self.cursor, separator) {
            Ok(value) => {
                debug!(header = %value, "header matched");
                self.result.header = value;
            }
            Err(found) => {
                debug!("header mismatch");
                return Err(ErrorKind::HeaderMismatch {
                    found: found.map(|t| t.to_string()).unwrap_or_default(),
                });
            }
        }

        self.enter(Phase::MainArgs);
        let mut main = ArgMap::new();
        let outcome = self.match_args(command.args(), separator, &mut main);
        self.result.main_args = main;
        outcome?;

        self.enter(Phase::Loop);
        let mut options = BTreeMap::new();
        let mut subcommands = BTreeMap::new();
        let outcome = self.option_loop(
            separator,
            &|text| {
                command.resolve(text).map(|param| match param {
                    Param::Option(node) => Hit::Option(node),
                    Param::Subcommand(sub) => Hit::Subcommand(sub),
                })
            },
            &mut options,
            Some(&mut subcommands),
        );
        self.result.options = options;
        self.result.subcommands = subcommands;
        outcome
    }

    /// Fill `args` from the cursor in declared order.
    fn match_args(
        &mut self,
        args: &Args,
        separator: &str,
        acc: &mut ArgMap,
    ) -> Result<(), ErrorKind> {
        if !args.needs_input() && self.cursor.is_exhausted() {
            for slot in args.slots() {
                if let Some(default) = &slot.default {
                    acc.insert(slot.name.clone(), default.clone());
                }
            }
            return Ok(());
        }
        for (index, slot) in args.slots().iter().enumerate() {
            let candidate = self.cursor.fetch(separator);
            let ctx = SlotCtx {
                slot,
                later_required: args.required_after(index),
                separator,
                keywords: self.command.keywords(),
            };
            dispatch(&mut self.cursor, candidate, &ctx, acc)?;
        }
        Ok(())
    }

    /// Resolve options (and, at the top level, sub-commands) until the input
    /// ends or a token resolves to nothing.
    fn option_loop<'n>(
        &mut self,
        separator: &str,
        resolve: &dyn Fn(&str) -> Option<Hit<'n>>,
        options: &mut BTreeMap<String, OptionResult>,
        mut subcommands: Option<&mut BTreeMap<String, SubcommandResult>>,
    ) -> Result<(), ErrorKind> {
        loop {
            let Some(next) = self.cursor.peek(separator) else {
                return Ok(());
            };
            let hit = match next.as_text().and_then(|text| resolve(text)) {
                Some(hit) => hit,
                None => {
                    trace!(token = %next, "unknown token ends the option loop");
                    return Ok(());
                }
            };
            match hit {
                Hit::Option(node) => {
                    let mut args = ArgMap::new();
                    let outcome = self.match_node(node, separator, &mut args);
                    options.insert(node.name().to_owned(), OptionResult { args });
                    outcome?;
                    debug!(option = node.name(), "option matched");
                }
                Hit::Subcommand(sub) => {
                    let Some(found) = subcommands.as_deref_mut() else {
                        return Ok(());
                    };
                    let sub_separator = sub.node().separator_or(separator);
                    let mut args = ArgMap::new();
                    let mut sub_options = BTreeMap::new();
                    let mut outcome = self.match_node(sub.node(), separator, &mut args);
                    if outcome.is_ok() {
                        debug!(subcommand = sub.name(), "sub-command matched");
                        outcome = self.option_loop(
                            sub_separator,
                            &|text| sub.resolve(text).map(Hit::Option),
                            &mut sub_options,
                            None,
                        );
                    }
                    found.insert(
                        sub.name().to_owned(),
                        SubcommandResult {
                            args,
                            options: sub_options,
                        },
                    );
                    outcome?;
                }
            }
        }
    }

    /// Consume a node's name and match its arguments into `args` with the
    /// node's separator. Arguments captured before a failure stay in `args`.
    fn match_node(
        &mut self,
        node: &Node,
        parent_separator: &str,
        args: &mut ArgMap,
    ) -> Result<(), ErrorKind> {
        let separator = node.separator_or(parent_separator);
        let name: Option<Token> = self.cursor.fetch(separator);
        trace!(node = node.name(), token = ?name, "node name consumed");
        self.match_args(node.args(), separator, args)
    }
}
