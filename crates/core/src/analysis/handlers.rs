//! One handler per [`Strategy`] variant.
//!
//! A handler receives the token already fetched for its slot (or `None` at
//! the end of input), may fetch more, and either writes the slot into the
//! accumulator or fails. Every token a handler does not keep is pushed back.

use tracing::trace;

use super::cursor::Cursor;
use super::error::ErrorKind;
use super::input::Token;
use super::result::ArgMap;
use crate::grammar::args::ArgSlot;
use crate::grammar::keywords::KeywordIndex;
use crate::grammar::pattern::ArgPattern;
use crate::grammar::strategy::{Multi, MultiMode, Strategy, Union};
use crate::grammar::value::Value;

/// What a handler knows about the slot it is filling.
pub(crate) struct SlotCtx<'a> {
    pub(crate) slot: &'a ArgSlot,
    /// Required slots declared after this one.
    pub(crate) later_required: usize,
    pub(crate) separator: &'a str,
    pub(crate) keywords: &'a KeywordIndex,
}

impl SlotCtx<'_> {
    fn is_keyword(&self, token: &Token) -> bool {
        token.as_text().is_some_and(|text| self.keywords.contains(text))
    }

    /// The candidate, unless it is a keyword.
    fn data<'t>(&self, candidate: Option<&'t Token>) -> Option<&'t Token> {
        candidate.filter(|token| !self.is_keyword(token))
    }

    fn write(&self, acc: &mut ArgMap, value: Value) {
        trace!(slot = %self.slot.name, %value, "slot filled");
        acc.insert(self.slot.name.clone(), value);
    }
}

/// Run the handler for the slot's strategy.
pub(crate) fn dispatch(
    cursor: &mut Cursor,
    candidate: Option<Token>,
    ctx: &SlotCtx<'_>,
    acc: &mut ArgMap,
) -> Result<(), ErrorKind> {
    match &ctx.slot.strategy {
        Strategy::Pattern(pattern) => plain(cursor, candidate, pattern, ctx, acc),
        Strategy::Negated(pattern) => negated(cursor, candidate, pattern, ctx, acc),
        Strategy::Union(union) => union_of(cursor, candidate, union, ctx, acc),
        Strategy::Multi(multi) => variadic(cursor, candidate, multi, ctx, acc),
        Strategy::Any => any(cursor, candidate, ctx, acc),
        Strategy::All => all(cursor, candidate, ctx, acc),
    }
}

fn plain(
    cursor: &mut Cursor,
    candidate: Option<Token>,
    pattern: &ArgPattern,
    ctx: &SlotCtx<'_>,
    acc: &mut ArgMap,
) -> Result<(), ErrorKind> {
    let value = ctx
        .data(candidate.as_ref())
        .and_then(Token::as_text)
        .and_then(|text| pattern.capture(text));
    match value {
        Some(value) => {
            ctx.write(acc, value);
            Ok(())
        }
        None => fallback(cursor, candidate, ctx, acc),
    }
}

fn negated(
    cursor: &mut Cursor,
    candidate: Option<Token>,
    pattern: &ArgPattern,
    ctx: &SlotCtx<'_>,
    acc: &mut ArgMap,
) -> Result<(), ErrorKind> {
    let accepted = ctx
        .data(candidate.as_ref())
        .is_some_and(|token| token.as_text().is_none_or(|text| pattern.find(text).is_none()));
    match candidate {
        Some(token) if accepted => {
            ctx.write(acc, Value::from(token));
            Ok(())
        }
        _ => fallback(cursor, candidate, ctx, acc),
    }
}

fn union_of(
    cursor: &mut Cursor,
    candidate: Option<Token>,
    union: &Union,
    ctx: &SlotCtx<'_>,
    acc: &mut ArgMap,
) -> Result<(), ErrorKind> {
    let Some(token) = ctx.data(candidate.as_ref()) else {
        return fallback(cursor, candidate, ctx, acc);
    };
    let value = match (union.hit(token), union.negated) {
        (Some(value), true) => Some(value),
        (None, false) => Some(Value::from(token.clone())),
        _ => None,
    };
    match value {
        Some(value) => {
            ctx.write(acc, value);
            Ok(())
        }
        None => fallback(cursor, candidate, ctx, acc),
    }
}

fn any(
    cursor: &mut Cursor,
    candidate: Option<Token>,
    ctx: &SlotCtx<'_>,
    acc: &mut ArgMap,
) -> Result<(), ErrorKind> {
    match candidate {
        Some(token) if !ctx.is_keyword(&token) => {
            ctx.write(acc, Value::from(token));
            Ok(())
        }
        _ => fallback(cursor, candidate, ctx, acc),
    }
}

fn all(
    cursor: &mut Cursor,
    candidate: Option<Token>,
    ctx: &SlotCtx<'_>,
    acc: &mut ArgMap,
) -> Result<(), ErrorKind> {
    let mut items: Vec<Value> = candidate.into_iter().map(Value::from).collect();
    while let Some(token) = cursor.fetch(ctx.separator) {
        items.push(Value::from(token));
    }
    if items.is_empty() {
        write_empty_run(ctx, MultiMode::List, acc);
    } else {
        ctx.write(acc, Value::List(items));
    }
    Ok(())
}

/// Collect a run of values for a [`Multi`] slot.
///
/// The run never takes more than `remaining - later_required` tokens. When it
/// stops on a keyword or a mismatch, up to `later_required` collected tokens
/// are handed back so the slots after it can still be filled.
fn variadic(
    cursor: &mut Cursor,
    candidate: Option<Token>,
    multi: &Multi,
    ctx: &SlotCtx<'_>,
    acc: &mut ArgMap,
) -> Result<(), ErrorKind> {
    let Some(first) = candidate else {
        write_empty_run(ctx, multi.mode, acc);
        return Ok(());
    };
    let budget = (cursor.remaining(ctx.separator) + 1).saturating_sub(ctx.later_required);
    trace!(slot = %ctx.slot.name, budget, "variadic run");

    let mut taken: Vec<(Token, Value)> = Vec::new();
    let mut next = Some(first);
    let mut stopped_early = false;
    while let Some(token) = next {
        if taken.len() >= budget {
            cursor.push_back(&token);
            break;
        }
        let item = if ctx.is_keyword(&token) {
            None
        } else {
            collect_one(&token, multi)
        };
        match item {
            Some(value) => taken.push((token, value)),
            None => {
                cursor.push_back(&token);
                stopped_early = true;
                break;
            }
        }
        next = cursor.fetch(ctx.separator);
    }

    if stopped_early {
        let give_back = taken.len().min(ctx.later_required);
        for (token, _) in taken.drain(taken.len() - give_back..).rev() {
            cursor.push_back(&token);
        }
    }

    if taken.is_empty() {
        write_empty_run(ctx, multi.mode, acc);
        return Ok(());
    }
    let values = taken.into_iter().map(|(_, value)| value);
    let value = match multi.mode {
        MultiMode::List => Value::List(values.collect()),
        MultiMode::Map => Value::Map(
            values
                .filter_map(|entry| match entry {
                    Value::List(mut pair) if pair.len() == 2 => {
                        let value = pair.pop()?;
                        match pair.pop()? {
                            Value::Str(key) => Some((key, value)),
                            _ => None,
                        }
                    }
                    _ => None,
                })
                .collect(),
        ),
    };
    ctx.write(acc, value);
    Ok(())
}

/// Match one token of a variadic run. Map entries come back as a
/// `[key, value]` pair.
fn collect_one(token: &Token, multi: &Multi) -> Option<Value> {
    let text = token.as_text()?;
    match multi.mode {
        MultiMode::List => multi.inner.capture(text),
        MultiMode::Map => {
            let (key, raw) = text.split_once('=')?;
            if key.is_empty() {
                return None;
            }
            let value = multi.inner.capture(raw)?;
            Some(Value::List(vec![Value::from(key), value]))
        }
    }
}

fn write_empty_run(ctx: &SlotCtx<'_>, mode: MultiMode, acc: &mut ArgMap) {
    let value = match (mode, &ctx.slot.default) {
        (MultiMode::List, Some(default)) => Value::List(vec![default.clone()]),
        (MultiMode::List, None) => Value::List(Vec::new()),
        (MultiMode::Map, Some(default)) => default.clone(),
        (MultiMode::Map, None) => Value::Map(Default::default()),
    };
    ctx.write(acc, value);
}

/// Shared failure path: hand the token back, then use the default, leave an
/// optional slot absent, or fail.
fn fallback(
    cursor: &mut Cursor,
    candidate: Option<Token>,
    ctx: &SlotCtx<'_>,
    acc: &mut ArgMap,
) -> Result<(), ErrorKind> {
    if let Some(token) = &candidate {
        cursor.push_back(token);
    }
    if let Some(default) = &ctx.slot.default {
        ctx.write(acc, default.clone());
        return Ok(());
    }
    if ctx.slot.optional {
        trace!(slot = %ctx.slot.name, "optional slot left empty");
        return Ok(());
    }
    match ctx.data(candidate.as_ref()) {
        Some(token) => Err(ErrorKind::ParamsUnmatched {
            slot: ctx.slot.name.clone(),
            found: token.to_string(),
        }),
        None => Err(ErrorKind::ArgumentMissing {
            slot: ctx.slot.name.clone(),
        }),
    }
}
