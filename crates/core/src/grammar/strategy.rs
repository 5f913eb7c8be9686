use serde::Deserialize;

use super::error::GrammarError;
use super::pattern::ArgPattern;
use super::value::Value;
use crate::analysis::input::Token;

/// How an argument slot matches tokens.
///
/// In a grammar document a strategy is written compactly:
///
/// | JSON                                   | Strategy                    |
/// |----------------------------------------|-----------------------------|
/// | `"int"`, `"word"`, `"[a-z]+"`          | [`Strategy::Pattern`]       |
/// | `"!int"`                               | [`Strategy::Negated`]       |
/// | `{"union": {"equals": [...], ...}}`    | [`Strategy::Union`]         |
/// | `{"multi": "int", "mode": "map"}`      | [`Strategy::Multi`]         |
/// | `"any"` / `"all"`                      | [`Strategy::Any`] / [`Strategy::All`] |
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "StrategySpec")]
pub enum Strategy {
    /// Full-match a textual token against a pattern.
    Pattern(ArgPattern),
    /// Accept any token that does *not* match the pattern.
    Negated(ArgPattern),
    /// Equality set, sub-patterns and kinds combined.
    Union(Union),
    /// Collect a run of tokens matching one inner pattern.
    Multi(Multi),
    /// Accept any single token, text or unit.
    Any,
    /// Consume every remaining token.
    All,
}

impl Strategy {
    /// Parse the compact string form (`"int"`, `"!word"`, `"any"`, a regex).
    pub fn parse(spec: &str) -> Result<Self, GrammarError> {
        match spec {
            "any" => Ok(Strategy::Any),
            "all" => Ok(Strategy::All),
            _ => match spec.strip_prefix('!') {
                Some(rest) if !rest.is_empty() => Ok(Strategy::Negated(ArgPattern::parse(rest)?)),
                _ => Ok(Strategy::Pattern(ArgPattern::parse(spec)?)),
            },
        }
    }

    /// Shorthand for a plain pattern strategy.
    pub fn pattern(spec: &str) -> Result<Self, GrammarError> {
        Ok(Strategy::Pattern(ArgPattern::parse(spec)?))
    }

    /// Whether this strategy collects a run of tokens.
    pub fn is_variadic(&self) -> bool {
        matches!(self, Strategy::Multi(_) | Strategy::All)
    }
}

/// A union of alternatives: literal values, patterns and token kinds.
///
/// With `negated` unset the union is a deny-list: it rejects any token that
/// equals a member of `equals`, matches one of `patterns`, or is of one of
/// `kinds`, and passes every other token through unchanged. With `negated`
/// set it accepts only such tokens.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Union {
    /// Exact text values.
    pub equals: Vec<String>,
    /// Sub-patterns, tried in order.
    pub patterns: Vec<ArgPattern>,
    /// Token kinds (`"text"` or a unit kind).
    pub kinds: Vec<String>,
    /// Invert the union (see the type docs).
    pub negated: bool,
}

impl Union {
    /// Check `token` against the alternatives. Returns the value an accepting
    /// alternative captures, or `None` when no alternative holds.
    pub(crate) fn hit(&self, token: &Token) -> Option<Value> {
        if let Token::Text(text) = token {
            if self.equals.iter().any(|e| e == text) {
                return Some(Value::Str(text.clone()));
            }
            if let Some(value) = self.patterns.iter().find_map(|p| p.capture(text)) {
                return Some(value);
            }
        }
        if self.kinds.iter().any(|k| token.is_kind(k)) {
            return Some(Value::from(token.clone()));
        }
        None
    }
}

/// Shape of a variadic run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiMode {
    /// Positional values.
    #[default]
    List,
    /// `key=value` pairs.
    Map,
}

/// A variadic slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Multi {
    /// Pattern every collected value must match.
    pub inner: ArgPattern,
    /// List or map collection.
    pub mode: MultiMode,
}

// ── Serde forms ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum StrategySpec {
    Short(String),
    Union {
        union: UnionSpec,
    },
    Multi {
        multi: String,
        #[serde(default)]
        mode: MultiMode,
    },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct UnionSpec {
    #[serde(default)]
    equals: Vec<String>,
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    kinds: Vec<String>,
    #[serde(default)]
    negated: bool,
}

impl TryFrom<StrategySpec> for Strategy {
    type Error = GrammarError;

    fn try_from(spec: StrategySpec) -> Result<Self, Self::Error> {
        match spec {
            StrategySpec::Short(s) => Strategy::parse(&s),
            StrategySpec::Union { union } => Ok(Strategy::Union(Union {
                equals: union.equals,
                patterns: union
                    .patterns
                    .iter()
                    .map(|p| ArgPattern::parse(p))
                    .collect::<Result<_, _>>()?,
                kinds: union.kinds,
                negated: union.negated,
            })),
            StrategySpec::Multi { multi, mode } => Ok(Strategy::Multi(Multi {
                inner: ArgPattern::parse(&multi)?,
                mode,
            })),
        }
    }
}
