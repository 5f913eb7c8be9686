use regex::Regex;
use tracing::trace;

use super::cursor::Cursor;
use super::input::Token;
use crate::grammar::command::Trigger;
use crate::grammar::error::GrammarError;
use crate::grammar::value::Value;

/// Which leading tokens a header consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderShape {
    /// One token: an optional literal prefix glued to the name.
    Literal,
    /// A unit of a marked kind, then the bare name.
    Unit,
    /// A unit of a marked kind or a token that is exactly one of the literal
    /// prefixes, then the bare name.
    Mixed,
}

/// Compiled header of a command.
#[derive(Debug, Clone)]
pub struct HeaderMatcher {
    shape: HeaderShape,
    pattern: Regex,
    /// Lead-token pattern of a mixed header.
    prefix: Option<Regex>,
    kinds: Vec<String>,
}

fn compile(source: &str, pattern: &str) -> Result<Regex, GrammarError> {
    Regex::new(source).map_err(|source_err| GrammarError::InvalidPattern {
        pattern: pattern.to_owned(),
        source: source_err,
    })
}

impl HeaderMatcher {
    /// Compile the header for command `name` (a regular expression) and its
    /// triggers.
    pub fn build(name: &str, triggers: &[Trigger]) -> Result<Self, GrammarError> {
        let mut literals = Vec::new();
        let mut kinds = Vec::new();
        for trigger in triggers {
            match trigger {
                Trigger::Literal(text) => literals.push(regex::escape(text)),
                Trigger::Unit { unit } => kinds.push(unit.clone()),
            }
        }

        let shape = match (literals.is_empty(), kinds.is_empty()) {
            (_, true) => HeaderShape::Literal,
            (true, false) => HeaderShape::Unit,
            (false, false) => HeaderShape::Mixed,
        };

        let alternation = literals.join("|");
        let (source, prefix) = match shape {
            HeaderShape::Literal if !literals.is_empty() => {
                (format!("^(?:{alternation})?(?:{name})$"), None)
            }
            HeaderShape::Mixed => (
                format!("^(?:{name})$"),
                Some(compile(&format!("^(?:{alternation})$"), &alternation)?),
            ),
            _ => (format!("^(?:{name})$"), None),
        };
        let pattern = compile(&source, name)?;
        Ok(Self {
            shape,
            pattern,
            prefix,
            kinds,
        })
    }

    /// The shape chosen at build time.
    pub fn shape(&self) -> HeaderShape {
        self.shape
    }

    /// Match the leading tokens.
    ///
    /// On success returns the header value: the name pattern's first capture
    /// group, or `true` when it has none. On failure every token taken is
    /// pushed back and the first token examined is returned.
    pub(crate) fn matches(&self, cursor: &mut Cursor, separator: &str) -> Result<Value, Option<Token>> {
        let Some(first) = cursor.fetch(separator) else {
            return Err(None);
        };

        let two_token = self.shape != HeaderShape::Literal;
        let name_token = if two_token {
            if !self.is_lead(&first) {
                return Err(self.reject(cursor, first, None));
            }
            match cursor.fetch(separator) {
                Some(next) => next,
                None => return Err(self.reject(cursor, first, None)),
            }
        } else {
            first.clone()
        };

        match name_token.as_text().and_then(|text| self.capture(text)) {
            Some(value) => Ok(value),
            None if two_token => Err(self.reject(cursor, first, Some(&name_token))),
            None => Err(self.reject(cursor, first, None)),
        }
    }

    /// Whether `token` may open a two-token header.
    fn is_lead(&self, token: &Token) -> bool {
        match token {
            Token::Unit(unit) => self.kinds.contains(&unit.kind),
            Token::Text(text) => self.prefix.as_ref().is_some_and(|p| p.is_match(text)),
        }
    }

    fn reject(&self, cursor: &mut Cursor, first: Token, second: Option<&Token>) -> Option<Token> {
        if let Some(token) = second {
            cursor.push_back(token);
        }
        cursor.push_back(&first);
        trace!(found = %first, shape = ?self.shape, "header rejected");
        Some(first)
    }

    fn capture(&self, text: &str) -> Option<Value> {
        let caps = self.pattern.captures(text)?;
        Some(match caps.get(1) {
            Some(group) => Value::Str(group.as_str().to_owned()),
            None => Value::Bool(true),
        })
    }
}
