use std::sync::LazyLock;

use regex::Regex;

use super::error::GrammarError;
use super::value::Value;

/// Conversion applied to a captured string after a successful match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Keep the captured text as a string.
    Direct,
    /// Parse as a decimal `i64`.
    Int,
    /// Parse as `f64`.
    Float,
    /// `true`/`false` in any capitalisation.
    Bool,
    /// Parse hexadecimal digits as `i64`.
    Hex,
}

impl Transform {
    fn apply(self, text: &str) -> Option<Value> {
        match self {
            Transform::Direct => Some(Value::Str(text.to_owned())),
            Transform::Int => text.parse().ok().map(Value::Int),
            Transform::Float => text.parse().ok().map(Value::Float),
            Transform::Bool => Some(Value::Bool(text.eq_ignore_ascii_case("true"))),
            Transform::Hex => i64::from_str_radix(text, 16).ok().map(Value::Int),
        }
    }
}

/// A full-match regular expression with an optional transform.
///
/// The pattern's `source` doubles as its placeholder text: a token equal to
/// the source captures [`Value::Wildcard`] instead of the literal text.
#[derive(Debug, Clone)]
pub struct ArgPattern {
    source: String,
    regex: Regex,
    transform: Transform,
    alias: Option<&'static str>,
}

/// Built-in named patterns: `(alias, source, transform)`.
const BUILTIN_SPECS: &[(&str, &str, Transform)] = &[
    ("str", ".+", Transform::Direct),
    ("word", r"\w+", Transform::Direct),
    ("int", r"-?\d+", Transform::Int),
    ("float", r"-?\d+\.?\d*", Transform::Float),
    ("bool", "True|False|true|false", Transform::Bool),
    ("hex", "0x([0-9a-fA-F]+)", Transform::Hex),
    ("email", r"[\w.+-]+@[\w-]+\.[\w.-]+", Transform::Direct),
    ("url", r"[a-zA-Z][a-zA-Z0-9+.-]*://\S+", Transform::Direct),
    ("ip", r"(?:\d{1,3}\.){3}\d{1,3}(?::\d{1,5})?", Transform::Direct),
];

static BUILTINS: LazyLock<Vec<ArgPattern>> = LazyLock::new(|| {
    BUILTIN_SPECS
        .iter()
        .map(|&(alias, source, transform)| ArgPattern {
            source: source.to_owned(),
            regex: anchored(source).expect("built-in patterns are valid regexes"),
            transform,
            alias: Some(alias),
        })
        .collect()
});

fn anchored(source: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{source})$"))
}

impl ArgPattern {
    /// Compile `source` as a full-match regular expression with no transform.
    pub fn new(source: &str) -> Result<Self, GrammarError> {
        let regex = anchored(source).map_err(|source_err| GrammarError::InvalidPattern {
            pattern: source.to_owned(),
            source: source_err,
        })?;
        Ok(Self {
            source: source.to_owned(),
            regex,
            transform: Transform::Direct,
            alias: None,
        })
    }

    /// Look up a built-in pattern by name (`"int"`, `"word"`, ...).
    pub fn builtin(name: &str) -> Option<Self> {
        BUILTINS.iter().find(|p| p.alias == Some(name)).cloned()
    }

    /// Resolve a built-in name, or compile the text as a regular expression.
    pub fn parse(spec: &str) -> Result<Self, GrammarError> {
        match Self::builtin(spec) {
            Some(pattern) => Ok(pattern),
            None => Self::new(spec),
        }
    }

    /// Set the transform applied to captured text (builder pattern).
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// The pattern source, which is also its placeholder text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The built-in name, if this is a built-in pattern.
    pub fn alias(&self) -> Option<&str> {
        self.alias
    }

    /// The transform applied after a match.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Full-match `text`, returning the first capture group when the pattern
    /// has one, otherwise the whole text.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        let caps = self.regex.captures(text)?;
        Some(caps.get(1).or_else(|| caps.get(0))?.as_str())
    }

    /// Match `text` and produce the captured value, applying the wildcard
    /// rule and the transform. Returns `None` when the text does not match
    /// or the transform rejects it.
    pub fn capture(&self, text: &str) -> Option<Value> {
        let found = self.find(text)?;
        if found == self.source {
            return Some(Value::Wildcard);
        }
        self.transform.apply(found)
    }
}

impl PartialEq for ArgPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.transform == other.transform
    }
}

impl std::fmt::Display for ArgPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.alias {
            Some(alias) => f.write_str(alias),
            None => f.write_str(&self.source),
        }
    }
}
