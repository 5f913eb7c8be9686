use serde::{Deserialize, Serialize};

/// Reserved kind name that matches any textual token in union kind checks.
pub const TEXT_KIND: &str = "text";

/// A non-textual input element carried through the stream unmatched.
///
/// Units are identified by their `kind` tag (e.g. `"image"`, `"at"`). The
/// payload is opaque to the analyser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Declared sub-type tag.
    pub kind: String,
    /// Opaque payload.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

impl Unit {
    /// Create a unit with no payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            data: serde_json::Value::Null,
        }
    }

    /// Attach a payload (builder pattern).
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

/// One element of the input stream: a string token or an opaque unit.
///
/// In JSON a token is either a plain string or a unit object
/// (`{"kind": "image", "data": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Token {
    /// A piece of text.
    Text(String),
    /// An opaque unit.
    Unit(Unit),
}

impl Token {
    /// The text of a textual token.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Token::Text(text) => Some(text),
            Token::Unit(_) => None,
        }
    }

    /// Whether this token is textual or a unit of the given kind.
    pub fn is_kind(&self, kind: &str) -> bool {
        match self {
            Token::Text(_) => kind == TEXT_KIND,
            Token::Unit(unit) => unit.kind == kind,
        }
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token::Text(text.to_owned())
    }
}

impl From<String> for Token {
    fn from(text: String) -> Self {
        Token::Text(text)
    }
}

impl From<Unit> for Token {
    fn from(unit: Unit) -> Self {
        Token::Unit(unit)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Text(text) => f.write_str(text),
            Token::Unit(unit) => write!(f, "[{}]", unit.kind),
        }
    }
}

/// Input to a parse attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Input {
    /// A single delimited string.
    Text(String),
    /// A sequence of mixed text and opaque units.
    Chain(Vec<Token>),
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Input::Text(text.to_owned())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::Text(text)
    }
}

impl From<Vec<Token>> for Input {
    fn from(chain: Vec<Token>) -> Self {
        Input::Chain(chain)
    }
}
