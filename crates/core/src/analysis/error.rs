use std::collections::BTreeMap;

use argot_diagnostics::{Diagnostic, codes};
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use super::input::Token;

/// Why a parse attempt failed.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    /// Tokenization produced nothing to match.
    #[error("empty input")]
    EmptyInput,

    /// A unit of a filtered-out kind appeared in the input.
    #[error("unrecognised unit of kind `{unit_type}`")]
    UnrecognisedUnit {
        /// The unit's kind tag.
        unit_type: String,
    },

    /// The leading tokens do not match the command header.
    #[error("header mismatch at `{found}`")]
    HeaderMismatch {
        /// The first token examined.
        found: String,
    },

    /// A token was present but did not satisfy the slot's strategy.
    #[error("parameter `{found}` does not match argument `{slot}`")]
    ParamsUnmatched {
        /// The slot being filled.
        slot: String,
        /// The rejected token.
        found: String,
    },

    /// The stream ran out (or hit a keyword) before a required slot.
    #[error("missing argument `{slot}`")]
    ArgumentMissing {
        /// The slot left unfilled.
        slot: String,
    },
}

impl ErrorKind {
    /// Diagnostic code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::EmptyInput => codes::PARSE_EMPTY_INPUT,
            ErrorKind::UnrecognisedUnit { .. } => codes::PARSE_UNRECOGNISED_UNIT,
            ErrorKind::HeaderMismatch { .. } => codes::PARSE_HEADER_MISMATCH,
            ErrorKind::ParamsUnmatched { .. } => codes::PARSE_PARAMS_UNMATCHED,
            ErrorKind::ArgumentMissing { .. } => codes::PARSE_ARGUMENT_MISSING,
        }
    }

    fn context(&self) -> BTreeMap<String, String> {
        match self {
            ErrorKind::EmptyInput => BTreeMap::new(),
            ErrorKind::UnrecognisedUnit { unit_type } => {
                BTreeMap::from([("unit_type".into(), unit_type.clone())])
            }
            ErrorKind::HeaderMismatch { found } => {
                BTreeMap::from([("found".into(), found.clone())])
            }
            ErrorKind::ParamsUnmatched { slot, found } => BTreeMap::from([
                ("slot".into(), slot.clone()),
                ("found".into(), found.clone()),
            ]),
            ErrorKind::ArgumentMissing { slot } => {
                BTreeMap::from([("slot".into(), slot.clone())])
            }
        }
    }
}

/// A failed parse: what went wrong plus the input left unconsumed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}")]
pub struct ParseError {
    /// The failure.
    pub kind: ErrorKind,
    /// Tokens not consumed when the failure occurred.
    pub remainder: Vec<Token>,
}

impl ParseError {
    /// Diagnostic code for this failure.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Convert to a structured [`Diagnostic`].
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut context = self.kind.context();
        if !self.remainder.is_empty() {
            let rest: Vec<String> = self.remainder.iter().map(Token::to_string).collect();
            context.insert("remainder".into(), rest.join(" "));
        }
        let diag = Diagnostic::error(self.code(), self.to_string());
        if context.is_empty() {
            diag
        } else {
            diag.with_context(context)
        }
    }
}

impl Serialize for ParseError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ParseError", 4)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("remainder", &self.remainder)?;
        state.end()
    }
}
