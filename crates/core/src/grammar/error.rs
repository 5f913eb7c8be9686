use std::collections::BTreeMap;

use argot_diagnostics::{Diagnostic, codes};

/// Errors raised while building a grammar.
///
/// Grammar errors are reported once, at construction time. A successfully
/// built [`Command`](super::command::Command) never produces them again.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    /// A pattern failed to compile as a regular expression.
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// The offending pattern source.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// Two slots in one argument list share a name.
    #[error("duplicate argument name `{0}`")]
    DuplicateArgument(String),

    /// Two options or sub-commands under one parent resolve to the same name.
    #[error("duplicate name `{name}` under `{parent}`")]
    DuplicateName {
        /// The clashing alias.
        name: String,
        /// The parent command or sub-command.
        parent: String,
    },

    /// A command, option or sub-command was given an empty name.
    #[error("empty name")]
    EmptyName,

    /// A separator string was empty.
    #[error("empty separator")]
    EmptySeparator,

    /// A grammar file could not be deserialized.
    #[error("invalid grammar document: {0}")]
    Json(#[from] serde_json::Error),
}

impl GrammarError {
    /// Diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            GrammarError::InvalidPattern { .. } => codes::GRAMMAR_INVALID_PATTERN,
            GrammarError::DuplicateArgument(_) => codes::GRAMMAR_DUPLICATE_ARGUMENT,
            GrammarError::DuplicateName { .. } => codes::GRAMMAR_DUPLICATE_NAME,
            GrammarError::EmptyName => codes::GRAMMAR_EMPTY_NAME,
            GrammarError::EmptySeparator => codes::GRAMMAR_EMPTY_SEPARATOR,
            GrammarError::Json(_) => codes::GRAMMAR_INVALID_DOCUMENT,
        }
    }

    /// Convert to a structured [`Diagnostic`].
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string());
        match self {
            GrammarError::InvalidPattern { pattern, .. } => {
                diag.with_context(BTreeMap::from([("pattern".into(), pattern.clone())]))
            }
            GrammarError::DuplicateArgument(name) => {
                diag.with_context(BTreeMap::from([("name".into(), name.clone())]))
            }
            GrammarError::DuplicateName { name, parent } => diag.with_context(BTreeMap::from([
                ("name".into(), name.clone()),
                ("parent".into(), parent.clone()),
            ])),
            _ => diag,
        }
    }
}
