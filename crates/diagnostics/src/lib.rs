//! Diagnostics for the argot command-grammar engine.
//!
//! Provides [`Diagnostic`] and [`Severity`], used to report parse failures
//! and grammar construction errors in a structured, serializable form.
//! Diagnostic codes are defined in the [`codes`] module.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error: the input did not match.
    Error,
    /// Warning: the input matched with caveats.
    Warn,
    /// Informational note.
    Info,
}

/// A diagnostic message produced by the analyser or grammar builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"ARGOT1003"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Machine-readable context for tooling. Keys and values are free-form strings.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(id: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(id, Severity::Error, message)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(id: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(id, Severity::Warn, message)
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(id: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(id, Severity::Info, message)
    }

    /// Attach machine-readable context metadata (builder pattern).
    ///
    /// Keys are short descriptors like `"slot"`, `"found"`, `"command"`.
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Returns `true` for `Error` severity.
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    let text = match id {
        codes::PARSE_EMPTY_INPUT => {
            "The input produced no tokens after splitting on the command separator. \
             Empty strings and chains made only of dropped units end up here."
        }
        codes::PARSE_UNRECOGNISED_UNIT => {
            "An opaque unit in the input has a type listed in the grammar's filter-out list. \
             Remove the unit or take the type off the list."
        }
        codes::PARSE_HEADER_MISMATCH => {
            "The leading tokens do not match the command header: the command name, \
             optionally preceded by one of the configured literal or unit triggers."
        }
        codes::PARSE_PARAMS_UNMATCHED => {
            "A token was present for an argument slot but did not satisfy the slot's \
             match strategy, and the slot has neither a default nor the optional flag."
        }
        codes::PARSE_ARGUMENT_MISSING => {
            "The input ran out before a required argument slot could be filled. \
             Supply the argument or give the slot a default."
        }
        codes::GRAMMAR_INVALID_PATTERN => {
            "A pattern in the grammar failed to compile as a regular expression."
        }
        codes::GRAMMAR_DUPLICATE_ARGUMENT => {
            "Argument names must be unique within one argument list."
        }
        codes::GRAMMAR_DUPLICATE_NAME => {
            "Options and sub-commands under the same parent must resolve to distinct names."
        }
        codes::GRAMMAR_EMPTY_NAME => {
            "Commands, options and sub-commands need a non-empty name."
        }
        codes::GRAMMAR_EMPTY_SEPARATOR => {
            "Separators must contain at least one character."
        }
        codes::GRAMMAR_INVALID_DOCUMENT => {
            "The grammar document could not be read: it is not valid JSON, or a field \
             has the wrong shape. The message names the line and column."
        }
        _ => return None,
    };
    Some(text)
}
