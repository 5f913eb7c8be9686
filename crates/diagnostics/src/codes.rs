//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete. `ARGOT1xxx` codes describe parse failures,
//! `ARGOT2xxx` codes describe grammar construction errors.

// ── Parse failures ──────────────────────────────────────────────────────

/// The input contained no tokenizable content.
pub const PARSE_EMPTY_INPUT: &str = "ARGOT1001";
/// An opaque unit's type is on the grammar's filter-out list.
pub const PARSE_UNRECOGNISED_UNIT: &str = "ARGOT1002";
/// The leading tokens do not satisfy the command header.
pub const PARSE_HEADER_MISMATCH: &str = "ARGOT1003";
/// A token did not satisfy its argument slot's match strategy.
pub const PARSE_PARAMS_UNMATCHED: &str = "ARGOT1004";
/// A required argument slot had no token available.
pub const PARSE_ARGUMENT_MISSING: &str = "ARGOT1005";

// ── Grammar errors ──────────────────────────────────────────────────────

/// A pattern in the grammar is not a valid regular expression.
pub const GRAMMAR_INVALID_PATTERN: &str = "ARGOT2001";
/// Two argument slots in one argument list share a name.
pub const GRAMMAR_DUPLICATE_ARGUMENT: &str = "ARGOT2002";
/// Two options or sub-commands under one parent share a name.
pub const GRAMMAR_DUPLICATE_NAME: &str = "ARGOT2003";
/// A command, option or sub-command has an empty name.
pub const GRAMMAR_EMPTY_NAME: &str = "ARGOT2004";
/// A separator string is empty.
pub const GRAMMAR_EMPTY_SEPARATOR: &str = "ARGOT2005";
/// A grammar document is not well-formed JSON or has the wrong shape.
pub const GRAMMAR_INVALID_DOCUMENT: &str = "ARGOT2006";

/// Every known diagnostic ID, in numeric order.
pub const ALL: &[&str] = &[
    PARSE_EMPTY_INPUT,
    PARSE_UNRECOGNISED_UNIT,
    PARSE_HEADER_MISMATCH,
    PARSE_PARAMS_UNMATCHED,
    PARSE_ARGUMENT_MISSING,
    GRAMMAR_INVALID_PATTERN,
    GRAMMAR_DUPLICATE_ARGUMENT,
    GRAMMAR_DUPLICATE_NAME,
    GRAMMAR_EMPTY_NAME,
    GRAMMAR_EMPTY_SEPARATOR,
    GRAMMAR_INVALID_DOCUMENT,
];
