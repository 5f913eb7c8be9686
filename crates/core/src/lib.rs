//! argot core library.
//!
//! A command-grammar parsing engine. A [`Command`] describes a header, typed
//! main arguments, options and sub-commands; [`Command::analyse`] tokenizes
//! an input string or a chain of text and opaque units and matches it,
//! producing a [`ParseResult`] or a precise [`ParseError`].
//!
//! ```
//! use argot_core::Command;
//!
//! let greet = Command::from_json(r#"{
//!     "name": "greet",
//!     "args": [{"name": "who", "pattern": "word"}],
//!     "options": [{"name": "--loud", "aliases": ["-l"]}]
//! }"#).unwrap();
//!
//! let result = greet.analyse("greet Alice -l").unwrap();
//! assert!(result.matched);
//! assert_eq!(result.get("who").and_then(|v| v.as_str()), Some("Alice"));
//! assert!(result.has_option("--loud"));
//! ```

#![warn(missing_docs)]

/// Tokenizing and matching input against a grammar.
pub mod analysis;
/// JSON serialization helpers for parse results.
pub mod dump;
/// Grammar data types: patterns, strategies, arguments, options, commands.
pub mod grammar;
/// Caller-owned command collections.
pub mod registry;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Grammar
pub use grammar::args::{ArgSlot, Args};
pub use grammar::command::{Command, CommandConfig, DEFAULT_SEPARATOR, Trigger};
pub use grammar::error::GrammarError;
pub use grammar::keywords::KeywordIndex;
pub use grammar::node::{Node, Param, Subcommand};
pub use grammar::pattern::{ArgPattern, Transform};
pub use grammar::strategy::{Multi, MultiMode, Strategy, Union};
pub use grammar::value::Value;

// Analysis
pub use analysis::error::{ErrorKind, ParseError};
pub use analysis::input::{Input, TEXT_KIND, Token, Unit};
pub use analysis::result::{ArgMap, OptionResult, ParseResult, SubcommandResult};

// Registry
pub use registry::Registry;

// Diagnostics (re-exported from the diagnostics crate)
pub use argot_diagnostics::{Diagnostic, Severity, codes};

// Serialization helpers
pub use dump::to_pretty_json;
