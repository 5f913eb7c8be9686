/// Argument specifications.
pub mod args;
/// Commands and their configuration.
pub mod command;
/// Grammar construction errors.
pub mod error;
/// The keyword index.
pub mod keywords;
/// Options and sub-commands.
pub mod node;
/// Argument patterns and built-ins.
pub mod pattern;
/// Match strategies.
pub mod strategy;
/// Captured values.
pub mod value;
