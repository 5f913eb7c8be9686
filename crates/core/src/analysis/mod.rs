/// Orchestration of one parse attempt.
pub(crate) mod analyser;
/// Two-level token cursor with push-back.
pub mod cursor;
/// Parse failures.
pub mod error;
/// Match-strategy handlers.
pub(crate) mod handlers;
/// Header matching.
pub mod header;
/// Input tokens and units.
pub mod input;
/// Parse results.
pub mod result;
/// Quote-aware splitting.
pub mod split;
