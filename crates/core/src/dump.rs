use crate::analysis::result::ParseResult;

/// Serialize a parse result to a pretty-printed JSON string.
pub fn to_pretty_json(result: &ParseResult) -> String {
    serde_json::to_string_pretty(result).expect("ParseResult serialization cannot fail")
}
