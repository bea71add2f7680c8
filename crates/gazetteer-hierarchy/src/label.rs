//! Path label codec.
//!
//! Place codes use `:` internally, so an ancestor path needs a distinct
//! separator for depth. Encoded form: codes joined with `.`, every `:`
//! rewritten to `_`. `decode(encode(x)) == x` for well-formed codes (none
//! containing `.` or `_`).

use crate::place::PlaceCode;

pub const TREE_SEPARATOR: char = '.';
pub const TREE_DELIMITER: char = '_';
pub const LABEL_DELIMITER: char = ':';

/// Encode an ordered ancestor-code sequence into a single path string.
pub fn encode(codes: &[PlaceCode]) -> String {
    let joined = codes
        .iter()
        .map(PlaceCode::as_str)
        .collect::<Vec<_>>()
        .join(&TREE_SEPARATOR.to_string());
    joined.replace(LABEL_DELIMITER, &TREE_DELIMITER.to_string())
}

/// Decode a path string back into its ordered ancestor codes.
pub fn decode(path: &str) -> Vec<PlaceCode> {
    if path.is_empty() {
        return Vec::new();
    }
    path.replace(TREE_DELIMITER, &LABEL_DELIMITER.to_string())
        .split(TREE_SEPARATOR)
        .map(PlaceCode::from)
        .collect()
}
