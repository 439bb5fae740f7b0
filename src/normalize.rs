//! Line normalization for equality and similarity comparisons.

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading ordinal: "12. ", "3) ", "4: ", "5- " at the start of a line.
static LEADING_ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.):-]\s*").unwrap());

/// Canonicalize a line: trim, optionally strip one leading ordinal,
/// lowercase. Pure and total - two lines differing only by case or a
/// leading track number normalize to the same string.
pub fn normalize(line: &str, strip_leading_number: bool) -> String {
    let trimmed = line.trim();
    if strip_leading_number {
        LEADING_ORDINAL.replace(trimmed, "").to_lowercase()
    } else {
        trimmed.to_lowercase()
    }
}
