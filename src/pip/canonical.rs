//! Canonical lookup keys for region identifiers.
//!
//! Codes, names and aliases are all folded to one key so that
//! "The United States", "united-states" and "UnitedStates" collide.

use regex::Regex;
use std::sync::LazyLock;

/// Stop words (whole words, any case) and separator characters removed
/// from identifiers before upper-casing.
static ID_FILTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:and|the|of|el|la|de)\b|[-_ .,'()&\[\]/]").expect("static regex")
});

/// An identifier that is nothing but a stop word is a code ("DE", "LA")
/// and is kept as is.
static BARE_STOP_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:and|the|of|el|la|de)$").expect("static regex"));

/// Normalize an identifying string into its canonical index key.
///
/// Empty input yields an empty key, which never matches anything. An input
/// consisting of a single stop word, or starting with `.` (ccTLDs such as
/// `.de`), is only upper-cased.
pub fn canonical_id(id: &str) -> String {
    if id.is_empty() {
        return String::new();
    }
    if id.starts_with('.') {
        return id.to_uppercase();
    }

    // Removing separators can join fragments into a new word ("o-f" -> "of"),
    // so filter until nothing changes or only a bare stop word is left.
    let mut current = id.to_string();
    loop {
        if BARE_STOP_WORD.is_match(&current) {
            break;
        }
        let next = ID_FILTER.replace_all(&current, "");
        if next == current {
            break;
        }
        current = next.into_owned();
    }
    current.to_uppercase()
}
