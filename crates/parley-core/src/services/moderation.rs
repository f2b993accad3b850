//! Profanity filter applied to every piece of user text before it is stored.
//!
//! The whole text is lower-cased, then each denylisted term that stands as a
//! whole word is replaced with [`REPLACEMENT`]. Lower-casing everything keeps
//! the filter idempotent and matches what existing records already look like.

use once_cell::sync::Lazy;
use regex::Regex;

/// Written in place of every banned term.
pub const REPLACEMENT: &str = "*beep*";

/// Banned whole-word terms, English and Indonesian.
pub const BANNED_TERMS: &[&str] = &[
    "shit", "fuck", "anjing", "bangsat", "jancok", "cuk", "asu", "babi", "kampret", "tolol",
    "goblok", "bodoh",
];

static BANNED_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let alternation = BANNED_TERMS
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("Banned term pattern is valid")
});

/// Moderate `text`. Total and side-effect free; `""` maps to `""`.
pub fn filter(text: &str) -> String {
    let lowered = text.to_lowercase();
    BANNED_PATTERN
        .replace_all(&lowered, REPLACEMENT)
        .into_owned()
}
