//! Noun canonicalization for exception-table lookups.
//!
//! The exception table is keyed by a canonical form of the noun so that
//! "USA", "the USA" and "U.S.A." all land on the same entry. The pipeline is
//! deliberately small:
//!
//! ```text
//! raw ── trim ── strip one leading determiner ── drop ASCII punctuation
//!     ── collapse whitespace ── lowercase ──▶ key
//! ```
//!
//! Only a *single* leading determiner is removed: "the the bed" becomes
//! "the bed". The determiner may also be the whole input ("the"), in which
//! case the key is empty and callers must treat it as "no match".

/// Return the canonical lookup key for `raw`.
///
/// An empty return value means there is nothing to look up.
///
/// # Example
/// ```
/// use article_helper::normalize_noun;
///
/// assert_eq!(normalize_noun("  The  U.S.A. "), "usa");
/// assert_eq!(normalize_noun("the the bed"), "the bed");
/// assert_eq!(normalize_noun("the"), "");
/// ```
pub fn normalize_noun(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let without_determiner = strip_determiner(trimmed);
    let without_punctuation: String = without_determiner.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    let collapsed = regex!(r"\s+").replace_all(&without_punctuation, " ");

    collapsed.trim().to_lowercase()
}

/// Drop one leading "the"/"an"/"a" token, matched case-insensitively.
///
/// The token must be followed by whitespace or by the end of input; "another"
/// and "theory" are left alone.
fn strip_determiner(text: &str) -> &str {
    match regex!(r"(?i)^(?:the|an|a)(?:\s+|$)").find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}
