//! Drug-name canonicalization.
//!
//! Two forms exist. [`normalize_name`] is the comparison key used wherever
//! pair identity matters (interaction sources, co-exposure pairs).
//! [`canonical_drug`] only drops the dosage tail of an exposure description
//! and keeps the original casing for display.

use std::sync::LazyLock;

use regex::Regex;

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("bracket pattern is valid"));
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s\-+]").expect("character class is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Normalizes a free-text drug name.
///
/// Lowercases, removes bracketed annotations, turns every character other
/// than `a-z`, `0-9`, whitespace, `-` and `+` into a space, collapses
/// whitespace runs and trims. Missing input yields the empty string.
///
/// The result is a fixed point: normalizing it again returns it unchanged.
///
/// # Examples
///
/// ```
/// use pvl_transform::normalize_name;
///
/// assert_eq!(normalize_name(Some("Warfarin Sodium [Coumadin]")), "warfarin sodium");
/// assert_eq!(normalize_name(Some("  Co-Trimoxazole/TMP ")), "co-trimoxazole tmp");
/// assert_eq!(normalize_name(None), "");
/// ```
pub fn normalize_name(name: Option<&str>) -> String {
    let Some(name) = name else {
        return String::new();
    };
    let lowered = name.to_lowercase();
    let unbracketed = BRACKETED.replace_all(&lowered, "");
    let cleaned = DISALLOWED.replace_all(&unbracketed, " ");
    WHITESPACE.replace_all(&cleaned, " ").trim().to_string()
}

/// Truncates an exposure description at its first digit.
///
/// `"Acetaminophen 325 MG Oral Tablet"` becomes `"Acetaminophen"`. Inner
/// whitespace runs collapse to one space; missing input yields `""`.
pub fn canonical_drug(description: Option<&str>) -> String {
    let Some(description) = description else {
        return String::new();
    };
    let head = description
        .split(|ch: char| ch.is_ascii_digit())
        .next()
        .unwrap_or_default();
    head.split_whitespace().collect::<Vec<_>>().join(" ")
}
