/// Strips invisible characters left by scraped pages and collapses whitespace.
pub(crate) fn normalize_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\u{a0}'], " ");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased form used for keyword comparisons.
pub(crate) fn normalize_keyword(value: &str) -> String {
    normalize_text(value).to_lowercase()
}
