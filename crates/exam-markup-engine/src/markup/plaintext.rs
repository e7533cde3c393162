use std::sync::LazyLock;

use regex::Regex;

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?[a-zA-Z][a-zA-Z0-9]*[^>]*>").expect("tag pattern is valid")
});

static BLOCK_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p\s*>|<br\s*/?>").expect("boundary pattern is valid"));

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Strips every tag-shaped construct and decodes entities, preserving the
/// text otherwise verbatim.
///
/// This is the imbalance-fallback extraction: when a fragment's tags cannot
/// be trusted, its readable text still can.
pub fn strip_tags(text: &str) -> String {
    let stripped = ANY_TAG.replace_all(text, "");
    html_escape::decode_html_entities(stripped.as_ref())
        .trim()
        .to_string()
}

/// Flattens markup to a single-line plain string for delimited exports.
///
/// Block boundaries become single spaces and whitespace runs collapse, so
/// the result fits one field of a delimited row.
pub fn plain_text(markup: &str) -> String {
    let with_breaks = BLOCK_BOUNDARY.replace_all(markup, " ");
    let stripped = strip_tags(&with_breaks);
    WHITESPACE_RUNS.replace_all(&stripped, " ").trim().to_string()
}
