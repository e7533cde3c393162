use std::sync::LazyLock;

use regex::Regex;

static BLOCK_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p\s*>|<br\s*/?>").expect("split pattern is valid"));

static P_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<p[^>]*>").expect("p-open pattern is valid"));

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<li[^>]*>(.*?)</li\s*>").expect("li pattern is valid"));

static HAS_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:ul|ol|li)[^>]*>").expect("list pattern is valid"));

static ORDERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<ol[^>]*>").expect("ol pattern is valid"));

static LIST_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(?:ul|ol|li)[^>]*>").expect("list-tag pattern is valid"));

static QUOTE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?blockquote[^>]*>").expect("blockquote pattern is valid")
});

/// A block fragment classified by shape, before inline parsing.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum BlockFragment {
    Paragraph(String),
    /// One entry per `<li>…</li>` match, in source order.
    List { ordered: bool, items: Vec<String> },
    Quote(String),
}

/// Splits markup on block boundaries and classifies each fragment.
///
/// The splitter is tolerant by construction: paragraph ends and explicit
/// line breaks are plain separators, unmatched or partial block tags
/// degrade to paragraph content instead of erroring, and empty fragments
/// vanish here rather than becoming empty output blocks.
pub(crate) fn split_fragments(markup: &str) -> Vec<BlockFragment> {
    let mut out = vec![];
    for piece in BLOCK_SPLIT.split(markup) {
        let fragment = P_OPEN.replace_all(piece, "");
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }
        out.push(classify(fragment));
    }
    out
}

fn classify(fragment: &str) -> BlockFragment {
    if HAS_LIST.is_match(fragment) {
        let items: Vec<String> = LIST_ITEM
            .captures_iter(fragment)
            .map(|c| c[1].trim().to_string())
            .collect();
        if !items.is_empty() {
            let ordered = ORDERED.is_match(fragment);
            return BlockFragment::List { ordered, items };
        }
        // A partial list (e.g. an opener with no closed item) degrades to a
        // paragraph with the list tags stripped.
        return BlockFragment::Paragraph(LIST_TAGS.replace_all(fragment, "").trim().to_string());
    }

    if QUOTE_TAG.is_match(fragment) {
        return BlockFragment::Quote(QUOTE_TAG.replace_all(fragment, "").trim().to_string());
    }

    BlockFragment::Paragraph(fragment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_on_paragraph_ends_and_breaks() {
        let frags = split_fragments("<p>one</p><p>two</p>three<br/>four");
        assert_eq!(
            frags,
            vec![
                BlockFragment::Paragraph("one".into()),
                BlockFragment::Paragraph("two".into()),
                BlockFragment::Paragraph("three".into()),
                BlockFragment::Paragraph("four".into()),
            ]
        );
    }

    #[test]
    fn empty_fragments_are_dropped() {
        let frags = split_fragments("<p>one</p><p>  </p><br/><br/><p>two</p>");
        assert_eq!(frags.len(), 2);
    }

    #[test]
    fn extracts_list_items_in_source_order() {
        let frags = split_fragments("<ul><li>a</li><li>b</li></ul>");
        assert_eq!(
            frags,
            vec![BlockFragment::List {
                ordered: false,
                items: vec!["a".into(), "b".into()],
            }]
        );
    }

    #[test]
    fn ordered_list_is_flagged() {
        let frags = split_fragments("<ol><li>a</li></ol>");
        assert_eq!(
            frags,
            vec![BlockFragment::List {
                ordered: true,
                items: vec!["a".into()],
            }]
        );
    }

    #[test]
    fn partial_list_degrades_to_paragraph() {
        let frags = split_fragments("<ul><li>never closed");
        assert_eq!(frags, vec![BlockFragment::Paragraph("never closed".into())]);
    }

    #[test]
    fn blockquote_content_is_unwrapped() {
        let frags = split_fragments("<blockquote>art. 14 CE</blockquote>");
        assert_eq!(frags, vec![BlockFragment::Quote("art. 14 CE".into())]);
    }

    #[test]
    fn unmatched_quote_tag_still_unwraps() {
        let frags = split_fragments("<blockquote>dangling");
        assert_eq!(frags, vec![BlockFragment::Quote("dangling".into())]);
    }

    #[test]
    fn inline_markup_survives_splitting() {
        let frags = split_fragments("<p><strong>A</strong> B</p>");
        assert_eq!(
            frags,
            vec![BlockFragment::Paragraph("<strong>A</strong> B".into())]
        );
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(split_fragments("").is_empty());
        assert!(split_fragments("  \n ").is_empty());
    }
}
