use super::{
    MarkupOptions,
    blocks::{BlockFragment, split_fragments},
    inline::parse_inline,
    types::{BlockElement, ListMarker},
};

/// Renders semantic markup into an ordered sequence of block elements.
///
/// Total for any string input: malformed markup degrades through the
/// tolerant splitter and the inline imbalance fallback, and never errors.
/// Empty or whitespace input yields an empty sequence, which callers treat
/// as "no feedback", not as a failure. Deterministic: identical input
/// yields structurally identical output.
pub fn render(markup: &str) -> Vec<BlockElement> {
    render_with(markup, &MarkupOptions::default())
}

/// [`render`] with an explicit vocabulary and color table.
pub fn render_with(markup: &str, options: &MarkupOptions) -> Vec<BlockElement> {
    if markup.trim().is_empty() {
        return vec![];
    }

    let mut out = vec![];
    for fragment in split_fragments(markup) {
        match fragment {
            BlockFragment::Paragraph(text) => {
                let runs = parse_inline(&text, &options.vocabulary, &options.colors);
                if !runs.is_empty() {
                    out.push(BlockElement::Paragraph { runs });
                }
            }
            BlockFragment::Quote(text) => {
                let runs = parse_inline(&text, &options.vocabulary, &options.colors);
                if !runs.is_empty() {
                    out.push(BlockElement::Quote { runs });
                }
            }
            BlockFragment::List { ordered, items } => {
                // Ordinals restart per list block and ignore any numbering
                // present in the item text itself.
                let mut ordinal = 0u32;
                for item in items {
                    let runs = parse_inline(&item, &options.vocabulary, &options.colors);
                    if runs.is_empty() {
                        continue;
                    }
                    let marker = if ordered {
                        ordinal += 1;
                        ListMarker::Number(ordinal)
                    } else {
                        ListMarker::Bullet
                    };
                    out.push(BlockElement::ListItem { marker, runs });
                }
            }
        }
    }
    out
}
