use super::{
    plaintext::strip_tags,
    style::{ColorTable, StyleFrame, parse_style_attr},
    types::{Highlight, StyledRun},
    vocabulary::{TagKind, Vocabulary, parse_tag_at},
};

/// Parses one block fragment into styled runs.
///
/// The scan keeps a stack of immutable style frames seeded with one neutral
/// base frame. Recognized opening tags push a derived frame, closing tags
/// pop back down (never below the base), and plain text emits a run carrying
/// the current top frame. Tag-shaped constructs outside the vocabulary are
/// stripped; a bare `<` that is not tag-shaped stays literal text.
///
/// # Imbalance fallback
/// If the counts of recognized opening and closing tags disagree after the
/// scan, every run is discarded and the fragment is emitted as a single
/// unstyled run of its tag-stripped text. Mis-nested styling is worse than
/// no styling.
pub fn parse_inline(fragment: &str, vocab: &Vocabulary, colors: &ColorTable) -> Vec<StyledRun> {
    let mut stack: Vec<StyleFrame> = vec![StyleFrame::default()];
    let mut runs: Vec<StyledRun> = vec![];
    let mut buf = String::new();
    let mut opens = 0usize;
    let mut closes = 0usize;

    let mut i = 0;
    while i < fragment.len() {
        if fragment.as_bytes()[i] == b'<' {
            if let Some(tag) = parse_tag_at(fragment, i) {
                match vocab.resolve(tag.name) {
                    Some(kind) if kind.is_inline() => {
                        flush(&mut buf, &stack, &mut runs);
                        if tag.closing {
                            closes += 1;
                            if stack.len() > 1 {
                                stack.pop();
                            }
                        } else {
                            opens += 1;
                            let top = stack.last().cloned().unwrap_or_default();
                            stack.push(derive_frame(&top, kind, tag.attrs, colors));
                        }
                    }
                    // Unknown tags and block tags caught mid-fragment are
                    // stripped without affecting style or balance.
                    _ => {}
                }
                i += tag.len;
                continue;
            }
        }
        let Some(ch) = fragment[i..].chars().next() else {
            break;
        };
        buf.push(ch);
        i += ch.len_utf8();
    }
    flush(&mut buf, &stack, &mut runs);

    if opens != closes {
        let text = strip_tags(fragment);
        if text.is_empty() {
            return vec![];
        }
        return vec![StyledRun::plain(text)];
    }
    runs
}

/// Emits the buffered text as one run carrying the top-of-stack frame.
fn flush(buf: &mut String, stack: &[StyleFrame], runs: &mut Vec<StyledRun>) {
    if buf.is_empty() {
        return;
    }
    let text = html_escape::decode_html_entities(buf.as_str()).to_string();
    buf.clear();
    if text.is_empty() {
        return;
    }
    let frame = stack.last().cloned().unwrap_or_default();
    runs.push(StyledRun {
        text,
        bold: frame.bold,
        italic: frame.italic,
        underline: frame.underline,
        color: frame.color,
        highlight: frame.highlight,
    });
}

/// Derives the frame produced by opening `kind` on top of `base`.
fn derive_frame(base: &StyleFrame, kind: TagKind, attrs: &str, colors: &ColorTable) -> StyleFrame {
    let mut frame = base.clone();
    match kind {
        TagKind::Strong => frame.bold = true,
        TagKind::Emphasis => frame.italic = true,
        TagKind::Underline => frame.underline = true,
        // Counted for balance, no run formatting of its own.
        TagKind::Code => {}
        TagKind::Mark => {
            let style = parse_style_attr(attrs);
            frame.highlight = style
                .background
                .as_deref()
                .and_then(|bg| colors.resolve_highlight(bg))
                .or(Some(Highlight::Yellow));
            if let Some(color) = style.color.as_deref() {
                frame.color = colors.resolve_color(color);
            }
        }
        TagKind::Span => {
            let style = parse_style_attr(attrs);
            if let Some(color) = style.color.as_deref() {
                // Resolve once more defensively; stored markup may predate
                // the normalizer's contrast rewrite.
                frame.color = colors.resolve_color(color);
            }
            if let Some(h) = style
                .background
                .as_deref()
                .and_then(|bg| colors.resolve_highlight(bg))
            {
                frame.highlight = Some(h);
            }
            frame.bold |= style.bold;
            frame.italic |= style.italic;
            frame.underline |= style.underline;
        }
        _ => {}
    }
    frame
}
