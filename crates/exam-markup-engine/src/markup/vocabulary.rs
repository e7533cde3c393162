use std::collections::HashSet;

/// The fixed tag vocabulary recognized by the normalizer and renderer.
///
/// Anything outside this set is stripped by the tolerant scanners rather
/// than treated as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// `<strong>` / `<b>`
    Strong,
    /// `<em>` / `<i>`
    Emphasis,
    /// `<u>`
    Underline,
    /// `<mark>`, optionally carrying a background color
    Mark,
    /// `<code>`; counted for balance but carries no run formatting
    Code,
    /// `<span>` with `color` / `background-color` / `font-weight` /
    /// `text-decoration` style declarations
    Span,
    /// `<p>`
    Paragraph,
    /// `<br>` / `<br/>`
    LineBreak,
    /// `<ol>`
    OrderedList,
    /// `<ul>`
    UnorderedList,
    /// `<li>`
    ListItem,
    /// `<blockquote>`
    BlockQuote,
}

impl TagKind {
    pub const ALL: [TagKind; 12] = [
        TagKind::Strong,
        TagKind::Emphasis,
        TagKind::Underline,
        TagKind::Mark,
        TagKind::Code,
        TagKind::Span,
        TagKind::Paragraph,
        TagKind::LineBreak,
        TagKind::OrderedList,
        TagKind::UnorderedList,
        TagKind::ListItem,
        TagKind::BlockQuote,
    ];

    /// Resolves a tag name (case-insensitive) to its kind.
    pub fn from_name(name: &str) -> Option<TagKind> {
        match name.to_ascii_lowercase().as_str() {
            "strong" | "b" => Some(TagKind::Strong),
            "em" | "i" => Some(TagKind::Emphasis),
            "u" => Some(TagKind::Underline),
            "mark" => Some(TagKind::Mark),
            "code" => Some(TagKind::Code),
            "span" => Some(TagKind::Span),
            "p" => Some(TagKind::Paragraph),
            "br" => Some(TagKind::LineBreak),
            "ol" => Some(TagKind::OrderedList),
            "ul" => Some(TagKind::UnorderedList),
            "li" => Some(TagKind::ListItem),
            "blockquote" => Some(TagKind::BlockQuote),
            _ => None,
        }
    }

    /// True for tags that affect the style frame of an inline scan.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            TagKind::Strong
                | TagKind::Emphasis
                | TagKind::Underline
                | TagKind::Mark
                | TagKind::Code
                | TagKind::Span
        )
    }
}

/// The set of tags the scanners recognize.
///
/// Defaults to the full vocabulary; individual tags can be disabled through
/// configuration. A disabled tag is treated exactly like an unknown one.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    disabled: HashSet<TagKind>,
}

impl Vocabulary {
    pub fn disable(&mut self, tag: TagKind) {
        self.disabled.insert(tag);
    }

    pub fn without(mut self, tag: TagKind) -> Self {
        self.disable(tag);
        self
    }

    pub fn recognizes(&self, tag: TagKind) -> bool {
        !self.disabled.contains(&tag)
    }

    /// Resolves a tag name to a kind, honoring disabled tags.
    pub fn resolve(&self, name: &str) -> Option<TagKind> {
        TagKind::from_name(name).filter(|t| self.recognizes(*t))
    }
}

/// A tag-shaped construct found in the input, before vocabulary resolution.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct RawTag<'a> {
    pub name: &'a str,
    pub closing: bool,
    /// Raw text between the tag name and the closing `>` (attributes).
    pub attrs: &'a str,
    /// Total byte length of the construct, including both angle brackets.
    pub len: usize,
}

/// Tries to read a tag-shaped construct starting at byte offset `at`.
///
/// Returns `None` when the text at `at` is not shaped like a tag (no name,
/// or no closing `>`), in which case the caller treats the `<` as literal
/// text.
pub(crate) fn parse_tag_at(s: &str, at: usize) -> Option<RawTag<'_>> {
    let rest = &s.as_bytes()[at..];
    if rest.first() != Some(&b'<') {
        return None;
    }

    let mut i = 1;
    let closing = rest.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }

    let name_start = i;
    while rest.get(i).is_some_and(|b| b.is_ascii_alphanumeric()) {
        i += 1;
    }
    if i == name_start {
        return None;
    }
    let name_end = i;

    let gt = rest[i..].iter().position(|&b| b == b'>')? + i;
    let mut attrs_end = gt;
    // Tolerate self-closing syntax like <br/>
    if attrs_end > name_end && rest[attrs_end - 1] == b'/' {
        attrs_end -= 1;
    }

    Some(RawTag {
        name: &s[at + name_start..at + name_end],
        closing,
        attrs: s[at + name_end..at + attrs_end].trim(),
        len: gt + 1,
    })
}

/// Returns true when `text` contains at least one recognized tag.
///
/// Used to decide between the plain-prose path and the markup repair
/// pipeline in the normalizer.
pub fn contains_markup(text: &str, vocab: &Vocabulary) -> bool {
    let mut at = 0;
    while let Some(lt) = text[at..].find('<') {
        let pos = at + lt;
        if let Some(tag) = parse_tag_at(text, pos) {
            if vocab.resolve(tag.name).is_some() {
                return true;
            }
            at = pos + tag.len;
        } else {
            at = pos + 1;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_aliases() {
        assert_eq!(TagKind::from_name("b"), Some(TagKind::Strong));
        assert_eq!(TagKind::from_name("STRONG"), Some(TagKind::Strong));
        assert_eq!(TagKind::from_name("i"), Some(TagKind::Emphasis));
        assert_eq!(TagKind::from_name("div"), None);
    }

    #[test]
    fn parse_simple_tag() {
        let tag = parse_tag_at("<strong>", 0).unwrap();
        assert_eq!(tag.name, "strong");
        assert!(!tag.closing);
        assert_eq!(tag.attrs, "");
        assert_eq!(tag.len, 8);
    }

    #[test]
    fn parse_closing_tag() {
        let tag = parse_tag_at("x</em>y", 1).unwrap();
        assert_eq!(tag.name, "em");
        assert!(tag.closing);
        assert_eq!(tag.len, 5);
    }

    #[test]
    fn parse_tag_with_attributes() {
        let s = r#"<span style="color: #0066cc">"#;
        let tag = parse_tag_at(s, 0).unwrap();
        assert_eq!(tag.name, "span");
        assert_eq!(tag.attrs, r#"style="color: #0066cc""#);
    }

    #[test]
    fn parse_self_closing_tag() {
        let tag = parse_tag_at("<br/>", 0).unwrap();
        assert_eq!(tag.name, "br");
        assert_eq!(tag.attrs, "");
        assert_eq!(tag.len, 5);
    }

    #[test]
    fn bare_angle_bracket_is_not_a_tag() {
        assert!(parse_tag_at("a < b", 2).is_none());
        assert!(parse_tag_at("<", 0).is_none());
        assert!(parse_tag_at("<unclosed", 0).is_none());
    }

    #[test]
    fn detects_markup_only_for_recognized_tags() {
        let vocab = Vocabulary::default();
        assert!(contains_markup("has <strong>bold</strong>", &vocab));
        assert!(contains_markup("just a <br/> break", &vocab));
        assert!(!contains_markup("plain text, 2 < 3 and such", &vocab));
        assert!(!contains_markup("<div>unknown vocabulary</div>", &vocab));
    }

    #[test]
    fn disabled_tag_is_not_detected() {
        let vocab = Vocabulary::default().without(TagKind::Code);
        assert!(!contains_markup("see <code>art. 14</code>", &vocab));
        assert!(contains_markup("see <u>this</u>", &vocab));
    }
}
