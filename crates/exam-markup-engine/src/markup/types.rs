use serde::Serialize;

/// A highlight token the word-processor renderer supports.
///
/// Backgrounds requested in markup are resolved onto this small enumerated
/// set; anything unresolvable renders with no highlight at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Highlight {
    Yellow,
    LightBlue,
    LightGray,
    LightGreen,
}

impl Highlight {
    /// The token as the word-processor highlight attribute expects it.
    pub fn as_str(self) -> &'static str {
        match self {
            Highlight::Yellow => "yellow",
            Highlight::LightBlue => "lightBlue",
            Highlight::LightGray => "lightGray",
            Highlight::LightGreen => "lightGreen",
        }
    }

    /// Parses a highlight name as used in configuration files.
    pub fn from_name(name: &str) -> Option<Highlight> {
        match name.to_ascii_lowercase().as_str() {
            "yellow" => Some(Highlight::Yellow),
            "lightblue" => Some(Highlight::LightBlue),
            "lightgray" | "lightgrey" => Some(Highlight::LightGray),
            "lightgreen" => Some(Highlight::LightGreen),
            _ => None,
        }
    }
}

/// Marker prefix of a rendered list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListMarker {
    /// Unordered item, rendered with a bullet glyph.
    Bullet,
    /// Ordered item with its 1-based ordinal. Ordinals are assigned by the
    /// renderer per list block, regardless of any numbering in the source.
    Number(u32),
}

/// A contiguous span of text sharing one style frame.
///
/// Leaf unit of rendered output; immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// Resolved six-digit uppercase hex without the leading `#`, or `None`
    /// for the document default color.
    pub color: Option<String>,
    pub highlight: Option<Highlight>,
}

impl StyledRun {
    /// A run carrying no formatting at all.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            underline: false,
            color: None,
            highlight: None,
        }
    }
}

/// A top-level structural unit of rendered output, in document order.
///
/// Ownership transfers to the document builder, which lays these into a
/// target page or section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BlockElement {
    Paragraph { runs: Vec<StyledRun> },
    ListItem { marker: ListMarker, runs: Vec<StyledRun> },
    Quote { runs: Vec<StyledRun> },
}

impl BlockElement {
    /// The styled runs of this block, whatever its kind.
    pub fn runs(&self) -> &[StyledRun] {
        match self {
            BlockElement::Paragraph { runs } => runs,
            BlockElement::ListItem { runs, .. } => runs,
            BlockElement::Quote { runs } => runs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_run_has_no_formatting() {
        let run = StyledRun::plain("hello");
        assert_eq!(run.text, "hello");
        assert!(!run.bold && !run.italic && !run.underline);
        assert!(run.color.is_none());
        assert!(run.highlight.is_none());
    }

    #[test]
    fn highlight_names_round_trip() {
        for h in [
            Highlight::Yellow,
            Highlight::LightBlue,
            Highlight::LightGray,
            Highlight::LightGreen,
        ] {
            assert_eq!(Highlight::from_name(h.as_str()), Some(h));
        }
    }

    #[test]
    fn unknown_highlight_name_is_none() {
        assert_eq!(Highlight::from_name("magenta"), None);
    }
}
