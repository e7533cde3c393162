//! The feedback markup pipeline: normalization of raw annotation text into
//! canonical semantic markup, and tolerant rendering of that markup into
//! styled block elements for a document builder.
//!
//! Both entry points are pure functions over their inputs. No state is
//! kept between calls, no I/O happens inside, and malformed input degrades
//! to plain text instead of erroring.

pub mod blocks;
pub mod inline;
pub mod normalize;
pub mod plaintext;
pub mod render;
pub mod style;
pub mod types;
pub mod vocabulary;

pub use normalize::{normalize, normalize_with};
pub use plaintext::{plain_text, strip_tags};
pub use render::{render, render_with};
pub use style::{ColorTable, StyleFrame, resolve_color, resolve_highlight};
pub use types::{BlockElement, Highlight, ListMarker, StyledRun};
pub use vocabulary::{TagKind, Vocabulary, contains_markup};

/// Knobs for the pipeline. The defaults reproduce the fixed engine
/// behavior; configuration may override the color tables or restrict the
/// tag vocabulary.
#[derive(Debug, Clone, Default)]
pub struct MarkupOptions {
    pub vocabulary: Vocabulary,
    pub colors: ColorTable,
}
