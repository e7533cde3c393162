pub mod enrich;
pub mod export;
pub mod markup;

// Re-export key types for easier usage
pub use enrich::{AnnotationEnricher, EnrichmentError, EnrichmentItem, EnrichmentOutcome};
pub use export::{DocumentSink, PlainTextSink, write_blocks};
pub use markup::{
    BlockElement, ColorTable, Highlight, ListMarker, MarkupOptions, StyledRun, TagKind,
    Vocabulary, contains_markup, normalize, normalize_with, plain_text, render, render_with,
    strip_tags,
};
