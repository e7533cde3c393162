//! The boundary between rendered block elements and an actual document.
//!
//! The engine does not know how to serialize a word-processor file; it
//! hands ordered blocks to a [`DocumentSink`] and the exporter owns the
//! rest, including its own failure reporting. [`PlainTextSink`] is the
//! reference implementation, producing the flat text column of the
//! delimited export format.

use crate::markup::types::{BlockElement, ListMarker, StyledRun};

/// Receiver for rendered blocks, implemented by document exporters.
///
/// Methods are infallible on purpose: a sink accumulates content, and
/// whatever serialization it does afterwards fails in its own error domain,
/// not the engine's.
pub trait DocumentSink {
    fn paragraph(&mut self, runs: &[StyledRun]);
    fn list_item(&mut self, marker: &ListMarker, runs: &[StyledRun]);
    fn quote(&mut self, runs: &[StyledRun]);
}

/// Drives a sink over rendered blocks in document order.
pub fn write_blocks(sink: &mut dyn DocumentSink, blocks: &[BlockElement]) {
    for block in blocks {
        match block {
            BlockElement::Paragraph { runs } => sink.paragraph(runs),
            BlockElement::ListItem { marker, runs } => sink.list_item(marker, runs),
            BlockElement::Quote { runs } => sink.quote(runs),
        }
    }
}

/// Sink that flattens blocks to plain text, one line per block.
///
/// Used for the delimited export column, where styling cannot be carried
/// and only the readable text matters.
#[derive(Debug, Default)]
pub struct PlainTextSink {
    out: String,
}

impl PlainTextSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out.trim_end().to_string()
    }

    fn push_line(&mut self, prefix: &str, runs: &[StyledRun]) {
        self.out.push_str(prefix);
        for run in runs {
            self.out.push_str(&run.text);
        }
        self.out.push('\n');
    }
}

impl DocumentSink for PlainTextSink {
    fn paragraph(&mut self, runs: &[StyledRun]) {
        self.push_line("", runs);
    }

    fn list_item(&mut self, marker: &ListMarker, runs: &[StyledRun]) {
        match marker {
            ListMarker::Bullet => self.push_line("• ", runs),
            ListMarker::Number(n) => self.push_line(&format!("{n}. "), runs),
        }
    }

    fn quote(&mut self, runs: &[StyledRun]) {
        self.push_line("> ", runs);
    }
}
