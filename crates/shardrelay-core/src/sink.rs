//! The downstream sink seam.
//!
//! The consumer hands ownership of each document to a `DocumentSink` in
//! emission order; delivery and retry are the sink's own concern.

use crate::document::CanonicalDocument;
use crate::error::SinkError;
use std::io::Write;

/// Receives canonical documents one at a time, in emission order.
pub trait DocumentSink {
    fn ship(&mut self, doc: CanonicalDocument) -> Result<(), SinkError>;
}

/// Collects documents in memory. Used by tests and short-lived callers.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub documents: Vec<CanonicalDocument>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentSink for MemorySink {
    fn ship(&mut self, doc: CanonicalDocument) -> Result<(), SinkError> {
        self.documents.push(doc);
        Ok(())
    }
}

/// Writes one JSON document per line to the wrapped writer.
pub struct NdjsonSink<W: Write> {
    writer: W,
}

impl<W: Write> NdjsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DocumentSink for NdjsonSink<W> {
    fn ship(&mut self, doc: CanonicalDocument) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, &doc)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
