//! Writer trait and output format dispatch
//!
//! Writers serialize a finished [`CitationGraph`] to a file. The
//! [`FormatRegistry`] maps a format id (e.g., "gexf") to its writer.

use std::path::Path;

use thiserror::Error;

use crate::gexf_writer::GexfWriter;
use crate::graph::CitationGraph;
use crate::graph_json_writer::GraphJsonWriter;

/// Errors that can occur while writing a graph
#[derive(Error, Debug)]
pub enum IoError {
    /// The output format is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A rendering/writing error occurred
    #[error("write error: {0}")]
    Write(String),
}

/// Result type for writer operations
pub type IoResult<T> = Result<T, IoError>;

/// A writer outputs a citation graph in a specific format
pub trait Writer {
    /// Write the graph to the output path
    fn write(&self, graph: &CitationGraph, output: &Path) -> IoResult<()>;

    /// Identifier for this output format (e.g., "gexf", "graph-json")
    fn format_id(&self) -> &str;
}

/// Registry of available writers
pub struct FormatRegistry {
    writers: Vec<Box<dyn Writer>>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            writers: Vec::new(),
        }
    }

    /// Create a registry with all default writers registered
    ///
    /// Currently registers `GexfWriter` (gexf) and `GraphJsonWriter` (graph-json).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_writer(Box::new(GexfWriter::new()));
        registry.register_writer(Box::new(GraphJsonWriter::new()));
        registry
    }

    /// Register a writer
    pub fn register_writer(&mut self, writer: Box<dyn Writer>) {
        self.writers.push(writer);
    }

    /// Find a writer by format ID
    pub fn writer_for_format(&self, format_id: &str) -> IoResult<&dyn Writer> {
        self.writers
            .iter()
            .find(|w| w.format_id().eq_ignore_ascii_case(format_id))
            .map(|w| w.as_ref())
            .ok_or_else(|| IoError::UnsupportedFormat(format_id.to_string()))
    }
}
