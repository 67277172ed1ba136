//! Graph JSON writer
//!
//! Serializes the citation graph as JSON. Unlike GEXF, the JSON form carries
//! node sizes, paper identifiers and the citation tally.

use std::path::Path;

use serde::Serialize;

use crate::gexf_writer::GexfWriter;
use crate::graph::CitationGraph;
use crate::io::{IoError, IoResult, Writer};

/// Top-level JSON document
#[derive(Debug, Serialize)]
pub struct GraphDocument<'a> {
    /// Version of the document format (for future compatibility)
    pub format_version: &'static str,

    pub description: String,

    #[serde(flatten)]
    pub graph: &'a CitationGraph,
}

impl<'a> GraphDocument<'a> {
    /// Format version constant
    pub const FORMAT_VERSION: &'static str = "1.0";

    pub fn new(graph: &'a CitationGraph) -> Self {
        Self {
            format_version: Self::FORMAT_VERSION,
            description: GexfWriter::description(graph),
            graph,
        }
    }
}

/// Writer that outputs the graph as pretty-printed JSON
pub struct GraphJsonWriter;

impl GraphJsonWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GraphJsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for GraphJsonWriter {
    fn write(&self, graph: &CitationGraph, output: &Path) -> IoResult<()> {
        let json = serde_json::to_string_pretty(&GraphDocument::new(graph))
            .map_err(|e| IoError::Write(format!("JSON serialization failed: {}", e)))?;

        std::fs::write(output, json).map_err(IoError::Io)?;

        Ok(())
    }

    fn format_id(&self) -> &str {
        "graph-json"
    }
}
