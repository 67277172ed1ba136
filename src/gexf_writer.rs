//! GEXF Writer
//!
//! Writes a citation graph as a GEXF 1.2draft document with `viz` colors.

use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::graph::{CitationGraph, ReferenceMode, Rgba};
use crate::io::{IoResult, Writer};

const GEXF_NS: &str = "http://www.gexf.net/1.2draft";
const VIZ_NS: &str = "http://www.gexf.net/1.2draft/viz";

/// Value of the `<creator>` meta element
pub const CREATOR: &str = "citegraph";

/// Writer for Graph Exchange XML Format (.gexf) files
pub struct GexfWriter {
    date: Option<NaiveDate>,
}

impl GexfWriter {
    /// Create a GEXF writer stamping documents with today's date
    pub fn new() -> Self {
        Self { date: None }
    }

    /// Create a GEXF writer with a fixed `lastmodifieddate`
    pub fn with_date(date: NaiveDate) -> Self {
        Self { date: Some(date) }
    }

    /// Generate the GEXF document for a graph
    pub fn generate_gexf(graph: &CitationGraph, date: NaiveDate) -> String {
        let mut output = String::new();

        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        output.push_str(&format!(
            "<gexf xmlns=\"{}\" xmlns:viz=\"{}\" version=\"1.2\">\n",
            GEXF_NS, VIZ_NS
        ));

        output.push_str(&Self::generate_meta(graph, date));

        output.push_str("  <graph mode=\"static\" defaultedgetype=\"directed\">\n");
        output.push_str(&Self::generate_nodes(graph));
        output.push_str(&Self::generate_edges(graph));
        output.push_str("  </graph>\n");

        output.push_str("</gexf>\n");
        output
    }

    /// Human-readable description of what the graph contains
    pub fn description(graph: &CitationGraph) -> String {
        let references = match graph.reference_mode {
            ReferenceMode::Ignore => "does not include references.",
            ReferenceMode::RelevantOnly => "includes references to co-authors and self.",
            ReferenceMode::All => "includes all references.",
        };
        format!(
            "Citation graph for author {} that {}",
            graph.author_id, references
        )
    }

    fn generate_meta(graph: &CitationGraph, date: NaiveDate) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "  <meta lastmodifieddate=\"{}\">\n",
            date.format("%Y-%m-%d")
        ));
        output.push_str(&format!(
            "    <creator>{}</creator>\n",
            Self::escape_text(CREATOR)
        ));
        output.push_str(&format!(
            "    <description>{}</description>\n",
            Self::escape_text(&Self::description(graph))
        ));
        output.push_str("  </meta>\n");
        output
    }

    fn generate_nodes(graph: &CitationGraph) -> String {
        if graph.nodes.is_empty() {
            return "    <nodes />\n".to_string();
        }

        let mut output = String::from("    <nodes>\n");
        for node in &graph.nodes {
            output.push_str(&format!(
                "      <node id=\"{}\" label=\"{}\">\n",
                node.id,
                Self::escape_attr(&node.label)
            ));
            output.push_str(&Self::generate_color(&node.color));
            output.push_str("      </node>\n");
        }
        output.push_str("    </nodes>\n");
        output
    }

    fn generate_edges(graph: &CitationGraph) -> String {
        if graph.edges.is_empty() {
            return "    <edges />\n".to_string();
        }

        let mut output = String::from("    <edges>\n");
        for edge in &graph.edges {
            output.push_str(&format!(
                "      <edge id=\"{}\" source=\"{}\" target=\"{}\">\n",
                edge.id, edge.source, edge.target
            ));
            output.push_str(&Self::generate_color(&edge.color));
            output.push_str("      </edge>\n");
        }
        output.push_str("    </edges>\n");
        output
    }

    fn generate_color(color: &Rgba) -> String {
        format!(
            "        <viz:color r=\"{}\" g=\"{}\" b=\"{}\" a=\"{:.2}\" />\n",
            color.r, color.g, color.b, color.a
        )
    }

    /// Escape character data
    ///
    /// Characters XML 1.0 forbids are dropped.
    fn escape_text(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in s.chars().filter(|&c| is_xml_char(c)) {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                _ => out.push(c),
            }
        }
        out
    }

    /// Escape a double-quoted attribute value
    ///
    /// Tabs and line breaks become character references so attribute value
    /// normalization does not turn them into spaces.
    fn escape_attr(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in Self::escape_text(s).chars() {
            match c {
                '"' => out.push_str("&quot;"),
                '\n' => out.push_str("&#xA;"),
                '\r' => out.push_str("&#xD;"),
                '\t' => out.push_str("&#x9;"),
                _ => out.push(c),
            }
        }
        out
    }
}

/// `Char` production of XML 1.0
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

impl Default for GexfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for GexfWriter {
    fn write(&self, graph: &CitationGraph, output: &Path) -> IoResult<()> {
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let gexf = Self::generate_gexf(graph, date);
        fs::write(output, gexf)?;
        info!(
            path = %output.display(),
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "wrote GEXF graph"
        );
        Ok(())
    }

    fn format_id(&self) -> &str {
        "gexf"
    }
}
