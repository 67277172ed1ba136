//! Citation graph construction
//!
//! [`GraphBuilder`] turns the target author's paper records into a deduplicated
//! node set and a deduplicated set of directed edges:
//!
//! - one node per paper identifier, ids assigned sequentially from 0 in
//!   first-seen order;
//! - citation edges run from the citing paper to the cited paper, reference
//!   edges from the paper under consideration to the referenced paper;
//! - at most one edge per ordered (source, target) pair. A reciprocal pair is
//!   two distinct edges.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::classify::{CitationClass, CitationTally, CoAuthorSet, classify};
use crate::label::paper_label;
use crate::model::{PaperRecord, RelatedPaper};

/// RGBA color with integer channels and a fractional alpha
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Color constants for citation classes
pub mod colors {
    use super::Rgba;

    /// Self-citations and the target author's own papers
    pub const RED: Rgba = Rgba::opaque(255, 0, 0);

    /// Co-author citations
    pub const ORANGE: Rgba = Rgba::opaque(255, 155, 0);

    /// Other citations
    pub const GREEN: Rgba = Rgba::opaque(0, 255, 0);
}

impl CitationClass {
    /// Color used for nodes and edges of this class
    pub fn color(self) -> Rgba {
        match self {
            CitationClass::SelfCitation => colors::RED,
            CitationClass::CoAuthor => colors::ORANGE,
            CitationClass::Other => colors::GREEN,
        }
    }
}

/// Which references of the target's papers enter the graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceMode {
    /// No reference processing at all
    #[default]
    Ignore,
    /// Only self and co-author references
    RelevantOnly,
    /// Every reference regardless of classification
    All,
}

impl ReferenceMode {
    /// Whether a reference of the given class is registered
    pub fn admits(self, class: CitationClass) -> bool {
        match self {
            ReferenceMode::Ignore => false,
            ReferenceMode::RelevantOnly => class.is_relevant(),
            ReferenceMode::All => true,
        }
    }
}

/// How a related paper relates to the paper under consideration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// The related paper cites the current paper
    Citation,
    /// The current paper references the related paper
    Reference,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Citation => f.write_str("citation"),
            Relation::Reference => f.write_str("reference"),
        }
    }
}

/// A paper node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Sequential node id
    pub id: usize,

    /// Paper identifier this node stands for
    pub paper_id: String,

    /// Citation-key style label (see [`crate::label`])
    pub label: String,

    /// Citation count + 1 for the target's own papers, 1 otherwise
    pub size: usize,

    /// Fixed at creation
    pub color: Rgba,
}

/// A directed edge between two paper nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub id: usize,
    pub source: usize,
    pub target: usize,
    pub weight: u32,
    pub color: Rgba,
}

/// The finished graph, ready for export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitationGraph {
    /// Target author identifier
    pub author_id: String,

    /// Reference inclusion mode the graph was built with
    pub reference_mode: ReferenceMode,

    /// Nodes in id order
    pub nodes: Vec<GraphNode>,

    /// Edges in id order
    pub edges: Vec<GraphEdge>,

    /// Classified citation counts
    pub tally: CitationTally,
}

/// Errors raised while building the graph
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// A paper has neither authors nor a title, so no label can be built
    #[error("paper {0} has neither authors nor a title")]
    Unlabelled(String),

    /// A related paper has no identifier to deduplicate on
    #[error("{relation} of paper {paper_id} has no paperId (title: {title})")]
    MissingPaperId {
        relation: Relation,
        paper_id: String,
        title: String,
    },
}

/// Accumulates nodes, edges and citation tallies for one author
#[derive(Debug)]
pub struct GraphBuilder {
    author_id: String,
    co_authors: CoAuthorSet,
    reference_mode: ReferenceMode,
    node_ids: HashMap<String, usize>,
    nodes: Vec<GraphNode>,
    edge_pairs: HashSet<(usize, usize)>,
    edges: Vec<GraphEdge>,
    tally: CitationTally,
}

impl GraphBuilder {
    /// Create a builder for the given target author
    pub fn new(
        author_id: impl Into<String>,
        co_authors: CoAuthorSet,
        reference_mode: ReferenceMode,
    ) -> Self {
        Self {
            author_id: author_id.into(),
            co_authors,
            reference_mode,
            node_ids: HashMap::new(),
            nodes: Vec::new(),
            edge_pairs: HashSet::new(),
            edges: Vec::new(),
            tally: CitationTally::default(),
        }
    }

    /// Add one of the target author's own papers with its references and citations
    ///
    /// Creates the paper's node (red, sized by citation count) or refreshes the
    /// size of an existing one. References pass through the reference mode;
    /// citations are always registered and tallied. Returns the paper's node id.
    pub fn add_own_paper(
        &mut self,
        paper_id: &str,
        paper: &PaperRecord,
    ) -> Result<usize, GraphError> {
        let size = paper.citations.len() + 1;
        let node = match self.node_ids.get(paper_id) {
            Some(&existing) => {
                self.nodes[existing].size = size;
                existing
            }
            None => {
                let label = paper_label(&paper.authors, paper.year, paper.title.as_deref())
                    .ok_or_else(|| GraphError::Unlabelled(paper_id.to_string()))?;
                self.push_node(paper_id, label, size, colors::RED)
            }
        };

        let (nodes_before, edges_before) = (self.nodes.len(), self.edges.len());

        if self.reference_mode != ReferenceMode::Ignore {
            for reference in &paper.references {
                let class = self.classify(reference);
                if !self.reference_mode.admits(class) {
                    continue;
                }
                self.register_related_paper(node, reference, class, Relation::Reference)?;
            }
        }

        for citation in &paper.citations {
            let class = self.classify(citation);
            self.tally.record(class);
            self.register_related_paper(node, citation, class, Relation::Citation)?;
        }

        debug!(
            paper_id,
            node,
            size,
            new_nodes = self.nodes.len() - nodes_before,
            new_edges = self.edges.len() - edges_before,
            "added paper to graph"
        );

        Ok(node)
    }

    /// Classify a related paper against the target author and co-authors
    pub fn classify(&self, related: &RelatedPaper) -> CitationClass {
        classify(&related.authors, &self.co_authors, &self.author_id)
    }

    /// Register a related paper and its edge to the current paper
    ///
    /// An unseen paper gets the next node id, size 1, and the class color. A
    /// seen paper keeps its node untouched. The edge is created only if its
    /// ordered pair is new. Returns the related paper's node id.
    ///
    /// `current` must be a node id returned by this builder.
    pub fn register_related_paper(
        &mut self,
        current: usize,
        related: &RelatedPaper,
        class: CitationClass,
        relation: Relation,
    ) -> Result<usize, GraphError> {
        let Some(paper_id) = related.id() else {
            return Err(GraphError::MissingPaperId {
                relation,
                paper_id: self
                    .nodes
                    .get(current)
                    .map(|n| n.paper_id.clone())
                    .unwrap_or_default(),
                title: related.title.clone().unwrap_or_default(),
            });
        };
        let node = match self.node_ids.get(paper_id) {
            Some(&existing) => existing,
            None => {
                let label = paper_label(&related.authors, related.year, related.title.as_deref())
                    .ok_or_else(|| GraphError::Unlabelled(paper_id.to_string()))?;
                self.push_node(paper_id, label, 1, class.color())
            }
        };

        let (source, target) = match relation {
            Relation::Citation => (node, current),
            Relation::Reference => (current, node),
        };
        self.push_edge(source, target, class.color());

        Ok(node)
    }

    /// Node id assigned to a paper identifier, if seen
    pub fn node_id(&self, paper_id: &str) -> Option<usize> {
        self.node_ids.get(paper_id).copied()
    }

    /// Finish the build and hand over nodes, edges and tallies
    pub fn finalize(self) -> CitationGraph {
        CitationGraph {
            author_id: self.author_id,
            reference_mode: self.reference_mode,
            nodes: self.nodes,
            edges: self.edges,
            tally: self.tally,
        }
    }

    fn push_node(&mut self, paper_id: &str, label: String, size: usize, color: Rgba) -> usize {
        let id = self.nodes.len();
        self.node_ids.insert(paper_id.to_string(), id);
        self.nodes.push(GraphNode {
            id,
            paper_id: paper_id.to_string(),
            label,
            size,
            color,
        });
        id
    }

    fn push_edge(&mut self, source: usize, target: usize, color: Rgba) {
        if !self.edge_pairs.insert((source, target)) {
            return;
        }
        self.edges.push(GraphEdge {
            id: self.edges.len(),
            source,
            target,
            weight: 1,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AuthorRef;

    const TARGET: &str = "target";

    fn jane() -> AuthorRef {
        AuthorRef::new(TARGET, "Jane Doe")
    }

    fn ann() -> AuthorRef {
        AuthorRef::new("co1", "Ann Lee")
    }

    fn stranger(id: &str) -> AuthorRef {
        AuthorRef::new(id, format!("Max {id}"))
    }

    fn own_paper(id: &str, year: i32) -> PaperRecord {
        PaperRecord::new(id, vec![jane(), ann()], Some(year))
    }

    fn builder(papers: &[&PaperRecord], mode: ReferenceMode) -> GraphBuilder {
        let co_authors = CoAuthorSet::from_papers(TARGET, papers.iter().copied());
        GraphBuilder::new(TARGET, co_authors, mode)
    }

    fn assert_integrity(graph: &CitationGraph) {
        let mut pairs = HashSet::new();
        for (i, node) in graph.nodes.iter().enumerate() {
            assert_eq!(node.id, i);
        }
        for (i, edge) in graph.edges.iter().enumerate() {
            assert_eq!(edge.id, i);
            assert!(edge.source < graph.nodes.len());
            assert!(edge.target < graph.nodes.len());
            assert!(pairs.insert((edge.source, edge.target)), "duplicate edge");
        }
    }

    // ========== Single Paper Scenario ==========

    #[test]
    fn single_paper_with_co_author_and_other_citation() {
        let mut paper = PaperRecord::new("P", vec![AuthorRef::new(TARGET, "Jane Doe")], Some(2020));
        paper.citations = vec![
            RelatedPaper::new("c1", vec![ann()], Some(2021)),
            RelatedPaper::new("c2", vec![stranger("s1")], Some(2022)),
        ];

        // Ann is a co-author through another of the target's papers
        let other = own_paper("Q", 2019);
        let mut b = builder(&[&paper, &other], ReferenceMode::Ignore);
        b.add_own_paper("P", &paper).unwrap();
        let graph = b.finalize();

        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.nodes[0].label, "Doe (2020)");
        assert_eq!(graph.nodes[0].color, colors::RED);
        assert_eq!(graph.nodes[0].size, 3);
        assert_eq!(graph.nodes[1].color, colors::ORANGE);
        assert_eq!(graph.nodes[2].color, colors::GREEN);
        assert_eq!(graph.nodes[2].size, 1);

        assert_eq!(graph.edges.len(), 2);
        assert!(graph.edges.iter().all(|e| e.target == 0 && e.weight == 1));
        assert_eq!(graph.edges[0].color, colors::ORANGE);
        assert_eq!(graph.edges[1].color, colors::GREEN);

        assert_eq!(graph.tally.self_citations, 0);
        assert_eq!(graph.tally.co_author_citations, 1);
        assert_eq!(graph.tally.other_citations, 1);
        assert_integrity(&graph);
    }

    // ========== Node Identity ==========

    #[test]
    fn node_ids_follow_first_seen_order() {
        let mut p = own_paper("P", 2020);
        p.citations = vec![
            RelatedPaper::new("z", vec![stranger("s1")], Some(2021)),
            RelatedPaper::new("a", vec![stranger("s2")], Some(2021)),
        ];
        let mut q = own_paper("Q", 2021);
        q.citations = vec![RelatedPaper::new("m", vec![stranger("s3")], Some(2022))];

        let mut b = builder(&[&p, &q], ReferenceMode::Ignore);
        b.add_own_paper("P", &p).unwrap();
        b.add_own_paper("Q", &q).unwrap();

        assert_eq!(b.node_id("P"), Some(0));
        assert_eq!(b.node_id("z"), Some(1));
        assert_eq!(b.node_id("a"), Some(2));
        assert_eq!(b.node_id("Q"), Some(3));
        assert_eq!(b.node_id("m"), Some(4));
    }

    #[test]
    fn paper_seen_as_citation_and_reference_maps_to_one_node() {
        let shared = RelatedPaper::new("shared", vec![stranger("s1")], Some(2015));
        let mut p = own_paper("P", 2020);
        p.citations = vec![shared.clone()];
        let mut q = own_paper("Q", 2021);
        q.references = vec![shared];

        let mut b = builder(&[&p, &q], ReferenceMode::All);
        b.add_own_paper("P", &p).unwrap();
        b.add_own_paper("Q", &q).unwrap();
        let graph = b.finalize();

        let shared_nodes: Vec<_> = graph.nodes.iter().filter(|n| n.paper_id == "shared").collect();
        assert_eq!(shared_nodes.len(), 1);
        let shared_id = shared_nodes[0].id;
        // citation edge into P, reference edge out of Q
        assert!(graph.edges.iter().any(|e| e.source == shared_id && e.target == 0));
        assert!(graph.edges.iter().any(|e| e.source == 2 && e.target == shared_id));
        assert_integrity(&graph);
    }

    #[test]
    fn own_paper_size_refreshed_on_revisit() {
        // P is first discovered as a self-citation of Q, then processed itself
        let mut q = own_paper("Q", 2021);
        q.citations = vec![RelatedPaper::new("P", vec![jane()], Some(2022))];
        let mut p = own_paper("P", 2022);
        p.citations = vec![
            RelatedPaper::new("c1", vec![stranger("s1")], Some(2023)),
            RelatedPaper::new("c2", vec![stranger("s2")], Some(2023)),
        ];

        let mut b = builder(&[&q, &p], ReferenceMode::Ignore);
        b.add_own_paper("Q", &q).unwrap();
        let p_node = b.add_own_paper("P", &p).unwrap();
        let graph = b.finalize();

        assert_eq!(p_node, 1);
        assert_eq!(graph.nodes[1].size, 3);
        assert_eq!(graph.nodes[1].label, "Doe (2022)");
    }

    #[test]
    fn color_fixed_at_first_creation() {
        // "x" is first a green citation, later a co-author reference
        let mut p = own_paper("P", 2020);
        p.citations = vec![RelatedPaper::new("x", vec![stranger("s1")], Some(2021))];
        let mut q = own_paper("Q", 2022);
        q.references = vec![RelatedPaper::new("x", vec![ann()], Some(2021))];

        let mut b = builder(&[&p, &q], ReferenceMode::All);
        b.add_own_paper("P", &p).unwrap();
        b.add_own_paper("Q", &q).unwrap();
        let graph = b.finalize();

        let x = &graph.nodes[node_for(&graph, "x")];
        assert_eq!(x.color, colors::GREEN);
        assert_eq!(x.size, 1);
        // The new edge still carries its own classification
        let reference_edge = graph.edges.iter().find(|e| e.target == x.id).unwrap();
        assert_eq!(reference_edge.color, colors::ORANGE);
    }

    fn node_for(graph: &CitationGraph, paper_id: &str) -> usize {
        graph
            .nodes
            .iter()
            .find(|n| n.paper_id == paper_id)
            .map(|n| n.id)
            .expect("node should exist")
    }

    // ========== Edge Dedup ==========

    #[test]
    fn duplicate_citation_absorbed_but_tallied() {
        let citer = RelatedPaper::new("c1", vec![stranger("s1")], Some(2021));
        let mut p = own_paper("P", 2020);
        p.citations = vec![citer.clone(), citer];

        let mut b = builder(&[&p], ReferenceMode::Ignore);
        b.add_own_paper("P", &p).unwrap();
        let graph = b.finalize();

        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.tally.total(), 2);
        assert_eq!(graph.tally.other_citations, 2);
    }

    #[test]
    fn reciprocal_edges_are_distinct() {
        // P and Q cite each other
        let mut p = own_paper("P", 2020);
        p.citations = vec![RelatedPaper::new("Q", vec![jane()], Some(2021))];
        let mut q = own_paper("Q", 2021);
        q.citations = vec![RelatedPaper::new("P", vec![jane()], Some(2020))];

        let mut b = builder(&[&p, &q], ReferenceMode::Ignore);
        b.add_own_paper("P", &p).unwrap();
        b.add_own_paper("Q", &q).unwrap();
        let graph = b.finalize();

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 2);
        assert_eq!((graph.edges[0].source, graph.edges[0].target), (1, 0));
        assert_eq!((graph.edges[1].source, graph.edges[1].target), (0, 1));
        assert_eq!(graph.tally.self_citations, 2);
        assert_integrity(&graph);
    }

    #[test]
    fn reference_and_citation_in_same_direction_share_an_edge() {
        // Q references P, and P lists Q as a citation: both mean Q -> P
        let mut p = own_paper("P", 2020);
        p.citations = vec![RelatedPaper::new("Q", vec![jane()], Some(2021))];
        let mut q = own_paper("Q", 2021);
        q.references = vec![RelatedPaper::new("P", vec![jane()], Some(2020))];

        let mut b = builder(&[&p, &q], ReferenceMode::RelevantOnly);
        b.add_own_paper("P", &p).unwrap();
        b.add_own_paper("Q", &q).unwrap();
        let graph = b.finalize();

        assert_eq!(graph.edges.len(), 1);
        assert_integrity(&graph);
    }

    // ========== Reference Modes ==========

    fn paper_with_references() -> PaperRecord {
        let mut p = own_paper("P", 2020);
        p.references = vec![
            RelatedPaper::new("r-self", vec![jane()], Some(2010)),
            RelatedPaper::new("r-co", vec![ann(), stranger("s1")], Some(2011)),
            RelatedPaper::new("r-other", vec![stranger("s2")], Some(2012)),
        ];
        p
    }

    #[test]
    fn ignore_mode_skips_references() {
        let p = paper_with_references();
        let mut b = builder(&[&p], ReferenceMode::Ignore);
        b.add_own_paper("P", &p).unwrap();
        let graph = b.finalize();

        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn relevant_only_mode_drops_unrelated_references() {
        let p = paper_with_references();
        let mut b = builder(&[&p], ReferenceMode::RelevantOnly);
        b.add_own_paper("P", &p).unwrap();
        assert_eq!(b.node_id("r-other"), None);
        let graph = b.finalize();

        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.nodes[1].color, colors::RED);
        assert_eq!(graph.nodes[2].color, colors::ORANGE);
        assert_eq!(graph.nodes[2].label, "Lee & s1 (2011)");
        assert!(graph.edges.iter().all(|e| e.source == 0));
        // references are not tallied
        assert_eq!(graph.tally.total(), 0);
    }

    #[test]
    fn all_mode_registers_every_reference() {
        let p = paper_with_references();
        let mut b = builder(&[&p], ReferenceMode::All);
        b.add_own_paper("P", &p).unwrap();
        let graph = b.finalize();

        assert_eq!(graph.nodes.len(), 4);
        assert_eq!(graph.edges.len(), 3);
        assert_eq!(graph.nodes[3].color, colors::GREEN);
        assert_integrity(&graph);
    }

    #[test]
    fn reference_mode_admission() {
        assert!(!ReferenceMode::Ignore.admits(CitationClass::SelfCitation));
        assert!(ReferenceMode::RelevantOnly.admits(CitationClass::CoAuthor));
        assert!(!ReferenceMode::RelevantOnly.admits(CitationClass::Other));
        assert!(ReferenceMode::All.admits(CitationClass::Other));
    }

    // ========== Labels and Failures ==========

    #[test]
    fn authorless_reference_labelled_by_title() {
        let mut p = own_paper("P", 2020);
        p.references = vec![RelatedPaper::new("r1", vec![], Some(1990)).with_title("On Graphs")];

        let mut b = builder(&[&p], ReferenceMode::All);
        b.add_own_paper("P", &p).unwrap();
        let graph = b.finalize();

        assert_eq!(graph.nodes[1].label, "On Graphs");
    }

    #[test]
    fn authorless_untitled_reference_is_fatal() {
        let mut p = own_paper("P", 2020);
        p.references = vec![RelatedPaper::new("r1", vec![], Some(1990))];

        let mut b = builder(&[&p], ReferenceMode::All);
        let err = b.add_own_paper("P", &p).unwrap_err();
        assert_eq!(err, GraphError::Unlabelled("r1".to_string()));
    }

    fn unresolved_reference() -> RelatedPaper {
        RelatedPaper {
            paper_id: None,
            authors: vec![ann()],
            year: Some(2001),
            title: Some("Unresolved".to_string()),
        }
    }

    #[test]
    fn reference_without_id_is_fatal_when_registered() {
        let mut p = own_paper("P", 2020);
        p.references = vec![unresolved_reference()];

        let mut b = builder(&[&p], ReferenceMode::RelevantOnly);
        let err = b.add_own_paper("P", &p).unwrap_err();
        assert_eq!(
            err,
            GraphError::MissingPaperId {
                relation: Relation::Reference,
                paper_id: "P".to_string(),
                title: "Unresolved".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "reference of paper P has no paperId (title: Unresolved)"
        );
    }

    #[test]
    fn reference_without_id_skipped_when_not_admitted() {
        let mut unrelated = unresolved_reference();
        unrelated.authors = vec![stranger("s1")];
        let mut p = own_paper("P", 2020);
        p.references = vec![unrelated.clone()];

        let mut b = builder(&[&p], ReferenceMode::RelevantOnly);
        assert!(b.add_own_paper("P", &p).is_ok());

        p.references = vec![unresolved_reference(), unrelated];
        let mut b = builder(&[&p], ReferenceMode::Ignore);
        assert!(b.add_own_paper("P", &p).is_ok());
    }

    #[test]
    fn authorless_untitled_reference_skipped_when_references_ignored() {
        let mut p = own_paper("P", 2020);
        p.references = vec![RelatedPaper::new("r1", vec![], Some(1990))];

        let mut b = builder(&[&p], ReferenceMode::Ignore);
        assert!(b.add_own_paper("P", &p).is_ok());
    }

    #[test]
    fn class_colors_are_distinct() {
        assert_eq!(CitationClass::SelfCitation.color(), colors::RED);
        assert_eq!(CitationClass::CoAuthor.color(), colors::ORANGE);
        assert_eq!(CitationClass::Other.color(), colors::GREEN);
        assert_ne!(colors::RED, colors::GREEN);
    }
}
