//! Typed records returned by the author and paper fetchers
//!
//! These mirror the subset of the Semantic Scholar v1 payloads that the graph
//! builder consumes. Optional fields are modelled as `Option` and checked once
//! at the fetcher boundary (see [`PaperRecord::validate`]).

use serde::{Deserialize, Serialize};

/// An author as it appears on a paper's author list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRef {
    /// Author identifier; absent for authors the service could not resolve
    #[serde(default)]
    pub author_id: Option<String>,
    /// Full display name (e.g., "Jane Q. Doe")
    pub name: String,
}

impl AuthorRef {
    /// Create an author reference with a known identifier
    pub fn new(author_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            author_id: Some(author_id.into()),
            name: name.into(),
        }
    }

    /// Create an author reference without an identifier
    pub fn anonymous(name: impl Into<String>) -> Self {
        Self {
            author_id: None,
            name: name.into(),
        }
    }
}

/// One entry of an author's publication list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPaper {
    pub paper_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

/// An author record: name plus the author's dated papers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRecord {
    #[serde(default)]
    pub author_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub papers: Vec<AuthorPaper>,
}

/// A paper that cites, or is referenced by, a paper under consideration
///
/// References and citations share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedPaper {
    /// Dedup key for graph nodes; required
    #[serde(default)]
    pub paper_id: Option<String>,
    #[serde(default)]
    pub authors: Vec<AuthorRef>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
}

impl RelatedPaper {
    /// Create a related paper with the given id, authors and year
    pub fn new(paper_id: impl Into<String>, authors: Vec<AuthorRef>, year: Option<i32>) -> Self {
        Self {
            paper_id: Some(paper_id.into()),
            authors,
            year,
            title: None,
        }
    }

    /// Set the title (builder style)
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The paper identifier, unless missing or empty
    pub fn id(&self) -> Option<&str> {
        self.paper_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// A full paper record: authors, year, references and citations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperRecord {
    #[serde(default)]
    pub paper_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<AuthorRef>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub references: Vec<RelatedPaper>,
    #[serde(default)]
    pub citations: Vec<RelatedPaper>,
}

impl PaperRecord {
    /// Create an empty paper record
    pub fn new(paper_id: impl Into<String>, authors: Vec<AuthorRef>, year: Option<i32>) -> Self {
        Self {
            paper_id: Some(paper_id.into()),
            title: None,
            authors,
            year,
            references: Vec::new(),
            citations: Vec::new(),
        }
    }

    /// Check the record is usable by the graph builder
    ///
    /// Every citation must carry a paper identifier; the message names the
    /// first offending entry. References are checked only when the graph
    /// builder registers them, since most runs never look at them.
    pub fn validate(&self) -> Result<(), String> {
        match self
            .citations
            .iter()
            .enumerate()
            .find(|(_, c)| c.id().is_none())
        {
            Some((index, citation)) => Err(format!(
                "citation #{}{} has no paperId",
                index,
                citation
                    .title
                    .as_deref()
                    .map(|t| format!(" ({t})"))
                    .unwrap_or_default()
            )),
            None => Ok(()),
        }
    }
}
