//! Citation classification
//!
//! Classifies a related paper's relationship to the target author as a
//! self-citation, a co-author citation, or an other-citation.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{AuthorRef, PaperRecord};

/// Three-way relationship between a related paper and the target author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationClass {
    /// The target author is among the related paper's authors
    SelfCitation,
    /// No author is the target, but at least one is a known co-author
    CoAuthor,
    Other,
}

impl CitationClass {
    /// Self and co-author relationships are "relevant"
    pub fn is_relevant(self) -> bool {
        matches!(self, CitationClass::SelfCitation | CitationClass::CoAuthor)
    }
}

/// Co-authors of the target author, keyed by author identifier
///
/// Built once from the target's own papers and read-only afterwards. The
/// target's own identifier is never a member.
#[derive(Debug, Clone, Default)]
pub struct CoAuthorSet {
    authors: IndexMap<String, String>,
}

impl CoAuthorSet {
    /// Collect co-authors from the target author's own paper records
    ///
    /// Authors without an identifier are skipped. The first display name seen
    /// for an identifier is kept.
    pub fn from_papers<'a>(
        target_author_id: &str,
        papers: impl IntoIterator<Item = &'a PaperRecord>,
    ) -> Self {
        let mut set = Self::default();
        for paper in papers {
            for author in &paper.authors {
                if let Some(id) = author.author_id.as_deref() {
                    if id != target_author_id {
                        set.insert(id, &author.name);
                    }
                }
            }
        }
        set
    }

    fn insert(&mut self, author_id: &str, name: &str) {
        if !self.authors.contains_key(author_id) {
            self.authors.insert(author_id.to_string(), name.to_string());
        }
    }

    pub fn contains(&self, author_id: &str) -> bool {
        self.authors.contains_key(author_id)
    }

    /// Co-author ids and display names, in first-seen order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.authors
            .iter()
            .map(|(id, name)| (id.as_str(), name.as_str()))
    }
}

/// Classify a related paper from its author list
///
/// Self takes precedence over co-author. Authors without an identifier do not
/// count toward either class.
pub fn classify(
    authors: &[AuthorRef],
    co_authors: &CoAuthorSet,
    target_author_id: &str,
) -> CitationClass {
    let mut co_author_seen = false;
    for id in authors.iter().filter_map(|a| a.author_id.as_deref()) {
        if id == target_author_id {
            return CitationClass::SelfCitation;
        }
        if co_authors.contains(id) {
            co_author_seen = true;
        }
    }

    if co_author_seen {
        CitationClass::CoAuthor
    } else {
        CitationClass::Other
    }
}

/// Running count of classified citation relationships
///
/// Counts every citation examined, including ones whose edge is later
/// absorbed as a duplicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CitationTally {
    pub self_citations: usize,
    pub co_author_citations: usize,
    pub other_citations: usize,
}

impl CitationTally {
    pub fn record(&mut self, class: CitationClass) {
        match class {
            CitationClass::SelfCitation => self.self_citations += 1,
            CitationClass::CoAuthor => self.co_author_citations += 1,
            CitationClass::Other => self.other_citations += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.self_citations + self.co_author_citations + self.other_citations
    }
}
