//! Node label synthesis
//!
//! Labels follow citation-key style: `Doe (2020)`, `Doe & Lee (2020)`,
//! `Doe et al. (2020)`. Papers without authors fall back to their title.

use crate::model::AuthorRef;

/// Surname of a full name: the text after the last space, or the whole name
pub fn surname(full_name: &str) -> &str {
    full_name
        .rsplit_once(' ')
        .map_or(full_name, |(_, last)| last)
}

/// Build a display label for a paper
///
/// A missing year renders as empty parentheses. Returns `None` when the paper
/// has neither authors nor a title.
pub fn paper_label(
    authors: &[AuthorRef],
    year: Option<i32>,
    title: Option<&str>,
) -> Option<String> {
    let year = year.map(|y| y.to_string()).unwrap_or_default();

    match authors {
        [] => title.map(str::to_string),
        [only] => Some(format!("{} ({})", surname(&only.name), year)),
        [first, second] => Some(format!(
            "{} & {} ({})",
            surname(&first.name),
            surname(&second.name),
            year
        )),
        [first, ..] => Some(format!("{} et al. ({})", surname(&first.name), year)),
    }
}
