//! citegraph - build a directed citation graph for a scholarly author.
//!
//! The author's papers are fetched with their citations (and optionally
//! references), every relationship is classified as a self, co-author or
//! other citation, and the result is exported as a colored GEXF graph.

pub mod classify;
pub mod cli;
pub mod gexf_writer;
pub mod graph;
pub mod graph_json_writer;
pub mod io;
pub mod label;
pub mod model;
pub mod pipeline;
pub mod source;
