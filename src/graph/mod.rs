//! The loan graph, its cycle search and cluster analysis.

pub mod cycle_search;
pub mod loan_graph;
pub mod scc;
