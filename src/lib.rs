//! # debt-graph
//!
//! Directed loan graph with debt aggregation and circular debt netting.
//!
//! An edge `(u, v, w)` means `u` has lent `w` to `v`. The engine stores
//! these loans, aggregates debt and credit per vertex or across the
//! boundary of an induced subgraph, and cancels circular obligations
//! without changing anyone's net position.
//!
//! ## Architecture
//!
//! - **core**: foundational types (accounts, loans, ledger, errors)
//! - **graph**: Loan graph, cycle search, strongly connected clusters
//! - **optimization**: Netting engine (cycle and boundary-circuit cancellation)
//! - **simulation**: Random loan networks for stress testing

pub mod core;
pub mod graph;
pub mod optimization;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::account::AccountId;
    pub use crate::core::error::GraphError;
    pub use crate::core::ledger::Ledger;
    pub use crate::core::loan::Loan;
    pub use crate::graph::cycle_search::{find_boundary_circuit, find_cycle, Circuit};
    pub use crate::graph::loan_graph::LoanGraph;
    pub use crate::graph::scc::{find_clusters, DebtCluster};
    pub use crate::optimization::netting::{Cancellation, NettingEngine, NettingReport};
}
