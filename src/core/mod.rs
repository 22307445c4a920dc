//! Foundational types shared by the graph and the netting engine.

pub mod account;
pub mod error;
pub mod ledger;
pub mod loan;
