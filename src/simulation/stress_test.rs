//! Random loan networks for stress testing and benchmarks.
//!
//! Generated graphs respect every invariant of [`LoanGraph`]: amounts are
//! positive with two decimal places, and no account lends to itself.

use crate::core::account::AccountId;
use crate::graph::loan_graph::LoanGraph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Configuration for generating a random loan network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Number of accounts in the network.
    pub party_count: usize,
    /// Average number of loans attempted per account.
    pub avg_loans_per_party: usize,
    /// Minimum loan amount.
    pub min_amount: Decimal,
    /// Maximum loan amount.
    pub max_amount: Decimal,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            party_count: 10,
            avg_loans_per_party: 3,
            min_amount: Decimal::from(1_000),
            max_amount: Decimal::from(10_000_000),
        }
    }
}

/// Generate a random loan network using the thread-local RNG.
pub fn generate_random_graph(config: &NetworkConfig) -> LoanGraph<AccountId> {
    generate_with_rng(config, &mut rand::thread_rng())
}

/// Generate a reproducible loan network from a seed.
pub fn generate_seeded_graph(config: &NetworkConfig, seed: u64) -> LoanGraph<AccountId> {
    generate_with_rng(config, &mut StdRng::seed_from_u64(seed))
}

fn generate_with_rng(config: &NetworkConfig, rng: &mut impl Rng) -> LoanGraph<AccountId> {
    let mut graph = LoanGraph::new();
    let accounts: Vec<AccountId> = (0..config.party_count)
        .map(|i| AccountId::new(format!("ACCT-{:03}", i)))
        .collect();
    for account in &accounts {
        graph.insert_vertex(account.clone());
    }
    if accounts.len() < 2 {
        return graph;
    }

    let min_cents = to_cents(config.min_amount).max(1);
    let max_cents = to_cents(config.max_amount).max(min_cents);
    let total_loans = config.party_count * config.avg_loans_per_party;

    for _ in 0..total_loans {
        let lender_idx = rng.gen_range(0..accounts.len());
        let mut borrower_idx = rng.gen_range(0..accounts.len());
        while borrower_idx == lender_idx {
            borrower_idx = rng.gen_range(0..accounts.len());
        }
        let amount = Decimal::new(rng.gen_range(min_cents..=max_cents), 2);
        graph.insert_edge(
            accounts[lender_idx].clone(),
            accounts[borrower_idx].clone(),
            amount,
        );
    }

    graph
}

fn to_cents(amount: Decimal) -> i64 {
    (amount * Decimal::from(100))
        .trunc()
        .to_i64()
        .unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_graph_generation() {
        let config = NetworkConfig {
            party_count: 5,
            avg_loans_per_party: 3,
            ..Default::default()
        };

        let graph = generate_random_graph(&config);
        assert_eq!(graph.vertex_count(), 5);
        assert!(graph.edge_count() >= 1);
        assert!(graph.edge_count() <= config.party_count * config.avg_loans_per_party);
        for loan in graph.loans() {
            assert!(loan.amount() >= config.min_amount);
            assert!(loan.amount() <= config.max_amount);
        }
    }

    #[test]
    fn test_seeded_graph_is_reproducible() {
        let config = NetworkConfig::default();
        assert_eq!(
            generate_seeded_graph(&config, 42),
            generate_seeded_graph(&config, 42)
        );
    }

    #[test]
    fn test_random_graph_netting() {
        let config = NetworkConfig {
            party_count: 20,
            avg_loans_per_party: 5,
            ..Default::default()
        };

        let mut graph = generate_seeded_graph(&config, 7);
        let before = graph.net_positions();
        let report = graph.reduce_all();

        assert_eq!(graph.net_positions(), before);
        assert!(report.gross_after() <= report.gross_before());
    }

    #[test]
    fn test_single_party_has_no_loans() {
        let config = NetworkConfig {
            party_count: 1,
            ..Default::default()
        };
        let graph = generate_random_graph(&config);
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }
}
