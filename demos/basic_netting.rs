//! Basic circular debt netting example.
//!
//! Demonstrates how reducing a vertex cancels the loans that circle back
//! to it without changing anyone's net position.
//!
//! Run with `RUST_LOG=debug` to see each cancellation.

use debt_graph::prelude::*;
use rust_decimal_macros::dec;

fn main() {
    env_logger::init();

    println!("╔══════════════════════════════════════╗");
    println!("║  debt-graph: Basic Netting Example   ║");
    println!("╚══════════════════════════════════════╝\n");

    // --- Scenario 1: Two parties lending to each other ---
    println!("━━━ Scenario 1: Bilateral Loans ━━━\n");

    let alice = AccountId::new("ALICE");
    let bob = AccountId::new("BOB");
    let mut graph = LoanGraph::new();
    graph.insert_edge(alice.clone(), bob.clone(), dec!(10));
    graph.insert_edge(bob.clone(), alice.clone(), dec!(4));

    println!("Before:\n{}", graph);
    let report = graph.reduce(&alice);
    println!("After:\n{}", graph);
    println!("{}", report);
    println!("  ALICE net: {}", graph.net_position(&alice));
    println!("  BOB net:   {}\n", graph.net_position(&bob));

    // --- Scenario 2: A longer chain with a shared leg ---
    println!("━━━ Scenario 2: Overlapping Cycles ━━━\n");

    let mut graph = LoanGraph::from_loans([
        Loan::new(AccountId::new("A"), AccountId::new("B"), dec!(100)),
        Loan::new(AccountId::new("B"), AccountId::new("C"), dec!(30)),
        Loan::new(AccountId::new("C"), AccountId::new("A"), dec!(30)),
        Loan::new(AccountId::new("B"), AccountId::new("D"), dec!(50)),
        Loan::new(AccountId::new("D"), AccountId::new("A"), dec!(20)),
    ]);
    let before = graph.net_positions();

    println!("Before:\n{}", graph);
    let report = graph.reduce_all();
    println!("After:\n{}", graph);
    println!("{}", report);
    println!(
        "Net positions unchanged: {}",
        graph.net_positions() == before
    );
}
