//! Cooperative netting example.
//!
//! Two members of a cooperative owe each other through outside parties.
//! Extracting the cooperative as an induced subgraph shows its exposure
//! to the rest of the network, and netting it shortens the routes that
//! leave the cooperative and come back.

use debt_graph::graph::scc::find_clusters;
use debt_graph::prelude::*;
use rust_decimal_macros::dec;
use std::collections::BTreeSet;

fn main() {
    env_logger::init();

    println!("╔═══════════════════════════════════════════════╗");
    println!("║  debt-graph: Cooperative Boundary Netting     ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    let coop_a = AccountId::new("COOP-A");
    let coop_b = AccountId::new("COOP-B");
    let supplier = AccountId::new("SUPPLIER");
    let retailer = AccountId::new("RETAILER");

    let mut graph = LoanGraph::new();
    graph.insert_edge(coop_a.clone(), supplier.clone(), dec!(500));
    graph.insert_edge(supplier.clone(), retailer.clone(), dec!(300));
    graph.insert_edge(retailer.clone(), coop_b.clone(), dec!(400));
    graph.insert_edge(coop_b.clone(), coop_a.clone(), dec!(50));

    println!("Loans:\n{}", graph);

    println!("━━━ Clusters ━━━\n");
    for (i, cluster) in find_clusters(&graph).iter().enumerate() {
        let members: Vec<String> = cluster.members.iter().map(|m| m.to_string()).collect();
        println!(
            "  Cluster {}: [{}], nettable: {}",
            i,
            members.join(", "),
            cluster.is_nettable()
        );
    }
    println!();

    let members: BTreeSet<_> = [coop_a.clone(), coop_b.clone()].into_iter().collect();
    let coop = graph.induced(&members);

    println!("━━━ Cooperative Exposure ━━━\n");
    println!("  Owed to outsiders:   {}", graph.subgraph_debt(&coop));
    println!("  Owed by outsiders:   {}", graph.subgraph_credit(&coop));
    println!();

    if let Some(circuit) = find_boundary_circuit(&graph, &coop) {
        let path: Vec<String> = circuit.path().iter().map(|p| p.to_string()).collect();
        println!("━━━ First Boundary Circuit ━━━\n");
        println!("  {}", path.join(" → "));
        if let Some(bottleneck) = circuit.bottleneck(&graph) {
            println!("  Bottleneck: {}\n", bottleneck);
        }
    }

    let report = graph.reduce_subgraph(&coop);
    println!("{}", report);
    println!("Loans after netting:\n{}", graph);
}
