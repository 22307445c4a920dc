use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use debt_graph::graph::cycle_search::find_cycle;
use debt_graph::simulation::stress_test::{generate_seeded_graph, NetworkConfig};

fn bench_reduce_all(
    c: &mut Criterion,
    name: &str,
    party_count: usize,
    avg_loans_per_party: usize,
) {
    let config = NetworkConfig {
        party_count,
        avg_loans_per_party,
        ..Default::default()
    };
    let graph = generate_seeded_graph(&config, 2024);

    c.bench_function(name, |b| {
        b.iter_batched(
            || graph.clone(),
            |mut g| g.reduce_all(),
            BatchSize::SmallInput,
        )
    });
}

fn bench_netting_10_parties(c: &mut Criterion) {
    bench_reduce_all(c, "reduce_all_10_parties", 10, 5);
}

fn bench_netting_100_parties(c: &mut Criterion) {
    bench_reduce_all(c, "reduce_all_100_parties", 100, 10);
}

fn bench_cycle_search_1000_parties(c: &mut Criterion) {
    let config = NetworkConfig {
        party_count: 1000,
        avg_loans_per_party: 10,
        ..Default::default()
    };
    let graph = generate_seeded_graph(&config, 2024);
    let start = graph.vertices().next().cloned();

    c.bench_function("find_cycle_1000_parties", |b| {
        b.iter(|| start.as_ref().map(|s| find_cycle(black_box(&graph), s)))
    });
}

criterion_group!(
    benches,
    bench_netting_10_parties,
    bench_netting_100_parties,
    bench_cycle_search_1000_parties
);
criterion_main!(benches);
