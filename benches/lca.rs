use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use euler_lca::tree::{Adjacency, LcaIndex, NodeId};

/// Node `i` hangs below a hashed earlier node.
fn scrambled_tree(nodes: u32) -> Adjacency {
    let edges = (1..nodes).map(|i| {
        let hash = (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 32;
        ((hash % i as u64) as u32, i)
    });
    Adjacency::from_edges(nodes as usize, edges).expect("generated edges form a tree")
}

fn bench_build(c: &mut Criterion) {
    let adjacency = scrambled_tree(100_000);
    c.bench_function("build 100k", |b| {
        b.iter(|| LcaIndex::build(black_box(&adjacency)).expect("valid tree"))
    });
}

fn bench_query(c: &mut Criterion) {
    let nodes = 100_000u32;
    let index = LcaIndex::build(&scrambled_tree(nodes)).expect("valid tree");
    let pairs: Vec<_> = (0..4096u32)
        .map(|i| {
            (
                NodeId::new(i.wrapping_mul(2_654_435_761) % nodes),
                NodeId::new(i.wrapping_mul(40_503) % nodes),
            )
        })
        .collect();

    c.bench_function("query 4096 serial", |b| {
        b.iter(|| {
            for &(u, v) in &pairs {
                black_box(index.query(u, v).expect("known nodes"));
            }
        })
    });

    let parallel = index.clone().with_parallel_threshold(1);
    c.bench_function("query_batch 4096 parallel", |b| {
        b.iter(|| black_box(parallel.query_batch(&pairs)))
    });
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);
