use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use blocktracker::analysis::EndReceiverRanker;
use blocktracker::models::{Currency, FlowGraphBuilder, Transaction};

fn address(id: u64) -> String {
    format!("0x{:040x}", id)
}

fn transfer(from_id: u64, to_id: u64) -> Transaction {
    Transaction {
        tx_hash: format!("0x{:032x}{:032x}", from_id, to_id),
        from_address: address(from_id),
        to_address: address(to_id),
        timestamp: 1640995200 + to_id,
        amount: 1.0,
        currency: Currency::Eth,
        block_number: 14000000 + to_id,
        gas_price: None,
        gas_used: None,
    }
}

/// One long forwarding chain: 0 -> 1 -> 2 -> ...
fn chain_transactions(len: usize) -> Vec<Transaction> {
    (0..len as u64).map(|i| transfer(i, i + 1)).collect()
}

/// A single hub paying out to `breadth` distinct leaves.
fn fan_out_transactions(breadth: usize) -> Vec<Transaction> {
    (1..=breadth as u64).map(|i| transfer(0, i)).collect()
}

/// A full tree rooted at node 0, breadth-first node numbering.
fn tree_transactions(depth: u32, branching: usize) -> Vec<Transaction> {
    let mut transactions = Vec::new();
    let mut frontier = vec![0u64];
    let mut next_id = 1u64;

    for _ in 0..depth {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching);
        for parent in frontier {
            for _ in 0..branching {
                let child = next_id;
                next_id += 1;
                transactions.push(transfer(parent, child));
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }
    transactions
}

fn bench_graph_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_construction");

    for size in [100, 1000, 5000].iter() {
        let transactions = chain_transactions(*size);
        group.bench_with_input(BenchmarkId::new("linear_chain", size), size, |b, _| {
            b.iter(|| FlowGraphBuilder::build(black_box(&transactions)));
        });
    }

    for breadth in [100, 1000, 5000].iter() {
        let transactions = fan_out_transactions(*breadth);
        group.bench_with_input(BenchmarkId::new("fan_out", breadth), breadth, |b, _| {
            b.iter(|| FlowGraphBuilder::build(black_box(&transactions)));
        });
    }

    group.finish();
}

fn bench_end_receiver_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_receiver_ranking");
    let start = address(0);

    let chain = FlowGraphBuilder::build(&chain_transactions(200));

    group.bench_function("deep_chain_default_depth", |b| {
        let ranker = EndReceiverRanker::default();
        b.iter(|| ranker.rank(black_box(&chain), black_box(start.as_str())));
    });

    group.bench_function("deep_chain_full_depth", |b| {
        let ranker = EndReceiverRanker::new(200);
        b.iter(|| ranker.rank(black_box(&chain), black_box(start.as_str())));
    });

    for breadth in [100, 1000].iter() {
        let graph = FlowGraphBuilder::build(&fan_out_transactions(*breadth));
        group.bench_with_input(BenchmarkId::new("fan_out", breadth), breadth, |b, _| {
            let ranker = EndReceiverRanker::default();
            b.iter(|| ranker.rank(black_box(&graph), black_box(start.as_str())));
        });
    }

    // 780 edges across four levels, every leaf a candidate
    let tree = FlowGraphBuilder::build(&tree_transactions(4, 5));
    group.bench_function("branching_tree", |b| {
        let ranker = EndReceiverRanker::default();
        b.iter(|| ranker.rank(black_box(&tree), black_box(start.as_str())));
    });

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);
    targets = bench_graph_construction, bench_end_receiver_ranking
);
criterion_main!(benches);
