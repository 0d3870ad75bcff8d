//! Traversal benchmark: standard vs eager beam search.
//! Measures convergence rate, average compared count, and QPS per limit.
//!
//! Usage: cargo bench --bench beam_fbin
//!
//! Reads `base.fbin` and `graph.bin` from `$BEAMWALK_DATA` (default `benchmarks/data`).
//! Falls back to a synthetic ring-plus-random-edges graph when the files are missing.

use beamwalk::beam::{run, ProximityGraph, SearchParams, Strategy, VectorTable};
use beamwalk::storage::{read_fbin, read_graph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::time::Instant;

const DEFAULT_DATA_DIR: &str = "benchmarks/data";
const SYNTHETIC_POINTS: u32 = 20_000;
const SYNTHETIC_DIM: usize = 64;
const SYNTHETIC_DEGREE: usize = 12;
const NUM_QUERIES: usize = 1_000;

fn synthetic() -> (ProximityGraph, VectorTable) {
    let mut rng = StdRng::seed_from_u64(42);
    let n = SYNTHETIC_POINTS;
    let neighbors = (0..n)
        .map(|i| {
            let mut list = vec![(i + 1) % n];
            list.extend((0..SYNTHETIC_DEGREE).map(|_| rng.gen_range(0..n)));
            list
        })
        .collect();
    let mut flat = Vec::with_capacity(n as usize * SYNTHETIC_DIM);
    for _ in 0..n {
        let row: Vec<f32> = (0..SYNTHETIC_DIM).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
        let norm = row.iter().map(|x| x * x).sum::<f32>().sqrt().max(f32::EPSILON);
        flat.extend(row.iter().map(|x| x / norm));
    }
    (
        ProximityGraph::new(neighbors).expect("synthetic graph is valid"),
        VectorTable::from_flat(flat, SYNTHETIC_DIM).expect("synthetic vectors are valid"),
    )
}

fn load() -> (ProximityGraph, VectorTable) {
    let dir = PathBuf::from(std::env::var("BEAMWALK_DATA").unwrap_or_else(|_| DEFAULT_DATA_DIR.into()));
    let vectors_path = dir.join("base.fbin");
    let graph_path = dir.join("graph.bin");
    if vectors_path.exists() && graph_path.exists() {
        let vectors = read_fbin(&vectors_path).unwrap_or_else(|e| panic!("Cannot read {vectors_path:?}: {e}"));
        let graph = read_graph(&graph_path).unwrap_or_else(|e| panic!("Cannot read {graph_path:?}: {e}"));
        (graph, vectors)
    } else {
        println!("No data in {}, using synthetic graph", dir.display());
        synthetic()
    }
}

fn main() {
    println!("=== Traversal Benchmark: standard vs eager beam search ===");
    println!();

    let t0 = Instant::now();
    let (graph, vectors) = load();
    println!(
        "Loaded {} points x {}d, {} edges in {:.2}s",
        graph.len(),
        vectors.dimension(),
        graph.edge_count(),
        t0.elapsed().as_secs_f64()
    );

    let num_queries = graph.len().min(NUM_QUERIES);
    if num_queries == 0 {
        println!("Graph has no points, nothing to search");
        return;
    }
    let step = (graph.len() / num_queries).max(1);
    let queries: Vec<u32> = (0..num_queries).map(|i| (i * step) as u32).collect();

    println!();
    println!("  strategy |  limit | converged | avg compared |    QPS");
    println!("  ---------+--------+-----------+--------------+--------");

    for strategy in [Strategy::Standard, Strategy::Eager] {
        for limit in [100, 1_000, 10_000] {
            let params = SearchParams::default().with_limit(limit);
            let t0 = Instant::now();
            let mut converged = 0usize;
            let mut compared = 0usize;
            for &q in &queries {
                let trace = run(strategy, &graph, &vectors, q, &params).expect("valid query");
                converged += usize::from(trace.converged_within(limit));
                compared += trace.compared.len();
            }
            let elapsed = t0.elapsed();
            let qps = queries.len() as f64 / elapsed.as_secs_f64();
            println!(
                "  {:>8} | {:>6} | {:>9.4} | {:>12.1} | {:>6.0}",
                strategy.to_string(),
                limit,
                converged as f64 / queries.len() as f64,
                compared as f64 / queries.len() as f64,
                qps
            );
        }
    }

    println!();
    println!("=== Benchmark complete ===");
}
