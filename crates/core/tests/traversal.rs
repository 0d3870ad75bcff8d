use beamwalk_core::beam::{
    beam_search, eager_beam_search, run, DistanceMetric, ProximityGraph, SearchParams, Strategy,
    Termination, VectorTable,
};
use beamwalk_core::config;
use beamwalk_core::eval::evaluate;
use beamwalk_core::storage::{read_fbin, read_graph, write_fbin, write_graph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tempfile::TempDir;

/// Strongly connected random graph: a ring plus `extra` random out-edges per node.
fn random_graph(rng: &mut StdRng, n: u32, extra: usize, dim: usize) -> (ProximityGraph, VectorTable) {
    let neighbors = (0..n)
        .map(|i| {
            let mut list = vec![(i + 1) % n];
            for _ in 0..extra {
                list.push(rng.gen_range(0..n));
            }
            list
        })
        .collect();
    let rows: Vec<Vec<f32>> = (0..n)
        .map(|_| (0..dim).map(|_| rng.gen_range(-1.0f32..1.0)).collect())
        .collect();
    (
        ProximityGraph::new(neighbors).unwrap(),
        VectorTable::from_rows(&rows).unwrap(),
    )
}

fn assert_unique(ids: &[u32], what: &str) {
    let set: HashSet<u32> = ids.iter().copied().collect();
    assert_eq!(set.len(), ids.len(), "{what} has duplicates: {ids:?}");
}

#[test]
fn test_connected_graph_always_converges() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let (graph, vectors) = random_graph(&mut rng, 60, 3, 8);
        let n = graph.len() as u32;
        let params = SearchParams::default()
            .with_start(rng.gen_range(0..n))
            .with_limit(graph.len() + 1);
        for query in 0..n {
            for strategy in [Strategy::Standard, Strategy::Eager] {
                let trace = run(strategy, &graph, &vectors, query, &params).unwrap();
                assert_eq!(trace.termination, Termination::Found, "{strategy} query {query}");
                match strategy {
                    Strategy::Standard => assert_eq!(trace.visited.last(), Some(&query)),
                    // the eager walk stops on the query without settling it
                    Strategy::Eager => assert!(!trace.visited.contains(&query)),
                }
                assert!(trace.converged_within(params.limit));
                assert!(trace.visited.len() <= params.limit);
                assert_unique(&trace.visited, "visited");
                assert_unique(&trace.compared, "compared");
                assert!(!trace.compared.contains(&params.start));
            }
        }
    }
}

#[test]
fn test_search_starts_at_entry_node() {
    let mut rng = StdRng::seed_from_u64(11);
    let (graph, vectors) = random_graph(&mut rng, 40, 2, 4);
    for start in [0, 13, 39] {
        let params = SearchParams::default().with_start(start);
        let start_neighbors = graph.get(start).unwrap();

        let standard = beam_search(&graph, &vectors, 21, &params).unwrap();
        assert_eq!(standard.visited.first(), Some(&start));
        assert!(start_neighbors.contains(&standard.compared[0]));

        // The eager walk may requeue the start before settling it, but the start is
        // still the first node expanded, so the first scored node is its neighbor.
        let eager = eager_beam_search(&graph, &vectors, 21, &params).unwrap();
        assert!(start_neighbors.contains(&eager.compared[0]));
        assert_unique(&eager.visited, "visited");
    }
}

#[test]
fn test_limit_is_never_exceeded() {
    let mut rng = StdRng::seed_from_u64(3);
    let (graph, vectors) = random_graph(&mut rng, 200, 2, 16);
    for limit in [1, 2, 5, 17] {
        let params = SearchParams::default().with_limit(limit);
        for query in [50, 120, 199] {
            let standard = beam_search(&graph, &vectors, query, &params).unwrap();
            let eager = eager_beam_search(&graph, &vectors, query, &params).unwrap();
            for trace in [standard, eager] {
                assert!(trace.visited.len() <= limit);
                if trace.termination == Termination::LimitReached {
                    assert_eq!(trace.visited.len(), limit);
                }
            }
        }
    }
}

#[test]
fn test_every_compared_node_is_a_neighbor_of_an_expanded_node() {
    let mut rng = StdRng::seed_from_u64(19);
    let (graph, vectors) = random_graph(&mut rng, 80, 4, 6);
    let trace = beam_search(&graph, &vectors, 55, &SearchParams::default()).unwrap();
    let reachable: HashSet<u32> = trace
        .visited
        .iter()
        .flat_map(|&v| graph.get(v).unwrap().iter().copied())
        .collect();
    assert!(trace.compared.iter().all(|c| reachable.contains(c)));
}

#[test]
fn test_files_round_trip_into_evaluation() {
    let mut rng = StdRng::seed_from_u64(23);
    let (graph, vectors) = random_graph(&mut rng, 50, 3, 5);
    let dir = TempDir::new().expect("Failed to create temp dir");
    let fbin_path = dir.path().join("base.fbin");
    let graph_path = dir.path().join("outputs").join("vamana");

    write_fbin(&fbin_path, &vectors).unwrap();
    write_graph(&graph_path, &graph).unwrap();
    let loaded_vectors = read_fbin(&fbin_path).unwrap();
    let loaded_graph = read_graph(&graph_path).unwrap();
    assert_eq!(loaded_vectors, vectors);
    assert_eq!(loaded_graph, graph);

    let queries: Vec<u32> = (0..50).collect();
    let params = SearchParams::default().with_metric(DistanceMetric::Cosine);
    let report = evaluate(&loaded_graph, &loaded_vectors, &queries, &params, Strategy::Eager).unwrap();
    assert_eq!(report.queries, 50);
    assert_eq!(report.converged, 50);
    assert!(report.meets(config::DEFAULT_CONVERGENCE_TARGET));
    assert!(report.mean_compared <= 49.0);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let err = read_graph(dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, beamwalk_core::BeamError::Io(_)));
}
