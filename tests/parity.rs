use bmssp_core::ffi::{sssp_run_baseline, sssp_run_bmssp, SSSP_OK};
use bmssp_core::{dijkstra, generators, Bmssp, Graph, GraphBuilder, Params, SsspResultInfo};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;

fn hash_dist(dist: &[f64]) -> u64 {
    // FNV-1a over the bit patterns; not cryptographic
    let mut h: u64 = 1469598103934665603;
    for (i, &d) in dist.iter().enumerate() {
        h ^= d.to_bits() ^ (i as u64).wrapping_mul(1099511628211);
        h = h.wrapping_mul(1099511628211);
    }
    h
}

fn assert_parity(base: &[f64], other: &[f64], tol: f64) {
    assert_eq!(base.len(), other.len());
    let diffs: Vec<_> = base
        .iter()
        .zip(other)
        .enumerate()
        .filter(|(_, (a, b))| {
            if a.is_infinite() || b.is_infinite() {
                a != b
            } else {
                (*a - *b).abs() > tol
            }
        })
        .take(16)
        .collect();
    assert!(diffs.is_empty(), "distance parity mismatch (n={}): {diffs:?}", base.len());
}

fn check(g: &Graph, source: usize) {
    let base = dijkstra(g, source).unwrap().distance;
    let dist = Bmssp::new(g, source).unwrap().run();
    assert_parity(&base, &dist, 1e-9);
}

#[rstest]
#[case::path(generators::path(10, 1.0).unwrap())]
#[case::star(generators::star(12, 1.0).unwrap())]
#[case::bridge_cliques(generators::bridge_cliques(4, 4, 1.0).unwrap())]
#[case::complete(generators::complete(6, 1.0).unwrap())]
#[case::grid(generators::grid(12, 9, 1.0).unwrap())]
#[case::weighted_grid(generators::grid(8, 8, 0.3).unwrap())]
#[case::zero_weight_grid(generators::grid(7, 7, 0.0).unwrap())]
#[case::zero_weight_complete(generators::complete(9, 0.0).unwrap())]
#[case::zero_edges_into_lower_ids(zero_descent(30))]
fn parity_core_small_graphs(#[case] g: Graph) {
    check(&g, 0);
}

/// Unit edges up the id range, free edges back down, so equal distances are
/// reached through vertices with larger ids.
fn zero_descent(n: usize) -> Graph {
    let mut b = GraphBuilder::directed().with_vertices(n);
    for v in 0..n {
        b.add_edge(v, (v * 7 + 3) % n, 1.0).unwrap();
        if v > 0 {
            b.add_edge(v, v - 1, 0.0).unwrap();
        }
    }
    b.build()
}

#[test]
fn parity_random_graphs_with_zero_weights() {
    for seed in 1..=5u64 {
        let mut rng = SmallRng::seed_from_u64(seed * 104729);
        let n = 300;
        let mut b = GraphBuilder::directed().with_vertices(n);
        for u in 0..n {
            for _ in 0..3 {
                let w = f64::from(rng.gen_range(0u8..3));
                b.add_edge(u, rng.gen_range(0..n), w).unwrap();
            }
        }
        let g = b.build();
        for source in generators::sample_sources(&g, 3, seed) {
            check(&g, source);
        }
    }
}

#[test]
fn parity_random_graphs() {
    for seed in 1..=5u64 {
        let g = generators::random(400, 4, 0.5, 3.5, seed * 7919).unwrap();
        for source in generators::sample_sources(&g, 3, seed) {
            check(&g, source);
        }
    }
}

#[test]
fn parity_is_bit_identical_on_integer_weights() {
    let g = generators::grid(16, 16, 2.0).unwrap();
    let base = dijkstra(&g, 17).unwrap().distance;
    let dist = Bmssp::new(&g, 17).unwrap().run();
    assert_eq!(hash_dist(&base), hash_dist(&dist));
}

#[test]
fn parity_across_the_c_abi() {
    let g = generators::random(200, 3, 1.0, 4.0, 42).unwrap();
    let offsets: Vec<u32> = g.offsets().iter().map(|&o| o as u32).collect();
    let (targets, weights): (Vec<u32>, Vec<f64>) = g
        .vertices()
        .flat_map(|v| g.edges(v))
        .map(|e| (e.target as u32, e.weight))
        .unzip();
    let n = g.vertex_count() as u32;

    let mut base = vec![0.0; n as usize];
    let mut pred = vec![0i32; n as usize];
    let mut dist = vec![0.0; n as usize];
    let mut info = SsspResultInfo::default();
    unsafe {
        let rc = sssp_run_baseline(
            n,
            offsets.as_ptr(),
            targets.as_ptr(),
            weights.as_ptr(),
            0,
            base.as_mut_ptr(),
            pred.as_mut_ptr(),
            &mut info,
        );
        assert_eq!(rc, SSSP_OK);
        let rc = sssp_run_bmssp(
            n,
            offsets.as_ptr(),
            targets.as_ptr(),
            weights.as_ptr(),
            0,
            dist.as_mut_ptr(),
            &mut info,
        );
        assert_eq!(rc, SSSP_OK);
    }
    assert_parity(&base, &dist, 1e-9);
    assert!(info.base_cases >= 1);
}

fn arb_graph() -> impl Strategy<Value = (Graph, usize)> {
    (2usize..48).prop_flat_map(|n| {
        let weight = prop_oneof![Just(0.0), Just(1.0), 0.5f64..10.0];
        let edge = (0..n, 0..n, weight);
        (Just(n), prop::collection::vec(edge, 0..n * 4), 0..n)
    })
    .prop_map(|(n, edges, source)| {
        let mut b = GraphBuilder::directed().with_vertices(n);
        for (u, v, w) in edges {
            b.add_edge(u, v, w).unwrap();
        }
        (b.build(), source)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn bmssp_matches_dijkstra((g, source) in arb_graph()) {
        let base = dijkstra(&g, source).unwrap().distance;
        let dist = Bmssp::new(&g, source).unwrap().run();
        for (a, b) in base.iter().zip(&dist) {
            prop_assert!(a == b || (a - b).abs() <= 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn any_params_match_dijkstra((g, source) in arb_graph(), k in 1usize..5, t in 1usize..5) {
        let base = dijkstra(&g, source).unwrap().distance;
        let dist = Bmssp::with_params(&g, source, Params { k, t }).unwrap().run();
        for (a, b) in base.iter().zip(&dist) {
            prop_assert!(a == b || (a - b).abs() <= 1e-9, "{a} vs {b}");
        }
    }
}
