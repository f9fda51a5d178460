use rstest::rstest;

use super::*;
use crate::dijkstra::dijkstra;
use crate::generators;
use crate::graph::GraphBuilder;
use crate::observer::Recorder;

fn graph(n: usize, edges: &[(usize, usize, f64)]) -> Graph {
    let mut b = GraphBuilder::directed().with_vertices(n);
    for &(u, v, w) in edges {
        b.add_edge(u, v, w).unwrap();
    }
    b.build()
}

fn seeded(n: usize, seeds: &[(usize, f64)]) -> (RunState, Vec<WeightedPair>) {
    let mut state = RunState::new(n);
    let pairs = seeds
        .iter()
        .map(|&(v, d)| {
            state.distance[v] = d;
            state.hops[v] = 0;
            WeightedPair::new(v, d)
        })
        .collect();
    (state, pairs)
}

#[test]
fn directed_four_cycle() {
    let g = graph(4, &[(0, 1, 1.0), (1, 2, 2.0), (2, 3, 3.0), (3, 0, 4.0)]);
    let dist = Bmssp::new(&g, 0).unwrap().run();
    assert_eq!(dist, vec![0.0, 1.0, 3.0, 6.0]);
}

#[test]
fn unreachable_vertex_stays_infinite() {
    let g = graph(4, &[(0, 1, 1.0), (1, 2, 1.0), (3, 0, 1.0)]);
    let dist = Bmssp::new(&g, 0).unwrap().run();
    assert_eq!(dist[..3], [0.0, 1.0, 2.0]);
    assert_eq!(dist[3], f64::INFINITY);
}

#[rstest]
#[case(5, 5)]
#[case(10, 10)]
#[case(7, 3)]
fn unit_grid_from_corner_is_manhattan(#[case] width: usize, #[case] height: usize) {
    let g = generators::grid(width, height, 1.0).unwrap();
    let dist = Bmssp::new(&g, 0).unwrap().run();
    for y in 0..height {
        for x in 0..width {
            assert_eq!(dist[y * width + x], (x + y) as f64, "cell ({x}, {y})");
        }
    }
}

#[test]
fn single_vertex_graph() {
    let g = graph(1, &[]);
    let (dist, stats) = Bmssp::new(&g, 0).unwrap().run_with_stats();
    assert_eq!(dist, vec![0.0]);
    assert_eq!(stats.base_cases, 1);
    assert_eq!(stats.settled, 1);
}

#[rstest]
#[case(Params { k: 1, t: 1 })]
#[case(Params { k: 2, t: 1 })]
#[case(Params { k: 3, t: 2 })]
#[case(Params { k: 1, t: 4 })]
fn overridden_params_agree_with_dijkstra(#[case] params: Params) {
    let g = generators::random(120, 4, 0.5, 5.0, 11).unwrap();
    let expected = dijkstra(&g, 3).unwrap().distance;
    let dist = Bmssp::with_params(&g, 3, params).unwrap().run();
    for (v, (a, b)) in expected.iter().zip(&dist).enumerate() {
        assert!(a == b || (a - b).abs() < 1e-9, "vertex {v}: {a} vs {b}");
    }
}

#[test]
fn constructor_rejects_bad_input() {
    let empty = Graph::default();
    assert_eq!(Bmssp::new(&empty, 0).err(), Some(SsspError::EmptyGraph));
    let g = graph(3, &[]);
    assert_eq!(
        Bmssp::new(&g, 3).err(),
        Some(SsspError::SourceOutOfRange { vertex: 3, vertex_count: 3 })
    );
    assert!(matches!(
        Bmssp::with_params(&g, 0, Params { k: 0, t: 1 }),
        Err(SsspError::InvalidParameter { name: "k", .. })
    ));
}

#[test]
fn pivot_search_bails_out_with_all_seeds() {
    // one seed fanning out to five leaves exceeds k * |S| = 2 in round one
    let g = generators::star(5, 1.0).unwrap();
    let (mut state, seeds) = seeded(6, &[(0, 0.0)]);
    let search = find_pivots(&g, &mut state, &seeds, Bound::INFINITE, 2);
    assert!(search.bailed_out);
    assert_eq!(search.pivots, seeds);
    assert_eq!(search.discovered.len(), 6);
    assert_eq!(state.stats.pivot_bailouts, 1);
}

#[test]
fn bail_out_returns_seeds_without_checking_tree_sizes() {
    // seed 0 reaches six vertices, seed 9 reaches nothing; the bail-out
    // still hands back seed 9 as a pivot
    let g = graph(10, &[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0), (0, 4, 1.0), (0, 5, 1.0)]);
    let (mut state, seeds) = seeded(10, &[(0, 0.0), (9, 0.0)]);
    let search = find_pivots(&g, &mut state, &seeds, Bound::INFINITE, 2);
    assert!(search.bailed_out);
    assert_eq!(search.pivots, seeds);
}

#[test]
fn pivots_need_a_tree_of_k_vertices() {
    let g = graph(6, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
    let (mut state, seeds) = seeded(6, &[(0, 0.0), (5, 0.0)]);
    let search = find_pivots(&g, &mut state, &seeds, Bound::INFINITE, 3);
    assert!(!search.bailed_out);
    assert_eq!(search.pivots, vec![WeightedPair::new(0, 0.0)]);
    assert_eq!(search.discovered, vec![0, 5, 1, 2, 3]);
    assert_eq!(state.distance[3], 3.0);
    assert!(state.pivot_root.iter().all(Option::is_none));
    assert!(state.tree_size.iter().all(|&s| s == 0));
}

#[test]
fn improved_vertices_do_not_rejoin_the_wavefront() {
    // 1 is found at 5.0 in round one and improved to 2.0 through 2 in round
    // two; 3 keeps the value it got from the first visit
    let g = graph(13, &[(0, 1, 5.0), (0, 2, 1.0), (2, 1, 1.0), (1, 3, 1.0)]);
    let (mut state, seeds) = seeded(13, &[(0, 0.0), (10, 0.0), (11, 0.0), (12, 0.0)]);
    let search = find_pivots(&g, &mut state, &seeds, Bound::INFINITE, 3);
    assert!(!search.bailed_out);
    assert_eq!(search.discovered, vec![0, 10, 11, 12, 1, 2, 3]);
    assert_eq!(state.distance[1], 2.0);
    assert_eq!(state.distance[3], 6.0);
    // round three finds nothing new and ends the search
    assert_eq!(state.stats.relaxations, 4);
    assert_eq!(search.pivots, vec![WeightedPair::new(0, 0.0)]);
}

#[test]
fn pivot_search_respects_bound_and_stops_early() {
    let g = graph(6, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
    let (mut state, seeds) = seeded(6, &[(0, 0.0), (5, 0.0)]);
    let search = find_pivots(&g, &mut state, &seeds, Bound::new(2.0, 0), 3);
    assert!(search.pivots.is_empty());
    assert_eq!(search.discovered, vec![0, 5, 1]);
    assert_eq!(state.distance[2], f64::INFINITY);
}

#[test]
fn base_case_truncates_after_k_plus_one() {
    let g = generators::path(5, 1.0).unwrap();
    let (mut state, seeds) = seeded(5, &[(0, 0.0)]);
    let (bound, settled) = base_case(&g, &mut state, seeds[0], Bound::INFINITE, 2);
    assert_eq!(bound, WeightedPair::with_hops(2, 2.0, 2).key());
    assert_eq!(settled, vec![WeightedPair::new(0, 0.0), WeightedPair::with_hops(1, 1.0, 1)]);
    assert_eq!(state.finalized, vec![true, true, false, false, false]);
}

#[test]
fn base_case_keeps_bound_when_exhausted() {
    let g = generators::path(5, 1.0).unwrap();
    let (mut state, seeds) = seeded(5, &[(0, 0.0)]);
    let limit = Bound::new(1.5, 0);
    let (bound, settled) = base_case(&g, &mut state, seeds[0], limit, 2);
    assert_eq!(bound, limit);
    assert_eq!(settled.len(), 2);
    assert_eq!(state.distance[2], f64::INFINITY);
}

#[test]
fn base_case_skips_stale_heap_entries() {
    // 2 is first reached at 5.0 via the direct edge, then improved to 2.0
    let g = graph(3, &[(0, 2, 5.0), (0, 1, 1.0), (1, 2, 1.0)]);
    let (mut state, seeds) = seeded(3, &[(0, 0.0)]);
    let (_, settled) = base_case(&g, &mut state, seeds[0], Bound::INFINITE, 5);
    assert_eq!(
        settled,
        vec![
            WeightedPair::new(0, 0.0),
            WeightedPair::with_hops(1, 1.0, 1),
            WeightedPair::with_hops(2, 2.0, 2)
        ]
    );
}

#[test]
fn base_case_cut_separates_zero_weight_chains() {
    // 0 -> 5 -> 1 at distance zero; 1 sorts after 5 despite its lower id
    let g = graph(6, &[(0, 5, 0.0), (5, 1, 0.0), (1, 2, 0.0)]);
    let (mut state, seeds) = seeded(6, &[(0, 0.0)]);
    let (bound, settled) = base_case(&g, &mut state, seeds[0], Bound::INFINITE, 2);
    assert_eq!(ids(&settled), vec![0, 5]);
    assert_eq!(bound, WeightedPair::with_hops(1, 0.0, 2).key());
    assert!(settled.iter().all(|p| bound.admits(p)));
    assert!(!state.finalized[1]);
}

#[rstest]
#[case::descending_ids(6, vec![(0, 5, 1.0), (5, 4, 0.0), (4, 3, 0.0), (3, 2, 0.0), (2, 1, 0.0)])]
#[case::zero_cycle(4, vec![(0, 3, 0.0), (3, 2, 0.0), (2, 1, 0.0), (1, 3, 0.0), (1, 0, 0.0)])]
#[case::zero_shortcut(5, vec![(0, 4, 2.0), (4, 1, 0.0), (0, 1, 3.0), (1, 2, 0.0), (2, 3, 1.0)])]
fn zero_weight_edges_match_dijkstra(#[case] n: usize, #[case] edges: Vec<(usize, usize, f64)>) {
    let g = graph(n, &edges);
    let base = dijkstra(&g, 0).unwrap().distance;
    for k in 1..4 {
        let dist = Bmssp::with_params(&g, 0, Params { k, t: 1 }).unwrap().run();
        assert_eq!(dist, base, "k = {k}");
    }
}

#[test]
fn seeded_zero_weight_graphs_match_dijkstra() {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    for seed in 0..300u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let n = rng.gen_range(2..40);
        let mut b = GraphBuilder::directed().with_vertices(n);
        for _ in 0..rng.gen_range(0..n * 3) {
            let (u, v) = (rng.gen_range(0..n), rng.gen_range(0..n));
            b.add_edge(u, v, f64::from(rng.gen_range(0u8..3))).unwrap();
        }
        let g = b.build();
        let source = rng.gen_range(0..n);
        let base = dijkstra(&g, source).unwrap().distance;
        let dist = Bmssp::new(&g, source).unwrap().run();
        assert_eq!(dist, base, "seed {seed}");
    }
}

#[test]
fn observer_sees_a_well_formed_event_stream() {
    let g = generators::grid(4, 4, 1.0).unwrap();
    let mut rec = Recorder::new();
    let (dist, stats) = Bmssp::new(&g, 0).unwrap().with_observer(&mut rec).run_with_stats();

    let events: Vec<Event> = rec.events().collect();
    assert_eq!(events.first(), Some(&Event::Start));
    assert_eq!(events.last(), Some(&Event::Done));
    let count = |e: Event| events.iter().filter(|&&x| x == e).count() as u64;
    assert_eq!(count(Event::RecurseEnter), stats.frames);
    assert_eq!(count(Event::Pull), stats.pulls);
    assert_eq!(count(Event::BaseCase), stats.base_cases);
    assert_eq!(count(Event::RecurseExit), stats.pulls);

    let last = rec.frames().last().unwrap();
    assert_eq!(last.level, None);
    assert_eq!(last.distance, dist);
    assert!(last.finalized.iter().all(|&f| f));
}

#[test]
fn observer_does_not_change_the_result() {
    let g = generators::random(80, 3, 0.5, 3.0, 5).unwrap();
    let plain = Bmssp::new(&g, 0).unwrap().run();
    let mut rec = Recorder::with_limit(10);
    let observed = Bmssp::new(&g, 0).unwrap().with_observer(&mut rec).run();
    assert_eq!(plain, observed);
    assert_eq!(rec.frames().len(), 10);
}
