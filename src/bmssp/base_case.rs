//! Leaf-level solver: a Dijkstra run from one seed that stops after `k + 1`
//! settled vertices.

use tracing::trace;

use super::state::RunState;
use crate::graph::Graph;
use crate::heap::MinHeap;
use crate::pair::{Bound, WeightedPair};

/// Settle up to `k` vertices closest to `seed` below `bound`.
///
/// When a `(k + 1)`-th vertex is reached it is left unsettled and its key
/// becomes the returned bound. Only the returned vertices are finalized.
pub fn base_case(
    graph: &Graph,
    state: &mut RunState,
    seed: WeightedPair,
    bound: Bound,
    k: usize,
) -> (Bound, Vec<WeightedPair>) {
    state.stats.base_cases += 1;
    let mut heap = MinHeap::with_capacity(k + 1);
    heap.push(state.pair(seed.vertex));
    let mut settled: Vec<WeightedPair> = Vec::with_capacity(k + 1);

    while settled.len() <= k {
        let Some(top) = heap.pop() else { break };
        let u = top.vertex;
        if top > state.pair(u) || settled.iter().any(|p| p.vertex == u) {
            continue;
        }
        settled.push(top);
        let du = state.distance[u];
        for e in graph.edges(u) {
            let pair = state.extend(u, e.target, e.weight);
            if bound.admits(&pair) && state.offer(e.target, du + e.weight, pair.hops) {
                heap.push(pair);
            }
        }
    }

    let result = if settled.len() > k {
        let cut = settled.pop().map_or(bound, |p| p.key());
        debug_assert!(settled.iter().all(|p| cut.admits(p)), "cut must separate the settled set");
        (cut, settled)
    } else {
        (bound, settled)
    };
    for p in &result.1 {
        state.finalize(p.vertex);
    }
    trace!(seed = seed.vertex, settled = result.1.len(), bound = result.0.distance(), "base case");
    result
}
