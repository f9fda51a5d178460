//! Bounded multi-round relaxation that picks the seeds worth recursing on.

use tracing::debug;

use super::state::RunState;
use crate::graph::{Graph, VertexId};
use crate::pair::{Bound, WeightedPair};

#[derive(Debug, Default)]
pub struct PivotSearch {
    /// Seeds that root a relaxation tree of at least `k` vertices, or every
    /// seed when the search bailed out.
    pub pivots: Vec<WeightedPair>,
    /// Distinct vertices reached, seeds first.
    pub discovered: Vec<VertexId>,
    pub bailed_out: bool,
}

/// Run up to `k` relaxation rounds from `seeds` under `bound`.
///
/// Each round relaxes the vertices first discovered in the round before;
/// the search ends early once a round discovers nothing new. Returns the
/// seeds unfiltered as soon as more than `k * |seeds|` vertices have been
/// discovered.
pub fn find_pivots(
    graph: &Graph,
    state: &mut RunState,
    seeds: &[WeightedPair],
    bound: Bound,
    k: usize,
) -> PivotSearch {
    state.stats.pivot_searches += 1;
    let mut discovered: Vec<VertexId> = Vec::with_capacity(seeds.len() * (k + 1));
    for s in seeds {
        if state.pivot_root[s.vertex].is_none() {
            state.pivot_root[s.vertex] = Some(s.vertex);
            discovered.push(s.vertex);
        }
    }

    let limit = k.saturating_mul(seeds.len());
    let mut wave: Vec<VertexId> = discovered.clone();
    let mut bailed_out = false;
    for _ in 0..k {
        let mut next = Vec::new();
        for &u in &wave {
            let du = state.distance[u];
            let root = state.pivot_root[u];
            for e in graph.edges(u) {
                let pair = state.extend(u, e.target, e.weight);
                if !bound.admits(&pair) || !state.offer(e.target, du + e.weight, pair.hops) {
                    continue;
                }
                let v = e.target;
                // an improved vertex changes tree but is not expanded again
                if state.pivot_root[v].is_none() {
                    discovered.push(v);
                    next.push(v);
                }
                state.pivot_root[v] = root;
            }
        }
        if next.is_empty() {
            break;
        }
        if discovered.len() > limit {
            bailed_out = true;
            break;
        }
        wave = next;
    }

    let pivots = if bailed_out {
        state.stats.pivot_bailouts += 1;
        debug!(seeds = seeds.len(), discovered = discovered.len(), "pivot search bailed out");
        seeds.to_vec()
    } else {
        for &v in &discovered {
            if let Some(r) = state.pivot_root[v] {
                state.tree_size[r] += 1;
            }
        }
        seeds
            .iter()
            .filter(|s| state.tree_size[s.vertex] >= k)
            .copied()
            .collect()
    };

    // roots are seeds, and seeds are discovered
    for &v in &discovered {
        state.pivot_root[v] = None;
        state.tree_size[v] = 0;
    }
    PivotSearch { pivots, discovered, bailed_out }
}
