use std::cmp::Ordering;

use serde::Serialize;

use crate::graph::VertexId;
use crate::pair::{round_distance, WeightedPair};

/// Work counters for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Accepted edge relaxations across all phases.
    pub relaxations: u64,
    pub pivot_searches: u64,
    /// Pivot searches that returned the seeds unfiltered.
    pub pivot_bailouts: u64,
    pub pulls: u64,
    pub batch_prepends: u64,
    pub base_cases: u64,
    /// Recursive calls entered, the outermost one included.
    pub frames: u64,
    /// Vertices marked finalized.
    pub settled: u64,
}

/// Mutable per-run context threaded through every recursive call.
#[derive(Debug)]
pub struct RunState {
    pub(crate) distance: Vec<f64>,
    // edges on the path behind `distance`
    pub(crate) hops: Vec<u32>,
    pub(crate) finalized: Vec<bool>,
    pub(crate) last_level: Vec<Option<usize>>,
    // pivot search scratch, reset after every search
    pub(crate) pivot_root: Vec<Option<VertexId>>,
    pub(crate) tree_size: Vec<usize>,
    pub(crate) stats: RunStats,
}

impl RunState {
    pub fn new(n: usize) -> Self {
        Self {
            distance: vec![f64::INFINITY; n],
            hops: vec![u32::MAX; n],
            finalized: vec![false; n],
            last_level: vec![None; n],
            pivot_root: vec![None; n],
            tree_size: vec![0; n],
            stats: RunStats::default(),
        }
    }

    pub fn distances(&self) -> &[f64] {
        &self.distance
    }

    pub fn finalized(&self) -> &[bool] {
        &self.finalized
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn into_distances(self) -> Vec<f64> {
        self.distance
    }

    /// `vertex` at its current distance and hop count.
    #[inline]
    pub(crate) fn pair(&self, vertex: VertexId) -> WeightedPair {
        WeightedPair::with_hops(vertex, self.distance[vertex], self.hops[vertex])
    }

    /// Key of a path reaching `vertex` one edge after `from`.
    #[inline]
    pub(crate) fn extend(&self, from: VertexId, vertex: VertexId, weight: f64) -> WeightedPair {
        WeightedPair::with_hops(
            vertex,
            self.distance[from] + weight,
            self.hops[from].saturating_add(1),
        )
    }

    /// Record `vertex` as a source at distance zero.
    pub(crate) fn seed(&mut self, vertex: VertexId) {
        self.distance[vertex] = 0.0;
        self.hops[vertex] = 0;
    }

    /// Offer a path of length `candidate` over `hops` edges to `vertex`.
    /// Accepted when `(distance, hops)` is not worse than the stored pair on
    /// the rounding grid; a finalized vertex only accepts strict
    /// improvements. The stored distance never increases.
    #[inline]
    pub(crate) fn offer(&mut self, vertex: VertexId, candidate: f64, hops: u32) -> bool {
        let current = (round_distance(self.distance[vertex]), self.hops[vertex]);
        let offered = (round_distance(candidate), hops);
        let order = offered
            .0
            .total_cmp(&current.0)
            .then(offered.1.cmp(&current.1));
        let accepted = if self.finalized[vertex] {
            order == Ordering::Less
        } else {
            order != Ordering::Greater
        };
        if accepted {
            self.distance[vertex] = self.distance[vertex].min(candidate);
            self.hops[vertex] = hops;
            self.stats.relaxations += 1;
        }
        accepted
    }

    /// Mark `vertex` final. Returns `false` when it already was.
    #[inline]
    pub(crate) fn finalize(&mut self, vertex: VertexId) -> bool {
        if self.finalized[vertex] {
            return false;
        }
        self.finalized[vertex] = true;
        self.stats.settled += 1;
        true
    }
}
