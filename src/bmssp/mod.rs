//! Bounded multi-source shortest paths.
//!
//! A call at `level` with bound `B` and seeds `S` settles every vertex whose
//! shortest path from `S` stays below `B`, or stops early once `2^(level t)`
//! vertices are settled and reports the tighter bound it did reach. Level 0
//! is a truncated Dijkstra ([`base_case`]); higher levels shrink the seed set
//! with [`find_pivots`] and feed it through a [`Frontier`] in batches.

mod base_case;
mod params;
mod pivots;
mod state;
#[cfg(test)]
mod tests;

use tracing::{debug, info, instrument, trace};

pub use base_case::base_case;
pub use params::{Params, ENV_K, ENV_T};
pub use pivots::{find_pivots, PivotSearch};
pub use state::{RunState, RunStats};

use crate::error::{Result, SsspError};
use crate::frontier::Frontier;
use crate::graph::{Graph, VertexId};
use crate::observer::{Event, NoopObserver, Observer, Snapshot};
use crate::pair::{Bound, WeightedPair};

/// Single-source solver over a borrowed graph.
pub struct Bmssp<'g, O = NoopObserver> {
    graph: &'g Graph,
    source: VertexId,
    params: Params,
    observer: O,
}

impl<'g> Bmssp<'g> {
    /// Solver with `k` and `t` derived from the vertex count.
    pub fn new(graph: &'g Graph, source: VertexId) -> Result<Self> {
        Self::with_params(graph, source, Params::derive(graph.vertex_count()))
    }

    pub fn with_params(graph: &'g Graph, source: VertexId, params: Params) -> Result<Self> {
        let n = graph.vertex_count();
        if n == 0 {
            return Err(SsspError::EmptyGraph);
        }
        if source >= n {
            return Err(SsspError::SourceOutOfRange { vertex: source, vertex_count: n });
        }
        let params = Params::new(params.k, params.t)?;
        Ok(Self { graph, source, params, observer: NoopObserver })
    }

    /// Derived parameters overridden by `SSSP_BMSSP_K` / `SSSP_BMSSP_T`.
    pub fn from_env(graph: &'g Graph, source: VertexId) -> Result<Self> {
        let params = Params::from_env(graph.vertex_count())?;
        Self::with_params(graph, source, params)
    }
}

impl<'g, O: Observer> Bmssp<'g, O> {
    pub fn with_observer<P: Observer>(self, observer: P) -> Bmssp<'g, P> {
        Bmssp { graph: self.graph, source: self.source, params: self.params, observer }
    }

    pub fn params(&self) -> Params {
        self.params
    }

    pub fn source(&self) -> VertexId {
        self.source
    }

    /// Shortest distance to every vertex; `f64::INFINITY` when unreachable.
    pub fn run(&mut self) -> Vec<f64> {
        self.run_with_stats().0
    }

    #[instrument(
        name = "bmssp.run",
        skip(self),
        fields(
            n = self.graph.vertex_count(),
            k = self.params.k,
            t = self.params.t,
            top_level = self.params.top_level(self.graph.vertex_count()),
            source = self.source
        )
    )]
    pub fn run_with_stats(&mut self) -> (Vec<f64>, RunStats) {
        let n = self.graph.vertex_count();
        let level = self.params.top_level(n);
        let source = self.source;
        let mut state = RunState::new(n);
        state.seed(source);

        let mut driver = Driver { graph: self.graph, params: self.params, observer: &mut self.observer };
        driver.emit(&state, Event::Start, Some(level), Bound::INFINITE, Some(source), || {
            (vec![source], Vec::new())
        });
        let seeds = vec![state.pair(source)];
        let top = driver.recurse(&mut state, level, Bound::INFINITE, seeds);
        driver.emit(&state, Event::Done, None, top.bound, None, || (ids(&top.settled), Vec::new()));

        let stats = state.stats();
        info!(
            level,
            settled = stats.settled,
            relaxations = stats.relaxations,
            pulls = stats.pulls,
            "bmssp finished"
        );
        (state.into_distances(), stats)
    }
}

/// What a call hands back to its parent.
#[derive(Debug)]
pub(crate) struct LevelResult {
    pub(crate) bound: Bound,
    pub(crate) settled: Vec<WeightedPair>,
}

struct Driver<'a, O> {
    graph: &'a Graph,
    params: Params,
    observer: &'a mut O,
}

impl<O: Observer> Driver<'_, O> {
    fn recurse(
        &mut self,
        state: &mut RunState,
        level: usize,
        bound: Bound,
        seeds: Vec<WeightedPair>,
    ) -> LevelResult {
        state.stats.frames += 1;
        self.emit(state, Event::RecurseEnter, Some(level), bound, None, || (ids(&seeds), Vec::new()));
        if level == 0 {
            return self.leaf(state, bound, &seeds);
        }

        let search = find_pivots(self.graph, state, &seeds, bound, self.params.k);
        self.emit(state, Event::Pivots, Some(level), bound, None, || {
            (ids(&seeds), ids(&search.pivots))
        });

        let cap = self.params.level_capacity(level);
        let mut frontier =
            Frontier::new(self.graph.vertex_count(), self.params.block_capacity(level), bound);
        let mut tighter = bound;
        for p in &search.pivots {
            let pair = state.pair(p.vertex);
            frontier.insert(pair);
            tighter = tighter.min(pair.key());
        }
        self.emit(state, Event::Frontier, Some(level), tighter, None, || {
            (sorted(frontier.vertices()), ids(&search.pivots))
        });

        let mut settled: Vec<WeightedPair> = Vec::new();
        while settled.len() < cap && !frontier.is_empty() {
            let (batch, pull_bound) = frontier.pull();
            state.stats.pulls += 1;
            trace!(level, pulled = batch.len(), bound = pull_bound.distance(), "pull");
            self.emit(state, Event::Pull, Some(level), pull_bound, None, || (ids(&batch), Vec::new()));

            let child = self.recurse(state, level - 1, pull_bound, batch.clone());
            self.emit(state, Event::RecurseExit, Some(level - 1), child.bound, None, || {
                (ids(&child.settled), Vec::new())
            });

            let mut staged = Vec::new();
            let mut work = ids(&child.settled);
            let mut next = 0;
            while let Some(&u) = work.get(next) {
                next += 1;
                frontier.erase(u);
                if state.last_level[u] != Some(level) {
                    state.last_level[u] = Some(level);
                    settled.push(state.pair(u));
                }
                state.finalize(u);
                let (du, hops) = (state.distance[u], state.hops[u].saturating_add(1));
                for e in self.graph.edges(u) {
                    if !state.offer(e.target, du + e.weight, hops) {
                        continue;
                    }
                    let pair = state.pair(e.target);
                    let key = pair.key();
                    if key >= pull_bound && key < bound {
                        frontier.insert(pair);
                    } else if key >= child.bound && key < pull_bound {
                        staged.push(pair);
                    } else if state.last_level[e.target] == Some(level) {
                        // already output here with a longer path
                        work.push(e.target);
                    }
                }
            }
            for p in &batch {
                let pair = state.pair(p.vertex);
                let key = pair.key();
                if key >= child.bound && key < pull_bound {
                    staged.push(pair);
                }
            }
            if !staged.is_empty() {
                state.stats.batch_prepends += 1;
            }
            frontier.batch_prepend(staged, child.bound);
            tighter = child.bound;
            self.emit(state, Event::Frontier, Some(level), tighter, None, || {
                (ids(&settled), Vec::new())
            });
        }

        let result_bound = if frontier.is_empty() { bound } else { tighter };
        for &w in &search.discovered {
            if state.last_level[w] == Some(level) {
                continue;
            }
            let pair = state.pair(w);
            if result_bound.admits(&pair) {
                state.last_level[w] = Some(level);
                state.finalize(w);
                settled.push(pair);
            }
        }
        debug!(level, settled = settled.len(), bound = result_bound.distance(), "level done");
        self.emit(state, Event::Done, Some(level), result_bound, None, || (ids(&settled), Vec::new()));
        LevelResult { bound: result_bound, settled }
    }

    fn leaf(&mut self, state: &mut RunState, bound: Bound, seeds: &[WeightedPair]) -> LevelResult {
        let Some(&seed) = seeds.first() else {
            return LevelResult { bound, settled: Vec::new() };
        };
        debug_assert_eq!(seeds.len(), 1, "level 0 takes exactly one seed");
        let (bound, settled) = base_case(self.graph, state, seed, bound, self.params.k);
        self.emit(state, Event::BaseCase, Some(0), bound, Some(seed.vertex), || {
            (ids(&settled), Vec::new())
        });
        LevelResult { bound, settled }
    }

    fn emit<F>(
        &mut self,
        state: &RunState,
        event: Event,
        level: Option<usize>,
        bound: Bound,
        current: Option<VertexId>,
        sets: F,
    ) where
        F: FnOnce() -> (Vec<VertexId>, Vec<VertexId>),
    {
        if !self.observer.enabled() {
            return;
        }
        let (frontier, pivots) = sets();
        self.observer.observe(&Snapshot {
            event,
            level,
            bound: bound.distance(),
            distance: &state.distance,
            finalized: &state.finalized,
            frontier: &frontier,
            pivots: &pivots,
            current,
        });
    }
}

fn ids(pairs: &[WeightedPair]) -> Vec<VertexId> {
    pairs.iter().map(|p| p.vertex).collect()
}

fn sorted(vertices: impl Iterator<Item = VertexId>) -> Vec<VertexId> {
    let mut out: Vec<VertexId> = vertices.collect();
    out.sort_unstable();
    out
}
