//! Binary-heap Dijkstra, the reference the BMSSP solver is checked against.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{Result, SsspError};
use crate::graph::{Graph, VertexId};
use crate::heap::{HeapStats, MinHeap};
use crate::observer::{Event, NoopObserver, Observer, Snapshot};
use crate::pair::{round_distance, WeightedPair};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DijkstraStats {
    /// Successful distance improvements.
    pub relaxations: u64,
    pub settled: u64,
    pub heap: HeapStats,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShortestPaths {
    pub distance: Vec<f64>,
    /// Last hop on a shortest path; `None` for the source and unreachable
    /// vertices.
    pub predecessor: Vec<Option<VertexId>>,
    pub stats: DijkstraStats,
}

impl ShortestPaths {
    /// Vertices from `source` to `target`, or `None` when unreachable.
    pub fn path_to(&self, target: VertexId) -> Option<Vec<VertexId>> {
        if !self.distance.get(target)?.is_finite() {
            return None;
        }
        let mut path = vec![target];
        let mut v = target;
        while let Some(p) = self.predecessor[v] {
            path.push(p);
            v = p;
        }
        path.reverse();
        Some(path)
    }
}

pub fn dijkstra(graph: &Graph, source: VertexId) -> Result<ShortestPaths> {
    dijkstra_observed(graph, source, NoopObserver)
}

/// [`dijkstra`] reporting every settle and improvement to `observer`.
#[instrument(name = "dijkstra.run", skip(graph, observer), fields(n = graph.vertex_count()))]
pub fn dijkstra_observed<O: Observer>(
    graph: &Graph,
    source: VertexId,
    mut observer: O,
) -> Result<ShortestPaths> {
    let n = graph.vertex_count();
    if n == 0 {
        return Err(SsspError::EmptyGraph);
    }
    if source >= n {
        return Err(SsspError::SourceOutOfRange { vertex: source, vertex_count: n });
    }

    let mut distance = vec![f64::INFINITY; n];
    let mut predecessor = vec![None; n];
    let mut settled = vec![false; n];
    let mut stats = DijkstraStats::default();
    let mut heap = MinHeap::with_capacity(n.min(1024));

    distance[source] = 0.0;
    heap.push(WeightedPair::new(source, 0.0));
    emit(&mut observer, Event::Start, &distance, &settled, &heap, Some(source));

    while let Some(top) = heap.pop() {
        let u = top.vertex;
        if settled[u] || top.distance > round_distance(distance[u]) {
            continue;
        }
        settled[u] = true;
        stats.settled += 1;
        emit(&mut observer, Event::Settle, &distance, &settled, &heap, Some(u));

        let du = distance[u];
        for e in graph.edges(u) {
            let candidate = du + e.weight;
            if candidate < distance[e.target] {
                distance[e.target] = candidate;
                predecessor[e.target] = Some(u);
                heap.push(WeightedPair::new(e.target, candidate));
                stats.relaxations += 1;
                emit(&mut observer, Event::Relax, &distance, &settled, &heap, Some(u));
            }
        }
    }

    stats.heap = heap.stats();
    emit(&mut observer, Event::Done, &distance, &settled, &heap, None);
    debug!(settled = stats.settled, relaxations = stats.relaxations, "dijkstra finished");
    Ok(ShortestPaths { distance, predecessor, stats })
}

fn emit<O: Observer>(
    observer: &mut O,
    event: Event,
    distance: &[f64],
    finalized: &[bool],
    heap: &MinHeap<WeightedPair>,
    current: Option<VertexId>,
) {
    if !observer.enabled() {
        return;
    }
    let frontier: Vec<VertexId> = heap.as_slice().iter().map(|p| p.vertex).collect();
    observer.observe(&Snapshot {
        event,
        level: None,
        bound: f64::INFINITY,
        distance,
        finalized,
        frontier: &frontier,
        pivots: &[],
        current,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators;
    use crate::graph::GraphBuilder;
    use crate::observer::Recorder;

    fn diamond() -> Graph {
        let mut b = GraphBuilder::directed();
        b.add_edge(0, 1, 1.0).unwrap();
        b.add_edge(0, 2, 4.0).unwrap();
        b.add_edge(1, 2, 2.0).unwrap();
        b.add_edge(2, 3, 1.0).unwrap();
        b.add_edge(1, 3, 5.0).unwrap();
        b.with_vertices(5).build()
    }

    #[test]
    fn distances_and_predecessors() {
        let sp = dijkstra(&diamond(), 0).unwrap();
        assert_eq!(sp.distance, vec![0.0, 1.0, 3.0, 4.0, f64::INFINITY]);
        assert_eq!(sp.predecessor, vec![None, Some(0), Some(1), Some(2), None]);
        assert_eq!(sp.path_to(3), Some(vec![0, 1, 2, 3]));
        assert_eq!(sp.path_to(4), None);
        assert_eq!(sp.stats.settled, 4);
    }

    #[test]
    fn heap_counters_balance() {
        let sp = dijkstra(&generators::grid(6, 6, 1.0).unwrap(), 0).unwrap();
        let heap = sp.stats.heap;
        assert_eq!(heap.pushes, heap.pops);
        assert_eq!(heap.pushes, sp.stats.relaxations + 1);
        assert!(heap.max_size >= 1);
    }

    #[test]
    fn rejects_bad_source() {
        let g = generators::path(3, 1.0).unwrap();
        assert_eq!(
            dijkstra(&g, 7).unwrap_err(),
            SsspError::SourceOutOfRange { vertex: 7, vertex_count: 3 }
        );
        assert_eq!(dijkstra(&Graph::default(), 0).unwrap_err(), SsspError::EmptyGraph);
    }

    #[test]
    fn observer_sees_each_settle() {
        let g = generators::path(4, 2.0).unwrap();
        let mut rec = Recorder::new();
        let sp = dijkstra_observed(&g, 0, &mut rec).unwrap();
        let settles: Vec<_> =
            rec.frames().iter().filter(|f| f.event == Event::Settle).filter_map(|f| f.current).collect();
        assert_eq!(settles, vec![0, 1, 2, 3]);
        assert_eq!(rec.events().next(), Some(Event::Start));
        assert_eq!(rec.events().last(), Some(Event::Done));
        assert_eq!(sp.distance, vec![0.0, 2.0, 4.0, 6.0]);
    }
}
