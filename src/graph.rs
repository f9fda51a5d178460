//! Compressed sparse row graph store.
//!
//! `offsets[v]..offsets[v + 1]` indexes the outgoing edges of `v` inside the
//! parallel `targets` / `weights` arrays. Every weight is finite and
//! non-negative once a [`Graph`] exists.

use crate::error::GraphError;

pub type VertexId = usize;

/// One outgoing edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub target: VertexId,
    pub weight: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    offsets: Vec<usize>,
    targets: Vec<VertexId>,
    weights: Vec<f64>,
}

impl Graph {
    /// Build from raw CSR arrays, rejecting anything the solvers cannot
    /// consume.
    pub fn from_csr(
        offsets: Vec<usize>,
        targets: Vec<VertexId>,
        weights: Vec<f64>,
    ) -> Result<Self, GraphError> {
        if offsets.first() != Some(&0) {
            return Err(GraphError::MissingOffsets);
        }
        if targets.len() != weights.len() {
            return Err(GraphError::WeightCountMismatch {
                targets: targets.len(),
                weights: weights.len(),
            });
        }
        if let Some(index) = offsets.windows(2).position(|w| w[0] > w[1]) {
            return Err(GraphError::NonMonotoneOffsets { index: index + 1 });
        }
        let last = offsets[offsets.len() - 1];
        if last != targets.len() {
            return Err(GraphError::EdgeCountMismatch { last, edges: targets.len() });
        }
        let n = offsets.len() - 1;
        for from in 0..n {
            for i in offsets[from]..offsets[from + 1] {
                let (to, weight) = (targets[i], weights[i]);
                if to >= n {
                    return Err(GraphError::TargetOutOfRange { target: to, vertex_count: n });
                }
                check_weight(from, to, weight)?;
            }
        }
        Ok(Self { offsets, targets, weights })
    }

    /// Same as [`Graph::from_csr`] over the `u32` arrays the C ABI receives.
    pub fn from_csr_u32(
        offsets: &[u32],
        targets: &[u32],
        weights: &[f64],
    ) -> Result<Self, GraphError> {
        Self::from_csr(
            offsets.iter().map(|&o| o as usize).collect(),
            targets.iter().map(|&t| t as VertexId).collect(),
            weights.to_vec(),
        )
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    pub fn vertices(&self) -> std::ops::Range<VertexId> {
        0..self.vertex_count()
    }

    /// Outgoing edges of `v`. Panics when `v` is not a vertex of this graph.
    #[inline]
    pub fn edges(&self, v: VertexId) -> impl Iterator<Item = Edge> + '_ {
        let range = self.offsets[v]..self.offsets[v + 1];
        self.targets[range.clone()]
            .iter()
            .zip(&self.weights[range])
            .map(|(&target, &weight)| Edge { target, weight })
    }

    pub fn out_degree(&self, v: VertexId) -> usize {
        self.offsets[v + 1] - self.offsets[v]
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}

fn check_weight(from: VertexId, to: VertexId, weight: f64) -> Result<(), GraphError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(GraphError::InvalidWeight { from, to, weight })
    }
}

/// Incremental adjacency-list builder that grows the vertex range on demand.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    adjacency: Vec<Vec<Edge>>,
    undirected: bool,
}

impl GraphBuilder {
    pub fn directed() -> Self {
        Self::default()
    }

    /// Every `add_edge` also stores the reverse edge.
    pub fn undirected() -> Self {
        Self { undirected: true, ..Self::default() }
    }

    pub fn with_vertices(mut self, n: usize) -> Self {
        if n > 0 {
            self.ensure_vertex(n - 1);
        }
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn ensure_vertex(&mut self, v: VertexId) {
        if v >= self.adjacency.len() {
            self.adjacency.resize_with(v + 1, Vec::new);
        }
    }

    pub fn add_edge(
        &mut self,
        from: VertexId,
        to: VertexId,
        weight: f64,
    ) -> Result<&mut Self, GraphError> {
        check_weight(from, to, weight)?;
        self.ensure_vertex(from.max(to));
        self.adjacency[from].push(Edge { target: to, weight });
        if self.undirected && from != to {
            self.adjacency[to].push(Edge { target: from, weight });
        }
        Ok(self)
    }

    pub fn build(self) -> Graph {
        let edges: usize = self.adjacency.iter().map(Vec::len).sum();
        let mut offsets = Vec::with_capacity(self.adjacency.len() + 1);
        let mut targets = Vec::with_capacity(edges);
        let mut weights = Vec::with_capacity(edges);
        offsets.push(0);
        for list in self.adjacency {
            for e in list {
                targets.push(e.target);
                weights.push(e.weight);
            }
            offsets.push(targets.len());
        }
        Graph { offsets, targets, weights }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn builder_produces_csr_in_insertion_order() {
        let mut b = GraphBuilder::directed();
        b.add_edge(0, 2, 1.5).unwrap();
        b.add_edge(0, 1, 2.0).unwrap();
        b.add_edge(2, 1, 0.5).unwrap();
        let g = b.build();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.offsets(), &[0, 2, 2, 3]);
        let out: Vec<_> = g.edges(0).map(|e| (e.target, e.weight)).collect();
        assert_eq!(out, vec![(2, 1.5), (1, 2.0)]);
        assert_eq!(g.out_degree(1), 0);
    }

    #[test]
    fn undirected_builder_mirrors_edges_once_for_loops() {
        let mut b = GraphBuilder::undirected().with_vertices(4);
        b.add_edge(0, 1, 1.0).unwrap().add_edge(2, 2, 3.0).unwrap();
        let g = b.build();
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.edges(1).next(), Some(Edge { target: 0, weight: 1.0 }));
    }

    #[rstest]
    #[case(vec![], vec![], vec![], "GRAPH_MISSING_OFFSETS")]
    #[case(vec![1, 1], vec![0], vec![1.0], "GRAPH_MISSING_OFFSETS")]
    #[case(vec![0, 2, 1], vec![0, 1], vec![1.0, 1.0], "GRAPH_NON_MONOTONE_OFFSETS")]
    #[case(vec![0, 1, 1], vec![0, 1], vec![1.0, 1.0], "GRAPH_EDGE_COUNT_MISMATCH")]
    #[case(vec![0, 1], vec![0], vec![], "GRAPH_WEIGHT_COUNT_MISMATCH")]
    #[case(vec![0, 1], vec![3], vec![1.0], "GRAPH_TARGET_OUT_OF_RANGE")]
    #[case(vec![0, 1], vec![0], vec![-1.0], "GRAPH_INVALID_WEIGHT")]
    #[case(vec![0, 1], vec![0], vec![f64::NAN], "GRAPH_INVALID_WEIGHT")]
    fn from_csr_rejects_malformed_input(
        #[case] offsets: Vec<usize>,
        #[case] targets: Vec<usize>,
        #[case] weights: Vec<f64>,
        #[case] code: &str,
    ) {
        let err = Graph::from_csr(offsets, targets, weights).unwrap_err();
        assert_eq!(err.code(), code);
    }

    #[test]
    fn builder_rejects_negative_weight() {
        let mut b = GraphBuilder::directed();
        assert!(matches!(
            b.add_edge(0, 1, -0.5),
            Err(GraphError::InvalidWeight { from: 0, to: 1, .. })
        ));
        assert_eq!(b.vertex_count(), 0);
    }

    #[test]
    fn u32_arrays_convert() {
        let g = Graph::from_csr_u32(&[0, 1, 1], &[1], &[4.0]).unwrap();
        assert_eq!(g.vertices().collect::<Vec<_>>(), vec![0, 1]);
        assert!(!g.is_empty());
    }
}
