//! Synthetic graph families used by the tests, demos and benchmarks.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::GraphError;
use crate::graph::{Graph, GraphBuilder, VertexId};

/// `width × height` four-neighbour lattice, undirected, every edge `weight`.
/// Cell `(x, y)` is vertex `y * width + x`.
pub fn grid(width: usize, height: usize, weight: f64) -> Result<Graph, GraphError> {
    let mut b = GraphBuilder::undirected().with_vertices(width * height);
    for y in 0..height {
        for x in 0..width {
            let v = y * width + x;
            if x + 1 < width {
                b.add_edge(v, v + 1, weight)?;
            }
            if y + 1 < height {
                b.add_edge(v, v + width, weight)?;
            }
        }
    }
    Ok(b.build())
}

/// Directed chain `0 -> 1 -> … -> n-1`.
pub fn path(n: usize, weight: f64) -> Result<Graph, GraphError> {
    let mut b = GraphBuilder::directed().with_vertices(n);
    for u in 1..n {
        b.add_edge(u - 1, u, weight)?;
    }
    Ok(b.build())
}

/// Centre 0 with directed spokes to leaves `1..=leaves`.
pub fn star(leaves: usize, weight: f64) -> Result<Graph, GraphError> {
    let mut b = GraphBuilder::directed().with_vertices(leaves + 1);
    for leaf in 1..=leaves {
        b.add_edge(0, leaf, weight)?;
    }
    Ok(b.build())
}

pub fn complete(n: usize, weight: f64) -> Result<Graph, GraphError> {
    let mut b = GraphBuilder::directed().with_vertices(n);
    for u in 0..n {
        for v in (0..n).filter(|&v| v != u) {
            b.add_edge(u, v, weight)?;
        }
    }
    Ok(b.build())
}

/// Two directed cliques of sizes `a` and `b` joined by the single edge
/// `a-1 -> a`.
pub fn bridge_cliques(a: usize, b: usize, weight: f64) -> Result<Graph, GraphError> {
    let mut g = GraphBuilder::directed().with_vertices(a + b);
    for (lo, hi) in [(0, a), (a, a + b)] {
        for u in lo..hi {
            for v in (lo..hi).filter(|&v| v != u) {
                g.add_edge(u, v, weight)?;
            }
        }
    }
    if a > 0 && b > 0 {
        g.add_edge(a - 1, a, weight)?;
    }
    Ok(g.build())
}

/// Seeded random directed graph: every vertex gets `out_degree` edges to
/// uniformly drawn targets (self loops skipped) with weights drawn from
/// `min_weight..max_weight`.
pub fn random(
    n: usize,
    out_degree: usize,
    min_weight: f64,
    max_weight: f64,
    seed: u64,
) -> Result<Graph, GraphError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut b = GraphBuilder::directed().with_vertices(n);
    if n < 2 {
        return Ok(b.build());
    }
    for u in 0..n {
        for _ in 0..out_degree {
            let v: VertexId = rng.gen_range(0..n);
            if v == u {
                continue;
            }
            let w = if max_weight > min_weight {
                rng.gen_range(min_weight..max_weight)
            } else {
                min_weight
            };
            b.add_edge(u, v, w)?;
        }
    }
    Ok(b.build())
}

/// Up to `count` distinct source vertices that have at least one outgoing
/// edge, drawn with a fixed-seed generator so benchmark runs are repeatable.
pub fn sample_sources(graph: &Graph, count: usize, seed: u64) -> Vec<VertexId> {
    let mut eligible: Vec<VertexId> =
        graph.vertices().filter(|&v| graph.out_degree(v) > 0).collect();
    let mut rng = SmallRng::seed_from_u64(seed);
    let take = count.min(eligible.len());
    // partial Fisher-Yates
    for i in 0..take {
        let j = rng.gen_range(i..eligible.len());
        eligible.swap(i, j);
    }
    eligible.truncate(take);
    eligible
}
