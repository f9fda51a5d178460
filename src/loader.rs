//! Edge-list loader.
//!
//! Each non-blank line is `from,to,weight` optionally followed by further
//! comma-separated columns, which are ignored. Lines starting with `#` are
//! comments. Both endpoints of every parsed line become vertices even when
//! the edge itself is dropped for carrying a negative weight.
//!
//! Vertex ids size the graph directly, so ids at or above a vertex limit
//! are rejected as parse errors before anything is allocated for them.

use std::io::BufRead;

use tracing::debug;

use crate::error::GraphError;
use crate::graph::{Graph, GraphBuilder, VertexId};

/// Largest vertex count [`read_edge_list`] will build.
pub const DEFAULT_VERTEX_LIMIT: usize = 1 << 26;

/// Read an edge list from `reader` into a directed or undirected graph of at
/// most [`DEFAULT_VERTEX_LIMIT`] vertices.
pub fn read_edge_list<R: BufRead>(reader: R, undirected: bool) -> Result<Graph, GraphError> {
    read_edge_list_with_limit(reader, undirected, DEFAULT_VERTEX_LIMIT)
}

/// [`read_edge_list`] with an explicit bound on the vertex count: every id
/// must be below `vertex_limit`.
pub fn read_edge_list_with_limit<R: BufRead>(
    reader: R,
    undirected: bool,
    vertex_limit: usize,
) -> Result<Graph, GraphError> {
    let mut builder = if undirected {
        GraphBuilder::undirected()
    } else {
        GraphBuilder::directed()
    };
    let mut skipped = 0usize;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (from, to, weight) = parse_line(trimmed, index + 1)?;
        let highest = from.max(to);
        if highest >= vertex_limit {
            return Err(GraphError::Parse {
                line: index + 1,
                reason: format!("vertex id {highest} exceeds the limit of {vertex_limit} vertices"),
            });
        }
        builder.ensure_vertex(highest);
        if weight < 0.0 {
            skipped += 1;
            continue;
        }
        builder.add_edge(from, to, weight).map_err(|err| GraphError::Parse {
            line: index + 1,
            reason: err.to_string(),
        })?;
    }
    if skipped > 0 {
        debug!(skipped, "dropped negative-weight edges");
    }
    Ok(builder.build())
}

fn parse_line(line: &str, line_no: usize) -> Result<(VertexId, VertexId, f64), GraphError> {
    let parse_err = |reason: String| GraphError::Parse { line: line_no, reason };
    let mut fields = line.split(',').map(str::trim);
    let mut next = |name: &str| {
        fields
            .next()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| parse_err(format!("missing {name}")))
    };
    let from = next("source")?;
    let to = next("target")?;
    let weight = next("weight")?;
    let from = from
        .parse::<VertexId>()
        .map_err(|e| parse_err(format!("bad source {from:?}: {e}")))?;
    let to = to
        .parse::<VertexId>()
        .map_err(|e| parse_err(format!("bad target {to:?}: {e}")))?;
    let weight = weight
        .parse::<f64>()
        .map_err(|e| parse_err(format!("bad weight {weight:?}: {e}")))?;
    Ok((from, to, weight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn reads_edges_and_ignores_extra_columns() {
        let input = "# header\n0,1,2.5\n\n1,2,1.0,99,label\n";
        let g = read_edge_list(input.as_bytes(), false).unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edges(0).next().map(|e| e.weight), Some(2.5));
    }

    #[test]
    fn negative_weights_still_create_vertices() {
        let g = read_edge_list("0,1,1.0\n1,7,-3.0\n".as_bytes(), false).unwrap();
        assert_eq!(g.vertex_count(), 8);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn explicit_limit_bounds_both_endpoints() {
        let g = read_edge_list_with_limit("0,3,1.0\n".as_bytes(), false, 4).unwrap();
        assert_eq!(g.vertex_count(), 4);
        match read_edge_list_with_limit("4,0,1.0\n".as_bytes(), false, 4) {
            Err(GraphError::Parse { line: 1, reason }) => assert!(reason.contains("limit")),
            other => panic!("expected limit error, got {other:?}"),
        }
    }

    #[test]
    fn undirected_mode_mirrors_edges() {
        let g = read_edge_list("0,1,1.0\n".as_bytes(), true).unwrap();
        assert_eq!(g.edges(1).next().map(|e| e.target), Some(0));
    }

    #[rstest]
    #[case("0,1\n", 1)]
    #[case("0,1,1.0\nx,1,1.0\n", 2)]
    #[case("0,1,1.0\n\n2,3,abc\n", 3)]
    #[case("0,1,inf\n", 1)]
    #[case("0,1,1.0\n0,999999999999,1\n", 2)]
    #[case("18446744073709551615,0,1\n", 1)]
    fn malformed_lines_report_their_number(#[case] input: &str, #[case] expected: usize) {
        match read_edge_list(input.as_bytes(), false) {
            Err(GraphError::Parse { line, .. }) => assert_eq!(line, expected),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
