//! Single-source shortest paths over non-negative weights.
//!
//! Two solvers share one CSR [`Graph`]:
//!  - [`dijkstra`]: classic binary-heap baseline with predecessors
//!  - [`Bmssp`]: bounded multi-source shortest paths, a recursive
//!    divide-and-conquer solver built on the [`frontier::Frontier`]
//!    partition structure
//!
//! Both are also exposed through a stable C ABI (see [`ffi`]).
//!
//! ```
//! use bmssp_core::{generators, Bmssp};
//!
//! let grid = generators::grid(5, 5, 1.0).unwrap();
//! let dist = Bmssp::new(&grid, 0).unwrap().run();
//! assert_eq!(dist[24], 8.0);
//! ```

pub mod bmssp;
pub mod dijkstra;
pub mod error;
pub mod ffi;
pub mod frontier;
pub mod generators;
pub mod graph;
pub mod heap;
pub mod loader;
pub mod observer;
pub mod pair;

pub use bmssp::{Bmssp, Params, RunStats};
pub use dijkstra::{dijkstra, dijkstra_observed, DijkstraStats, ShortestPaths};
pub use error::{GraphError, Result, SsspError};
pub use ffi::SsspResultInfo;
pub use graph::{Edge, Graph, GraphBuilder, VertexId};
pub use heap::HeapStats;
pub use loader::{read_edge_list, read_edge_list_with_limit};
pub use observer::{Event, Frame, NoopObserver, Observer, Recorder, Snapshot};
pub use pair::{Bound, WeightedPair};
