//! Stepwise graph search.
//!
//! Two engines that advance a search one bounded unit of work per call to
//! `step`, so a caller can animate the algorithm one tick at a time:
//!
//! - [`GridSearch`]: BFS, DFS, Dijkstra, A\* and greedy best-first over a
//!   4-connected unit-cost [`CellGrid`].
//! - [`GraphSearch`]: BFS, DFS, Dijkstra and Bellman-Ford over a weighted,
//!   directed adjacency list.
//!
//! Both follow the same lifecycle:
//!
//! ```
//! use pathstep_core::Point;
//! use pathstep_search::{CellGrid, GridAlgorithm, GridSearch};
//!
//! let mut search = GridSearch::new(CellGrid::new(5, 5), Point::new(0, 0), Point::new(4, 4)).unwrap();
//! search.set_up(GridAlgorithm::Bfs);
//! while search.state().is_running() {
//!     search.step();
//! }
//! let path = search.trace_shortest_path().unwrap();
//! assert_eq!(path.len(), 9);
//! ```
//!
//! Edits (moving the start, toggling obstacles, adding edges) reset the
//! engine, discarding any search in progress.

mod cell;
mod distance;
mod edit;
mod error;
mod frontier;
mod graph;
mod grid;
mod state;

pub use cell::{CellGrid, CellState};
pub use distance::{euclidean, manhattan};
pub use edit::parse_weight;
pub use error::{EditError, TraceError};
pub use frontier::{Entry, Frontier, FrontierKind};
pub use graph::{Edge, GraphAlgorithm, GraphSearch, VertexMark};
pub use grid::{GridAlgorithm, GridSearch};
pub use state::{SearchState, Step, Termination};

/// Sentinel distance for cells and vertices not (yet) reached.
pub const UNREACHABLE: i32 = i32::MAX;
