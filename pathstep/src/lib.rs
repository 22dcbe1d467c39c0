//! pathstep: watch graph searches run one step at a time in the terminal.
//!
//! The grid page animates BFS, DFS, Dijkstra, A* and greedy best-first
//! search over an editable obstacle grid; the graph page animates BFS, DFS,
//! Dijkstra and Bellman-Ford over a user-drawn weighted digraph.

pub mod colors;
pub mod config;
pub mod graph_page;
pub mod grid_page;
pub mod log;
pub mod model;
pub mod weight_input;

pub use config::{Config, ConfigError, USAGE};
pub use model::{PathstepModel, ui_size};
