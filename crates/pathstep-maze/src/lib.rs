//! Obstacle layouts for the grid search, generated one cell per tick so the
//! generation can be animated like a search.

mod maze;

pub use maze::{DEFAULT_DENSITY, MazeGen, MazeKind, MazeStep};
