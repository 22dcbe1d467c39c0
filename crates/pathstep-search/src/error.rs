//! Errors reported by the editing boundary and by path reconstruction.
//!
//! Neither kind is fatal: an editor shows the message and carries on, and a
//! failed trace leaves the overlay exactly as the search left it.

use std::fmt;

use pathstep_core::Point;

/// An edit rejected before it could reach an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// A coordinate outside the grid.
    OutOfBounds { pos: Point, size: Point },
    /// A vertex id that does not exist.
    UnknownVertex { id: usize, len: usize },
    /// Edge weight text that is not an integer.
    InvalidWeight(String),
    /// A replacement topology whose size differs from the engine's.
    SizeMismatch { expected: Point, found: Point },
    /// Stored cells that do not fill a `width` x `height` grid.
    CellCount {
        width: i32,
        height: i32,
        found: usize,
    },
    /// A text grid row of the wrong width.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { pos, size } => {
                write!(f, "position {pos} is outside the {}x{} grid", size.x, size.y)
            }
            Self::UnknownVertex { id, len } => {
                write!(f, "vertex {id} does not exist (graph has {len} vertices)")
            }
            Self::InvalidWeight(s) => write!(f, "invalid edge weight \u{201c}{s}\u{201d}: expected an integer"),
            Self::SizeMismatch { expected, found } => write!(
                f,
                "grid size mismatch: expected {}x{}, found {}x{}",
                expected.x, expected.y, found.x, found.y
            ),
            Self::CellCount {
                width,
                height,
                found,
            } => write!(f, "a {width}x{height} grid cannot hold {found} cells"),
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
        }
    }
}

impl std::error::Error for EditError {}

/// Why no path could be reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceError {
    /// The search has not finished yet.
    NotFinished,
    /// The goal (or sink) was never reached.
    Unreached,
    /// Bellman-Ford found a negative-weight cycle reaching `vertex`.
    NegativeCycle { vertex: usize },
    /// The graph has no vertices.
    Empty,
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinished => f.write_str("search has not finished"),
            Self::Unreached => f.write_str("no path found"),
            Self::NegativeCycle { vertex } => {
                write!(f, "graph contains a negative weight cycle (at vertex {vertex})")
            }
            Self::Empty => f.write_str("the graph is empty"),
        }
    }
}

impl std::error::Error for TraceError {}
