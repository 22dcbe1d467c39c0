//! **pathstep-core**: shared types for the pathstep workspace.
//!
//! Geometry primitives used by the search engines, plus the pieces of the
//! terminal front-end that are not tied to a back-end: styled cells, the
//! drawing grid, input messages, and the Elm-architecture application loop
//! that owns the animation clock.

pub mod app;
pub mod cell;
pub mod geom;
pub mod grid;
pub mod messages;
pub mod style;

pub use app::{App, AppConfig, Driver, Effect, Model};
pub use cell::Cell;
pub use geom::{Point, Range};
pub use grid::Grid;
pub use messages::*;
pub use style::{Color, Style};
