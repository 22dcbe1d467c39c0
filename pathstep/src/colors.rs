//! Colour palette for a dark terminal background.

use pathstep_core::style::Color;

use pathstep_search::{CellState, VertexMark};

use crate::log::LogStyle;

/// Default terminal colours (reset).
pub const BG: Color = Color::DEFAULT;
pub const FG: Color = Color::DEFAULT;

/// Status bar and menu highlight background.
pub const BG_BAR: Color = Color::from_rgb(40, 42, 54);
pub const FG_DIM: Color = Color::from_rgb(98, 100, 106);
pub const FG_EMPH: Color = Color::from_rgb(248, 248, 242);

pub const RED: Color = Color::from_rgb(255, 85, 85);
pub const GREEN: Color = Color::from_rgb(80, 200, 80);
pub const YELLOW: Color = Color::from_rgb(220, 200, 60);
pub const MAGENTA: Color = Color::from_rgb(210, 100, 210);
pub const CYAN: Color = Color::from_rgb(80, 210, 210);
pub const ORANGE: Color = Color::from_rgb(220, 140, 50);

// -- Grid cells --

pub const CELL_EMPTY: Color = Color::from_rgb(30, 32, 40);
pub const CELL_OBSTACLE: Color = Color::from_rgb(150, 155, 170);
pub const CELL_HELPER: Color = Color::from_rgb(120, 60, 140);
pub const CELL_ROUTE: Color = YELLOW;
pub const CELL_START: Color = GREEN;
pub const CELL_GOAL: Color = RED;

/// Background colour of a grid cell.
pub fn cell_bg(state: CellState) -> Color {
    match state {
        CellState::Empty => CELL_EMPTY,
        CellState::Obstacle => CELL_OBSTACLE,
        CellState::RouteHelper => CELL_HELPER,
        CellState::Route => CELL_ROUTE,
    }
}

/// Background colour of a graph vertex.
pub fn vertex_bg(mark: VertexMark) -> Color {
    match mark {
        VertexMark::Unvisited => CELL_OBSTACLE,
        VertexMark::Expanded => MAGENTA,
        VertexMark::Path => YELLOW,
        VertexMark::Source => GREEN,
        VertexMark::Sink | VertexMark::Cycle => RED,
    }
}

pub fn log_fg(style: LogStyle) -> Color {
    match style {
        LogStyle::Normal => FG_DIM,
        LogStyle::Info => CYAN,
        LogStyle::Warn => ORANGE,
        LogStyle::Error => RED,
    }
}
