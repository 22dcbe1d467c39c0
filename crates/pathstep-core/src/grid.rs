//! The screen [`Grid`]: what a [`Model`](crate::app::Model) draws into, and
//! the [`Frame`] diff that a [`Driver`](crate::app::Driver) flushes.

use crate::cell::Cell;
use crate::geom::{Point, Range};
use crate::style::Style;

/// A 2D buffer of styled [`Cell`]s in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    bounds: Range,
}

impl Grid {
    /// Create a new grid of the given dimensions, filled with default cells.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::new(0, 0, width.max(0), height.max(0));
        Self {
            cells: vec![Cell::default(); bounds.len()],
            bounds,
        }
    }

    /// The grid rectangle, always anchored at the origin.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        Some(p.y as usize * self.width() as usize + p.x as usize)
    }

    /// The cell at `p`; out-of-bounds positions read as the default cell.
    pub fn at(&self, p: Point) -> Cell {
        self.index(p).map(|i| self.cells[i]).unwrap_or_default()
    }

    /// Set the cell at `p`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, p: Point, cell: Cell) {
        if let Some(i) = self.index(p) {
            self.cells[i] = cell;
        }
    }

    /// Fill the whole grid with `cell`.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Fill the part of `rng` that lies inside the grid with `cell`.
    pub fn fill_range(&mut self, rng: Range, cell: Cell) {
        for p in rng.intersect(self.bounds) {
            self.set(p, cell);
        }
    }

    /// Write `text` starting at `p`, one char per cell, clipped to the
    /// grid. Returns the position just after the last written char.
    pub fn draw_text(&mut self, p: Point, text: &str, style: Style) -> Point {
        let mut cur = p;
        for ch in text.chars() {
            self.set(cur, Cell::new(ch, style));
            cur = cur.shift(1, 0);
        }
        cur
    }

    /// Copy every cell from `src`; both grids must have the same size.
    pub fn copy_from(&mut self, src: &Grid) {
        if self.bounds == src.bounds {
            self.cells.copy_from_slice(&src.cells);
        }
    }

    /// Iterate over `(Point, Cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        self.bounds.iter().zip(self.cells.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Frame / FrameCell / compute_frame
// ---------------------------------------------------------------------------

/// A single cell that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameCell {
    pub cell: Cell,
    pub pos: Point,
}

/// A set of cell changes (a diff frame).
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

/// Compute the difference between two same-sized grids.
pub fn compute_frame(prev: &Grid, curr: &Grid) -> Frame {
    let cells = curr
        .iter()
        .filter(|&(p, c)| prev.at(p) != c)
        .map(|(pos, cell)| FrameCell { cell, pos })
        .collect();
    Frame {
        cells,
        width: curr.width(),
        height: curr.height(),
    }
}
