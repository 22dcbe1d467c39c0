//! Cell states and the owned [`CellGrid`] the grid engine searches over.

use pathstep_core::{Point, Range};

use crate::error::EditError;

/// What a grid cell currently shows.
///
/// `Obstacle` is topology; `Route` and `RouteHelper` are the search overlay
/// painted on top of empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    #[default]
    Empty,
    Obstacle,
    /// On the reconstructed path.
    Route,
    /// Expanded during the search but not on the final path.
    RouteHelper,
}

impl CellState {
    /// Whether the cell blocks movement.
    #[inline]
    pub const fn is_obstacle(self) -> bool {
        matches!(self, Self::Obstacle)
    }

    /// The topology underneath any overlay: obstacles stay, everything else
    /// becomes `Empty`.
    #[inline]
    pub const fn topology(self) -> Self {
        match self {
            Self::Obstacle => Self::Obstacle,
            _ => Self::Empty,
        }
    }
}

/// A fixed-size 2D grid of [`CellState`] values in row-major order.
///
/// Each grid owns its storage; cloning copies the cells, so a snapshot handed
/// to an engine never aliases the editor's grid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCellGrid"))]
pub struct CellGrid {
    cells: Vec<CellState>,
    width: i32,
    height: i32,
}

/// Unchecked serialized form of a [`CellGrid`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCellGrid {
    cells: Vec<CellState>,
    width: i32,
    height: i32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCellGrid> for CellGrid {
    type Error = EditError;

    fn try_from(raw: RawCellGrid) -> Result<Self, EditError> {
        let RawCellGrid {
            cells,
            width,
            height,
        } = raw;
        let expected = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h));
        if expected != Some(cells.len()) {
            return Err(EditError::CellCount {
                width,
                height,
                found: cells.len(),
            });
        }
        Ok(Self {
            cells,
            width,
            height,
        })
    }
}

impl CellGrid {
    /// Create a grid filled with `CellState::Empty`.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            cells: vec![CellState::Empty; (width * height) as usize],
            width,
            height,
        }
    }

    /// Build a grid from rows of text: `#` is an obstacle, anything else is
    /// empty. Every row must have the same length.
    pub fn parse(s: &str) -> Result<Self, EditError> {
        let rows: Vec<&str> = s.lines().map(str::trim_end).filter(|l| !l.is_empty()).collect();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut grid = Self::new(width as i32, rows.len() as i32);
        for (y, row) in rows.iter().enumerate() {
            let len = row.chars().count();
            if len != width {
                return Err(EditError::RaggedRow {
                    row: y,
                    expected: width,
                    found: len,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    grid.set(Point::new(x as i32, y as i32), CellState::Obstacle);
                }
            }
        }
        Ok(grid)
    }

    /// The grid rectangle, anchored at the origin.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    /// Size as a Point (width = x, height = y).
    #[inline]
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    /// Flat row-major index of `p`, or `None` when out of bounds.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some((p.y * self.width + p.x) as usize)
    }

    /// The cell at `p`, or `None` if out of bounds.
    #[inline]
    pub fn at(&self, p: Point) -> Option<CellState> {
        self.idx(p).map(|i| self.cells[i])
    }

    /// Set the cell at `p`. Does nothing if out of bounds.
    #[inline]
    pub fn set(&mut self, p: Point, state: CellState) {
        if let Some(i) = self.idx(p) {
            self.cells[i] = state;
        }
    }

    /// Fill the entire grid with `state`.
    pub fn fill(&mut self, state: CellState) {
        self.cells.fill(state);
    }

    /// Strip the search overlay, keeping only obstacles.
    pub fn clear_overlay(&mut self) {
        for c in self.cells.iter_mut() {
            *c = c.topology();
        }
    }

    /// Count how many cells equal `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// Iterate over `(Point, CellState)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, CellState)> + '_ {
        self.bounds().iter().zip(self.cells.iter().copied())
    }
}
