//! Maze generators that advance one cell per step.
//!
//! Two generators share [`MazeGen`]:
//! - **Random fill**: visits every cell in row-major order and blocks it
//!   with probability `density`.
//! - **Recursive backtracker**: starts from a fully blocked grid and carves
//!   corridors between cells two apart, backtracking at dead ends.

use pathstep_core::Point;
use pathstep_search::{CellGrid, CellState};
use rand::{Rng, RngExt};

/// Default share of cells a random fill blocks.
pub const DEFAULT_DENSITY: f64 = 1.0 / 3.0;

/// Which generator a [`MazeGen`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MazeKind {
    RandomFill,
    Backtracker,
}

/// What a single [`MazeGen::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeStep {
    /// Nothing is set up.
    Idle,
    /// The cell at the point was given a new state.
    Set(Point, CellState),
    /// The backtracker left a dead end.
    Backtracked(Point),
    /// Generation is over.
    Finished,
}

/// Stepwise maze generator over an owned [`CellGrid`].
pub struct MazeGen<R: Rng> {
    rng: R,
    grid: CellGrid,
    density: f64,
    keep_clear: Vec<Point>,
    kind: Option<MazeKind>,
    // Random fill: next row-major index to decide.
    next: usize,
    // Backtracker: the carving path.
    stack: Vec<Point>,
    finished: bool,
}

impl<R: Rng> MazeGen<R> {
    /// Create a generator over an empty `width` x `height` grid.
    pub fn new(width: i32, height: i32, rng: R) -> Self {
        Self::with_grid(CellGrid::new(width, height), rng)
    }

    /// Create a generator that starts from an existing layout.
    pub fn with_grid(grid: CellGrid, rng: R) -> Self {
        Self {
            rng,
            grid,
            density: DEFAULT_DENSITY,
            keep_clear: Vec::new(),
            kind: None,
            next: 0,
            stack: Vec::new(),
            finished: false,
        }
    }

    /// Share of cells a random fill blocks, clamped to `0.0..=1.0`.
    pub fn set_density(&mut self, density: f64) {
        self.density = if density.is_nan() {
            DEFAULT_DENSITY
        } else {
            density.clamp(0.0, 1.0)
        };
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Cells that must stay empty whatever the generator decides, typically
    /// the search start and goal.
    pub fn set_keep_clear(&mut self, points: &[Point]) {
        self.keep_clear = points.to_vec();
    }

    /// Replace the layout the next random fill starts from.
    pub fn set_grid(&mut self, grid: CellGrid) {
        self.grid = grid;
        self.kind = None;
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn into_grid(self) -> CellGrid {
        self.grid
    }

    pub fn kind(&self) -> Option<MazeKind> {
        self.kind
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_running(&self) -> bool {
        self.kind.is_some() && !self.finished
    }

    /// Prepare a run of `kind`. The backtracker carves from `origin`.
    pub fn set_up(&mut self, kind: MazeKind, origin: Point) {
        self.kind = Some(kind);
        self.finished = false;
        self.next = 0;
        self.stack.clear();
        if kind == MazeKind::Backtracker {
            self.grid.fill(CellState::Obstacle);
            if self.grid.contains(origin) {
                self.grid.set(origin, CellState::Empty);
                self.stack.push(origin);
            }
        }
        log::debug!(
            "maze {kind:?} set up on a {}x{} grid",
            self.grid.width(),
            self.grid.height()
        );
    }

    /// Advance generation by one cell.
    pub fn step(&mut self) -> MazeStep {
        let Some(kind) = self.kind else {
            return MazeStep::Idle;
        };
        if self.finished {
            return MazeStep::Finished;
        }
        match kind {
            MazeKind::RandomFill => self.step_random_fill(),
            MazeKind::Backtracker => self.step_backtracker(),
        }
    }

    /// Step until finished; returns the number of steps taken.
    pub fn run(&mut self) -> usize {
        let mut n = 0;
        while self.is_running() {
            self.step();
            n += 1;
        }
        n
    }

    fn step_random_fill(&mut self) -> MazeStep {
        let width = self.grid.width();
        let len = self.grid.bounds().len();
        if self.next >= len || width == 0 {
            return self.finish();
        }
        let i = self.next as i32;
        let p = Point::new(i % width, i / width);
        self.next += 1;
        let state = if !self.keep_clear.contains(&p) && self.rng.random_bool(self.density) {
            CellState::Obstacle
        } else {
            CellState::Empty
        };
        self.grid.set(p, state);
        MazeStep::Set(p, state)
    }

    fn step_backtracker(&mut self) -> MazeStep {
        let Some(&cur) = self.stack.last() else {
            return self.finish();
        };
        let candidates: Vec<Point> = [
            Point::new(0, -2),
            Point::new(2, 0),
            Point::new(0, 2),
            Point::new(-2, 0),
        ]
        .into_iter()
        .map(|d| cur + d)
        .filter(|&q| self.grid.at(q) == Some(CellState::Obstacle))
        .collect();

        if candidates.is_empty() {
            self.stack.pop();
            return MazeStep::Backtracked(cur);
        }
        let next = candidates[self.rng.random_range(0..candidates.len())];
        let wall = Point::new((cur.x + next.x) / 2, (cur.y + next.y) / 2);
        self.grid.set(wall, CellState::Empty);
        self.grid.set(next, CellState::Empty);
        self.stack.push(next);
        MazeStep::Set(next, CellState::Empty)
    }

    fn finish(&mut self) -> MazeStep {
        self.finished = true;
        for &p in &self.keep_clear {
            self.grid.set(p, CellState::Empty);
        }
        log::info!(
            "maze finished with {} obstacles",
            self.grid.count(CellState::Obstacle)
        );
        MazeStep::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathstep_search::{GridAlgorithm, GridSearch};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded(w: i32, h: i32, seed: u64) -> MazeGen<StdRng> {
        MazeGen::new(w, h, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn random_fill_visits_each_cell_once() {
        let mut mg = seeded(7, 5, 1);
        mg.set_up(MazeKind::RandomFill, Point::ZERO);
        let mut seen = Vec::new();
        loop {
            match mg.step() {
                MazeStep::Set(p, _) => seen.push(p),
                MazeStep::Finished => break,
                other => panic!("unexpected step {other:?}"),
            }
        }
        let expected: Vec<Point> = mg.grid().bounds().iter().collect();
        assert_eq!(seen, expected);
        assert_eq!(mg.step(), MazeStep::Finished);
    }

    #[test]
    fn random_fill_density_is_roughly_respected() {
        let mut mg = seeded(40, 40, 9);
        mg.set_up(MazeKind::RandomFill, Point::ZERO);
        mg.run();
        let blocked = mg.grid().count(CellState::Obstacle) as f64 / 1600.0;
        assert!((0.25..0.42).contains(&blocked), "density {blocked}");

        let mut all = seeded(6, 6, 2);
        all.set_density(1.0);
        all.set_keep_clear(&[Point::new(0, 0), Point::new(5, 5)]);
        all.set_up(MazeKind::RandomFill, Point::ZERO);
        all.run();
        assert_eq!(all.grid().count(CellState::Obstacle), 34);
        assert_eq!(all.grid().at(Point::new(5, 5)), Some(CellState::Empty));
    }

    #[test]
    fn backtracker_carves_every_lattice_cell() {
        let mut mg = seeded(9, 7, 5);
        mg.set_up(MazeKind::Backtracker, Point::new(0, 0));
        assert!(mg.run() > 0);
        for y in (0..7).step_by(2) {
            for x in (0..9).step_by(2) {
                assert_eq!(mg.grid().at(Point::new(x, y)), Some(CellState::Empty));
            }
        }
        // Odd-odd cells are never carved.
        assert_eq!(mg.grid().at(Point::new(1, 1)), Some(CellState::Obstacle));
    }

    #[test]
    fn backtracker_connects_start_and_goal() {
        for seed in 0..5 {
            let (start, goal) = (Point::new(0, 0), Point::new(10, 10));
            let mut mg = seeded(11, 11, seed);
            mg.set_keep_clear(&[start, goal]);
            mg.set_up(MazeKind::Backtracker, start);
            mg.run();
            let mut search = GridSearch::new(mg.into_grid(), start, goal).unwrap();
            search.set_up(GridAlgorithm::Bfs);
            search.advance(10_000);
            assert!(search.trace_shortest_path().is_ok(), "seed {seed}");
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let mut a = seeded(15, 15, 42);
        let mut b = seeded(15, 15, 42);
        for mg in [&mut a, &mut b] {
            mg.set_up(MazeKind::Backtracker, Point::new(2, 2));
            mg.run();
        }
        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn idle_until_set_up() {
        let mut mg = seeded(3, 3, 0);
        assert_eq!(mg.step(), MazeStep::Idle);
        assert!(!mg.is_running());
        mg.set_density(f64::NAN);
        assert_eq!(mg.density(), DEFAULT_DENSITY);
    }
}
