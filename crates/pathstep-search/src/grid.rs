//! Stepwise search over a 4-connected, unit-cost cell grid.

use std::fmt;

use pathstep_core::Point;

use crate::cell::{CellGrid, CellState};
use crate::distance::euclidean;
use crate::error::{EditError, TraceError};
use crate::frontier::{Entry, Frontier, FrontierKind};
use crate::state::{SearchState, Step, Termination};
use crate::UNREACHABLE;

/// The algorithms the grid engine can animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridAlgorithm {
    Bfs,
    Dfs,
    Dijkstra,
    AStar,
    /// Greedy best-first search.
    Gbfs,
}

impl GridAlgorithm {
    pub const ALL: [Self; 5] = [Self::Bfs, Self::Dfs, Self::Dijkstra, Self::AStar, Self::Gbfs];

    /// The frontier container this algorithm expands from.
    pub const fn frontier_kind(self) -> FrontierKind {
        match self {
            Self::Bfs => FrontierKind::Queue,
            Self::Dfs => FrontierKind::Stack,
            Self::Dijkstra | Self::AStar | Self::Gbfs => FrontierKind::MinHeap,
        }
    }

    /// Whether popping the goal ends the search immediately.
    pub const fn stops_at_goal(self) -> bool {
        matches!(self, Self::AStar | Self::Gbfs)
    }
}

impl fmt::Display for GridAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bfs => "BFS",
            Self::Dfs => "DFS",
            Self::Dijkstra => "Dijkstra",
            Self::AStar => "A*",
            Self::Gbfs => "GBFS",
        })
    }
}

#[derive(Debug, Clone)]
struct Active {
    algorithm: GridAlgorithm,
    frontier: Frontier<Point>,
}

/// A grid search that advances one frontier pop per [`step`](Self::step).
///
/// The engine owns a private copy of the topology. The same [`CellGrid`]
/// doubles as the overlay: expanded cells become
/// [`CellState::RouteHelper`] and the traced path [`CellState::Route`].
#[derive(Debug, Clone)]
pub struct GridSearch {
    cells: CellGrid,
    distances: Vec<i32>,
    visited: Vec<bool>,
    active: Option<Active>,
    state: SearchState,
    start: Point,
    goal: Point,
}

impl GridSearch {
    /// Create an engine over `cells` searching from `start` to `goal`.
    pub fn new(cells: CellGrid, start: Point, goal: Point) -> Result<Self, EditError> {
        for p in [start, goal] {
            if !cells.contains(p) {
                return Err(EditError::OutOfBounds {
                    pos: p,
                    size: cells.size(),
                });
            }
        }
        let len = cells.bounds().len();
        let mut engine = Self {
            cells,
            distances: vec![UNREACHABLE; len],
            visited: vec![false; len],
            active: None,
            state: SearchState::Idle,
            start,
            goal,
        };
        engine.reset();
        Ok(engine)
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    /// The topology plus the current search overlay.
    pub fn cells(&self) -> &CellGrid {
        &self.cells
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// The algorithm chosen by the last [`set_up`](Self::set_up), if any.
    pub fn algorithm(&self) -> Option<GridAlgorithm> {
        self.active.as_ref().map(|a| a.algorithm)
    }

    /// Recorded cost from the start, or `None` if out of bounds or unreached.
    pub fn distance(&self, p: Point) -> Option<i32> {
        let d = self.distances[self.cells.idx(p)?];
        (d != UNREACHABLE).then_some(d)
    }

    /// The whole distance table in row-major order ([`UNREACHABLE`] for
    /// unreached cells).
    pub fn distances(&self) -> &[i32] {
        &self.distances
    }

    pub fn is_visited(&self, p: Point) -> bool {
        self.cells.idx(p).is_some_and(|i| self.visited[i])
    }

    /// Number of entries waiting in the frontier (0 when idle).
    pub fn frontier_len(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.frontier.len())
    }

    // -------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------

    fn check_bounds(&self, p: Point) -> Result<(), EditError> {
        if self.cells.contains(p) {
            Ok(())
        } else {
            Err(EditError::OutOfBounds {
                pos: p,
                size: self.cells.size(),
            })
        }
    }

    /// Move the start cell. Resets the engine.
    pub fn set_start(&mut self, p: Point) -> Result<(), EditError> {
        self.check_bounds(p)?;
        self.start = p;
        self.reset();
        Ok(())
    }

    /// Move the goal cell. Resets the engine.
    pub fn set_goal(&mut self, p: Point) -> Result<(), EditError> {
        self.check_bounds(p)?;
        self.goal = p;
        self.reset();
        Ok(())
    }

    /// Replace the topology with a same-sized snapshot. Resets the engine.
    pub fn set_obstacles(&mut self, cells: CellGrid) -> Result<(), EditError> {
        if cells.size() != self.cells.size() {
            return Err(EditError::SizeMismatch {
                expected: self.cells.size(),
                found: cells.size(),
            });
        }
        self.cells = cells;
        self.reset();
        Ok(())
    }

    /// Block or clear a single cell and reset the engine.
    ///
    /// The start and goal cells are never blocked. Returns whether the
    /// topology changed.
    pub fn set_obstacle(&mut self, p: Point, blocked: bool) -> Result<bool, EditError> {
        self.check_bounds(p)?;
        if blocked && (p == self.start || p == self.goal) {
            return Ok(false);
        }
        let want = if blocked {
            CellState::Obstacle
        } else {
            CellState::Empty
        };
        let changed = self.cells.at(p).map(CellState::topology) != Some(want);
        self.cells.set(p, want);
        self.reset();
        Ok(changed)
    }

    /// Flip a cell between obstacle and empty. Returns whether it changed.
    pub fn toggle_obstacle(&mut self, p: Point) -> Result<bool, EditError> {
        let blocked = self.cells.at(p).is_some_and(CellState::is_obstacle);
        self.set_obstacle(p, !blocked)
    }

    // -------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------

    /// Discard any search in progress and reseed the distance and visited
    /// tables. Obstacles are kept; the overlay is cleared.
    pub fn reset(&mut self) {
        self.cells.clear_overlay();
        self.cells.set(self.start, CellState::Empty);
        self.cells.set(self.goal, CellState::Empty);
        self.distances.fill(UNREACHABLE);
        self.visited.fill(false);
        if let Some(si) = self.cells.idx(self.start) {
            self.distances[si] = 0;
            self.visited[si] = true;
        }
        self.active = None;
        self.state = SearchState::Idle;
    }

    /// Reset and seed the frontier with the start cell for `algorithm`.
    pub fn set_up(&mut self, algorithm: GridAlgorithm) {
        self.reset();
        let mut frontier = Frontier::new(algorithm.frontier_kind());
        let key = match algorithm {
            GridAlgorithm::AStar | GridAlgorithm::Gbfs => self.heuristic(self.start),
            _ => 0.0,
        };
        frontier.push(self.start, key);
        self.active = Some(Active {
            algorithm,
            frontier,
        });
        self.state = SearchState::Running;
        log::debug!(
            "grid {algorithm} set up from {} to {}",
            self.start,
            self.goal
        );
    }

    /// Advance the search by one pop-and-expand.
    pub fn step(&mut self) -> Step<Point> {
        let Some(algorithm) = self.algorithm() else {
            return Step::Idle;
        };
        if let SearchState::Finished(t) = self.state {
            return Step::Finished(t);
        }
        let Some(Entry { node: p, key }) = self.active.as_mut().and_then(|a| a.frontier.pop())
        else {
            return self.finish(Termination::FrontierExhausted);
        };
        // Popped entries are always in bounds: only validated cells are pushed.
        let Some(pi) = self.cells.idx(p) else {
            return Step::Stale(p);
        };

        match algorithm {
            GridAlgorithm::Bfs | GridAlgorithm::Dfs => {
                self.paint(p);
                for n in p.neighbors_4() {
                    if let Some(ni) = self.open_unvisited(n) {
                        self.distances[ni] = self.distances[pi] + 1;
                        self.visited[ni] = true;
                        self.push(n, f64::from(self.distances[ni]));
                    }
                }
            }
            GridAlgorithm::Dijkstra => {
                if key > f64::from(self.distances[pi]) {
                    return Step::Stale(p);
                }
                self.visited[pi] = true;
                self.paint(p);
                let nd = self.distances[pi] + 1;
                for n in p.neighbors_4() {
                    if let Some(ni) = self.open_unvisited(n) {
                        if nd < self.distances[ni] {
                            self.distances[ni] = nd;
                            self.push(n, f64::from(nd));
                        }
                    }
                }
            }
            GridAlgorithm::AStar => {
                self.paint(p);
                if p == self.goal {
                    return self.finish(Termination::GoalReached);
                }
                let g = self.distances[pi] + 1;
                for n in p.neighbors_4() {
                    let Some(ni) = self.open(n) else {
                        continue;
                    };
                    if !self.visited[ni] || g < self.distances[ni] {
                        self.distances[ni] = g;
                        self.visited[ni] = true;
                        self.push(n, f64::from(g) + self.heuristic(n));
                    }
                }
            }
            GridAlgorithm::Gbfs => {
                self.paint(p);
                if p == self.goal {
                    return self.finish(Termination::GoalReached);
                }
                for n in p.neighbors_4() {
                    if let Some(ni) = self.open_unvisited(n) {
                        self.visited[ni] = true;
                        self.distances[ni] = self.distances[pi] + 1;
                        self.push(n, self.heuristic(n));
                    }
                }
            }
        }
        Step::Expanded(p)
    }

    /// Step until the search finishes or `max_steps` steps have run.
    pub fn advance(&mut self, max_steps: usize) -> SearchState {
        for _ in 0..max_steps {
            if !self.state.is_running() {
                break;
            }
            self.step();
        }
        self.state
    }

    // -------------------------------------------------------------------
    // Path reconstruction
    // -------------------------------------------------------------------

    /// Walk back from the goal along strictly decreasing distances and mark
    /// the path [`CellState::Route`].
    ///
    /// Returns the path from start to goal, both included. On failure the
    /// overlay is left untouched.
    pub fn trace_shortest_path(&mut self) -> Result<Vec<Point>, TraceError> {
        if !self.state.is_finished() {
            return Err(TraceError::NotFinished);
        }
        if !self.is_visited(self.goal) {
            log::warn!("no path from {} to {}", self.start, self.goal);
            return Err(TraceError::Unreached);
        }

        let mut path = vec![self.goal];
        let mut cur = self.goal;
        while cur != self.start {
            let cur_d = self.distances[self.cells.idx(cur).ok_or(TraceError::Unreached)?];
            let next = cur
                .neighbors_4()
                .into_iter()
                .filter_map(|n| self.cells.idx(n).map(|i| (n, self.distances[i])))
                .min_by_key(|&(_, d)| d);
            match next {
                Some((n, d)) if d < cur_d => {
                    path.push(n);
                    cur = n;
                }
                _ => return Err(TraceError::Unreached),
            }
        }

        for &p in &path {
            self.cells.set(p, CellState::Route);
        }
        path.reverse();
        log::info!("path of {} cells traced", path.len());
        Ok(path)
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    /// Index of `p` if it is in bounds and not an obstacle.
    #[inline]
    fn open(&self, p: Point) -> Option<usize> {
        let i = self.cells.idx(p)?;
        (!self.cells.at(p)?.is_obstacle()).then_some(i)
    }

    /// Index of `p` if it is in bounds, not an obstacle and not visited.
    #[inline]
    fn open_unvisited(&self, p: Point) -> Option<usize> {
        self.open(p).filter(|&i| !self.visited[i])
    }

    #[inline]
    fn heuristic(&self, p: Point) -> f64 {
        euclidean(p, self.goal)
    }

    fn push(&mut self, p: Point, key: f64) {
        if let Some(a) = self.active.as_mut() {
            a.frontier.push(p, key);
        }
    }

    fn paint(&mut self, p: Point) {
        self.cells.set(p, CellState::RouteHelper);
    }

    fn finish(&mut self, t: Termination) -> Step<Point> {
        self.state = SearchState::Finished(t);
        if let Some(alg) = self.algorithm() {
            log::info!("grid {alg} finished: {t:?}");
        }
        Step::Finished(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};

    fn open_grid(w: i32, h: i32) -> CellGrid {
        CellGrid::new(w, h)
    }

    fn run(engine: &mut GridSearch, algorithm: GridAlgorithm) -> SearchState {
        engine.set_up(algorithm);
        engine.advance(100_000)
    }

    /// Shortest hop counts by relaxing every cell until nothing changes.
    fn brute_force(cells: &CellGrid, start: Point) -> Vec<i32> {
        let len = cells.bounds().len();
        let mut dist = vec![UNREACHABLE; len];
        dist[cells.idx(start).unwrap()] = 0;
        loop {
            let mut changed = false;
            for (p, c) in cells.iter() {
                if c.is_obstacle() {
                    continue;
                }
                let pi = cells.idx(p).unwrap();
                for n in p.neighbors_4() {
                    let Some(ni) = cells.idx(n) else { continue };
                    if dist[ni] != UNREACHABLE && dist[ni] + 1 < dist[pi] {
                        dist[pi] = dist[ni] + 1;
                        changed = true;
                    }
                }
            }
            if !changed {
                return dist;
            }
        }
    }

    fn random_grid(rng: &mut StdRng, w: i32, h: i32) -> CellGrid {
        let mut g = CellGrid::new(w, h);
        for p in g.bounds() {
            if rng.random_bool(0.3) {
                g.set(p, CellState::Obstacle);
            }
        }
        g
    }

    #[test]
    fn bfs_on_open_5x5() {
        let mut e = GridSearch::new(open_grid(5, 5), Point::new(0, 0), Point::new(4, 4)).unwrap();
        assert_eq!(
            run(&mut e, GridAlgorithm::Bfs),
            SearchState::Finished(Termination::FrontierExhausted)
        );
        assert_eq!(e.distance(Point::new(4, 4)), Some(8));
        let path = e.trace_shortest_path().unwrap();
        assert_eq!(path.len(), 9);
        assert_eq!(path.first(), Some(&Point::new(0, 0)));
        assert_eq!(path.last(), Some(&Point::new(4, 4)));
        for w in path.windows(2) {
            assert_eq!(crate::manhattan(w[0], w[1]), 1);
        }
        assert_eq!(e.cells().count(CellState::Route), 9);
    }

    #[test]
    fn bfs_matches_brute_force_on_small_grids() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..40 {
            let w = rng.random_range(2..=10);
            let h = rng.random_range(2..=10);
            let cells = random_grid(&mut rng, w, h);
            let start = Point::new(0, 0);
            let goal = Point::new(w - 1, h - 1);
            let mut e = GridSearch::new(cells, start, goal).unwrap();
            run(&mut e, GridAlgorithm::Bfs);
            // The engine clears start and goal before searching.
            let expected = brute_force(e.cells(), start);
            assert_eq!(e.distances(), expected.as_slice());
        }
    }

    #[test]
    fn dijkstra_and_bfs_agree_on_unit_costs() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let cells = random_grid(&mut rng, 8, 8);
            let mut bfs = GridSearch::new(cells.clone(), Point::new(0, 0), Point::new(7, 7)).unwrap();
            let mut dij = GridSearch::new(cells, Point::new(0, 0), Point::new(7, 7)).unwrap();
            run(&mut bfs, GridAlgorithm::Bfs);
            run(&mut dij, GridAlgorithm::Dijkstra);
            assert_eq!(bfs.distances(), dij.distances());
        }
    }

    #[test]
    fn astar_path_is_never_longer_than_gbfs() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut compared = 0;
        for _ in 0..40 {
            let cells = random_grid(&mut rng, 10, 10);
            let (s, g) = (Point::new(0, 0), Point::new(9, 9));
            let mut a = GridSearch::new(cells.clone(), s, g).unwrap();
            let mut b = GridSearch::new(cells, s, g).unwrap();
            run(&mut a, GridAlgorithm::AStar);
            run(&mut b, GridAlgorithm::Gbfs);
            match (a.trace_shortest_path(), b.trace_shortest_path()) {
                (Ok(pa), Ok(pb)) => {
                    assert!(pa.len() <= pb.len());
                    compared += 1;
                }
                (Err(ea), Err(eb)) => assert_eq!(ea, eb),
                (ra, rb) => panic!("reachability differs: {ra:?} vs {rb:?}"),
            }
        }
        assert!(compared > 0);
    }

    #[test]
    fn astar_finds_optimal_length_around_a_wall() {
        let cells = CellGrid::parse(
            "\
.....
.###.
.#...
.#.#.
...#.",
        )
        .unwrap();
        let mut e = GridSearch::new(cells.clone(), Point::new(2, 2), Point::new(0, 0)).unwrap();
        assert_eq!(
            run(&mut e, GridAlgorithm::AStar),
            SearchState::Finished(Termination::GoalReached)
        );
        let expected = brute_force(&cells, Point::new(2, 2));
        let path = e.trace_shortest_path().unwrap();
        assert_eq!(path.len() as i32 - 1, expected[0]);
    }

    #[test]
    fn astar_stops_as_soon_as_goal_pops() {
        let mut e = GridSearch::new(open_grid(9, 9), Point::new(0, 4), Point::new(3, 4)).unwrap();
        run(&mut e, GridAlgorithm::AStar);
        assert_eq!(e.state(), SearchState::Finished(Termination::GoalReached));
        // Cells far behind the start were never reached.
        assert!(!e.is_visited(Point::new(8, 0)));
        assert!(e.frontier_len() > 0);
    }

    #[test]
    fn dijkstra_discards_stale_entries() {
        let mut e = GridSearch::new(open_grid(3, 3), Point::new(1, 1), Point::new(2, 2)).unwrap();
        e.set_up(GridAlgorithm::Dijkstra);
        // A second, worse entry for (1, 0) must pop as stale.
        assert_eq!(e.step(), Step::Expanded(Point::new(1, 1)));
        e.push(Point::new(1, 0), 5.0);
        let mut stale = 0;
        while e.state().is_running() {
            if let Step::Stale(p) = e.step() {
                assert_eq!(p, Point::new(1, 0));
                stale += 1;
            }
        }
        assert_eq!(stale, 1);
        assert_eq!(e.distance(Point::new(1, 0)), Some(1));
    }

    #[test]
    fn astar_reinserts_a_visited_cell_on_a_cheaper_g() {
        let (start, goal) = (Point::new(0, 1), Point::new(4, 1));
        let x = Point::new(1, 1);
        let mut e = GridSearch::new(open_grid(5, 3), start, goal).unwrap();
        e.set_up(GridAlgorithm::AStar);
        // As if (1, 1) had already been reached from a worse parent.
        let xi = e.cells.idx(x).unwrap();
        e.distances[xi] = 7;
        e.visited[xi] = true;
        e.push(x, 7.0 + e.heuristic(x));
        assert_eq!(e.frontier_len(), 2);

        assert_eq!(e.step(), Step::Expanded(start));
        // Up, the improved (1, 1), and down.
        assert_eq!(e.frontier_len(), 4);
        assert_eq!(e.distance(x), Some(1));

        assert_eq!(e.advance(1000), SearchState::Finished(Termination::GoalReached));
        let path = e.trace_shortest_path().unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path[1], x);
        assert_eq!(e.distance(goal), Some(4));
    }

    #[test]
    fn gbfs_never_reinserts_a_visited_cell() {
        let (start, goal) = (Point::new(0, 1), Point::new(4, 1));
        let x = Point::new(1, 1);
        let mut e = GridSearch::new(open_grid(5, 3), start, goal).unwrap();
        e.set_up(GridAlgorithm::Gbfs);
        let xi = e.cells.idx(x).unwrap();
        e.distances[xi] = 7;
        e.visited[xi] = true;
        assert_eq!(e.step(), Step::Expanded(start));
        // Only up and down: (1, 1) is visited even though 1 < 7.
        assert_eq!(e.frontier_len(), 2);
        assert_eq!(e.distance(x), Some(7));

        let mut rng = StdRng::seed_from_u64(19);
        for _ in 0..20 {
            let cells = random_grid(&mut rng, 9, 9);
            let mut e = GridSearch::new(cells, Point::new(0, 0), Point::new(8, 8)).unwrap();
            e.set_up(GridAlgorithm::Gbfs);
            let mut pops = vec![0; 81];
            while e.state().is_running() {
                match e.step() {
                    Step::Expanded(p) => pops[e.cells.idx(p).unwrap()] += 1,
                    Step::Finished(_) => {}
                    other => panic!("unexpected {other:?}"),
                }
            }
            assert!(pops.iter().all(|&n| n <= 1), "{pops:?}");
        }
    }

    #[test]
    fn obstacles_are_never_expanded() {
        let cells = CellGrid::parse(
            "\
..#..
..#..
..#..",
        )
        .unwrap();
        for alg in GridAlgorithm::ALL {
            let mut e = GridSearch::new(cells.clone(), Point::new(0, 0), Point::new(4, 0)).unwrap();
            run(&mut e, alg);
            assert_eq!(e.cells().count(CellState::Obstacle), 3, "{alg}");
            assert!(!e.is_visited(Point::new(2, 1)), "{alg}");
            assert_eq!(e.trace_shortest_path(), Err(TraceError::Unreached), "{alg}");
            // Overlay left as the search painted it.
            assert_eq!(e.cells().count(CellState::Route), 0, "{alg}");
        }
    }

    #[test]
    fn every_algorithm_reaches_the_goal_on_open_grid() {
        for alg in GridAlgorithm::ALL {
            let mut e = GridSearch::new(open_grid(6, 4), Point::new(0, 3), Point::new(5, 0)).unwrap();
            assert!(run(&mut e, alg).is_finished(), "{alg}");
            let path = e.trace_shortest_path().unwrap();
            assert_eq!(path[0], Point::new(0, 3), "{alg}");
            assert_eq!(*path.last().unwrap(), Point::new(5, 0), "{alg}");
        }
    }

    #[test]
    fn set_up_twice_equals_set_up_once() {
        let cells = CellGrid::parse(
            "\
....
.##.
....",
        )
        .unwrap();
        for alg in GridAlgorithm::ALL {
            let mut once = GridSearch::new(cells.clone(), Point::new(0, 0), Point::new(3, 2)).unwrap();
            let mut twice = once.clone();
            once.set_up(alg);
            twice.set_up(alg);
            twice.set_up(alg);
            assert_eq!(once.cells(), twice.cells());
            assert_eq!(once.distances(), twice.distances());
            assert_eq!(once.visited, twice.visited);
            assert_eq!(once.frontier_len(), twice.frontier_len());
            assert_eq!(once.state(), twice.state());
            // And they evolve identically.
            for _ in 0..6 {
                assert_eq!(once.step(), twice.step());
            }
        }
    }

    #[test]
    fn start_distance_is_zero_after_set_up_and_stays() {
        let mut e = GridSearch::new(open_grid(4, 4), Point::new(2, 1), Point::new(0, 3)).unwrap();
        for alg in GridAlgorithm::ALL {
            e.set_up(alg);
            assert_eq!(e.distance(Point::new(2, 1)), Some(0));
            e.advance(1000);
            assert_eq!(e.distance(Point::new(2, 1)), Some(0), "{alg}");
        }
    }

    #[test]
    fn step_without_set_up_is_idle_and_finished_stays_finished() {
        let mut e = GridSearch::new(open_grid(2, 1), Point::new(0, 0), Point::new(1, 0)).unwrap();
        assert_eq!(e.step(), Step::Idle);
        assert_eq!(e.trace_shortest_path(), Err(TraceError::NotFinished));
        e.set_up(GridAlgorithm::Gbfs);
        e.advance(10);
        let t = Termination::GoalReached;
        assert_eq!(e.state(), SearchState::Finished(t));
        assert_eq!(e.step(), Step::Finished(t));
    }

    #[test]
    fn edits_reset_the_engine_and_validate_bounds() {
        let mut e = GridSearch::new(open_grid(3, 3), Point::new(0, 0), Point::new(2, 2)).unwrap();
        e.set_up(GridAlgorithm::Bfs);
        e.step();
        assert!(e.set_obstacle(Point::new(1, 1), true).unwrap());
        assert_eq!(e.state(), SearchState::Idle);
        assert_eq!(e.frontier_len(), 0);
        assert!(!e.set_obstacle(Point::new(0, 0), true).unwrap());
        assert!(e.toggle_obstacle(Point::new(1, 1)).unwrap());
        assert_eq!(e.cells().at(Point::new(1, 1)), Some(CellState::Empty));
        assert!(matches!(
            e.set_goal(Point::new(3, 0)),
            Err(EditError::OutOfBounds { .. })
        ));
        assert!(matches!(
            e.set_obstacles(CellGrid::new(2, 2)),
            Err(EditError::SizeMismatch { .. })
        ));
        assert!(GridSearch::new(open_grid(2, 2), Point::new(0, 0), Point::new(5, 5)).is_err());
    }

    #[test]
    fn reset_clears_overlay_but_keeps_obstacles() {
        let cells = CellGrid::parse(".#.\n...").unwrap();
        let mut e = GridSearch::new(cells, Point::new(0, 0), Point::new(2, 0)).unwrap();
        run(&mut e, GridAlgorithm::Bfs);
        e.trace_shortest_path().unwrap();
        assert!(e.cells().count(CellState::Route) > 0);
        e.reset();
        assert_eq!(e.cells().count(CellState::Route), 0);
        assert_eq!(e.cells().count(CellState::RouteHelper), 0);
        assert_eq!(e.cells().count(CellState::Obstacle), 1);
        assert_eq!(e.distance(Point::new(2, 0)), None);
    }

    #[test]
    fn start_equal_to_goal_traces_single_cell() {
        let mut e = GridSearch::new(open_grid(3, 3), Point::new(1, 1), Point::new(1, 1)).unwrap();
        run(&mut e, GridAlgorithm::AStar);
        assert_eq!(e.trace_shortest_path().unwrap(), vec![Point::new(1, 1)]);
    }
}
