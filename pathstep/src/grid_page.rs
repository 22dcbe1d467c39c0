//! The grid page: paint obstacles, place start and goal, generate mazes and
//! watch the unweighted searches.

use std::time::Duration;

use pathstep_core::{Cell, Effect, Grid, Key, MouseAction, Msg, Point, Style};
use pathstep_maze::{MazeGen, MazeKind};
use pathstep_search::{CellGrid, CellState, EditError, GridAlgorithm, GridSearch, Step};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::colors::*;
use crate::config::Config;
use crate::log::MessageLog;

pub const HELP: &[&str] = &[
    "arrows     move cursor",
    "space / x  block / clear",
    "mouse L/R  paint / erase",
    "s / e      set start / goal",
    "1 BFS  2 DFS  3 Dijkstra",
    "4 A*   5 greedy best-first",
    "m          random maze",
    "b          backtracker maze",
    "c          clear search",
    "r          clear everything",
    "tab        graph page",
    "esc        menu   q quit",
];

/// Each cell is drawn two columns wide so it looks square.
const CELL_W: i32 = 2;

pub struct GridPage {
    search: GridSearch,
    maze: Option<MazeGen<StdRng>>,
    cursor: Point,
    /// Mouse drag in progress: `Some(true)` paints, `Some(false)` erases.
    drag: Option<bool>,
    steps: usize,
    path_len: Option<usize>,
    tick: Duration,
    density: f64,
}

impl GridPage {
    pub fn new(config: &Config) -> Result<Self, EditError> {
        let search = GridSearch::new(
            CellGrid::new(config.width, config.height),
            config.start(),
            config.goal(),
        )?;
        Ok(Self {
            search,
            maze: None,
            cursor: Point::ZERO,
            drag: None,
            steps: 0,
            path_len: None,
            tick: config.grid_tick,
            density: config.density,
        })
    }

    /// Columns and rows taken on screen.
    pub fn screen_size(config: &Config) -> Point {
        Point::new(config.width * CELL_W, config.height)
    }

    pub fn search(&self) -> &GridSearch {
        &self.search
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn is_animating(&self) -> bool {
        self.maze.is_some() || self.search.state().is_running()
    }

    /// Abandon any maze or search in progress.
    pub fn stop(&mut self) {
        self.maze = None;
        if self.search.state().is_running() {
            self.search.reset();
        }
    }

    // -------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------

    /// Handle a message whose mouse positions are relative to the page.
    pub fn update(&mut self, msg: Msg, rng: &mut StdRng, log: &mut MessageLog) -> Option<Effect> {
        let was_animating = self.is_animating();
        let effect = match msg {
            Msg::KeyDown { key, .. } => self.handle_key(key, rng, log),
            Msg::Mouse { action, pos, .. } => {
                self.handle_mouse(action, pos, log);
                None
            }
            _ => None,
        };
        match effect {
            Some(e) => Some(e),
            // An edit interrupted the animation.
            None if was_animating && !self.is_animating() => Some(Effect::Tick(None)),
            None => None,
        }
    }

    fn handle_key(&mut self, key: Key, rng: &mut StdRng, log: &mut MessageLog) -> Option<Effect> {
        let (dx, dy) = match key {
            Key::ArrowUp => (0, -1),
            Key::ArrowDown => (0, 1),
            Key::ArrowLeft => (-1, 0),
            Key::ArrowRight => (1, 0),
            Key::Char(' ') => {
                self.edit(log, |s, p| s.set_obstacle(p, true).map(drop));
                return None;
            }
            Key::Char('x') => {
                self.edit(log, |s, p| s.set_obstacle(p, false).map(drop));
                return None;
            }
            Key::Char('s') => {
                self.edit(log, GridSearch::set_start);
                return None;
            }
            Key::Char('e') => {
                self.edit(log, GridSearch::set_goal);
                return None;
            }
            Key::Char(c @ '1'..='5') => {
                let i = c as usize - '1' as usize;
                return Some(self.start_search(GridAlgorithm::ALL[i]));
            }
            Key::Char('m') => return Some(self.start_maze(MazeKind::RandomFill, rng)),
            Key::Char('b') => return Some(self.start_maze(MazeKind::Backtracker, rng)),
            Key::Char('c') => {
                self.maze = None;
                self.search.reset();
                self.path_len = None;
                return None;
            }
            Key::Char('r') => {
                self.maze = None;
                let size = self.search.cells().size();
                self.edit_all(CellGrid::new(size.x, size.y), log);
                log.log("grid cleared");
                return None;
            }
            _ => return None,
        };
        let next = self.cursor.shift(dx, dy);
        if self.search.cells().contains(next) {
            self.cursor = next;
        }
        None
    }

    fn handle_mouse(&mut self, action: MouseAction, pos: Point, log: &mut MessageLog) {
        let cell = Point::new(pos.x.div_euclid(CELL_W), pos.y);
        let inside = self.search.cells().contains(cell);
        match action {
            MouseAction::Main | MouseAction::Secondary if inside => {
                let paint = action == MouseAction::Main;
                self.cursor = cell;
                self.drag = Some(paint);
                self.paint(cell, paint, log);
            }
            MouseAction::Move if inside => {
                self.cursor = cell;
                if let Some(paint) = self.drag {
                    self.paint(cell, paint, log);
                }
            }
            MouseAction::Release => self.drag = None,
            _ => {}
        }
    }

    fn paint(&mut self, p: Point, blocked: bool, log: &mut MessageLog) {
        // Dragging over cells that already match leaves the search alone.
        if self.search.cells().at(p).is_some_and(CellState::is_obstacle) == blocked {
            return;
        }
        self.maze = None;
        self.path_len = None;
        if let Err(e) = self.search.set_obstacle(p, blocked) {
            log.error(&e.to_string());
        }
    }

    /// Apply an edit at the cursor. Edits reset the engine, so any maze or
    /// search in progress stops.
    fn edit(
        &mut self,
        log: &mut MessageLog,
        f: impl FnOnce(&mut GridSearch, Point) -> Result<(), EditError>,
    ) {
        self.maze = None;
        self.path_len = None;
        if let Err(e) = f(&mut self.search, self.cursor) {
            log.error(&e.to_string());
        }
    }

    fn edit_all(&mut self, layout: CellGrid, log: &mut MessageLog) {
        self.path_len = None;
        if let Err(e) = self.search.set_obstacles(layout) {
            log.error(&e.to_string());
        }
    }

    fn start_search(&mut self, algorithm: GridAlgorithm) -> Effect {
        self.maze = None;
        self.steps = 0;
        self.path_len = None;
        self.search.set_up(algorithm);
        Effect::Tick(Some(self.tick))
    }

    fn start_maze(&mut self, kind: MazeKind, rng: &mut StdRng) -> Effect {
        let mut layout = self.search.cells().clone();
        layout.clear_overlay();
        self.search.reset();
        self.path_len = None;

        let mut maze = MazeGen::with_grid(layout, StdRng::seed_from_u64(rng.random()));
        maze.set_density(self.density);
        maze.set_keep_clear(&[self.search.start(), self.search.goal()]);
        maze.set_up(kind, self.search.start());
        self.maze = Some(maze);
        Effect::Tick(Some(self.tick))
    }

    /// Advance whatever is animating by one step.
    pub fn tick(&mut self, log: &mut MessageLog) -> Option<Effect> {
        if let Some(maze) = self.maze.as_mut() {
            maze.step();
            let layout = maze.grid().clone();
            let finished = maze.is_finished();
            self.edit_all(layout, log);
            if finished {
                self.maze = None;
                return Some(Effect::Tick(None));
            }
            return None;
        }

        if !self.search.state().is_running() {
            return Some(Effect::Tick(None));
        }
        self.steps += 1;
        if let Step::Finished(_) = self.search.step() {
            // The engine logs why a trace fails.
            self.path_len = self.search.trace_shortest_path().ok().map(|p| p.len());
            return Some(Effect::Tick(None));
        }
        None
    }

    // -------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------

    /// One-line summary for the status bar.
    pub fn status(&self) -> String {
        if let Some(maze) = &self.maze {
            let name = match maze.kind() {
                Some(MazeKind::Backtracker) => "backtracker maze",
                _ => "random maze",
            };
            return format!("generating {name}");
        }
        let Some(alg) = self.search.algorithm() else {
            return format!("cursor {}", self.cursor);
        };
        let state = self.search.state();
        if state.is_running() {
            format!("{alg}: step {}, frontier {}", self.steps, self.search.frontier_len())
        } else {
            match self.path_len {
                Some(n) => format!("{alg}: {} steps, path of {n} cells", self.steps),
                None => format!("{alg}: {} steps, no path", self.steps),
            }
        }
    }

    pub fn draw(&self, grid: &mut Grid, origin: Point) {
        let start = self.search.start();
        let goal = self.search.goal();
        for (p, state) in self.search.cells().iter() {
            let bg = if p == start {
                CELL_START
            } else if p == goal {
                CELL_GOAL
            } else {
                cell_bg(state)
            };
            let (l, r) = if p == self.cursor { ('[', ']') } else { (' ', ' ') };
            let style = Style::default().with_fg(FG_EMPH).with_bg(bg).with_bold(true);
            let at = origin.shift(p.x * CELL_W, p.y);
            grid.set(at, Cell::new(l, style));
            grid.set(at.shift(1, 0), Cell::new(r, style));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> (GridPage, StdRng, MessageLog) {
        let config = Config {
            width: 5,
            height: 5,
            ..Config::default()
        };
        (
            GridPage::new(&config).unwrap(),
            StdRng::seed_from_u64(1),
            MessageLog::new(),
        )
    }

    fn run_ticks(page: &mut GridPage, log: &mut MessageLog) -> usize {
        let mut n = 0;
        while page.is_animating() {
            page.tick(log);
            n += 1;
            assert!(n < 10_000, "animation never ended");
        }
        n
    }

    #[test]
    fn keys_run_a_search_and_trace_the_path() {
        let (mut page, mut rng, mut log) = page();
        let effect = page.update(Msg::key(Key::Char('1')), &mut rng, &mut log);
        assert_eq!(effect, Some(Effect::Tick(Some(Duration::from_millis(30)))));
        run_ticks(&mut page, &mut log);
        assert_eq!(page.path_len, Some(9));
        assert_eq!(page.search().cells().count(CellState::Route), 9);
        assert!(page.status().contains("path of 9 cells"));
    }

    #[test]
    fn cursor_edits_block_cells_but_not_start() {
        let (mut page, mut rng, mut log) = page();
        page.update(Msg::key(Key::Char(' ')), &mut rng, &mut log);
        assert_eq!(page.search().cells().at(Point::ZERO), Some(CellState::Empty));
        page.update(Msg::key(Key::ArrowRight), &mut rng, &mut log);
        page.update(Msg::key(Key::Char(' ')), &mut rng, &mut log);
        assert_eq!(
            page.search().cells().at(Point::new(1, 0)),
            Some(CellState::Obstacle)
        );
        page.update(Msg::key(Key::Char('x')), &mut rng, &mut log);
        assert_eq!(page.search().cells().at(Point::new(1, 0)), Some(CellState::Empty));
    }

    #[test]
    fn editing_mid_search_stops_the_clock() {
        let (mut page, mut rng, mut log) = page();
        page.update(Msg::key(Key::Char('4')), &mut rng, &mut log);
        page.tick(&mut log);
        let effect = page.update(
            Msg::mouse(MouseAction::Main, Point::new(4, 2)),
            &mut rng,
            &mut log,
        );
        assert_eq!(effect, Some(Effect::Tick(None)));
        assert!(!page.is_animating());
        assert_eq!(
            page.search().cells().at(Point::new(2, 2)),
            Some(CellState::Obstacle)
        );
    }

    #[test]
    fn mouse_drag_paints_and_erases() {
        let (mut page, mut rng, mut log) = page();
        for (action, x) in [
            (MouseAction::Main, 2),
            (MouseAction::Move, 4),
            (MouseAction::Move, 6),
            (MouseAction::Release, 6),
            (MouseAction::Move, 8),
        ] {
            page.update(Msg::mouse(action, Point::new(x, 1)), &mut rng, &mut log);
        }
        assert_eq!(page.search().cells().count(CellState::Obstacle), 3);
        page.update(Msg::mouse(MouseAction::Secondary, Point::new(4, 1)), &mut rng, &mut log);
        assert_eq!(page.search().cells().count(CellState::Obstacle), 2);
    }

    #[test]
    fn start_and_goal_move_to_cursor() {
        let (mut page, mut rng, mut log) = page();
        page.update(Msg::key(Key::ArrowDown), &mut rng, &mut log);
        page.update(Msg::key(Key::Char('e')), &mut rng, &mut log);
        assert_eq!(page.search().goal(), Point::new(0, 1));
        assert!(log.is_empty());
    }

    #[test]
    fn backtracker_maze_keeps_start_and_goal_connected() {
        let (mut page, mut rng, mut log) = page();
        page.update(Msg::key(Key::Char('b')), &mut rng, &mut log);
        assert!(run_ticks(&mut page, &mut log) > 1);
        assert!(page.search().cells().count(CellState::Obstacle) > 0);
        page.update(Msg::key(Key::Char('3')), &mut rng, &mut log);
        run_ticks(&mut page, &mut log);
        assert!(page.path_len.is_some());
    }

    #[test]
    fn clear_everything_removes_obstacles() {
        let (mut page, mut rng, mut log) = page();
        page.update(Msg::key(Key::Char('m')), &mut rng, &mut log);
        run_ticks(&mut page, &mut log);
        page.update(Msg::key(Key::Char('r')), &mut rng, &mut log);
        assert_eq!(page.search().cells().count(CellState::Obstacle), 0);
    }

    #[test]
    fn draw_shows_start_goal_and_cursor() {
        let (page, _, _) = page();
        let mut grid = Grid::new(12, 6);
        page.draw(&mut grid, Point::new(1, 1));
        assert_eq!(grid.at(Point::new(1, 1)).ch, '[');
        assert_eq!(grid.at(Point::new(1, 1)).style.bg, CELL_START);
        assert_eq!(grid.at(Point::new(9, 5)).style.bg, CELL_GOAL);
    }
}
