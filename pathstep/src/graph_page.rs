//! The graph page: place vertices, connect them with weighted directed
//! edges and watch the weighted searches.

use std::time::Duration;

use pathstep_core::{Cell, Effect, Grid, Key, MouseAction, Msg, Point, Style};
use pathstep_search::{GraphAlgorithm, GraphSearch, Step, VertexMark, parse_weight};

use crate::colors::*;
use crate::log::MessageLog;
use crate::weight_input::{InputAction, WeightInput};

pub const HELP: &[&str] = &[
    "click      add vertex",
    "click 2    select edge ends",
    "  digits + enter  weight",
    "right      cancel selection",
    "S / K      selected is",
    "           source / sink",
    "1 BFS  2 DFS  3 Dijkstra",
    "4 Bellman-Ford",
    "c          clear graph",
    "r          clear search",
    "tab        grid page",
    "esc        menu   q quit",
];

/// What the user has picked so far while building an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    None,
    Vertex(usize),
    Weight {
        from: usize,
        to: usize,
        input: WeightInput,
    },
}

pub struct GraphPage {
    search: GraphSearch,
    /// Label position of each vertex, relative to the page.
    positions: Vec<Point>,
    selection: Selection,
    size: Point,
    steps: usize,
    path: Option<Vec<usize>>,
    tick: Duration,
}

fn label(v: usize) -> String {
    v.to_string()
}

impl GraphPage {
    pub fn new(size: Point, tick: Duration) -> Self {
        Self {
            search: GraphSearch::new(),
            positions: Vec::new(),
            selection: Selection::None,
            size,
            steps: 0,
            path: None,
            tick,
        }
    }

    pub fn search(&self) -> &GraphSearch {
        &self.search
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn is_animating(&self) -> bool {
        self.search.state().is_running()
    }

    /// Whether keys are currently going to the weight prompt.
    pub fn is_typing(&self) -> bool {
        matches!(self.selection, Selection::Weight { .. })
    }

    pub fn stop(&mut self) {
        if self.is_animating() {
            self.search.reset();
        }
    }

    fn vertex_at(&self, p: Point) -> Option<usize> {
        // A one-cell margin on each side of the label is forgiving enough.
        self.positions.iter().enumerate().position(|(v, &q)| {
            let len = label(v).len() as i32;
            p.y == q.y && p.x >= q.x - 1 && p.x <= q.x + len
        })
    }

    /// Whether a new vertex label at `p` would overlap another one or leave
    /// the page.
    fn has_room(&self, p: Point) -> bool {
        let len = label(self.positions.len()).len() as i32;
        p.x >= 1
            && p.y >= 0
            && p.x + len < self.size.x
            && p.y < self.size.y
            && self
                .positions
                .iter()
                .all(|q| (p.y - q.y).abs() > 1 || (p.x - q.x).abs() > 3)
    }

    // -------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------

    /// Handle a message whose mouse positions are relative to the page.
    pub fn update(&mut self, msg: Msg, log: &mut MessageLog) -> Option<Effect> {
        let was_animating = self.is_animating();
        let effect = if self.is_typing() {
            self.update_weight(msg, log)
        } else {
            match msg {
                Msg::KeyDown { key, .. } => self.handle_key(key, log),
                Msg::Mouse { action, pos, .. } => {
                    self.handle_mouse(action, pos, log);
                    None
                }
                _ => None,
            }
        };
        match effect {
            Some(e) => Some(e),
            None if was_animating && !self.is_animating() => Some(Effect::Tick(None)),
            None => None,
        }
    }

    fn update_weight(&mut self, msg: Msg, log: &mut MessageLog) -> Option<Effect> {
        if let Msg::Mouse {
            action: MouseAction::Secondary,
            ..
        } = msg
        {
            self.selection = Selection::None;
            return None;
        }
        let Selection::Weight { from, to, input } = &mut self.selection else {
            return None;
        };
        let (from, to) = (*from, *to);
        match input.update(&msg) {
            InputAction::Confirm => {
                let result = parse_weight(input.content())
                    .and_then(|w| self.search.add_edge(from, to, w).map(|()| w));
                match result {
                    Ok(w) => {
                        self.path = None;
                        self.selection = Selection::None;
                        log.log(&format!("edge {from} -> {to} with weight {w} added"));
                    }
                    // Keep the prompt open so the weight can be fixed.
                    Err(e) => log.error(&e.to_string()),
                }
            }
            InputAction::Cancel => self.selection = Selection::None,
            InputAction::Change | InputAction::Pass => {}
        }
        None
    }

    fn handle_key(&mut self, key: Key, log: &mut MessageLog) -> Option<Effect> {
        match key {
            Key::Char(c @ '1'..='4') => {
                let i = c as usize - '1' as usize;
                return Some(self.start_search(GraphAlgorithm::ALL[i], log));
            }
            Key::Char('c') => {
                self.search.clear();
                self.positions.clear();
                self.selection = Selection::None;
                self.path = None;
                log.log("graph cleared");
            }
            Key::Char('r') => {
                self.search.reset();
                self.path = None;
            }
            Key::Char(c @ ('S' | 'K')) => {
                let Selection::Vertex(v) = self.selection else {
                    log.error("select a vertex first");
                    return None;
                };
                let result = if c == 'S' {
                    self.search.set_source(v)
                } else {
                    self.search.set_sink(v)
                };
                self.path = None;
                match result {
                    Ok(()) => {
                        let role = if c == 'S' { "source" } else { "sink" };
                        log.log(&format!("vertex {v} is now the {role}"));
                        self.selection = Selection::None;
                    }
                    Err(e) => log.error(&e.to_string()),
                }
            }
            _ => {}
        }
        None
    }

    fn handle_mouse(&mut self, action: MouseAction, pos: Point, log: &mut MessageLog) {
        match action {
            MouseAction::Main => {}
            MouseAction::Secondary => {
                self.selection = Selection::None;
                return;
            }
            _ => return,
        }
        let hit = self.vertex_at(pos);
        self.selection = match (&self.selection, hit) {
            (Selection::None, Some(v)) => Selection::Vertex(v),
            (Selection::Vertex(u), Some(v)) if *u != v => Selection::Weight {
                from: *u,
                to: v,
                input: WeightInput::new(),
            },
            (Selection::None, None) => {
                if self.has_room(pos) {
                    self.positions.push(pos);
                    self.search.add_vertex();
                    self.path = None;
                } else if pos.x >= 0 && pos.y >= 0 && pos.x < self.size.x && pos.y < self.size.y {
                    log.error("too close to another vertex");
                }
                Selection::None
            }
            _ => Selection::None,
        };
    }

    fn start_search(&mut self, algorithm: GraphAlgorithm, log: &mut MessageLog) -> Effect {
        self.selection = Selection::None;
        self.steps = 0;
        self.path = None;
        self.search.set_up(algorithm);
        if self.search.state().is_running() {
            Effect::Tick(Some(self.tick))
        } else {
            // Nothing to animate on an empty graph.
            if let Err(e) = self.search.trace_path() {
                log.error(&e.to_string());
            }
            Effect::Tick(None)
        }
    }

    pub fn tick(&mut self) -> Option<Effect> {
        if !self.search.state().is_running() {
            return Some(Effect::Tick(None));
        }
        self.steps += 1;
        if let Step::Finished(_) = self.search.step() {
            // The engine logs why a trace fails.
            self.path = self.search.trace_path().ok();
            return Some(Effect::Tick(None));
        }
        None
    }

    // -------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------

    pub fn status(&self) -> String {
        let counts = format!(
            "{} vertices, {} edges",
            self.search.vertex_count(),
            self.search.edge_count()
        );
        let Some(alg) = self.search.algorithm() else {
            return counts;
        };
        if self.search.state().is_running() {
            if alg == GraphAlgorithm::BellmanFord {
                let (round, v, e) = self.search.bellman_ford_cursor();
                format!("{alg}: round {} vertex {v} edge {e}", round + 1)
            } else {
                format!("{alg}: step {}, frontier {}", self.steps, self.search.frontier_len())
            }
        } else {
            match &self.path {
                Some(p) => {
                    let cost = self
                        .search
                        .sink()
                        .and_then(|s| self.search.distance(s))
                        .map_or_else(|| "?".to_string(), |d| d.to_string());
                    format!("{alg}: path of {} vertices, cost {cost}", p.len())
                }
                None => format!("{alg}: no path ({counts})"),
            }
        }
    }

    pub fn draw(&self, grid: &mut Grid, origin: Point) {
        let dim = Style::default().with_fg(FG_DIM);
        let weight_style = Style::default().with_fg(YELLOW);

        for (u, e) in self.search.all_edges() {
            let (a, b) = (self.positions[u], self.positions[e.to]);
            let line = line(a, b);
            if line.len() < 3 {
                continue;
            }
            let inner = &line[1..line.len() - 1];
            for &p in inner {
                grid.set(origin + p, Cell::new('.', dim));
            }
            if let Some(&last) = inner.last() {
                grid.set(origin + last, Cell::new(arrow(b - last), dim.with_fg(FG_EMPH)));
            }
            let at = inner[inner.len() / 3];
            grid.draw_text(origin + at, &e.weight.to_string(), weight_style);
        }

        let selected = match &self.selection {
            Selection::None => [None, None],
            Selection::Vertex(v) => [Some(*v), None],
            Selection::Weight { from, to, .. } => [Some(*from), Some(*to)],
        };
        let marks = self.search.vertex_marks();
        let sink = self.search.sink();
        for (v, &p) in self.positions.iter().enumerate() {
            let mark = marks.get(v).copied().unwrap_or_default();
            let bg = if selected.contains(&Some(v)) {
                CYAN
            } else {
                vertex_bg(mark)
            };
            let fg = if mark == VertexMark::Unvisited && v == self.search.source() {
                GREEN
            } else if mark == VertexMark::Unvisited && Some(v) == sink {
                RED
            } else {
                BG_BAR
            };
            let style = Style::default().with_fg(fg).with_bg(bg).with_bold(true);
            grid.draw_text(origin + p, &label(v), style);
        }

        if let Selection::Weight { from, to, input } = &self.selection {
            let prompt = format!("weight {from} -> {to}: ");
            let at = origin.shift(0, self.size.y - 1);
            input.draw(
                grid,
                at,
                &prompt,
                Style::default().with_fg(FG_EMPH).with_bg(BG_BAR),
                Style::default().with_fg(BG_BAR).with_bg(FG_EMPH),
            );
        }
    }
}

/// Cells on the segment from `a` to `b`, both included (Bresenham).
fn line(a: Point, b: Point) -> Vec<Point> {
    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = (b.x - a.x).signum();
    let sy = (b.y - a.y).signum();
    let mut err = dx + dy;
    let mut p = a;
    let mut points = vec![p];
    while p != b {
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            p.x += sx;
        }
        if e2 <= dx {
            err += dx;
            p.y += sy;
        }
        points.push(p);
    }
    points
}

/// Arrow glyph pointing along `d`.
fn arrow(d: Point) -> char {
    match (d.x.signum(), d.y.signum()) {
        (1, 0) => '>',
        (-1, 0) => '<',
        (0, 1) => 'v',
        (0, -1) => '^',
        (1, 1) | (-1, -1) => '\\',
        _ => '/',
    }
}
