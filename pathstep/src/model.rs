//! Elm-architecture Model implementation.

use pathstep_core::{Cell, Effect, Grid, Key, Model, MouseAction, Msg, Point, Range, Style};
use pathstep_search::EditError;
use rand::rngs::StdRng;

use crate::colors::*;
use crate::config::Config;
use crate::graph_page::{self, GraphPage};
use crate::grid_page::{self, GridPage};
use crate::log::{LogQueue, MessageLog};

/// Smallest page area, so the graph canvas stays usable on small grids.
const PAGE_MIN: Point = Point::new(50, 20);
const HELP_W: i32 = 28;
const LOG_LINES: i32 = 4;

const MENU: &[&str] = &["Grid search", "Graph search", "Quit"];

const MENU_HELP: &[&str] = &[
    "up / down  select",
    "enter      open",
    "tab        switch page",
    "q          quit",
];

/// Which page has the focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Menu,
    Grid,
    Graph,
}

pub struct PathstepModel {
    page: Page,
    menu_index: usize,
    grid: GridPage,
    graph: GraphPage,
    log: MessageLog,
    queue: LogQueue,
    rng: StdRng,
    layout: Layout,
}

/// Screen areas, carved out of the whole interface range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    status: Range,
    page: Range,
    help: Range,
    log: Range,
}

impl Layout {
    fn new(config: &Config) -> Self {
        let page = page_size(config);
        let ui = ui_size(config);
        let ui = Range::new(0, 0, ui.x, ui.y);
        let body = ui.lines(1, 1 + page.y);
        Self {
            status: ui.line(0),
            page: body.columns(0, page.x),
            help: body.columns(page.x + 1, ui.width()),
            log: ui.lines(1 + page.y, ui.height()),
        }
    }
}

/// Size of the page area for `config`.
fn page_size(config: &Config) -> Point {
    let grid = GridPage::screen_size(config);
    Point::new(grid.x.max(PAGE_MIN.x), grid.y.max(PAGE_MIN.y))
}

/// Total terminal size the interface needs.
pub fn ui_size(config: &Config) -> Point {
    let page = page_size(config);
    Point::new(page.x + 1 + HELP_W, 1 + page.y + LOG_LINES)
}

impl PathstepModel {
    pub fn new(config: &Config, queue: LogQueue, rng: StdRng) -> Result<Self, EditError> {
        let layout = Layout::new(config);
        Ok(Self {
            page: Page::Menu,
            menu_index: 0,
            grid: GridPage::new(config)?,
            graph: GraphPage::new(layout.page.size(), config.graph_tick),
            log: MessageLog::new(),
            queue,
            rng,
            layout,
        })
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    fn typing(&self) -> bool {
        self.page == Page::Graph && self.graph.is_typing()
    }

    /// Switch pages. Whatever was animating on the old page is abandoned
    /// and the clock stops.
    fn open(&mut self, page: Page) -> Option<Effect> {
        if page == self.page {
            return None;
        }
        self.grid.stop();
        self.graph.stop();
        self.page = page;
        log::debug!("switched to {page:?} page");
        Some(Effect::Tick(None))
    }

    fn dispatch(&mut self, msg: Msg) -> Option<Effect> {
        // Global keys, unless the graph page is reading a weight.
        if let Msg::KeyDown { key, .. } = &msg {
            if !self.typing() {
                match key {
                    Key::Char('q') => return Some(Effect::End),
                    Key::Tab => {
                        return self.open(match self.page {
                            Page::Grid => Page::Graph,
                            Page::Graph | Page::Menu => Page::Grid,
                        });
                    }
                    Key::Escape if self.page != Page::Menu => return self.open(Page::Menu),
                    _ => {}
                }
            }
        }
        match msg {
            Msg::Init => {
                self.log
                    .log("welcome to pathstep: pick a page, tab switches between them");
                None
            }
            Msg::Quit => Some(Effect::End),
            Msg::Tick => match self.page {
                Page::Grid => self.grid.tick(&mut self.log),
                Page::Graph => self.graph.tick(),
                Page::Menu => Some(Effect::Tick(None)),
            },
            _ => self.forward(msg),
        }
    }

    fn forward(&mut self, msg: Msg) -> Option<Effect> {
        let msg = self.layout.page.rel_msg(msg);
        match self.page {
            Page::Menu => self.update_menu(msg),
            Page::Grid => self.grid.update(msg, &mut self.rng, &mut self.log),
            Page::Graph => self.graph.update(msg, &mut self.log),
        }
    }

    fn update_menu(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::KeyDown { key, .. } => match key {
                Key::ArrowUp => {
                    self.menu_index = (self.menu_index + MENU.len() - 1) % MENU.len();
                    None
                }
                Key::ArrowDown => {
                    self.menu_index = (self.menu_index + 1) % MENU.len();
                    None
                }
                Key::Enter => self.activate_menu(),
                _ => None,
            },
            Msg::Mouse { action, pos, .. } => {
                let row = pos.y - 1;
                if row < 0 || row as usize >= MENU.len() || pos.x < 0 || pos.x >= PAGE_MIN.x {
                    return None;
                }
                self.menu_index = row as usize;
                if action == MouseAction::Main {
                    self.activate_menu()
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn activate_menu(&mut self) -> Option<Effect> {
        match self.menu_index {
            0 => self.open(Page::Grid),
            1 => self.open(Page::Graph),
            _ => Some(Effect::End),
        }
    }

    // -------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------

    fn draw_status(&self, grid: &mut Grid) {
        let bar = Style::default().with_fg(FG_EMPH).with_bg(BG_BAR);
        grid.fill_range(self.layout.status, Cell::new(' ', bar));
        let (name, status) = match self.page {
            Page::Menu => ("menu", String::new()),
            Page::Grid => ("grid", self.grid.status()),
            Page::Graph => ("graph", self.graph.status()),
        };
        let p = grid.draw_text(self.layout.status.min.shift(1, 0), "pathstep", bar.with_bold(true));
        let p = grid.draw_text(p, &format!(" | {name}"), bar);
        if !status.is_empty() {
            grid.draw_text(p, &format!(" | {status}"), bar.with_fg(CYAN));
        }
    }

    fn draw_menu(&self, grid: &mut Grid, origin: Point) {
        for (i, entry) in MENU.iter().enumerate() {
            let style = if i == self.menu_index {
                Style::default().with_fg(FG_EMPH).with_bg(BG_BAR).with_bold(true)
            } else {
                Style::default().with_fg(FG_DIM)
            };
            grid.draw_text(origin.shift(2, 1 + i as i32), &format!(" {entry} "), style);
        }
    }

    fn draw_help(&self, grid: &mut Grid) {
        let lines = match self.page {
            Page::Menu => MENU_HELP,
            Page::Grid => grid_page::HELP,
            Page::Graph => graph_page::HELP,
        };
        let origin = self.layout.help.min;
        for (y, line) in lines.iter().enumerate().take(self.layout.help.height() as usize) {
            grid.draw_text(
                origin.shift(0, y as i32),
                line,
                Style::default().with_fg(FG_DIM),
            );
        }
    }

    fn draw_log(&self, grid: &mut Grid) {
        let area = self.layout.log;
        let n = area.height() as usize;
        for (y, entry) in self.log.recent(n).iter().enumerate() {
            let style = Style::default().with_fg(log_fg(entry.style));
            grid.draw_text(area.min.shift(1, y as i32), &entry.display(), style);
        }
    }
}

impl Model for PathstepModel {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        self.log.pull(&self.queue);
        let effect = self.dispatch(msg);
        // Engines log as they step; show those records in this frame.
        self.log.pull(&self.queue);
        effect
    }

    fn draw(&self, grid: &mut Grid) {
        grid.fill(Cell::new(' ', Style::default().with_fg(FG).with_bg(BG)));
        let origin = self.layout.page.min;
        match self.page {
            Page::Menu => self.draw_menu(grid, origin),
            Page::Grid => self.grid.draw(grid, origin),
            Page::Graph => self.graph.draw(grid, origin),
        }
        self.draw_help(grid);
        self.draw_log(grid);
        self.draw_status(grid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use rand::SeedableRng;

    fn model() -> (PathstepModel, LogQueue) {
        let config = Config {
            width: 7,
            height: 7,
            ..Config::default()
        };
        let queue = LogQueue::default();
        let m = PathstepModel::new(&config, queue.clone(), StdRng::seed_from_u64(3)).unwrap();
        (m, queue)
    }

    #[test]
    fn layout_fits_the_pages() {
        let config = Config::default();
        let size = ui_size(&config);
        assert_eq!(size, Point::new(50 + 1 + 28, 1 + 25 + 4));
        let wide = Config {
            width: 40,
            ..Config::default()
        };
        assert_eq!(ui_size(&wide).x, 80 + 1 + 28);
    }

    #[test]
    fn layout_areas_tile_the_screen() {
        let layout = Layout::new(&Config::default());
        assert_eq!(layout.status, Range::new(0, 0, 79, 1));
        assert_eq!(layout.page, Range::new(0, 1, 50, 26));
        assert_eq!(layout.help, Range::new(51, 1, 79, 26));
        assert_eq!(layout.log, Range::new(0, 26, 79, 30));
    }

    #[test]
    fn tab_and_escape_switch_pages() {
        let (mut m, _) = model();
        assert_eq!(m.page(), Page::Menu);
        assert_eq!(m.update(Msg::key(Key::Tab)), Some(Effect::Tick(None)));
        assert_eq!(m.page(), Page::Grid);
        m.update(Msg::key(Key::Tab));
        assert_eq!(m.page(), Page::Graph);
        m.update(Msg::key(Key::Escape));
        assert_eq!(m.page(), Page::Menu);
    }

    #[test]
    fn menu_keys_and_mouse_open_pages() {
        let (mut m, _) = model();
        m.update(Msg::key(Key::ArrowDown));
        m.update(Msg::key(Key::Enter));
        assert_eq!(m.page(), Page::Graph);
        m.update(Msg::key(Key::Escape));
        // First entry sits on the second page row, one below the status bar.
        m.update(Msg::mouse(MouseAction::Main, Point::new(4, 2)));
        assert_eq!(m.page(), Page::Grid);
        m.update(Msg::key(Key::Escape));
        m.update(Msg::key(Key::ArrowUp));
        assert_eq!(m.update(Msg::key(Key::Enter)), Some(Effect::End));
    }

    #[test]
    fn q_quits_unless_typing_a_weight() {
        let (mut m, _) = model();
        m.update(Msg::key(Key::Tab));
        m.update(Msg::key(Key::Tab));
        for x in [5, 20] {
            m.update(Msg::mouse(MouseAction::Main, Point::new(x, 6)));
        }
        m.update(Msg::mouse(MouseAction::Main, Point::new(5, 6)));
        m.update(Msg::mouse(MouseAction::Main, Point::new(20, 6)));
        assert!(m.typing());
        assert_eq!(m.update(Msg::key(Key::Char('q'))), None);
        m.update(Msg::key(Key::Escape));
        assert_eq!(m.page(), Page::Graph);
        assert_eq!(m.update(Msg::key(Key::Char('q'))), Some(Effect::End));
    }

    #[test]
    fn ticks_drive_the_grid_search() {
        let (mut m, _) = model();
        m.update(Msg::key(Key::Tab));
        let effect = m.update(Msg::key(Key::Char('1')));
        assert!(matches!(effect, Some(Effect::Tick(Some(_)))));
        let mut n = 0;
        while m.update(Msg::Tick).is_none() {
            n += 1;
            assert!(n < 1000);
        }
        assert!(m.grid.search().state().is_finished());
    }

    #[test]
    fn queued_records_reach_the_log() {
        let (mut m, queue) = model();
        m.update(Msg::Init);
        queue.push(Level::Warn, "no path".into());
        m.update(Msg::Screen {
            width: 80,
            height: 30,
        });
        let last = &m.log().recent(1)[0];
        assert_eq!(last.text, "No path");
        assert_eq!(m.log().len(), 2);
    }

    #[test]
    fn draw_shows_status_and_help() {
        let (mut m, _) = model();
        m.update(Msg::key(Key::Tab));
        let mut grid = Grid::new(100, 40);
        m.draw(&mut grid);
        let status: String = (1..9).map(|x| grid.at(Point::new(x, 0)).ch).collect();
        assert_eq!(status, "pathstep");
        let help: String = (0..6).map(|x| grid.at(Point::new(51 + x, 1)).ch).collect();
        assert_eq!(help, "arrows");
    }
}
