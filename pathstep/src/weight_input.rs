//! Single-line prompt for typing an edge weight.

use pathstep_core::{Cell, Grid, Key, Msg, Point, Style};

/// Longest accepted input, enough for any `i32`.
const MAX_LEN: usize = 12;

/// Actions returned by [`WeightInput::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// No meaningful action.
    Pass,
    /// The text content changed.
    Change,
    Confirm,
    Cancel,
}

/// Text typed after choosing an edge's endpoints. Validation happens on
/// confirm, so anything printable is accepted here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightInput {
    content: String,
}

impl WeightInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn update(&mut self, msg: &Msg) -> InputAction {
        let Msg::KeyDown { key, .. } = msg else {
            return InputAction::Pass;
        };
        match key {
            Key::Enter => InputAction::Confirm,
            Key::Escape => InputAction::Cancel,
            Key::Backspace => {
                if self.content.pop().is_some() {
                    InputAction::Change
                } else {
                    InputAction::Pass
                }
            }
            Key::Char(ch) if !ch.is_control() && self.content.chars().count() < MAX_LEN => {
                self.content.push(*ch);
                InputAction::Change
            }
            _ => InputAction::Pass,
        }
    }

    /// Draw `prompt` followed by the content and a cursor at `p`.
    pub fn draw(&self, grid: &mut Grid, p: Point, prompt: &str, style: Style, cursor: Style) {
        let end = grid.draw_text(p, prompt, style);
        let end = grid.draw_text(end, &self.content, style);
        grid.set(end, Cell::new('_', cursor));
    }
}
