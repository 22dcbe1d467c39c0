//! Crossterm terminal driver for pathstep.
//!
//! [`CrosstermDriver`] implements [`pathstep_core::Driver`]: it turns
//! terminal key, mouse and resize events into [`Msg`]s and paints diff
//! frames with true-colour escape sequences.

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind},
    execute, queue,
    style::{Attribute, Color as CtColor, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use pathstep_core::{
    Point,
    app::{Context, Driver},
    grid::Frame,
    messages::{Key, ModMask, MouseAction, Msg},
    style::Color,
};

fn to_ct_color(c: Color) -> CtColor {
    if c == Color::DEFAULT {
        CtColor::Reset
    } else {
        CtColor::Rgb {
            r: c.r(),
            g: c.g(),
            b: c.b(),
        }
    }
}

fn to_mod_mask(mods: KeyModifiers) -> ModMask {
    let mut m = ModMask::NONE;
    if mods.contains(KeyModifiers::SHIFT) {
        m = m | ModMask::SHIFT;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        m = m | ModMask::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) {
        m = m | ModMask::ALT;
    }
    m
}

fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        _ => None,
    }
}

/// Translate one terminal event, dropping the ones the app has no use for.
fn to_msg(ev: Event) -> Option<Msg> {
    let time = Instant::now();
    match ev {
        // Windows terminals report releases too.
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press | KeyEventKind::Repeat,
            ..
        }) => to_key(code).map(|key| Msg::KeyDown {
            key,
            modifiers: to_mod_mask(modifiers),
            time,
        }),
        Event::Mouse(me) => {
            let action = match me.kind {
                MouseEventKind::Down(MouseButton::Left) => MouseAction::Main,
                MouseEventKind::Down(MouseButton::Right) => MouseAction::Secondary,
                MouseEventKind::Up(_) => MouseAction::Release,
                MouseEventKind::Moved | MouseEventKind::Drag(_) => MouseAction::Move,
                _ => return None,
            };
            Some(Msg::Mouse {
                action,
                pos: Point::new(i32::from(me.column), i32::from(me.row)),
                modifiers: to_mod_mask(me.modifiers),
                time,
            })
        }
        Event::Resize(w, h) => Some(Msg::Screen {
            width: i32::from(w),
            height: i32::from(h),
        }),
        _ => None,
    }
}

/// A terminal back-end using crossterm.
pub struct CrosstermDriver {
    mouse_enabled: bool,
}

impl CrosstermDriver {
    pub fn new() -> Self {
        Self {
            mouse_enabled: true,
        }
    }

    /// Configure whether mouse events are captured.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for CrosstermDriver {
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if self.mouse_enabled {
            execute!(stdout, event::EnableMouseCapture)?;
        }
        log::debug!("terminal initialised (mouse: {})", self.mouse_enabled);
        Ok(())
    }

    fn poll_msgs(
        &mut self,
        ctx: &Context,
        timeout: Duration,
        tx: Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !event::poll(timeout)? {
            return Ok(());
        }

        while event::poll(Duration::ZERO)? {
            if ctx.is_done() {
                return Ok(());
            }
            if let Some(msg) = to_msg(event::read()?) {
                tx.send(msg).ok();
            }
        }

        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = io::stdout();

        for fc in &frame.cells {
            let (p, cell) = (fc.pos, fc.cell);
            let (Ok(x), Ok(y)) = (u16::try_from(p.x), u16::try_from(p.y)) else {
                continue;
            };
            queue!(
                stdout,
                cursor::MoveTo(x, y),
                SetForegroundColor(to_ct_color(cell.style.fg)),
                SetBackgroundColor(to_ct_color(cell.style.bg))
            )?;
            if cell.style.bold {
                queue!(stdout, SetAttribute(Attribute::Bold), Print(cell.ch), SetAttribute(Attribute::Reset))?;
            } else {
                queue!(stdout, Print(cell.ch))?;
            }
        }

        stdout.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        let mut stdout = io::stdout();
        if self.mouse_enabled {
            let _ = execute!(stdout, event::DisableMouseCapture);
        }
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    #[test]
    fn colours_map_to_rgb_or_reset() {
        assert_eq!(to_ct_color(Color::DEFAULT), CtColor::Reset);
        assert_eq!(
            to_ct_color(Color::from_rgb(10, 20, 30)),
            CtColor::Rgb { r: 10, g: 20, b: 30 }
        );
    }

    #[test]
    fn key_presses_become_key_down() {
        let ev = Event::Key(KeyEvent {
            code: KeyCode::Char('s'),
            modifiers: KeyModifiers::SHIFT,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        });
        match to_msg(ev) {
            Some(Msg::KeyDown { key, modifiers, .. }) => {
                assert_eq!(key, Key::Char('s'));
                assert!(modifiers.contains(ModMask::SHIFT));
            }
            other => panic!("unexpected {other:?}"),
        }
        let release = Event::Key(KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert!(to_msg(release).is_none());
        assert!(to_key(KeyCode::F(1)).is_none());
    }

    #[test]
    fn right_click_is_secondary() {
        let ev = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Right),
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        });
        match to_msg(ev) {
            Some(Msg::Mouse { action, pos, .. }) => {
                assert_eq!(action, MouseAction::Secondary);
                assert_eq!(pos, Point::new(4, 7));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
