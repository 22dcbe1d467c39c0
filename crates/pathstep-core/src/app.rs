//! The Elm-architecture application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`].
//!
//! The loop owns the animation clock. A model asks for ticks with
//! [`Effect::Tick`] and receives [`Msg::Tick`] at that cadence until it asks
//! for them to stop; models themselves never look at wall-clock time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::grid::{compute_frame, Frame, Grid};
use crate::messages::Msg;

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A simple cooperative-cancellation token backed by an [`AtomicBool`].
#[derive(Clone, Debug, Default)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver [`Msg::Tick`] every interval, or stop ticking with `None`.
    Tick(Option<Duration>),
    /// Multiple effects batched together.
    Batch(Vec<Effect>),
    /// Signal the application loop to stop.
    End,
}

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

/// The application model (Elm architecture).
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `grid`.
    fn draw(&self, grid: &mut Grid);
}

// ---------------------------------------------------------------------------
// Driver trait
// ---------------------------------------------------------------------------

/// Back-end driver (e.g. a terminal).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Poll for input messages, sending them through `tx`.
    ///
    /// Implementations should block for at most `timeout` so the loop can
    /// deliver ticks on time, and return early once `ctx.is_done()`.
    fn poll_msgs(
        &mut self,
        ctx: &Context,
        timeout: Duration,
        tx: Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Clean up / restore the terminal.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    pub width: i32,
    pub height: i32,
    /// Longest time a single poll may block.
    pub poll_interval: Duration,
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
    poll_interval: Duration,
    tick: Option<Duration>,
    last_tick: Instant,
}

impl<M: Model, D: Driver> App<M, D> {
    /// Create a new application from a configuration.
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
            poll_interval: config.poll_interval,
            tick: None,
            last_tick: Instant::now(),
        }
    }

    /// The model, e.g. for inspecting its state after [`run`](Self::run).
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run the main Model-View-Update loop.
    ///
    /// 1. Initialises the driver and sends `Msg::Init` through the model.
    /// 2. Loops: poll input → emit `Msg::Tick` when due → update → draw →
    ///    diff → flush.
    /// 3. Stops when the model returns `Effect::End` or sees `Msg::Quit`.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;

        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();
        tx.send(Msg::Init).ok();

        let mut prev_grid = Grid::new(self.width, self.height);
        let mut curr_grid = Grid::new(self.width, self.height);
        let result = self.event_loop(&ctx, &tx, &rx, &mut prev_grid, &mut curr_grid);

        self.driver.close();
        result
    }

    fn event_loop(
        &mut self,
        ctx: &Context,
        tx: &Sender<Msg>,
        rx: &Receiver<Msg>,
        prev_grid: &mut Grid,
        curr_grid: &mut Grid,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.process_pending(rx, ctx, prev_grid, curr_grid)?;

        while !ctx.is_done() {
            let timeout = self.poll_timeout();
            if let Err(e) = self.driver.poll_msgs(ctx, timeout, tx.clone()) {
                ctx.cancel();
                return Err(e);
            }

            if let Some(interval) = self.tick {
                if self.last_tick.elapsed() >= interval {
                    self.last_tick = Instant::now();
                    tx.send(Msg::Tick).ok();
                }
            }

            self.process_pending(rx, ctx, prev_grid, curr_grid)?;
        }
        Ok(())
    }

    /// How long the driver may block: never past the next tick.
    fn poll_timeout(&self) -> Duration {
        match self.tick {
            Some(interval) => interval
                .saturating_sub(self.last_tick.elapsed())
                .min(self.poll_interval),
            None => self.poll_interval,
        }
    }

    /// Drain queued messages, update the model, draw, diff, and flush.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        ctx: &Context,
        prev_grid: &mut Grid,
        curr_grid: &mut Grid,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut needs_draw = false;

        while let Ok(msg) = rx.try_recv() {
            let quit = matches!(msg, Msg::Quit);
            if let Some(effect) = self.model.update(msg) {
                self.handle_effect(effect, ctx);
            }
            if quit {
                ctx.cancel();
            }
            if ctx.is_done() {
                return Ok(());
            }
            needs_draw = true;
        }

        if needs_draw {
            self.model.draw(curr_grid);
            let frame = compute_frame(prev_grid, curr_grid);
            if !frame.cells.is_empty() {
                self.driver.flush(frame)?;
            }
            prev_grid.copy_from(curr_grid);
        }

        Ok(())
    }

    fn handle_effect(&mut self, effect: Effect, ctx: &Context) {
        match effect {
            Effect::End => ctx.cancel(),
            Effect::Tick(interval) => {
                if interval != self.tick {
                    log::debug!("tick interval set to {interval:?}");
                    self.last_tick = Instant::now();
                }
                self.tick = interval;
            }
            Effect::Batch(effects) => {
                for e in effects {
                    self.handle_effect(e, ctx);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::geom::Point;
    use crate::messages::Key;
    use std::collections::VecDeque;

    /// Replays a fixed script, one message per poll.
    struct ScriptDriver {
        script: VecDeque<Msg>,
        flushed: Vec<Frame>,
        closed: bool,
    }

    impl Driver for ScriptDriver {
        fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }

        fn poll_msgs(
            &mut self,
            _ctx: &Context,
            timeout: Duration,
            tx: Sender<Msg>,
        ) -> Result<(), Box<dyn std::error::Error>> {
            match self.script.pop_front() {
                Some(msg) => {
                    tx.send(msg).ok();
                }
                None => std::thread::sleep(timeout),
            }
            Ok(())
        }

        fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.flushed.push(frame);
            Ok(())
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    /// Starts ticking on Init and ends after three ticks.
    #[derive(Default)]
    struct TickCounter {
        ticks: u32,
        keys: u32,
    }

    impl Model for TickCounter {
        fn update(&mut self, msg: Msg) -> Option<Effect> {
            match msg {
                Msg::Init => Some(Effect::Tick(Some(Duration::from_millis(1)))),
                Msg::Tick => {
                    self.ticks += 1;
                    (self.ticks == 3).then_some(Effect::End)
                }
                Msg::KeyDown { .. } => {
                    self.keys += 1;
                    None
                }
                _ => None,
            }
        }

        fn draw(&self, grid: &mut Grid) {
            grid.set(
                Point::new(0, 0),
                Cell::default().with_char(char::from(b'0' + self.keys as u8)),
            );
        }
    }

    #[test]
    fn loop_delivers_ticks_until_end() {
        let driver = ScriptDriver {
            script: VecDeque::from(vec![Msg::key(Key::Char('a'))]),
            flushed: Vec::new(),
            closed: false,
        };
        let mut app = App::new(AppConfig {
            model: TickCounter::default(),
            driver,
            width: 2,
            height: 1,
            poll_interval: Duration::from_millis(5),
        });
        app.run().unwrap();
        assert_eq!(app.model().ticks, 3);
        assert_eq!(app.model().keys, 1);
        assert!(app.driver.closed);
        assert!(!app.driver.flushed.is_empty());
    }

    #[test]
    fn quit_message_stops_the_loop() {
        let driver = ScriptDriver {
            script: VecDeque::from(vec![Msg::Quit]),
            flushed: Vec::new(),
            closed: false,
        };
        let mut app = App::new(AppConfig {
            model: TickCounter::default(),
            driver,
            width: 1,
            height: 1,
            poll_interval: Duration::from_millis(1),
        });
        app.run().unwrap();
        assert!(app.driver.closed);
        assert!(app.model().ticks < 3);
    }

    #[test]
    fn poll_timeout_never_exceeds_poll_interval() {
        let mut app = App::new(AppConfig {
            model: TickCounter::default(),
            driver: ScriptDriver {
                script: VecDeque::new(),
                flushed: Vec::new(),
                closed: false,
            },
            width: 1,
            height: 1,
            poll_interval: Duration::from_millis(16),
        });
        assert_eq!(app.poll_timeout(), Duration::from_millis(16));
        app.tick = Some(Duration::from_secs(1));
        assert!(app.poll_timeout() <= Duration::from_millis(16));
    }
}
