//! Command-line configuration.

use std::fmt;
use std::time::Duration;

use pathstep_core::Point;
use pathstep_maze::DEFAULT_DENSITY;

pub const USAGE: &str = "\
usage: pathstep [options]

  --width N         grid width in cells (default 25)
  --height N        grid height in cells (default 25)
  --grid-tick MS    milliseconds between grid search steps (default 30)
  --graph-tick MS   milliseconds between graph search steps (default 1000)
  --density F       random maze obstacle share, 0 to 1 (default 0.333)
  --seed N          seed for the maze generators
  --no-mouse        do not capture the mouse
  --verbose         show debug records in the message log
  --help            print this text";

/// Smallest and largest accepted grid side.
pub const MIN_SIDE: i32 = 3;
pub const MAX_SIDE: i32 = 60;

/// Runtime settings, built from defaults and command-line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub width: i32,
    pub height: i32,
    pub grid_tick: Duration,
    pub graph_tick: Duration,
    pub density: f64,
    pub seed: Option<u64>,
    pub mouse: bool,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 25,
            height: 25,
            grid_tick: Duration::from_millis(30),
            graph_tick: Duration::from_millis(1000),
            density: DEFAULT_DENSITY,
            seed: None,
            mouse: true,
            verbose: false,
        }
    }
}

impl Config {
    /// Default start cell: the top-left corner.
    pub fn start(&self) -> Point {
        Point::ZERO
    }

    /// Default goal cell: the bottom-right corner, rounded down to even
    /// coordinates so backtracker mazes always reach it.
    pub fn goal(&self) -> Point {
        Point::new((self.width - 1) & !1, (self.height - 1) & !1)
    }

    /// Parse flags (without the program name).
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cfg = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let flag = arg.as_ref();
            match flag {
                "--help" | "-h" => return Err(ConfigError::Help),
                "--no-mouse" => cfg.mouse = false,
                "--verbose" => cfg.verbose = true,
                "--width" | "--height" | "--grid-tick" | "--graph-tick" | "--density"
                | "--seed" => {
                    let value = args
                        .next()
                        .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))?;
                    cfg.apply(flag, value.as_ref())?;
                }
                other => return Err(ConfigError::UnknownFlag(other.to_string())),
            }
        }
        Ok(cfg)
    }

    fn apply(&mut self, flag: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            flag: flag.to_string(),
            value: value.to_string(),
        };
        match flag {
            "--width" | "--height" => {
                let n: i32 = value.parse().map_err(|_| invalid())?;
                if !(MIN_SIDE..=MAX_SIDE).contains(&n) {
                    return Err(invalid());
                }
                if flag == "--width" {
                    self.width = n;
                } else {
                    self.height = n;
                }
            }
            "--grid-tick" => self.grid_tick = parse_millis(value).ok_or_else(invalid)?,
            "--graph-tick" => self.graph_tick = parse_millis(value).ok_or_else(invalid)?,
            "--density" => {
                let d: f64 = value.parse().map_err(|_| invalid())?;
                if !(0.0..=1.0).contains(&d) {
                    return Err(invalid());
                }
                self.density = d;
            }
            "--seed" => self.seed = Some(value.parse().map_err(|_| invalid())?),
            _ => return Err(ConfigError::UnknownFlag(flag.to_string())),
        }
        Ok(())
    }
}

fn parse_millis(s: &str) -> Option<Duration> {
    s.parse::<u64>()
        .ok()
        .filter(|&ms| ms > 0)
        .map(Duration::from_millis)
}

/// A command line that could not be turned into a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `--help` was given.
    Help,
    UnknownFlag(String),
    MissingValue(String),
    InvalidValue { flag: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Help => f.write_str(USAGE),
            Self::UnknownFlag(flag) => write!(f, "unknown option {flag}"),
            Self::MissingValue(flag) => write!(f, "option {flag} needs a value"),
            Self::InvalidValue { flag, value } => {
                write!(f, "invalid value {value:?} for option {flag}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
