use std::process::ExitCode;
use std::time::Duration;

use log::LevelFilter;
use pathstep::log::LogSink;
use pathstep::{Config, ConfigError, PathstepModel, USAGE, ui_size};
use pathstep_core::{App, AppConfig};
use pathstep_crossterm::CrosstermDriver;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

fn main() -> ExitCode {
    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(ConfigError::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("pathstep: {e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pathstep: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let level = if config.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let queue = LogSink::install(level)?;

    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    log::info!("maze seed {seed}");

    let model = PathstepModel::new(config, queue, StdRng::seed_from_u64(seed))?;
    let size = ui_size(config);
    let mut app = App::new(AppConfig {
        model,
        driver: CrosstermDriver::new().with_mouse(config.mouse),
        width: size.x,
        height: size.y,
        poll_interval: Duration::from_millis(16),
    });
    app.run()
}
