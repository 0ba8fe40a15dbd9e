//! Global logger setup (`log` facade + `env_logger`).
//!
//! Log lines go to stderr so they never interleave with report output on
//! stdout. `RUST_LOG`, when set, overrides the `-v` derived level.

use std::io::Write;
use std::time::Instant;

use log::LevelFilter;

use crate::error::AppError;

/// Map a `-v` count to a level filter.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the global logger. Must be called at most once per process.
pub fn setup_global_logger(level: LevelFilter) -> Result<(), AppError> {
    let start = Instant::now();
    let default_filter = format!("warn,force_fit={level}");

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(move |buf, record| {
            let t = start.elapsed();
            writeln!(
                buf,
                "[{:>4}.{:03}s][{}][{}] {}",
                t.as_secs(),
                t.subsec_millis(),
                record.target(),
                record.level(),
                record.args(),
            )
        })
        .try_init()
        .map_err(|e| AppError::invalid_input(format!("Failed to initialize logger: {e}")))
}
