//! Terminal logger setup shared by the binaries.

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode, ThreadLogMode};

/// Installs a terminal logger at `level`.
///
/// Thread names are shown so interleaved lines can be traced back to the
/// player that wrote them. Calling this twice is harmless; the second call
/// is ignored with a warning.
pub fn init(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_time_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Error)
        .set_thread_mode(ThreadLogMode::Names)
        .build();
    if TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto).is_err() {
        log::warn!("logger already initialized");
    }
}

/// Maps the `--verbose` / `--quiet` flags to a level filter.
pub fn level(verbose: bool, quiet: bool) -> LevelFilter {
    match (verbose, quiet) {
        (_, true) => LevelFilter::Warn,
        (true, false) => LevelFilter::Debug,
        (false, false) => LevelFilter::Info,
    }
}
