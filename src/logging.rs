//! Logger bootstrap for the headless runner and tests.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Default filter: dependencies at `warn`, this crate at `crate_level`.
fn default_filter(crate_level: LevelFilter) -> String {
    format!("warn,{}={crate_level}", env!("CARGO_CRATE_NAME"))
}

/// Initialises the global logger and reports whether this call installed it.
///
/// `RUST_LOG` wins when set. Otherwise the crate logs at `debug` when
/// `verbose` and at `info` when not, while Bevy and other dependencies stay at
/// `warn` so crushes and pickups are not buried.
#[must_use]
pub fn init(verbose: bool) -> bool {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(default_filter(level));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // Only fails when a logger is already installed.
    builder.try_init().is_ok()
}
