use crate::cli::{actions::Action, commands, dispatch, telemetry};
use anyhow::Result;
use clap::{ArgMatches, parser::ValueSource};
use tracing::Level;

/// Map verbosity count to tracing level
const fn get_verbosity_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// INFO unless `-v` or `BANK_PORTAL_LOG_LEVEL` picks a level.
fn log_level(matches: &ArgMatches) -> Level {
    match matches.value_source(commands::logging::ARG_VERBOSITY) {
        None | Some(ValueSource::DefaultValue) => Level::INFO,
        Some(_) => get_verbosity_level(
            matches
                .get_one::<u8>(commands::logging::ARG_VERBOSITY)
                .copied()
                .unwrap_or(2),
        ),
    }
}

/// Main entry point for the CLI - builds and returns the Action
///
/// # Errors
///
/// Returns an error if argument parsing, telemetry initialization, or action dispatch fails
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    // Production logs are shipped as JSON lines.
    let log_format = if commands::server::environment(&matches).is_production() {
        telemetry::LogFormat::Json
    } else {
        telemetry::LogFormat::Pretty
    };

    telemetry::init(log_level(&matches), log_format)?;

    dispatch::handler(&matches)
}
