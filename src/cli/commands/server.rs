use clap::{Arg, ArgMatches, Command, builder::PossibleValuesParser};
use std::fmt;

pub const ARG_PORT: &str = "port";
pub const ARG_ENVIRONMENT: &str = "environment";
pub const ARG_STATIC_DIR: &str = "static-dir";
pub const ARG_SESSION_TTL: &str = "session-ttl";

const DEFAULT_SESSION_TTL_SECONDS: &str = "1800";
/// One year.
pub const MAX_SESSION_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Deployment environment; controls cookie security attributes and log format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct Options {
    pub port: u16,
    pub environment: Environment,
    pub static_dir: String,
    pub session_ttl_seconds: u64,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            port: matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080),
            environment: environment(matches),
            static_dir: matches
                .get_one::<String>(ARG_STATIC_DIR)
                .cloned()
                .unwrap_or_else(|| "public".to_string()),
            session_ttl_seconds: matches
                .get_one::<u64>(ARG_SESSION_TTL)
                .copied()
                .unwrap_or(1800),
        }
    }
}

/// Read the deployment environment; anything but `production` is development.
#[must_use]
pub fn environment(matches: &ArgMatches) -> Environment {
    match matches.get_one::<String>(ARG_ENVIRONMENT).map(String::as_str) {
        Some("production") => Environment::Production,
        _ => Environment::Development,
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("BANK_PORTAL_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_ENVIRONMENT)
                .short('e')
                .long("environment")
                .help("Deployment environment, production marks the session cookie Secure")
                .default_value("development")
                .env("BANK_PORTAL_ENV")
                .value_parser(PossibleValuesParser::new(["development", "production"])),
        )
        .arg(
            Arg::new(ARG_STATIC_DIR)
                .long("static-dir")
                .help("Directory served for static assets")
                .default_value("public")
                .env("BANK_PORTAL_STATIC_DIR"),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL)
                .long("session-ttl")
                .help("Session idle timeout in seconds (at most one year)")
                .default_value(DEFAULT_SESSION_TTL_SECONDS)
                .env("BANK_PORTAL_SESSION_TTL")
                .value_parser(clap::value_parser!(u64).range(1..=MAX_SESSION_TTL_SECONDS)),
        )
}
