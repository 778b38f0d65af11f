//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action the binary executes.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{server, vault};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if the Vault arguments are inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    crate::cli::commands::validate(matches).map_err(|e| anyhow::anyhow!(e))?;

    let server_opts = server::Options::parse(matches);
    let vault_opts = vault::Options::parse(matches);

    Ok(Action::Server(Args {
        port: server_opts.port,
        environment: server_opts.environment,
        static_dir: server_opts.static_dir,
        session_ttl_seconds: server_opts.session_ttl_seconds,
        vault: vault_opts,
    }))
}
