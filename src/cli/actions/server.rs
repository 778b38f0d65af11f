use crate::{
    api::{self, handlers::auth},
    cli::commands::{server::Environment, vault::Options as VaultOptions},
    vault,
};
use anyhow::Result;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub environment: Environment,
    pub static_dir: String,
    pub session_ttl_seconds: u64,
    pub vault: VaultOptions,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to bind or serve.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    // Never fails: a broken secret store leaves the default credentials in place.
    let credentials = vault::credentials::load(&args.vault).await;

    let auth_config = auth::AuthConfig::new()
        .with_session_ttl(Duration::from_secs(args.session_ttl_seconds))
        .with_cookie_secure(args.environment.is_production());

    let auth_state = Arc::new(auth::AuthState::new(
        auth_config,
        credentials,
        Arc::new(auth::MemoryStore::new()),
    ));

    api::new(args.port, auth_state, PathBuf::from(args.static_dir)).await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("environment", args.environment.to_string()),
        ("static_dir", args.static_dir.clone()),
        ("session_ttl", format!("{}s", args.session_ttl_seconds)),
        (
            "vault_url",
            args.vault
                .url
                .clone()
                .unwrap_or_else(|| "not configured".to_string()),
        ),
        ("vault_auth", vault_auth_mode(&args.vault).to_string()),
        (
            "vault_secret",
            format!("{}/{}", args.vault.kv_mount, args.vault.kv_path),
        ),
    ];
    log_entries("Startup configuration", &entries);
}

fn vault_auth_mode(opts: &VaultOptions) -> &'static str {
    if opts.url.is_none() {
        "n/a"
    } else if opts.token.is_some() {
        "token"
    } else if opts.wrapped_token.is_some() {
        "approle (wrapped secret-id)"
    } else if opts.secret_id.is_some() {
        "approle"
    } else {
        "none"
    }
}

fn log_entries(title: &str, entries: &[(&str, String)]) {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!("{}\n\n{title}:", banner());
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn banner() -> String {
    let short_hash = short_commit(crate::GIT_COMMIT_HASH);
    BANNER.replace(
        "{VERSION}",
        &format!(" - {} - {}", env!("CARGO_PKG_VERSION"), short_hash),
    )
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}

const BANNER: &str = r"
   _______________
  |  ___________  |
  | |  B A N K  | |
  | |  PORTAL   | |
  | |___________| |   B A N K   P O R T A L {VERSION}
  |_______________|";
