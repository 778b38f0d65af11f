//! Startup credential bootstrap.
//!
//! Runs once before the listener is bound. Any failure is logged and the built-in
//! default credentials stay in effect.

use crate::{
    api::handlers::auth::Credentials,
    cli::{commands::vault::Options, globals::GlobalArgs},
    vault,
};
use anyhow::{Result, anyhow};
use secrecy::SecretString;
use tracing::{error, info, warn};

/// Resolve the credential pair the login endpoint accepts.
pub async fn load(opts: &Options) -> Credentials {
    let Some(url) = opts.url.as_deref() else {
        warn!("Vault URL not set, using default credentials");
        return Credentials::default();
    };

    info!("Initializing Vault connection to {}", url);

    match fetch(url, opts).await {
        Ok(credentials) => {
            info!("Loaded customer credentials from Vault");
            credentials
        }
        Err(err) => {
            error!("Vault initialization failed, using default credentials: {err:#}");
            Credentials::default()
        }
    }
}

/// # Errors
/// Returns an error if no Vault token can be obtained or the secret cannot be read.
pub async fn fetch(url: &str, opts: &Options) -> Result<Credentials> {
    let mut globals = GlobalArgs::new(url.to_string());

    let token = resolve_token(&globals, opts).await?;
    globals.set_token(SecretString::from(token));

    vault::kv::read_customer_credentials(&globals, &opts.kv_mount, &opts.kv_path).await
}

async fn resolve_token(globals: &GlobalArgs, opts: &Options) -> Result<String> {
    if let Some(token) = &opts.token {
        return Ok(token.clone());
    }

    let role_id = opts
        .role_id
        .as_deref()
        .ok_or_else(|| anyhow!("Vault token or role-id is required"))?;

    // If vault wrapped token try to unwrap, otherwise use secret-id.
    let secret_id = if let Some(wrapped) = &opts.wrapped_token {
        vault::unwrap(globals, wrapped).await?
    } else {
        opts.secret_id
            .clone()
            .ok_or_else(|| anyhow!("Vault secret-id is required"))?
    };

    vault::approle_login(globals, &secret_id, role_id).await
}
