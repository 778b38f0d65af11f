use crate::{api::handlers::auth::Credentials, cli::globals::GlobalArgs, vault};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{Instrument, info_span, instrument};

pub const CUSTOMER_ID_FIELD: &str = "customer-id";
pub const CUSTOMER_PASSWORD_FIELD: &str = "customer-password";

/// Read the customer credential pair from a KV v2 secret.
/// # Errors
/// Returns an error if the Vault request fails or either field is missing or empty.
#[instrument(skip(globals))]
pub async fn read_customer_credentials(
    globals: &GlobalArgs,
    kv_mount: &str,
    kv_path: &str,
) -> Result<Credentials> {
    let path = format!(
        "/v1/{}/data/{}",
        kv_mount.trim_matches('/'),
        kv_path.trim_matches('/')
    );
    let url = vault::endpoint_url(&globals.vault_url, &path)?;

    let span = info_span!(
        "vault.kv.read",
        http.method = "GET",
        url = %url
    );
    let response = vault::client()?
        .get(&url)
        .header("X-Vault-Token", globals.vault_token.expose_secret())
        .send()
        .instrument(span)
        .await?;

    if !response.status().is_success() {
        return Err(vault::error_from_response(&url, response).await);
    }

    let json: Value = response.json().await?;
    let data = json
        .get("data")
        .and_then(|data| data.get("data"))
        .context("secret data missing from vault response")?;

    let customer_id = non_empty_field(data, CUSTOMER_ID_FIELD)?;
    let password = non_empty_field(data, CUSTOMER_PASSWORD_FIELD)?;

    Ok(Credentials::new(customer_id, SecretString::from(password)))
}

fn non_empty_field(data: &Value, field: &str) -> Result<String> {
    data.get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .with_context(|| format!("{field} missing from vault secret"))
}
