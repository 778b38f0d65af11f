pub mod credentials;
pub mod kv;

use crate::{APP_USER_AGENT, cli::globals::GlobalArgs};
use anyhow::{Result, anyhow};
use reqwest::{Client, Response};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{Instrument, debug, info_span, instrument};
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn client() -> Result<Client> {
    Ok(Client::builder()
        .user_agent(APP_USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}

fn vault_error_message(json_response: &Value) -> &str {
    json_response
        .get("errors")
        .and_then(|v| v.get(0))
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// Turn a non-success Vault response into an error carrying the first Vault error message.
pub(crate) async fn error_from_response(url: &str, response: Response) -> anyhow::Error {
    let status = response.status();
    let json_response: Value = response.json().await.unwrap_or(Value::Null);

    anyhow!(
        "{} - {}, {}",
        url,
        status,
        vault_error_message(&json_response)
    )
}

/// # Errors
/// Returns an error if `url` cannot be parsed, has no host, or uses an unsupported scheme.
pub fn endpoint_url(url: &str, path: &str) -> Result<String> {
    let url = Url::parse(url)?;

    let scheme = url.scheme();

    let host = url
        .host()
        .ok_or_else(|| anyhow!("Error parsing URL: no host specified"))?
        .to_owned();

    let port = match url.port() {
        Some(p) => p,
        None => match scheme {
            "http" => 80,
            "https" => 443,
            _ => return Err(anyhow!("Error parsing URL: unsupported scheme {scheme}")),
        },
    };

    let endpoint_url = format!("{scheme}://{host}:{port}{path}");

    debug!("endpoint URL: {}", endpoint_url);

    Ok(endpoint_url)
}

/// Unwrap a wrapped `AppRole` secret id
/// Create wrapped token with:
/// vault write -wrap-ttl=300s -f auth/approle/role/bank-portal/secret-id
/// # Errors
/// Returns an error if the Vault request fails, Vault returns a non-success status, or the response is missing expected fields.
#[instrument(skip(globals, token))]
pub async fn unwrap(globals: &GlobalArgs, token: &str) -> Result<String> {
    let unwrap_url = endpoint_url(&globals.vault_url, "/v1/sys/wrapping/unwrap")?;

    let span = info_span!(
        "vault.unwrap",
        http.method = "POST",
        url = %unwrap_url
    );
    let response = client()?
        .post(&unwrap_url)
        .header("X-Vault-Token", token)
        .send()
        .instrument(span)
        .await?;

    if !response.status().is_success() {
        return Err(error_from_response(&unwrap_url, response).await);
    }

    let json_response: Value = response.json().await?;
    let sid = json_response
        .get("data")
        .and_then(|v| v.get("secret_id"))
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("Error parsing JSON response: no secret_id found"))?;

    Ok(sid.to_string())
}

/// Login to Vault using `AppRole` and return the client token
/// # Errors
/// Returns an error if the Vault request fails, Vault returns a non-success status, or the response is missing expected fields.
#[instrument(skip(globals, sid))]
pub async fn approle_login(globals: &GlobalArgs, sid: &str, rid: &str) -> Result<String> {
    let login_url = endpoint_url(&globals.vault_url, "/v1/auth/approle/login")?;

    let login_payload = json!({
        "role_id": rid,
        "secret_id": sid
    });

    debug!("login URL: {}, role ID: {}", login_url, rid);

    let span = info_span!(
        "vault.approle_login",
        http.method = "POST",
        url = %login_url
    );
    let response = client()?
        .post(&login_url)
        .json(&login_payload)
        .send()
        .instrument(span)
        .await?;

    if !response.status().is_success() {
        return Err(error_from_response(&login_url, response).await);
    }

    let json_response: Value = response.json().await?;
    let token = json_response
        .get("auth")
        .and_then(|v| v.get("client_token"))
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("Error parsing JSON response: no client_token found"))?;

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn endpoint_url_fills_default_port() -> Result<()> {
        assert_eq!(
            endpoint_url("https://vault.tld", "/v1/sys/health")?,
            "https://vault.tld:443/v1/sys/health"
        );
        assert_eq!(
            endpoint_url("http://vault.tld:8200/ignored", "/v1/x")?,
            "http://vault.tld:8200/v1/x"
        );
        Ok(())
    }

    #[test]
    fn endpoint_url_rejects_unsupported_scheme() {
        assert!(endpoint_url("ftp://vault.tld", "/v1/x").is_err());
        assert!(endpoint_url("not a url", "/v1/x").is_err());
    }

    #[tokio::test]
    async fn approle_login_returns_client_token() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/auth/approle/login"))
            .and(body_json(json!({"role_id": "role", "secret_id": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "auth": {"client_token": "s.client", "lease_duration": 60}
            })))
            .mount(&server)
            .await;

        let globals = GlobalArgs::new(server.uri());
        let token = approle_login(&globals, "secret", "role").await?;
        assert_eq!(token, "s.client");
        Ok(())
    }

    #[tokio::test]
    async fn approle_login_surfaces_vault_errors() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/auth/approle/login"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"errors": ["invalid role or secret ID"]})),
            )
            .mount(&server)
            .await;

        let globals = GlobalArgs::new(server.uri());
        let result = approle_login(&globals, "bad", "role").await;
        let err = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("invalid role or secret ID"), "got: {err}");
        Ok(())
    }

    #[tokio::test]
    async fn unwrap_returns_secret_id() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/sys/wrapping/unwrap"))
            .and(header("X-Vault-Token", "wrapped"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"secret_id": "unwrapped-secret"}
            })))
            .mount(&server)
            .await;

        let globals = GlobalArgs::new(server.uri());
        assert_eq!(unwrap(&globals, "wrapped").await?, "unwrapped-secret");
        Ok(())
    }
}
