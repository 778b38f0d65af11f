//! Session token helpers.

use anyhow::{Context, Result};
use base64::Engine;
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

use super::store::SessionKey;

/// Create a new session token for the auth cookie.
/// The raw value is only returned to set the cookie; the store is keyed by its hash.
pub(super) fn generate_session_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// Hash a session token so raw values never reach the session store.
pub(super) fn hash_session_token(token: &str) -> SessionKey {
    let digest: [u8; 32] = Sha256::digest(token.as_bytes()).into();
    SessionKey::from(digest)
}
