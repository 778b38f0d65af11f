//! Cookie sessions, the auth gate and logout.

use anyhow::Result;
use axum::{
    Json,
    extract::{Extension, Request},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{COOKIE, InvalidHeaderValue, LOCATION, SET_COOKIE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::{
    state::{AuthConfig, AuthState},
    store::{SessionKey, SessionRecord},
    types::AuthResponse,
    utils::{generate_session_token, hash_session_token},
};
use crate::api::error::AppError;

pub const SESSION_COOKIE_NAME: &str = "bank_portal_session";

/// An authenticated session resolved from the request cookie.
#[derive(Clone, Debug)]
pub struct ActiveSession {
    token: SecretString,
    key: SessionKey,
    record: SessionRecord,
}

impl ActiveSession {
    #[must_use]
    pub fn customer_id(&self) -> &str {
        &self.record.customer_id
    }
}

/// Resolve the session cookie into an authenticated session, if any.
///
/// A live session has its expiry pushed out by the configured TTL.
///
/// # Errors
/// Returns an error if the session store fails.
pub async fn authenticate_session(
    headers: &HeaderMap,
    auth_state: &AuthState,
) -> Result<Option<ActiveSession>> {
    let Some(token) = extract_session_token(headers) else {
        return Ok(None);
    };
    let key = hash_session_token(&token);

    let Some(record) = auth_state.store().load(&key).await? else {
        debug!("No live session for {:?}", key);
        return Ok(None);
    };
    if !record.authenticated {
        return Ok(None);
    }

    auth_state
        .store()
        .save(&key, record.clone(), auth_state.config().session_ttl())
        .await?;

    Ok(Some(ActiveSession {
        token: SecretString::from(token),
        key,
        record,
    }))
}

/// Create an authenticated session and return its raw token.
///
/// # Errors
/// Returns an error if token generation or the session store fails.
pub(super) async fn start_session(auth_state: &AuthState, customer_id: &str) -> Result<String> {
    let token = generate_session_token()?;
    let key = hash_session_token(&token);
    auth_state
        .store()
        .save(
            &key,
            SessionRecord::authenticated(customer_id.to_string()),
            auth_state.config().session_ttl(),
        )
        .await?;
    Ok(token)
}

/// Remove whatever session the request cookie refers to.
///
/// # Errors
/// Returns an error if the session store fails.
pub(super) async fn end_session(headers: &HeaderMap, auth_state: &AuthState) -> Result<()> {
    if let Some(token) = extract_session_token(headers) {
        auth_state
            .store()
            .remove(&hash_session_token(&token))
            .await?;
    }
    Ok(())
}

/// Auth gate for protected routes.
///
/// Authenticated requests pass through with the [`ActiveSession`] in the request
/// extensions and a refreshed cookie on the response; everything else is redirected to
/// the login page.
pub async fn require_auth(
    Extension(auth_state): Extension<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = match authenticate_session(request.headers(), &auth_state).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            debug!("Unauthenticated request to {}", request.uri().path());
            return redirect("/");
        }
        Err(err) => return AppError::from(err).into_response(),
    };

    debug!("Session {:?} refreshed", session.key);
    let cookie = session_cookie(auth_state.config(), session.token.expose_secret());
    request.extensions_mut().insert(session);

    let mut response = next.run(request).await;
    match cookie {
        Ok(cookie) => {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build session cookie: {err}"),
    }
    response
}

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Session cleared", body = AuthResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<impl IntoResponse, AppError> {
    end_session(&headers, &auth_state).await?;
    info!("Session closed");

    // Always clear the cookie, even if the session record was missing.
    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(auth_state.config()) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    Ok((
        StatusCode::OK,
        response_headers,
        Json(AuthResponse::success()),
    ))
}

/// `302 Found` to `location`.
pub(crate) fn redirect(location: &'static str) -> Response {
    (
        StatusCode::FOUND,
        [(LOCATION, HeaderValue::from_static(location))],
    )
        .into_response()
}

/// Build the `HttpOnly` session cookie.
pub(super) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl().as_secs();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let key = parts.next()?.trim();
            let val = parts.next()?.trim();
            (key == SESSION_COOKIE_NAME && !val.is_empty()).then(|| val.to_string())
        })
        .next()
}
