//! HTML pages embedded in the binary.

use axum::{
    extract::Extension,
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use super::auth::{AuthState, authenticate_session, session::redirect};
use crate::api::error::AppError;

const LOGIN_PAGE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/login.html"));
const HOME_PAGE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/home.html"));

/// Login page, or straight to `/home` when already signed in.
pub async fn root(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Response, AppError> {
    if authenticate_session(&headers, &auth_state).await?.is_some() {
        return Ok(redirect("/home"));
    }
    Ok(Html(LOGIN_PAGE).into_response())
}

/// Home page; mounted behind the auth gate.
pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}
