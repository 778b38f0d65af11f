//! Catch-all error handling.
//!
//! Handler failures and panics are logged and surfaced to the client as a generic
//! `500` with no detail.

use axum::{
    Json,
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
};
use serde_json::json;
use std::any::Any;
use tracing::error;

const INTERNAL_ERROR: &str = "Internal server error";

/// Error returned by handlers; any `anyhow`-compatible error converts into it.
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        error!("Error: {:#}", self.0);
        internal_error()
    }
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": INTERNAL_ERROR })),
    )
        .into_response()
}

/// Response for a handler panic, used with `CatchPanicLayer::custom`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    error!("Error: handler panicked: {detail}");

    internal_error()
}
