use axum::{
    Form, Json,
    extract::{Extension, FromRequest, Request},
    http::{
        HeaderMap, StatusCode,
        header::{CONTENT_TYPE, SET_COOKIE},
    },
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::{
    session::{end_session, session_cookie, start_session},
    state::AuthState,
    types::{AuthResponse, LoginRequest},
};
use crate::api::error::AppError;

/// Login body accepted as JSON or as an urlencoded form.
#[derive(Debug)]
pub struct LoginPayload(pub LoginRequest);

impl<S> FromRequest<S> for LoginPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_json_content_type);

        if is_json {
            let Json(request) = Json::<LoginRequest>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(request))
        } else {
            let Form(request) = Form::<LoginRequest>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(request))
        }
    }
}

// Media types compare case-insensitively and ignore parameters.
fn is_json_content_type(value: &str) -> bool {
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(
        content = LoginRequest,
        content_type = "application/json",
        description = "Customer ID and password; an urlencoded form with the same fields is also accepted"
    ),
    responses(
        (status = 200, description = "Login outcome; `success` is false on a credential mismatch", body = AuthResponse),
        (status = 400, description = "Malformed body"),
        (status = 415, description = "Unsupported content type"),
        (status = 500, description = "Session store failure")
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    LoginPayload(request): LoginPayload,
) -> Result<Response, AppError> {
    info!("Login attempt for customer ID: {}", request.customer_id);

    if !auth_state
        .credentials()
        .matches(&request.customer_id, &request.password)
    {
        warn!("Invalid credentials for customer ID: {}", request.customer_id);
        return Ok(Json(AuthResponse::invalid_credentials()).into_response());
    }

    // Rotate: the old token must not survive the privilege change.
    end_session(&headers, &auth_state).await?;
    let token = start_session(&auth_state, &request.customer_id).await?;

    let mut response_headers = HeaderMap::new();
    match session_cookie(auth_state.config(), &token) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return Err(AppError::from(err));
        }
    }

    info!("Login successful for customer ID: {}", request.customer_id);

    Ok((
        StatusCode::OK,
        response_headers,
        Json(AuthResponse::success()),
    )
        .into_response())
}
