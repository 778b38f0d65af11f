use axum::{Extension, Json, response::IntoResponse};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use super::auth::ActiveSession;

const LAST_LOGIN_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerData {
    pub customer_id: String,
    pub name: String,
    pub account_type: String,
    pub balance: String,
    /// Server local time, e.g. `3/14/2026, 9:05:07 AM`.
    pub last_login: String,
}

impl CustomerData {
    fn for_customer(customer_id: &str) -> Self {
        Self {
            customer_id: customer_id.to_string(),
            name: "John Doe".to_string(),
            account_type: "Premium Savings".to_string(),
            balance: "$125,430.50".to_string(),
            last_login: Local::now().format(LAST_LOGIN_FORMAT).to_string(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/customer-data",
    responses(
        (status = 200, description = "Customer summary for the signed-in session", body = CustomerData),
        (status = 302, description = "No authenticated session; redirects to `/`")
    ),
    tag = "customer"
)]
pub async fn customer_data(Extension(session): Extension<ActiveSession>) -> impl IntoResponse {
    debug!("Customer data for {}", session.customer_id());
    Json(CustomerData::for_customer(session.customer_id()))
}
