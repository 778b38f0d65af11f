use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Login form fields; missing or non-string fields deserialize as empty strings.
#[derive(ToSchema, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    #[serde(deserialize_with = "string_or_empty")]
    pub customer_id: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub password: String,
}

// A number or object can never match a credential, so it is treated like a blank field.
fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => value,
        _ => String::new(),
    })
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("customer_id", &self.customer_id)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthResponse {
    #[must_use]
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    #[must_use]
    pub fn invalid_credentials() -> Self {
        Self {
            success: false,
            message: Some("Invalid credentials".to_string()),
        }
    }
}
