//! The customer credential pair accepted by the login endpoint.

use secrecy::{ExposeSecret, SecretString};

pub const DEFAULT_CUSTOMER_ID: &str = "5439090";
pub const DEFAULT_PASSWORD: &str = "Passw0rd!!";

#[derive(Clone, Debug)]
pub struct Credentials {
    customer_id: String,
    password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(customer_id: String, password: SecretString) -> Self {
        Self {
            customer_id,
            password,
        }
    }

    #[must_use]
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    /// Exact string comparison of both fields.
    #[must_use]
    pub fn matches(&self, customer_id: &str, password: &str) -> bool {
        // Evaluate both sides so a wrong ID and a wrong password cost the same.
        let id_ok = self.customer_id == customer_id;
        let password_ok = self.password.expose_secret() == password;
        id_ok & password_ok
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(
            DEFAULT_CUSTOMER_ID.to_string(),
            SecretString::from(DEFAULT_PASSWORD.to_string()),
        )
    }
}
