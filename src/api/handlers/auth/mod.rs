//! Auth handlers and supporting modules.
//!
//! Login compares the submitted customer ID and password with the credential pair
//! injected at startup and, on a match, issues a fresh cookie session. The auth gate
//! ([`require_auth`]) protects the home page and the customer data endpoint.
//!
//! ## Session Cookie
//!
//! `bank_portal_session` carries a 256-bit random token (`HttpOnly`, `SameSite=Lax`,
//! `Secure` in production). The store only ever sees the token's SHA-256 hash.

mod credentials;
pub(crate) mod login;
pub(crate) mod session;
mod state;
mod store;
pub(crate) mod types;
mod utils;

pub use credentials::{Credentials, DEFAULT_CUSTOMER_ID, DEFAULT_PASSWORD};
pub use session::{ActiveSession, SESSION_COOKIE_NAME, authenticate_session, require_auth};
pub use state::{AuthConfig, AuthState};
pub use store::{MemoryStore, SessionKey, SessionRecord, SessionStore};
