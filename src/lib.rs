//! # Bank Portal
//!
//! `bank-portal` is a small session-authenticated customer front end. A login form
//! checks a customer ID and password, and a successful login grants a cookie-backed
//! session that gates the home page and the customer data endpoint.
//!
//! ## Credentials (Vault KV v2)
//!
//! The accepted customer ID and password are read once at startup from a Vault KV v2
//! secret (`customer-id` and `customer-password` fields). When Vault is not configured or
//! the read fails, the service logs the failure and keeps the built-in defaults so that it
//! always starts.
//!
//! ## Sessions
//!
//! Session tokens are 256-bit random values carried in an `HttpOnly` cookie. Only the
//! SHA-256 hash of a token is used as the storage key. Sessions expire after a sliding
//! window (30 minutes by default) that is extended on every authenticated request.
//!
//! Storage is abstracted behind [`api::handlers::auth::SessionStore`]; the default
//! [`api::handlers::auth::MemoryStore`] keeps sessions in process memory.

pub mod api;
pub mod cli;
pub mod vault;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
