//! API handlers for the portal.
//!
//! Pages and JSON endpoints; authentication lives in [`auth`].

pub mod auth;
pub mod customer;
pub mod health;
pub mod pages;
