//! # Kroger API gateway
//!
//! Thin backend in front of the Kroger public API. It manages the OAuth2
//! token lifecycle (client credentials, authorization code, refresh) and
//! exposes location, product, cart and identity calls over a small REST
//! surface.
//!
//! Modules:
//! - `cache` token records, the session-keyed token store and pending login states
//! - `credentials` the provider's token endpoint
//! - `resources` bearer-authenticated resource API calls
//! - `resilience` lazy refresh and the one-retry-on-401 rule
//! - `routes` / `server` axum handlers, session cookie, start-up

pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod helpers;
pub mod observability;
pub mod resilience;
pub mod resources;
pub mod routes;
pub mod server;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::error::{GatewayError, GatewayResult};
