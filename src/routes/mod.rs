//! HTTP handlers. Each one validates its input, picks the token it needs and
//! hands the call to the resource client; failures render as [`GatewayError`].
//!
//! [`GatewayError`]: crate::error::GatewayError

pub mod account;
pub mod auth;
pub mod catalog;
pub mod status;

use axum::extract::rejection::{JsonRejection, QueryRejection};

use crate::error::GatewayError;

impl From<QueryRejection> for GatewayError {
    fn from(rejection: QueryRejection) -> Self {
        GatewayError::validation(rejection.body_text())
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::validation(rejection.body_text())
    }
}
