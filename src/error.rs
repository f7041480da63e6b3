//! Error taxonomy shared by the credential, resource and routing layers.
//!
//! Every failure reaches the router as a [`GatewayError`] and is rendered as
//! a JSON body with a matching status code; nothing is swallowed.

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// Token endpoint rejected the credentials, code or refresh token, or no
    /// usable user token exists for the session. Never retried automatically.
    #[error("authentication failed: {message}")]
    Auth {
        message: String,
        status: Option<StatusCode>,
        body: Option<String>,
    },

    /// Resource API answered with a non-2xx status or an unreadable payload.
    #[error("upstream request failed ({status}): {message}")]
    Upstream {
        message: String,
        status: StatusCode,
        body: String,
    },

    /// Provider unreachable or the request timed out.
    #[error("upstream unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// Malformed input, rejected before any network call.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The token endpoint refused an authorization code presented at the
    /// login callback. Reported as a bad request, with the provider's answer.
    #[error("invalid authorization code: {message}")]
    InvalidGrant {
        message: String,
        status: Option<StatusCode>,
        body: Option<String>,
    },
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
            status: None,
            body: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Rewrite a rejected code exchange as a client error; other errors pass through.
    pub fn into_invalid_grant(self) -> Self {
        match self {
            Self::Auth { message, status, body } => Self::InvalidGrant { message, status, body },
            other => other,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth { .. } => "auth",
            Self::Upstream { .. } | Self::Transport(_) => "upstream",
            Self::Validation(_) | Self::InvalidGrant { .. } => "validation",
        }
    }

    /// A resource API refused the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Upstream { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidGrant { .. } => StatusCode::BAD_REQUEST,
            Self::Auth { .. } => StatusCode::UNAUTHORIZED,
            Self::Upstream { status, .. } => match *status {
                StatusCode::NOT_FOUND => StatusCode::NOT_FOUND,
                StatusCode::UNAUTHORIZED => StatusCode::UNAUTHORIZED,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn upstream_payload(&self) -> Option<Value> {
        match self {
            Self::Auth {
                status: Some(status),
                body,
                ..
            }
            | Self::InvalidGrant {
                status: Some(status),
                body,
                ..
            } => Some(json!({ "status": status.as_u16(), "body": body })),
            Self::Upstream { status, body, .. } => {
                Some(json!({ "status": status.as_u16(), "body": body }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });
        if let Some(upstream) = self.upstream_payload() {
            body["upstream"] = upstream;
        }
        (status, Json(body)).into_response()
    }
}
