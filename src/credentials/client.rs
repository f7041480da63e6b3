use base64::Engine;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::token::TokenRecord;
use crate::credentials::grant::{Grant, TokenErrorResponse, TokenResponse};
use crate::credentials::TokenIssuer;
use crate::error::{GatewayError, GatewayResult};
use crate::helpers::time::now_i64;
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{AUTHORIZE_PATH, TOKEN_PATH};

/// OAuth2 client for the provider's token and authorize endpoints.
#[derive(Debug, Clone)]
pub struct CredentialClient {
    base_url: String,
    client_id: String,
    client_secret: String,
    client: Client,
}

impl CredentialClient {
    pub fn new(base_url: &str, client_id: &str, client_secret: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// App-level token, not tied to any end user.
    pub async fn client_credentials_token(&self, scope: &str) -> GatewayResult<TokenRecord> {
        self.request_token(Grant::ClientCredentials { scope }).await
    }

    /// Provider login page for the authorization-code flow. No network call.
    pub fn authorization_url(&self, redirect_uri: &str, scope: &str, state: &str) -> GatewayResult<String> {
        let url = Url::parse_with_params(
            &format!("{}{}", self.base_url, AUTHORIZE_PATH),
            &[
                ("scope", scope),
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("state", state),
            ],
        )
        .map_err(|e| GatewayError::validation(format!("cannot build authorization url: {e}")))?;
        Ok(url.into())
    }

    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> GatewayResult<TokenRecord> {
        if code.trim().is_empty() {
            return Err(GatewayError::validation("authorization code is empty"));
        }
        self.request_token(Grant::AuthorizationCode { code, redirect_uri }).await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> GatewayResult<TokenRecord> {
        if refresh_token.trim().is_empty() {
            return Err(GatewayError::validation("refresh token is empty"));
        }
        self.request_token(Grant::RefreshToken { refresh_token }).await
    }

    /// `Basic base64(client_id:client_secret)`
    pub fn basic_authorization(&self) -> String {
        let credentials = format!("{}:{}", self.client_id, self.client_secret);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(credentials)
        )
    }

    async fn request_token(&self, grant: Grant<'_>) -> GatewayResult<TokenRecord> {
        let metrics = get_metrics().await;
        let grant_name = grant.name();
        metrics.token_grants.with_label_values(&[grant_name]).inc();

        let issued_at = now_i64();
        let url = format!("{}{}", self.base_url, TOKEN_PATH);
        debug!(grant = grant_name, "requesting token");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.basic_authorization())
            .header(ACCEPT, "application/json")
            .form(&grant.form())
            .send()
            .await
            .inspect_err(|e| {
                warn!(grant = grant_name, "token endpoint unreachable: {}", e);
                metrics.token_grant_failures.with_label_values(&[grant_name]).inc();
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(grant = grant_name, status = %status, "token request rejected");
            metrics.token_grant_failures.with_label_values(&[grant_name]).inc();
            let message = TokenErrorResponse::message(&body)
                .unwrap_or_else(|| format!("token endpoint returned {}", status));
            return Err(GatewayError::Auth {
                message,
                status: Some(status),
                body: Some(body),
            });
        }

        let token_response: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            metrics.token_grant_failures.with_label_values(&[grant_name]).inc();
            GatewayError::Auth {
                message: format!("malformed token response: {e}"),
                status: Some(status),
                body: Some(body.clone()),
            }
        })?;

        info!(grant = grant_name, expires_in = token_response.expires_in, "token obtained");
        Ok(token_response.into_record(issued_at))
    }
}

impl TokenIssuer for CredentialClient {
    async fn client_credentials(&self, scope: &str) -> GatewayResult<TokenRecord> {
        self.client_credentials_token(scope).await
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> GatewayResult<TokenRecord> {
        CredentialClient::exchange_code(self, code, redirect_uri).await
    }

    async fn refresh(&self, refresh_token: &str) -> GatewayResult<TokenRecord> {
        self.refresh_token(refresh_token).await
    }
}
