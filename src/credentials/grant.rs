use serde::Deserialize;

use crate::cache::token::TokenRecord;

/// Grant types accepted by the provider's token endpoint.
#[derive(Debug, Clone, Copy)]
pub enum Grant<'a> {
    ClientCredentials { scope: &'a str },
    AuthorizationCode { code: &'a str, redirect_uri: &'a str },
    RefreshToken { refresh_token: &'a str },
}

impl<'a> Grant<'a> {
    pub fn name(&self) -> &'static str {
        match self {
            Grant::ClientCredentials { .. } => "client_credentials",
            Grant::AuthorizationCode { .. } => "authorization_code",
            Grant::RefreshToken { .. } => "refresh_token",
        }
    }

    /// `application/x-www-form-urlencoded` body fields.
    pub fn form(&self) -> Vec<(&'static str, &'a str)> {
        let mut form = vec![("grant_type", self.name())];
        match *self {
            Grant::ClientCredentials { scope } => form.push(("scope", scope)),
            Grant::AuthorizationCode { code, redirect_uri } => {
                form.push(("code", code));
                form.push(("redirect_uri", redirect_uri));
            }
            Grant::RefreshToken { refresh_token } => form.push(("refresh_token", refresh_token)),
        }
        form
    }
}

/// Token endpoint success payload.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
}

impl TokenResponse {
    pub fn into_record(self, issued_at: i64) -> TokenRecord {
        TokenRecord::new(
            self.access_token,
            self.refresh_token.filter(|refresh_token| !refresh_token.is_empty()),
            issued_at,
            self.expires_in,
            self.scope,
            self.token_type,
        )
    }
}

/// Token endpoint error payload (RFC 6749 section 5.2).
#[derive(Debug, Deserialize)]
pub struct TokenErrorResponse {
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl TokenErrorResponse {
    pub fn message(body: &str) -> Option<String> {
        let parsed: TokenErrorResponse = serde_json::from_str(body).ok()?;
        parsed.error_description.or(parsed.error)
    }
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_credentials_response_becomes_record() {
        let issued_at = 1_700_000_000;
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token":"A","expires_in":3600,"token_type":"bearer","scope":"product.compact"}"#,
        )
        .unwrap();

        let record = response.into_record(issued_at);

        assert_eq!(record.access_token, "A");
        assert_eq!(record.expires_at, issued_at + 3600);
        assert_eq!(record.refresh_token, None);
        assert_eq!(record.scope, "product.compact");
        assert_eq!(record.token_type, "bearer");
    }

    #[test]
    fn optional_fields_have_defaults() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token":"A","expires_in":1800,"refresh_token":"R"}"#).unwrap();
        let record = response.into_record(0);

        assert_eq!(record.refresh_token.as_deref(), Some("R"));
        assert_eq!(record.token_type, "bearer");
        assert_eq!(record.scope, "");
    }

    #[test]
    fn grant_forms() {
        assert_eq!(
            Grant::ClientCredentials { scope: "product.compact" }.form(),
            vec![("grant_type", "client_credentials"), ("scope", "product.compact")]
        );
        assert_eq!(
            Grant::AuthorizationCode { code: "c", redirect_uri: "http://localhost/cb" }.form(),
            vec![("grant_type", "authorization_code"), ("code", "c"), ("redirect_uri", "http://localhost/cb")]
        );
        assert_eq!(
            Grant::RefreshToken { refresh_token: "r" }.form(),
            vec![("grant_type", "refresh_token"), ("refresh_token", "r")]
        );
    }

    #[test]
    fn error_message_prefers_description() {
        assert_eq!(
            TokenErrorResponse::message(r#"{"error":"invalid_client","error_description":"bad secret"}"#).as_deref(),
            Some("bad secret")
        );
        assert_eq!(TokenErrorResponse::message(r#"{"error":"invalid_grant"}"#).as_deref(), Some("invalid_grant"));
        assert_eq!(TokenErrorResponse::message("<html>"), None);
    }
}
