use serde::Deserialize;

use crate::utils::constants::{
    CERTIFICATION_BASE_URL, DEFAULT_CLIENT_SCOPE, DEFAULT_SESSION_COOKIE, DEFAULT_USER_SCOPE,
    PRODUCTION_BASE_URL,
};

/// ================================
/// Kroger API application credentials
/// ================================
#[derive(Deserialize, Clone)]
pub struct ProviderConfig {
    #[serde(default)]
    pub environment: ProviderEnvironment,
    /// overrides the environment's base url (tests, proxies)
    pub base_url: Option<String>,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    #[serde(default = "default_client_scope")]
    pub client_scope: String,
    #[serde(default = "default_user_scope")]
    pub user_scope: String,
}

impl ProviderConfig {
    pub fn base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
            .to_owned()
    }

    /// First characters of the client id, safe to log or expose.
    pub fn masked_client_id(&self) -> String {
        if self.client_id.is_empty() {
            return "Not set".to_owned();
        }
        let prefix: String = self.client_id.chars().take(8).collect();
        format!("{prefix}...")
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url())
            .field("client_id", &self.masked_client_id())
            .field("redirect_uri", &self.redirect_uri)
            .field("client_scope", &self.client_scope)
            .field("user_scope", &self.user_scope)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderEnvironment {
    #[default]
    Production,
    Certification,
}

impl ProviderEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            ProviderEnvironment::Production => PRODUCTION_BASE_URL,
            ProviderEnvironment::Certification => CERTIFICATION_BASE_URL,
        }
    }
}

/// ================================
/// Browser session cookie
/// ================================
#[derive(Deserialize, Clone)]
pub struct SessionConfig {
    /// signing key material, at least 32 bytes
    pub secret: String,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("cookie_name", &self.cookie_name)
            .finish_non_exhaustive()
    }
}

fn default_redirect_uri() -> String {
    "http://localhost:8080/auth/callback".to_owned()
}

fn default_client_scope() -> String {
    DEFAULT_CLIENT_SCOPE.to_owned()
}

fn default_user_scope() -> String {
    DEFAULT_USER_SCOPE.to_owned()
}

fn default_cookie_name() -> String {
    DEFAULT_SESSION_COOKIE.to_owned()
}
