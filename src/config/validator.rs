//! Configuration validation with aggregated errors.
//! Every problem is collected so a broken deployment is fixed in one pass.

use tracing::{error, info};
use url::Url;

use crate::config::provider::{ProviderConfig, SessionConfig};
use crate::config::settings::SettingsConfig;
use crate::config::ServiceConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const MIN_SESSION_SECRET_BYTES: usize = 32;

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_provider(&cfg.provider, &mut errors);
    validate_session(&cfg.session, &mut errors);

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        Err(errors)
    }
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if let Some(s) = settings.safety_margin_seconds {
        if s > 60 * 60 * 24 {
            errors.push(format!(
                "settings.safety_margin_seconds ({}) is unreasonably large",
                s
            ));
        }
    }

    if settings.server.host.is_empty() {
        errors.push("settings.server.host must not be empty".to_owned());
    }
    if settings.server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' must be a valid port number",
            settings.server.port
        ));
    }

    if settings.http.timeout_ms == 0 {
        errors.push("settings.http.timeout_ms must be greater than zero".to_owned());
    }

    if settings.metrics.is_enabled && !settings.metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            settings.metrics.path
        ));
    }

    if let Some(logging) = &settings.logging {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' must be one of {}",
                logging.level,
                LOG_LEVELS.join(", ")
            ));
        }
    }
}

/// PROVIDER VALIDATION
fn validate_provider(provider: &ProviderConfig, errors: &mut Vec<String>) {
    if provider.client_id.trim().is_empty() {
        errors.push("provider.client_id is required (KROGER_CLIENT_ID)".to_owned());
    }
    if provider.client_secret.trim().is_empty() {
        errors.push("provider.client_secret is required (KROGER_CLIENT_SECRET)".to_owned());
    }

    let base_url = provider.base_url();
    match Url::parse(&base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        _ => errors.push(format!(
            "provider.base_url '{}' must be an absolute http(s) url",
            base_url
        )),
    }
    if Url::parse(&provider.redirect_uri).is_err() {
        errors.push(format!(
            "provider.redirect_uri '{}' must be an absolute url",
            provider.redirect_uri
        ));
    }

    if provider.client_scope.trim().is_empty() {
        errors.push("provider.client_scope must not be empty".to_owned());
    }
    if provider.user_scope.trim().is_empty() {
        errors.push("provider.user_scope must not be empty".to_owned());
    }
}

/// SESSION VALIDATION
fn validate_session(session: &SessionConfig, errors: &mut Vec<String>) {
    if session.secret.len() < MIN_SESSION_SECRET_BYTES {
        errors.push(format!(
            "session.secret must be at least {} bytes (SECRET_KEY)",
            MIN_SESSION_SECRET_BYTES
        ));
    }
    if session.cookie_name.is_empty()
        || !session
            .cookie_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        errors.push(format!(
            "session.cookie_name '{}' must be a non-empty token of [A-Za-z0-9_-]",
            session.cookie_name
        ));
    }
}
