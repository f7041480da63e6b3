use serde::Deserialize;

use crate::config::provider::{ProviderConfig, SessionConfig};
use crate::config::settings::SettingsConfig;

pub mod loader;
pub mod provider;
pub mod settings;
pub mod validator;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub provider: ProviderConfig,
    pub session: SessionConfig,
}
