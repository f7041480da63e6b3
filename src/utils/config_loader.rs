use anyhow::Result;
use std::path::Path;

use crate::config::loader::file_to_config;
use crate::config::ServiceConfig;

pub async fn run(config_path: &str) -> Result<ServiceConfig> {
    file_to_config(Path::new(config_path)).await
}
