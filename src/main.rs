use anyhow::Result;
use clap::Parser;
use kroger_gateway::server::server::{build_http_client, start, AppState};
use kroger_gateway::utils::config_loader;
use kroger_gateway::utils::logging;
use kroger_gateway::utils::logging::LogLevel;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "kroger-gateway.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args, load YAML config
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level)?;

    let provider = &service_config.provider;
    info!(
        base_url = %provider.base_url(),
        client_id = %provider.masked_client_id(),
        redirect_uri = %provider.redirect_uri,
        "provider configured"
    );

    // -------------------------------
    // 2. Create request client and shared state
    // -------------------------------

    let client = build_http_client(&service_config.settings.http)?;
    let state = AppState::new(&service_config, client).await?;

    // -------------------------------
    // 3. Start http server
    // -------------------------------

    info!("Service starting...");
    start(&service_config.settings, state).await
}
