use std::sync::Arc;

use anyhow::Context;
use log::info;

use headsup_api::build_router;
use headsup_api::config::Config;
use headsup_api::gateway::TwilioGateway;
use headsup_api::handlers::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init_timed();

    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Sender number: {}", config.sender);
    info!("Allowed origins: {}", config.allowed_origins);

    let gateway = TwilioGateway::new(config.twilio).context("Failed to create SMS gateway client")?;

    let state = Arc::new(AppState {
        gateway: Arc::new(gateway),
        sender: config.sender,
    });

    let app = build_router(state, &config.allowed_origins);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
