use anyhow::{Context, Result};
use dotenv::dotenv;
use home_sweet_loan_server::handler::AppRouter;
use shared::{
    config::{Config, ConnectionManager},
    state::AppState,
    utils::{Telemetry, init_logger},
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::init().context("Failed to load configuration")?;

    let telemetry = Telemetry::init("home-sweet-loan", &config.otel_endpoint)
        .context("Failed to initialize telemetry")?;

    let _log_guard = init_logger(telemetry.logger_provider(), "home-sweet-loan");

    let db_pool = ConnectionManager::new_pool(&config.database_url, config.run_migrations)
        .await
        .context("Failed to initialize database pool")?;

    let port = config.port;

    let state = AppState::new(db_pool, config)
        .await
        .context("Failed to create AppState")?;

    info!("Server started successfully");

    AppRouter::serve(port, state)
        .await
        .context("Failed to start server")?;

    info!("Shutting down server...");

    telemetry.shutdown()?;

    Ok(())
}
