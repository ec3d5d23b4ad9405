//! pvz-server: pickup point reception service (HTTP + gRPC)

use pvz_server::telemetry::logging::init_logger;
use pvz_server::{BoxError, Config, server};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _log_guard = init_logger(config.log_format, config.log_dir.as_deref());

    tracing::info!(
        "Starting pvz-server (env: {}, store: {:?})",
        config.environment,
        config.store_backend
    );

    server::run(config).await
}
