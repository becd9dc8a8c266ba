//! Post feed server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p feed-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env` if present).

use feed_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Server failed");
        eprintln!("feed-api: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        address = %config.api.address(),
        persistent = config.database.is_some(),
        "Configuration loaded"
    );

    feed_api::run(config).await?;

    Ok(())
}
