//! rdpgate gateway binary.

use rdpgate_server::{GatewayConfig, run_server, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let config = GatewayConfig::load()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        cache = ?config.cache.backend,
        "starting rdpgate"
    );

    run_server(config).await?;

    Ok(())
}
