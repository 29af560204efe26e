//! HTTP gateway entry point

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use http_gateway::{http_router, AppState, HttpGatewayConfig, RecordHttpRouter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "http_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = HttpGatewayConfig::from_env();
    tracing::info!("Starting HTTP Gateway v{}", config.version);
    tracing::info!("Record service REST endpoint: {}", config.upstream_url);

    let state = AppState {
        router: RecordHttpRouter::new(&config.upstream_url, config.upstream_timeout())?,
        version: config.version.clone(),
    };

    let listener = TcpListener::bind(&config.http_addr).await?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, http_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
