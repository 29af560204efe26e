//! RPC gateway entry point

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rpc_gateway::{http_router, AppState, RecordRouter, RpcGatewayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rpc_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = RpcGatewayConfig::from_env();
    tracing::info!("Starting RPC Gateway v{}", config.version);
    tracing::info!("Record service gRPC endpoint: {}", config.upstream_url);

    let state = AppState {
        router: RecordRouter::new(config.upstream_url.clone(), config.upstream_timeout()),
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
