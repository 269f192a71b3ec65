use raif_payment_bridge::api::{self, ApiContext};
use raif_payment_bridge::config::AppConfig;
use raif_payment_bridge::logging::init_tracing;
use raif_payment_bridge::orders::{InMemoryOrderStore, OrderStore};
use raif_payment_bridge::payments::providers::RaiffeisenProvider;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}

async fn init_order_store(config: &AppConfig) -> anyhow::Result<Arc<dyn OrderStore>> {
    match config.database.url.as_deref() {
        #[cfg(feature = "database")]
        Some(url) => {
            info!("📊 Initializing database connection pool...");
            let pool =
                raif_payment_bridge::database::init_pool(url, &config.database)
                    .await?;
            info!("✅ Database order store ready");
            Ok(Arc::new(raif_payment_bridge::database::PgOrderStore::new(pool)))
        }
        #[cfg(not(feature = "database"))]
        Some(_) => {
            warn!("DATABASE_URL is set but the `database` feature is disabled");
            Ok(Arc::new(InMemoryOrderStore::new()))
        }
        None => {
            warn!("⏭️  DATABASE_URL not set, using the in-memory order store");
            Ok(Arc::new(InMemoryOrderStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(&config.logging);
    config.validate()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        gateway_enabled = config.gateway.enabled,
        api_base_url = %config.gateway.api_base_url,
        max_retries = config.gateway.max_retries,
        "🚀 Starting Raiffeisen payment bridge"
    );

    let store = init_order_store(&config).await?;

    let bank = Arc::new(RaiffeisenProvider::new(config.gateway.clone()).map_err(|e| {
        error!("❌ Failed to initialize Raiffeisen client: {}", e);
        e
    })?);

    info!(
        callback_url = %config.store.callback_processing_url(),
        "Webhook endpoint to register with the bank"
    );

    let app = api::router(ApiContext {
        store,
        status_provider: bank.clone(),
        bank,
        gateway: config.gateway.clone(),
        urls: config.store.clone(),
    });

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        error!("❌ Failed to bind to address {}: {}", addr, e);
        e
    })?;

    info!(address = %addr, "🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");

    Ok(())
}
