use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use paycode_core::{MemoryStore, NotificationRegistry, RegistryStore};
use paycode_events::{EventBus, EventPersistence, WebhookDelivery};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paycode_api::config::ServerConfig;
use paycode_api::router::build_app_router;
use paycode_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paycode_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::new(config.event_bus_capacity));
    let mut background: Vec<JoinHandle<()>> = Vec::new();

    // --- Storage backend ---
    let (store, pool) = match &config.database_url {
        Some(database_url) => {
            let pool = paycode_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            paycode_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            paycode_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            // Best-effort ledger of state transitions.
            background.push(tokio::spawn(EventPersistence::run(
                pool.clone(),
                event_bus.subscribe(),
            )));

            let store: Arc<dyn RegistryStore> =
                Arc::new(paycode_db::PgRegistryStore::new(pool.clone()));
            (store, Some(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory registry (state is lost on exit)");
            let store: Arc<dyn RegistryStore> = Arc::new(MemoryStore::new());
            (store, None)
        }
    };

    // --- Webhook forwarding ---
    if !config.webhook_urls.is_empty() {
        let delivery = WebhookDelivery::new().expect("Failed to build webhook HTTP client");
        tracing::info!(count = config.webhook_urls.len(), "Webhook forwarding enabled");
        background.push(tokio::spawn(
            delivery.run(config.webhook_urls.clone(), event_bus.subscribe()),
        ));
    }

    // --- Registry ---
    let registry = Arc::new(NotificationRegistry::new(store).with_sink(event_bus.clone()));

    // --- App state ---
    let shutdown = CancellationToken::new();
    let state = AppState {
        registry,
        config: Arc::new(config.clone()),
        event_bus,
        pool,
        shutdown: shutdown.clone(),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    // The router (and with it every handle on the registry and the bus) is
    // gone once `serve` returns, which closes the broadcast channel and lets
    // the background tasks drain and exit.
    tracing::info!("Server stopped accepting connections, draining event services");
    for handle in background {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix). Cancels `shutdown`
/// before returning so open SSE streams end and connections can drain.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }

    shutdown.cancel();
}
