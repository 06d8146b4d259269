//! Server setup and initialization
//!
//! Provides the application builder, the store selection, and the server
//! runner that owns the expiry sweeper.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use room_common::{AppConfig, AppError, ConfigError, StoreBackend};
use room_core::SharedRoomStore;
use room_service::{ExpirySweeper, RoomService, ServiceContext, DEFAULT_SWEEP_CONCURRENCY};
use room_store::{MemoryRoomStore, RedisPool, RedisRoomStore};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(
        router,
        &state.config().cors,
        state.config().app.env.is_production(),
    );
    router.with_state(state)
}

/// Build the configured room store
pub fn create_store(config: &AppConfig) -> Result<SharedRoomStore, AppError> {
    match config.store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory room store (single process only)");
            Ok(MemoryRoomStore::shared())
        }
        StoreBackend::Redis => {
            let redis = config
                .redis
                .as_ref()
                .ok_or(ConfigError::MissingVar("REDIS_URL"))?;
            let pool = RedisPool::from_config(redis).map_err(AppError::store)?;
            info!(
                key_prefix = %redis.key_prefix,
                max_write_retries = redis.max_write_retries,
                "Using Redis room store"
            );
            Ok(Arc::new(RedisRoomStore::from_config(pool, redis)))
        }
    }
}

/// Rooms swept at once. On Redis each room sweep holds a pooled connection,
/// so half the pool is left to the request path.
pub fn sweep_concurrency(config: &AppConfig) -> usize {
    if let Some(limit) = config.presence.sweep_concurrency {
        return limit.max(1);
    }
    match (config.store.backend, &config.redis) {
        (StoreBackend::Redis, Some(redis)) => (redis.max_connections as usize / 2).max(1),
        _ => DEFAULT_SWEEP_CONCURRENCY,
    }
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let policy = config.presence.policy()?;
    let store = create_store(&config)?;

    // An unreachable store is reported by /health/ready rather than fatal
    match store.health_check().await {
        Ok(()) => info!(backend = store.backend(), "Room store reachable"),
        Err(e) => warn!(backend = store.backend(), error = %e, "Room store not reachable yet"),
    }

    let context = ServiceContext::builder()
        .store(store)
        .policy(policy)
        .sweep_concurrency(sweep_concurrency(&config))
        .build()?;

    info!(
        heartbeat_timeout_ms = policy.heartbeat_timeout().as_millis() as u64,
        sweep_interval_ms = policy.sweep_interval().as_millis() as u64,
        sweep_concurrency = context.sweep_concurrency(),
        "Liveness policy configured"
    );

    Ok(AppState::new(Arc::new(RoomService::new(context)), config))
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::server(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::server)?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::server(format!("Invalid listen address: {e}")))?;

    // Create app state
    let state = create_app_state(config).await?;

    // Background eviction shares the service with the handlers
    let sweeper = ExpirySweeper::new(state.rooms_handle()).spawn();

    // Build application
    let app = create_app(state);

    // Run server
    let served = run_server(app, addr).await;

    sweeper.shutdown().await;
    info!("Server stopped");
    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
