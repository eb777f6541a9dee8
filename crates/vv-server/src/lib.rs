//! vv-server: HTTP API for uploading and streaming videos.
//!
//! This crate ties the record store from `vv-db` and the range logic from
//! `vv-core` into a running Axum server. It provides:
//!
//! - Multipart upload of a video plus its thumbnail
//! - Range-aware streaming of stored videos
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod upload;

use std::net::SocketAddr;
use std::sync::Arc;

use vv_core::config::Config;
use vv_db::store::SqliteVideoStore;

use crate::context::AppContext;

/// Start the vidvault server.
///
/// Opens the database, builds the [`AppContext`] and serves HTTP until a
/// shutdown signal arrives. The database pool is released once in-flight
/// requests have drained.
pub async fn start(config: Config) -> vv_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    // Initialize database.
    let db_path = &config.server.db_path;
    let existed = db_path.exists();
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            tracing::info!("Created database directory {}", parent.display());
        }
    }
    let db_str = db_path.to_string_lossy();
    let pool = vv_db::pool::init_pool(&db_str)?;
    if existed {
        tracing::info!("Database opened (existing) at {db_str}");
    } else {
        tracing::info!("Database created (new) at {db_str}");
    }

    std::fs::create_dir_all(&config.upload.dir)?;
    tracing::info!("Storing uploads in {}", config.upload.dir.display());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| vv_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let store = Arc::new(SqliteVideoStore::new(pool));
    let ctx = AppContext::new(store, config);
    let app = router::build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| vv_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and with it the last pool handle) is dropped by `serve`.
    tracing::info!("Database pool closed; server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
