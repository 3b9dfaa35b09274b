//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Request body limit sized for picture uploads
//! - Uploaded pictures served from the media prefix
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::blob::{BlobStore, FsBlobStore};
use crate::settings::Settings;
use crate::Result;

/// Origins allowed when CORS is not permissive
const LOCAL_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:8000",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:8000",
];

/// Shared application state
pub struct AppState {
    pub pool: PgPool,
    pub blobs: Arc<dyn BlobStore>,
    pub settings: Settings,
}

impl AppState {
    /// State with a filesystem blob store rooted at the configured upload dir.
    pub fn new(pool: PgPool, settings: Settings) -> Self {
        let blobs = FsBlobStore::new(settings.upload_dir.clone(), &settings.media_prefix());
        Self {
            pool,
            blobs: Arc::new(blobs),
            settings,
        }
    }
}

/// Assemble the full application router.
pub fn build_router(state: AppState) -> Router {
    let cors = if state.settings.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(LOCAL_ORIGINS.map(HeaderValue::from_static))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let media = ServeDir::new(&state.settings.upload_dir);
    let prefix = state.settings.media_prefix();
    let max_body = state.settings.max_upload_bytes;

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::users::router())
        .merge(routes::tweets::router())
        .merge(routes::medias::router());

    let app = if prefix == "/" {
        app.fallback_service(media)
    } else {
        app.nest_service(&prefix, media)
    };

    app.layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let settings = Settings::from_env()?;
/// let pool = create_pool(&settings).await?;
/// run_server(pool, settings).await?;
/// ```
pub async fn run_server(pool: PgPool, settings: Settings) -> Result<()> {
    let bind_addr = settings.bind_addr;
    tokio::fs::create_dir_all(&settings.upload_dir).await?;
    tracing::info!(upload_dir = %settings.upload_dir.display(), "media storage ready");

    let app = build_router(AppState::new(pool, settings));

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
