//! Server setup and initialization
//!
//! Builds the application state, starts the presence sweeper and runs the
//! HTTP server until a shutdown signal arrives.

use std::sync::Arc;

use axum::Router;
use feed_common::{AppConfig, AppError};
use feed_core::PostRepository;
use feed_db::{create_pool, run_migrations, MemoryPostRepository, PgPostRepository};
use feed_realtime::{BusConfig, EventBus, PresenceStore, PresenceSweeper, SweeperConfig, SweeperHandle};
use feed_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
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

/// Initialize all dependencies and create AppState
///
/// Uses PostgreSQL when a database is configured, the in-memory store
/// otherwise.
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let post_repo: Arc<dyn PostRepository> = match &config.database {
        Some(database) => {
            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&feed_db::DatabaseConfig::from(database))
                .await
                .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;
            run_migrations(&pool)
                .await
                .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;
            info!("PostgreSQL connection established");
            Arc::new(PgPostRepository::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, posts are kept in memory only");
            Arc::new(MemoryPostRepository::new())
        }
    };

    let service_context = ServiceContextBuilder::new()
        .post_repo(post_repo)
        .bus(EventBus::new(BusConfig::from(&config.feed)))
        .presence(PresenceStore::new())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Start the presence sweeper over the state's store and bus
pub fn start_sweeper(state: &AppState) -> SweeperHandle {
    let ctx = state.service_context();
    PresenceSweeper::new(
        SweeperConfig::from(&state.config().feed),
        ctx.presence().clone(),
        ctx.bus().clone(),
    )
    .start()
}

/// Serve `app` on `listener` until `shutdown` is cancelled
///
/// Open streams are children of `shutdown`, so they end with it and the
/// graceful shutdown does not wait on them.
pub async fn run_server(
    app: Router,
    listener: TcpListener,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    let shutdown = state.shutdown().clone();
    let sweeper = start_sweeper(&state);
    let app = create_app(state);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    let result = run_server(app, listener, shutdown).await;

    sweeper.stop().await;

    result
}

/// Resolves on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn test_state() -> AppState {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        create_app_state(config).await.unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = create_app(test_state().await);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_add_post_requires_identity() {
        let app = create_app(test_state().await);

        let response = app
            .oneshot(
                Request::post("/api/posts")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"text":"hi"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sweeper_stops_with_server() {
        let state = test_state().await;
        let sweeper = start_sweeper(&state);
        assert!(sweeper.is_running());
        sweeper.stop().await;
    }
}
