pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health))
        // Checklist
        .route("/introduce", post(routes::checklist::introduce))
        .route("/ensure-checklist", post(routes::checklist::ensure_checklist))
        .route("/checklist", post(routes::checklist::get_checklist))
        .route(
            "/refresh-checklist",
            post(routes::checklist::refresh_checklist),
        )
        // Scaffolding and progress
        .route("/scaffold", post(routes::tasks::scaffold))
        .route("/status", post(routes::tasks::status))
        .route("/mark", post(routes::tasks::mark))
        // Execution
        .route("/tdd/start", post(routes::tdd::start))
        .route("/orchestrate", post(routes::tdd::orchestrate))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Serve on `0.0.0.0:{port}`.
pub async fn serve(root: PathBuf, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    serve_on(root, listener).await
}

/// Serve on a pre-bound listener, so the caller can read the actual port
/// first (useful with `port = 0`).
pub async fn serve_on(root: PathBuf, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    tracing::info!(root = %root.display(), "listening on http://localhost:{actual_port}");
    axum::serve(listener, build_router(root)).await?;
    Ok(())
}
