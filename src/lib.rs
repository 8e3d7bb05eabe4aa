pub mod api;
pub mod config;
pub mod directory;
pub mod error;
pub mod seed;
pub mod state;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

use crate::state::AppState;

fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .route("/activities", get(api::list_activities))
        .route("/activities/{activity_name}/signup", post(api::signup))
        .route(
            "/activities/{activity_name}/unregister",
            delete(api::unregister),
        )
}

/// Build the Axum router with all routes
pub fn build_router(state: Arc<AppState>) -> Router {
    routes()
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Build the router with the frontend served under `/static`
pub fn build_router_with_static(state: Arc<AppState>, static_dir: &Path) -> Router {
    routes()
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `host:port` and serve `router` until `cancel` fires.
///
/// Returns the bound address (useful with port 0) and the server task handle.
pub async fn spawn_http_server(
    router: Router,
    host: &str,
    port: u16,
    cancel: CancellationToken,
) -> anyhow::Result<(SocketAddr, tokio::task::JoinHandle<()>)> {
    let listener = TcpListener::bind(format!("{}:{}", host, port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "HTTP server listening");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move { cancel.cancelled().await })
            .await
            .ok();
    });

    Ok((addr, handle))
}
