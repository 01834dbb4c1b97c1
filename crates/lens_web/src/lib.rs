use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

/// Routes mirror the page routes; each request runs the page's controller to
/// completion and returns the settled view-state as JSON.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/article", get(handlers::article))
        .route("/fact-check", get(handlers::fact_check))
        .route("/related-topics", get(handlers::related_topics))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> lens_core::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("serving view-state on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState};
    pub use lens_core::{Error, Result};
}
