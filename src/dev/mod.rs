//! `marks-dev`: a local stand-in for the identity provider and the student
//! backend, held entirely in memory. The browser front-end points at it during
//! development and the integration tests run the HTTP clients against it.

pub mod handlers;
pub mod state;

pub use state::{DevSettings, DevState};

use anyhow::Result;
use axum::{
    Router,
    extract::Extension,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub fn router(state: DevState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/authorize", post(handlers::authorize))
        .route("/v1/authorize/:request_id/token", post(handlers::token))
        .route("/authorize/:request_id", get(handlers::approve))
        .route("/v1/logout", post(handlers::logout))
        .route(
            "/v1/students",
            get(handlers::list_students).post(handlers::create_student),
        )
        .route(
            "/v1/students/:id",
            put(handlers::update_student).delete(handlers::delete_student),
        )
        .layer(Extension(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serves the harness on an already bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, state: DevState) -> Result<()> {
    info!(address = %listener.local_addr()?, "marks-dev listening");

    axum::serve(listener, router(state).into_make_service()).await?;

    Ok(())
}

/// Binds `port` on all interfaces and serves.
pub async fn new(port: u16, settings: DevSettings) -> Result<()> {
    let listener = TcpListener::bind(format!("[::]:{port}")).await?;

    serve(listener, DevState::new(settings)).await
}
