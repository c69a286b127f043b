//! HTTP transport for the generation endpoint.
//!
//! Routes:
//! - `POST /generate_yaml` renders the posted model, always with `200 OK`
//! - `GET /up` answers `ok` for health checks

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::endpoint;
use crate::error::EndpointError;

/// Content type of every generation response.
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// Build the application router.
pub fn create_router(config: &ServerConfig) -> Router {
    Router::new()
        .route("/generate_yaml", post(generate_yaml_handler))
        .route("/up", get(health_handler))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
}

async fn generate_yaml_handler(body: Result<Bytes, BytesRejection>) -> impl IntoResponse {
    let text = match body {
        Ok(bytes) => endpoint::generate_yaml(&String::from_utf8_lossy(&bytes)),
        Err(rejection) => {
            warn!(error = %rejection, "Could not read generation request body");
            endpoint::error_line(&EndpointError::UnreadableBody)
        }
    };

    (StatusCode::OK, [(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)], text)
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Serve the generation endpoint until Ctrl-C.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;
    let app = create_router(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %listener.local_addr()?,
        max_body_bytes = config.max_body_bytes,
        "Generation endpoint listening"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Generation endpoint stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Could not listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
