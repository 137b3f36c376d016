//! Health check endpoints.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Liveness report for the Saldo service.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service name.
    pub service: &'static str,
    /// Service status.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
}

impl HealthResponse {
    fn current() -> Self {
        Self {
            service: "saldo",
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Health check handler.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::current())
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
