//! Health check handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::AppState;

/// Overall health plus per-dependency detail
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: &'static str,
    pub services: ServiceStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    pub database: ServiceHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    fn probe(result: Result<(), impl ToString>) -> Self {
        match result {
            Ok(()) => Self {
                status: "healthy",
                error: None,
            },
            Err(e) => Self {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Reports whether the database answers a ping
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Database reachable", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = ServiceHealth::probe(state.database.ping().await);

    let (code, status) = if database.is_healthy() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            services: ServiceStatus { database },
        }),
    )
}
