use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

pub const SERVICE_NAME: &str = "G-IMPACT PDF Generator";
pub const SERVICE_VERSION: &str = "1.0.0";

#[derive(Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub pdf_generator: &'static str,
    pub fonts: &'static str,
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub checks: HealthChecks,
    pub timestamp: String,
}

pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME,
        version: SERVICE_VERSION,
        status: "healthy",
        timestamp: jiff::Timestamp::now().to_string(),
    })
}

/// Reports `degraded` when reports will be drawn with the standard fonts.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    let embedded = state.fonts.is_embedded();
    Json(HealthStatus {
        status: if embedded { "healthy" } else { "degraded" },
        checks: HealthChecks {
            pdf_generator: "ok",
            fonts: if embedded { "ok" } else { "missing - will use fallback" },
        },
        timestamp: jiff::Timestamp::now().to_string(),
    })
}
