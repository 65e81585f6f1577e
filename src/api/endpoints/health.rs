//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub gpu_available: bool,
    pub message: &'static str,
}

fn status_message(model_loaded: bool, gpu_available: bool) -> &'static str {
    match (model_loaded, gpu_available) {
        (true, true) => "Service operational. MedGemma loaded on GPU.",
        (true, false) => "Service operational. MedGemma loaded on CPU (slower inference).",
        (false, _) => {
            "Service operational in MOCK mode. MedGemma is not loaded – responses are simulated."
        }
    }
}

/// `GET /health`
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let gateway = ctx.core.gateway();
    let model_loaded = gateway.model_loaded();
    let gpu_available = gateway.gpu_available();

    Ok(Json(HealthResponse {
        status: "ok",
        model_loaded,
        gpu_available,
        message: status_message(model_loaded, gpu_available),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_follow_status() {
        assert!(status_message(true, true).contains("GPU"));
        assert!(status_message(true, false).contains("CPU"));
        assert!(status_message(false, false).contains("MOCK"));
        assert_eq!(status_message(false, true), status_message(false, false));
    }
}
