use crate::relay::RelayError;
use crate::server::wire::{
    Endpoints, GenerateRequest, GenerateResponse, HealthResponse, ServiceInfo,
};
use crate::server::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::any::Any;
use std::sync::Arc;
use tracing::{error, warn};

pub const HEALTH_PATH: &str = "/health";
pub const GENERATE_PATH: &str = "/api/generate";

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "XSLGPT Excel Add-in Server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: Endpoints {
            health: HEALTH_PATH.to_string(),
            generate: GENERATE_PATH.to_string(),
        },
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "XSLGPT server is running".to_string(),
    })
}

pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let prompt = match payload {
        Ok(Json(GenerateRequest {
            prompt: Some(prompt),
        })) => prompt,
        Ok(_) => return error_response(&RelayError::InvalidInput),
        Err(rejection) => {
            warn!(%rejection, "Rejected generate request body");
            return error_response(&RelayError::InvalidInput);
        }
    };

    match state.relay.generate(&prompt).await {
        Ok(result) => (StatusCode::OK, Json(GenerateResponse::success(result))).into_response(),
        Err(err) => error_response(&err),
    }
}

pub async fn manifest(State(state): State<Arc<AppState>>) -> Response {
    match tokio::fs::read(&state.manifest_path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "application/xml")], bytes).into_response(),
        Err(e) => {
            warn!(path = %state.manifest_path.display(), error = %e, "Manifest not available");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

pub async fn favicon() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/x-icon")], "")
}

pub fn error_response(err: &RelayError) -> Response {
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(GenerateResponse::failure(err.to_string()))).into_response()
}

/// Turns a handler panic into the same JSON body as any other internal error.
pub fn panic_response(_: Box<dyn Any + Send + 'static>) -> Response {
    error!("Request handler panicked");
    error_response(&RelayError::InternalError)
}
