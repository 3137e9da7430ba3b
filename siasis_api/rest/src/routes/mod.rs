use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::{ApiErrorDetail, ApiResponse};

pub mod health;
pub mod lead;

pub const INTERNAL_SERVER_ERROR_MESSAGE: &str =
    "Error interno del servidor. Por favor, intenta nuevamente más tarde.";

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("Internal server error: {err:#}");
    error(
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_SERVER_ERROR_MESSAGE,
        err.to_string(),
    )
}

fn error(code: StatusCode, message: &'static str, error: String) -> Response {
    (code, Json(ApiResponse::failure(message, ApiErrorDetail { error }))).into_response()
}
