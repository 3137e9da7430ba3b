use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use siasis_core_lead_contracts::{LeadService, LeadSubmitError};
use tracing::info;

use super::{error, INTERNAL_SERVER_ERROR_MESSAGE};
use crate::models::{
    lead::{ApiSubmission, ApiSubmittedLead},
    ApiData, ApiResponse, ApiValidationErrors,
};

pub const SUBMIT_PATH: &str = "/api/solicitar-implementacion";

const SUBMITTED_MESSAGE: &str = "Solicitud enviada exitosamente. Te contactaremos pronto.";
const VALIDATION_FAILED_MESSAGE: &str = "Errores de validación en el formulario";
const DISPATCH_FAILED_MESSAGE: &str = "Hubo un problema al procesar tu solicitud. Por favor, intenta nuevamente o contáctanos directamente.";

pub fn router(service: Arc<impl LeadService>) -> Router<()> {
    Router::new()
        .route(SUBMIT_PATH, routing::post(submit).options(preflight))
        .with_state(service)
}

async fn submit(
    service: State<Arc<impl LeadService>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    // The content type is not checked, any body holding a JSON object is accepted.
    let parsed = body
        .map_err(|rejection| rejection.body_text())
        .and_then(|body| {
            serde_json::from_slice::<ApiSubmission>(&body).map_err(|err| err.to_string())
        });
    let submission = match parsed {
        Ok(submission) => submission,
        Err(err) => {
            tracing::error!("Failed to parse submission body: {err}");
            return error(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_SERVER_ERROR_MESSAGE,
                err,
            );
        }
    };

    info!("Received implementation request");

    match service.submit(submission.into()).await {
        Ok(submission) => Json(ApiResponse::success(
            SUBMITTED_MESSAGE,
            ApiData {
                data: ApiSubmittedLead {
                    nombre_completo: submission.full_name.into_inner(),
                    institucion: submission.institution.into_inner(),
                },
            },
        ))
        .into_response(),
        Err(LeadSubmitError::Validation(errors)) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failure(
                VALIDATION_FAILED_MESSAGE,
                ApiValidationErrors {
                    errores: errors.messages(),
                },
            )),
        )
            .into_response(),
        Err(LeadSubmitError::Dispatch(err)) => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            DISPATCH_FAILED_MESSAGE,
            err.to_string(),
        ),
    }
}

async fn preflight() -> Response {
    (
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
        (),
    )
        .into_response()
}
