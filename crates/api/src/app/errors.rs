use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use invoicer_infra::ServiceError;
use invoicer_infra::pdf::PdfError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::AlreadyExists(_) => json_error(StatusCode::CONFLICT, "already_exists", err.to_string()),
        ServiceError::NotFound(_) | ServiceError::MissingId => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        ServiceError::Database(e) => {
            tracing::error!("database failure: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "database_error", e.to_string())
        }
    }
}

pub fn pdf_error_to_response(err: PdfError) -> axum::response::Response {
    tracing::error!("pdf rendering failed: {err}");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "pdf_error", err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn not_found(what: impl std::fmt::Display) -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", format!("no invoice with {what}"))
}
