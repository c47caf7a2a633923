use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use invoicer_core::InvoiceId;
use invoicer_infra::{pdf, InvoiceService};
use invoicer_invoicing::Invoice;

use crate::app::errors;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_invoices).post(add_invoice).delete(delete_all_invoices))
        .route("/byNumber", get(get_invoice_by_number))
        .route("/pdf/byNumber", get(get_pdf_by_number))
        .route("/pdf/:id", get(get_pdf))
        .route(
            "/:id",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
}

#[derive(Debug, Deserialize)]
pub struct NumberQuery {
    pub number: Option<String>,
}

fn parse_id(raw: &str) -> Result<InvoiceId, axum::response::Response> {
    raw.parse()
        .map_err(|e: invoicer_core::DomainError| {
            errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string())
        })
}

fn require_number(query: NumberQuery) -> Result<String, axum::response::Response> {
    query
        .number
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| {
            errors::json_error(StatusCode::BAD_REQUEST, "missing_number", "number query parameter is required")
        })
}

fn require_body(body: Result<Json<Invoice>, JsonRejection>) -> Result<Invoice, axum::response::Response> {
    body.map(|Json(invoice)| invoice)
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", e.body_text()))
}

pub async fn list_invoices(
    Extension(service): Extension<Arc<InvoiceService>>,
) -> axum::response::Response {
    match service.get_all().await {
        Ok(invoices) => Json(invoices).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn add_invoice(
    Extension(service): Extension<Arc<InvoiceService>>,
    body: Result<Json<Invoice>, JsonRejection>,
) -> axum::response::Response {
    let invoice = match require_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match service.add(invoice).await {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_invoice(
    Extension(service): Extension<Arc<InvoiceService>>,
    Path(id): Path<String>,
    body: Result<Json<Invoice>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let mut invoice = match require_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match invoice.id {
        Some(body_id) if body_id != id => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "id_mismatch",
                format!("path id {id} does not match invoice id {body_id}"),
            );
        }
        Some(_) => {}
        None => invoice.id = Some(id),
    }

    match service.update(invoice).await {
        Ok(stored) => Json(stored).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_invoice(
    Extension(service): Extension<Arc<InvoiceService>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match service.get_by_id(id).await {
        Ok(Some(invoice)) => Json(invoice).into_response(),
        Ok(None) => errors::not_found(format_args!("id: {id}")),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_invoice_by_number(
    Extension(service): Extension<Arc<InvoiceService>>,
    Query(query): Query<NumberQuery>,
) -> axum::response::Response {
    let number = match require_number(query) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match service.get_by_number(&number).await {
        Ok(Some(invoice)) => Json(invoice).into_response(),
        Ok(None) => errors::not_found(format_args!("number: {number}")),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_pdf(
    Extension(service): Extension<Arc<InvoiceService>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match service.get_by_id(id).await {
        Ok(Some(invoice)) => pdf_response(&invoice),
        Ok(None) => errors::not_found(format_args!("id: {id}")),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_pdf_by_number(
    Extension(service): Extension<Arc<InvoiceService>>,
    Query(query): Query<NumberQuery>,
) -> axum::response::Response {
    let number = match require_number(query) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match service.get_by_number(&number).await {
        Ok(Some(invoice)) => pdf_response(&invoice),
        Ok(None) => errors::not_found(format_args!("number: {number}")),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_invoice(
    Extension(service): Extension<Arc<InvoiceService>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match service.delete_by_id(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_all_invoices(
    Extension(service): Extension<Arc<InvoiceService>>,
) -> axum::response::Response {
    match service.delete_all().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

fn pdf_response(invoice: &Invoice) -> axum::response::Response {
    let bytes = match pdf::render_invoice_pdf(invoice) {
        Ok(v) => v,
        Err(e) => return errors::pdf_error_to_response(e),
    };
    let disposition = format!("inline; filename=\"{}.pdf\"", pdf_file_stem(&invoice.number));
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

/// Invoice numbers like `FV/1/2019` reduced to a header-safe file name.
fn pdf_file_stem(number: &str) -> String {
    let stem: String = number
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if stem.is_empty() { "invoice".to_string() } else { stem }
}
