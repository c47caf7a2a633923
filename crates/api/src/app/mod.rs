//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: database selection and start-up seeding
//! - `routes/`: HTTP routes + handlers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use invoicer_infra::InvoiceService;

pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the tests).
pub fn build_app(service: Arc<InvoiceService>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/invoices", routes::invoices::router())
        .layer(Extension(service))
}
