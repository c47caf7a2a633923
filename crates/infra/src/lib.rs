//! Infrastructure layer: invoice storage backends, the invoice service,
//! PDF rendering and configuration.

pub mod config;
pub mod database;
pub mod invoice_service;
pub mod pdf;

pub use config::{AppConfig, ConfigError, DatabaseKind, LogFormat};
pub use database::{Database, DatabaseError, InFileDatabase, InMemoryDatabase, PostgresDatabase};
pub use invoice_service::{InvoiceService, ServiceError};
