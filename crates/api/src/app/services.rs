//! Service wiring: picks the database backend from configuration and loads
//! the optional seed fixture.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use invoicer_infra::{
    AppConfig, Database, DatabaseKind, InFileDatabase, InMemoryDatabase, InvoiceService,
    PostgresDatabase, ServiceError,
};
use invoicer_invoicing::Invoice;

pub async fn build_database(config: &AppConfig) -> anyhow::Result<Arc<dyn Database>> {
    let database: Arc<dyn Database> = match config.database {
        DatabaseKind::InMemory => Arc::new(InMemoryDatabase::new()),
        DatabaseKind::InFile => Arc::new(
            InFileDatabase::open(&config.database_file)
                .await
                .with_context(|| format!("failed to open {}", config.database_file.display()))?,
        ),
        DatabaseKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set for the postgres database")?;
            Arc::new(
                PostgresDatabase::connect(url)
                    .await
                    .context("failed to connect to Postgres")?,
            )
        }
    };
    Ok(database)
}

pub async fn build_service(config: &AppConfig) -> anyhow::Result<Arc<InvoiceService>> {
    let service = Arc::new(InvoiceService::new(build_database(config).await?));
    if let Some(seed) = &config.seed_file {
        let loaded = seed_from_file(&service, seed).await?;
        tracing::info!(seed = %seed.display(), loaded, "seed invoices loaded");
    }
    Ok(service)
}

/// Add every invoice of a JSON array file. Invoices whose id is already stored are skipped.
pub async fn seed_from_file(service: &InvoiceService, path: &Path) -> anyhow::Result<usize> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let invoices: Vec<Invoice> = serde_json::from_str(&raw)
        .with_context(|| format!("seed file {} is not a JSON array of invoices", path.display()))?;

    let mut loaded = 0;
    for invoice in invoices {
        match service.add(invoice).await {
            Ok(_) => loaded += 1,
            Err(ServiceError::AlreadyExists(id)) => {
                tracing::debug!(%id, "seed invoice already stored");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(loaded)
}
