//! Invoice use cases on top of a [`Database`].
//!
//! The service adds the existence checks the HTTP layer relies on (add must
//! not overwrite, update and delete must target a stored invoice) and logs
//! every outcome.

use std::sync::Arc;

use thiserror::Error;

use invoicer_core::InvoiceId;
use invoicer_invoicing::Invoice;

use crate::database::{Database, DatabaseError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invoice with id: {0} already exists")]
    AlreadyExists(InvoiceId),
    #[error("invoice with id: {0} does not exist")]
    NotFound(InvoiceId),
    #[error("invoice has no id")]
    MissingId,
    #[error("database operation failed: {0}")]
    Database(DatabaseError),
}

impl From<DatabaseError> for ServiceError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound(id) => ServiceError::NotFound(id),
            DatabaseError::MissingId => ServiceError::MissingId,
            other => ServiceError::Database(other),
        }
    }
}

#[derive(Clone)]
pub struct InvoiceService {
    database: Arc<dyn Database>,
}

impl std::fmt::Debug for InvoiceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvoiceService").finish_non_exhaustive()
    }
}

impl InvoiceService {
    pub fn new(database: Arc<dyn Database>) -> Self {
        Self { database }
    }

    /// Store a new invoice. Fails with `AlreadyExists` if it carries an id that is stored.
    pub async fn add(&self, invoice: Invoice) -> Result<Invoice, ServiceError> {
        if let Some(id) = invoice.id {
            if self.database.exists(id).await? {
                tracing::warn!(%id, "attempt to add invoice already existing in database");
                return Err(ServiceError::AlreadyExists(id));
            }
        }
        let stored = self.database.save(invoice).await.inspect_err(|e| {
            tracing::error!("an error occurred during adding invoice: {e}");
        })?;
        tracing::info!(id = ?stored.id, number = %stored.number, "invoice added");
        Ok(stored)
    }

    pub async fn update(&self, invoice: Invoice) -> Result<Invoice, ServiceError> {
        let Some(id) = invoice.id else {
            tracing::warn!("attempt to update invoice without id");
            return Err(ServiceError::MissingId);
        };
        let stored = match self.database.update(invoice).await {
            Err(DatabaseError::NotFound(_)) => {
                tracing::warn!(%id, "attempt to update not existing invoice");
                return Err(ServiceError::NotFound(id));
            }
            other => other?,
        };
        tracing::info!(%id, "invoice updated");
        Ok(stored)
    }

    pub async fn delete_by_id(&self, id: InvoiceId) -> Result<(), ServiceError> {
        if !self.database.exists(id).await? {
            tracing::warn!(%id, "attempt to delete not existing invoice");
            return Err(ServiceError::NotFound(id));
        }
        self.database.delete(id).await?;
        tracing::info!(%id, "invoice deleted");
        Ok(())
    }

    pub async fn get_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, ServiceError> {
        Ok(self.database.get_by_id(id).await?)
    }

    pub async fn get_by_number(&self, number: &str) -> Result<Option<Invoice>, ServiceError> {
        Ok(self.database.get_by_number(number).await?)
    }

    pub async fn get_all(&self) -> Result<Vec<Invoice>, ServiceError> {
        Ok(self.database.get_all().await?)
    }

    pub async fn delete_all(&self) -> Result<(), ServiceError> {
        self.database.delete_all().await?;
        tracing::info!("all invoices deleted");
        Ok(())
    }

    pub async fn exists(&self, id: InvoiceId) -> Result<bool, ServiceError> {
        Ok(self.database.exists(id).await?)
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        Ok(self.database.count().await?)
    }
}
