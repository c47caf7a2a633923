//! JSON-lines file backend: one serialized invoice per line.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use invoicer_core::InvoiceId;
use invoicer_invoicing::Invoice;

use super::{Database, DatabaseError};

/// File-backed invoice database.
///
/// Inserts append a line; updates and deletes rewrite the whole file through
/// a sibling temp file that is renamed over the original. All file access is
/// serialized by an async mutex.
#[derive(Debug)]
pub struct InFileDatabase {
    path: PathBuf,
    io: Mutex<()>,
    last_id: AtomicI64,
}

impl InFileDatabase {
    /// Open (creating if missing) the database file at `path`.
    ///
    /// The id counter resumes after the highest id stored in the file.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DatabaseError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        let existing = read_invoices(&path).await?;
        let last_id = existing
            .iter()
            .filter_map(|i| i.id.map(i64::from))
            .max()
            .unwrap_or(0);

        tracing::info!(path = %path.display(), invoices = existing.len(), "in-file database opened");

        Ok(Self {
            path,
            io: Mutex::new(()),
            last_id: AtomicI64::new(last_id),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, invoice: &Invoice) -> Result<(), DatabaseError> {
        let mut line = serde_json::to_string(invoice)?;
        line.push('\n');
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn rewrite(&self, invoices: &[Invoice]) -> Result<(), DatabaseError> {
        let mut contents = String::new();
        for invoice in invoices {
            contents.push_str(&serde_json::to_string(invoice)?);
            contents.push('\n');
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

async fn read_invoices(path: &Path) -> Result<Vec<Invoice>, DatabaseError> {
    let contents = tokio::fs::read_to_string(path).await?;
    let mut invoices = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Invoice>(line) {
            Ok(invoice) if invoice.id.is_some() => invoices.push(invoice),
            Ok(_) => tracing::warn!(line = idx + 1, "skipping stored invoice without id"),
            Err(e) => tracing::warn!(line = idx + 1, "skipping unparsable invoice line: {e}"),
        }
    }
    Ok(invoices)
}

#[async_trait::async_trait]
impl Database for InFileDatabase {
    async fn save(&self, invoice: Invoice) -> Result<Invoice, DatabaseError> {
        let _guard = self.io.lock().await;
        let mut invoices = read_invoices(&self.path).await?;

        if let Some(id) = invoice.id {
            if let Some(slot) = invoices.iter_mut().find(|i| i.id == Some(id)) {
                *slot = invoice.clone();
                self.rewrite(&invoices).await?;
                tracing::debug!(%id, "invoice updated");
                return Ok(invoice);
            }
        }

        let id = InvoiceId::new(self.last_id.fetch_add(1, Ordering::SeqCst)).next();
        let stored = invoice.with_id(id);
        self.append(&stored).await?;
        tracing::debug!(%id, "invoice inserted");
        Ok(stored)
    }

    async fn update(&self, invoice: Invoice) -> Result<Invoice, DatabaseError> {
        let id = invoice.id.ok_or(DatabaseError::MissingId)?;
        let _guard = self.io.lock().await;
        let mut invoices = read_invoices(&self.path).await?;
        let slot = invoices
            .iter_mut()
            .find(|i| i.id == Some(id))
            .ok_or(DatabaseError::NotFound(id))?;
        *slot = invoice.clone();
        self.rewrite(&invoices).await?;
        tracing::debug!(%id, "invoice updated");
        Ok(invoice)
    }

    async fn delete(&self, id: InvoiceId) -> Result<(), DatabaseError> {
        let _guard = self.io.lock().await;
        let mut invoices = read_invoices(&self.path).await?;
        let before = invoices.len();
        invoices.retain(|i| i.id != Some(id));
        if invoices.len() == before {
            return Err(DatabaseError::NotFound(id));
        }
        self.rewrite(&invoices).await
    }

    async fn get_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DatabaseError> {
        let _guard = self.io.lock().await;
        let invoices = read_invoices(&self.path).await?;
        Ok(invoices.into_iter().find(|i| i.id == Some(id)))
    }

    async fn get_by_number(&self, number: &str) -> Result<Option<Invoice>, DatabaseError> {
        let _guard = self.io.lock().await;
        let invoices = read_invoices(&self.path).await?;
        Ok(invoices.into_iter().find(|i| i.number == number))
    }

    async fn get_all(&self) -> Result<Vec<Invoice>, DatabaseError> {
        let _guard = self.io.lock().await;
        let mut invoices = read_invoices(&self.path).await?;
        invoices.sort_by_key(|i| i.id);
        Ok(invoices)
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        let _guard = self.io.lock().await;
        self.rewrite(&[]).await
    }

    async fn exists(&self, id: InvoiceId) -> Result<bool, DatabaseError> {
        Ok(self.get_by_id(id).await?.is_some())
    }

    async fn count(&self) -> Result<u64, DatabaseError> {
        let _guard = self.io.lock().await;
        Ok(read_invoices(&self.path).await?.len() as u64)
    }
}
