use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use invoicer_core::InvoiceId;
use invoicer_invoicing::Invoice;

use super::{Database, DatabaseError};

/// In-memory invoice database for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    invoices: RwLock<BTreeMap<InvoiceId, Invoice>>,
    last_id: AtomicI64,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> DatabaseError {
        DatabaseError::Backend("lock poisoned".to_string())
    }
}

#[async_trait::async_trait]
impl Database for InMemoryDatabase {
    async fn save(&self, invoice: Invoice) -> Result<Invoice, DatabaseError> {
        let mut map = self.invoices.write().map_err(|_| Self::poisoned())?;

        if let Some(id) = invoice.id.filter(|id| map.contains_key(id)) {
            map.insert(id, invoice.clone());
            tracing::debug!(%id, "invoice updated");
            return Ok(invoice);
        }

        let id = InvoiceId::new(self.last_id.fetch_add(1, Ordering::SeqCst)).next();
        let stored = invoice.with_id(id);
        map.insert(id, stored.clone());
        tracing::debug!(%id, "invoice inserted");
        Ok(stored)
    }

    async fn update(&self, invoice: Invoice) -> Result<Invoice, DatabaseError> {
        let id = invoice.id.ok_or(DatabaseError::MissingId)?;
        let mut map = self.invoices.write().map_err(|_| Self::poisoned())?;
        let slot = map.get_mut(&id).ok_or(DatabaseError::NotFound(id))?;
        *slot = invoice.clone();
        tracing::debug!(%id, "invoice updated");
        Ok(invoice)
    }

    async fn delete(&self, id: InvoiceId) -> Result<(), DatabaseError> {
        let mut map = self.invoices.write().map_err(|_| Self::poisoned())?;
        map.remove(&id)
            .map(|_| ())
            .ok_or(DatabaseError::NotFound(id))
    }

    async fn get_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DatabaseError> {
        let map = self.invoices.read().map_err(|_| Self::poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn get_by_number(&self, number: &str) -> Result<Option<Invoice>, DatabaseError> {
        let map = self.invoices.read().map_err(|_| Self::poisoned())?;
        Ok(map.values().find(|i| i.number == number).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Invoice>, DatabaseError> {
        let map = self.invoices.read().map_err(|_| Self::poisoned())?;
        Ok(map.values().cloned().collect())
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        let mut map = self.invoices.write().map_err(|_| Self::poisoned())?;
        map.clear();
        Ok(())
    }

    async fn exists(&self, id: InvoiceId) -> Result<bool, DatabaseError> {
        let map = self.invoices.read().map_err(|_| Self::poisoned())?;
        Ok(map.contains_key(&id))
    }

    async fn count(&self) -> Result<u64, DatabaseError> {
        let map = self.invoices.read().map_err(|_| Self::poisoned())?;
        Ok(map.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::contract;

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        contract::save_assigns_sequential_ids(&InMemoryDatabase::new()).await;
    }

    #[tokio::test]
    async fn save_with_known_id_replaces() {
        contract::save_with_known_id_replaces(&InMemoryDatabase::new()).await;
    }

    #[tokio::test]
    async fn save_with_unknown_id_inserts() {
        contract::save_with_unknown_id_inserts(&InMemoryDatabase::new()).await;
    }

    #[tokio::test]
    async fn update_replaces_but_never_inserts() {
        contract::update_replaces_but_never_inserts(&InMemoryDatabase::new()).await;
    }

    #[tokio::test]
    async fn delete_removes_only_target() {
        contract::delete_removes_only_target(&InMemoryDatabase::new()).await;
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        contract::delete_missing_is_not_found(&InMemoryDatabase::new()).await;
    }

    #[tokio::test]
    async fn get_by_number_matches_exactly() {
        contract::get_by_number_matches_exactly(&InMemoryDatabase::new()).await;
    }

    #[tokio::test]
    async fn get_all_is_ordered_by_id() {
        contract::get_all_is_ordered_by_id(&InMemoryDatabase::new()).await;
    }

    #[tokio::test]
    async fn delete_all_empties() {
        contract::delete_all_empties(&InMemoryDatabase::new()).await;
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let db = InMemoryDatabase::new();
        let first = db.save(contract::invoice("a")).await.unwrap();
        db.delete(first.id.unwrap()).await.unwrap();
        let second = db.save(contract::invoice("b")).await.unwrap();
        assert_eq!(second.id, Some(InvoiceId::new(2)));
    }
}
