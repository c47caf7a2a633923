//! Invoice storage abstraction and its backends.
//!
//! Every backend follows the same save semantics: an invoice without an id,
//! or with an id the backend does not know, is inserted under the next id
//! (monotonic, starting at 1); an invoice whose id is already stored replaces
//! the stored record.

pub mod in_file;
pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use thiserror::Error;

use invoicer_core::InvoiceId;
use invoicer_invoicing::Invoice;

pub use in_file::InFileDatabase;
pub use in_memory::InMemoryDatabase;
pub use postgres::PostgresDatabase;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("no invoice with id: {0}")]
    NotFound(InvoiceId),
    #[error("invoice has no id")]
    MissingId,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("backend error: {0}")]
    Backend(String),
}

/// Invoice persistence.
#[async_trait::async_trait]
pub trait Database: Send + Sync {
    /// Insert or replace an invoice; returns the stored copy (with its id).
    async fn save(&self, invoice: Invoice) -> Result<Invoice, DatabaseError>;

    /// Replace the stored invoice with the same id. `NotFound` when the id is
    /// absent or not stored; never inserts.
    async fn update(&self, invoice: Invoice) -> Result<Invoice, DatabaseError>;

    async fn delete(&self, id: InvoiceId) -> Result<(), DatabaseError>;

    async fn get_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DatabaseError>;

    /// First invoice whose number is exactly `number`.
    async fn get_by_number(&self, number: &str) -> Result<Option<Invoice>, DatabaseError>;

    /// All invoices, ordered by id.
    async fn get_all(&self) -> Result<Vec<Invoice>, DatabaseError>;

    async fn delete_all(&self) -> Result<(), DatabaseError>;

    async fn exists(&self, id: InvoiceId) -> Result<bool, DatabaseError>;

    async fn count(&self) -> Result<u64, DatabaseError>;
}

#[async_trait::async_trait]
impl<D> Database for Arc<D>
where
    D: Database + ?Sized,
{
    async fn save(&self, invoice: Invoice) -> Result<Invoice, DatabaseError> {
        (**self).save(invoice).await
    }

    async fn update(&self, invoice: Invoice) -> Result<Invoice, DatabaseError> {
        (**self).update(invoice).await
    }

    async fn delete(&self, id: InvoiceId) -> Result<(), DatabaseError> {
        (**self).delete(id).await
    }

    async fn get_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DatabaseError> {
        (**self).get_by_id(id).await
    }

    async fn get_by_number(&self, number: &str) -> Result<Option<Invoice>, DatabaseError> {
        (**self).get_by_number(number).await
    }

    async fn get_all(&self) -> Result<Vec<Invoice>, DatabaseError> {
        (**self).get_all().await
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        (**self).delete_all().await
    }

    async fn exists(&self, id: InvoiceId) -> Result<bool, DatabaseError> {
        (**self).exists(id).await
    }

    async fn count(&self) -> Result<u64, DatabaseError> {
        (**self).count().await
    }
}

/// Shared behavior checks run against every backend that needs no external service.
#[cfg(test)]
pub(crate) mod contract {
    use super::*;
    use chrono::NaiveDate;
    use invoicer_invoicing::{Company, InvoiceEntry, Vat};
    use rust_decimal_macros::dec;

    pub fn invoice(number: &str) -> Invoice {
        let day = NaiveDate::from_ymd_opt(2019, 11, 21).unwrap();
        Invoice {
            id: None,
            number: number.to_string(),
            issued_date: day,
            due_date: day,
            seller: Company::named("CodersTrust"),
            buyer: Company::named("Acme"),
            entries: vec![InvoiceEntry::new("Siatka", 5, dec!(123), Vat::Vat23)],
        }
    }

    pub async fn save_assigns_sequential_ids(db: &dyn Database) {
        let first = db.save(invoice("1/2019")).await.unwrap();
        let second = db.save(invoice("2/2019")).await.unwrap();
        assert_eq!(first.id, Some(InvoiceId::new(1)));
        assert_eq!(second.id, Some(InvoiceId::new(2)));
        assert_eq!(db.count().await.unwrap(), 2);
    }

    pub async fn save_with_known_id_replaces(db: &dyn Database) {
        let stored = db.save(invoice("1/2019")).await.unwrap();
        let mut changed = stored.clone();
        changed.buyer = Company::named("Other buyer");
        let updated = db.save(changed.clone()).await.unwrap();

        assert_eq!(updated, changed);
        assert_eq!(db.count().await.unwrap(), 1);
        let id = stored.id.unwrap();
        assert_eq!(db.get_by_id(id).await.unwrap().unwrap().buyer.name, "Other buyer");
    }

    pub async fn save_with_unknown_id_inserts(db: &dyn Database) {
        let foreign = invoice("9/2019").with_id(InvoiceId::new(99));
        let stored = db.save(foreign).await.unwrap();
        assert_eq!(stored.id, Some(InvoiceId::new(1)));
        assert!(!db.exists(InvoiceId::new(99)).await.unwrap());
    }

    pub async fn update_replaces_but_never_inserts(db: &dyn Database) {
        let stored = db.save(invoice("1/2019")).await.unwrap();
        let mut changed = stored.clone();
        changed.number = "1/2019/corrected".into();
        assert_eq!(db.update(changed.clone()).await.unwrap(), changed);
        assert_eq!(db.get_by_id(stored.id.unwrap()).await.unwrap(), Some(changed));

        let err = db
            .update(invoice("2/2019").with_id(InvoiceId::new(99)))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(id) if id == InvoiceId::new(99)));
        assert!(matches!(db.update(invoice("3/2019")).await, Err(DatabaseError::MissingId)));
        assert_eq!(db.count().await.unwrap(), 1);
    }

    pub async fn delete_removes_only_target(db: &dyn Database) {
        let a = db.save(invoice("a")).await.unwrap();
        let b = db.save(invoice("b")).await.unwrap();
        db.delete(a.id.unwrap()).await.unwrap();

        assert!(!db.exists(a.id.unwrap()).await.unwrap());
        assert!(db.exists(b.id.unwrap()).await.unwrap());
        assert_eq!(db.get_all().await.unwrap(), vec![b]);
    }

    pub async fn delete_missing_is_not_found(db: &dyn Database) {
        let err = db.delete(InvoiceId::new(5)).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(id) if id == InvoiceId::new(5)));
    }

    pub async fn get_by_number_matches_exactly(db: &dyn Database) {
        db.save(invoice("FV/1/2019")).await.unwrap();
        let second = db.save(invoice("FV/2/2019")).await.unwrap();

        assert_eq!(db.get_by_number("FV/2/2019").await.unwrap(), Some(second));
        assert_eq!(db.get_by_number("fv/2/2019").await.unwrap(), None);
        assert_eq!(db.get_by_number("FV/2").await.unwrap(), None);
    }

    pub async fn get_all_is_ordered_by_id(db: &dyn Database) {
        for n in ["c", "a", "b"] {
            db.save(invoice(n)).await.unwrap();
        }
        let numbers: Vec<_> = db
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.number)
            .collect();
        assert_eq!(numbers, vec!["c", "a", "b"]);
    }

    pub async fn delete_all_empties(db: &dyn Database) {
        db.save(invoice("a")).await.unwrap();
        db.save(invoice("b")).await.unwrap();
        db.delete_all().await.unwrap();
        assert_eq!(db.count().await.unwrap(), 0);
        assert!(db.get_all().await.unwrap().is_empty());
    }
}
