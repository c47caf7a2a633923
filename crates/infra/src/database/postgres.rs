//! Postgres-backed invoice database.
//!
//! Invoices are stored as JSONB documents keyed by a `BIGSERIAL` id; the
//! number is duplicated into its own column for lookups.

use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use invoicer_core::InvoiceId;
use invoicer_invoicing::Invoice;

use super::{Database, DatabaseError};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS invoices (
        id       BIGSERIAL PRIMARY KEY,
        number   TEXT NOT NULL,
        document JSONB NOT NULL
    )
"#;

#[derive(Debug, Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    /// Connect and make sure the `invoices` table exists.
    pub async fn connect(database_url: &str) -> Result<Self, DatabaseError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: PgPool) -> Result<Self, DatabaseError> {
        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(|e| map_sqlx_error("create_table", e))?;
        Ok(Self { pool })
    }

    fn row_to_invoice(row: &sqlx::postgres::PgRow) -> Result<Invoice, DatabaseError> {
        let id: i64 = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("read_id", e))?;
        let Json(document): Json<Invoice> = row
            .try_get("document")
            .map_err(|e| map_sqlx_error("read_document", e))?;
        Ok(document.with_id(InvoiceId::new(id)))
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> DatabaseError {
    DatabaseError::Backend(format!("{operation}: {err}"))
}

#[async_trait::async_trait]
impl Database for PostgresDatabase {
    #[instrument(skip(self, invoice), fields(number = %invoice.number), err)]
    async fn save(&self, invoice: Invoice) -> Result<Invoice, DatabaseError> {
        if let Some(id) = invoice.id {
            let updated = sqlx::query(
                "UPDATE invoices SET number = $2, document = $3 WHERE id = $1",
            )
            .bind(i64::from(id))
            .bind(&invoice.number)
            .bind(Json(&invoice))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update", e))?;

            if updated.rows_affected() > 0 {
                return Ok(invoice);
            }
        }

        let row = sqlx::query(
            "INSERT INTO invoices (number, document) VALUES ($1, $2) RETURNING id",
        )
        .bind(&invoice.number)
        .bind(Json(&invoice))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("read_id", e))?;
        Ok(invoice.with_id(InvoiceId::new(id)))
    }

    #[instrument(skip(self, invoice), fields(number = %invoice.number), err)]
    async fn update(&self, invoice: Invoice) -> Result<Invoice, DatabaseError> {
        let id = invoice.id.ok_or(DatabaseError::MissingId)?;
        let updated = sqlx::query("UPDATE invoices SET number = $2, document = $3 WHERE id = $1")
            .bind(i64::from(id))
            .bind(&invoice.number)
            .bind(Json(&invoice))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update", e))?;
        if updated.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(id));
        }
        Ok(invoice)
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: InvoiceId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(id));
        }
        Ok(())
    }

    async fn get_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DatabaseError> {
        let row = sqlx::query("SELECT id, document FROM invoices WHERE id = $1")
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_by_id", e))?;
        row.as_ref().map(Self::row_to_invoice).transpose()
    }

    async fn get_by_number(&self, number: &str) -> Result<Option<Invoice>, DatabaseError> {
        let row = sqlx::query(
            "SELECT id, document FROM invoices WHERE number = $1 ORDER BY id LIMIT 1",
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_by_number", e))?;
        row.as_ref().map(Self::row_to_invoice).transpose()
    }

    async fn get_all(&self) -> Result<Vec<Invoice>, DatabaseError> {
        let rows = sqlx::query("SELECT id, document FROM invoices ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_all", e))?;
        rows.iter().map(Self::row_to_invoice).collect()
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM invoices")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_all", e))?;
        Ok(())
    }

    async fn exists(&self, id: InvoiceId) -> Result<bool, DatabaseError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM invoices WHERE id = $1) AS present")
            .bind(i64::from(id))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("exists", e))?;
        row.try_get("present")
            .map_err(|e| map_sqlx_error("exists", e))
    }

    async fn count(&self) -> Result<u64, DatabaseError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM invoices")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("count", e))?;
        let total: i64 = row
            .try_get("total")
            .map_err(|e| map_sqlx_error("count", e))?;
        Ok(total as u64)
    }
}
