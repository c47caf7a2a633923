use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use invoicer_core::InvoiceId;

use crate::vat::Vat;

/// Seller or buyer on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Company {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One billable line of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub description: String,
    pub quantity: u64,
    /// Unit price before tax.
    pub price: Decimal,
    pub net_value: Decimal,
    pub gross_value: Decimal,
    pub vat_rate: Vat,
}

impl InvoiceEntry {
    /// Build an entry, deriving net and gross values from price, quantity and rate.
    pub fn new(description: impl Into<String>, quantity: u64, price: Decimal, vat_rate: Vat) -> Self {
        let net_value = price * Decimal::from(quantity);
        let gross_value = net_value + vat_rate.tax_on(net_value);
        Self {
            id: None,
            description: description.into(),
            quantity,
            price,
            net_value,
            gross_value,
            vat_rate,
        }
    }

    pub fn vat_value(&self) -> Decimal {
        self.gross_value - self.net_value
    }
}

/// VAT invoice as exchanged over `/api/invoices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Assigned by the database on insert.
    #[serde(default)]
    pub id: Option<InvoiceId>,
    pub number: String,
    pub issued_date: NaiveDate,
    pub due_date: NaiveDate,
    pub seller: Company,
    pub buyer: Company,
    #[serde(default)]
    pub entries: Vec<InvoiceEntry>,
}

impl Invoice {
    /// Copy of this invoice carrying `id`.
    pub fn with_id(&self, id: InvoiceId) -> Self {
        Self {
            id: Some(id),
            ..self.clone()
        }
    }

    /// Sum of entry net values; `None` if it overflows `Decimal`.
    pub fn net_total(&self) -> Option<Decimal> {
        checked_sum(self.entries.iter().map(|e| e.net_value))
    }

    pub fn gross_total(&self) -> Option<Decimal> {
        checked_sum(self.entries.iter().map(|e| e.gross_value))
    }

    pub fn vat_total(&self) -> Option<Decimal> {
        self.gross_total()?.checked_sub(self.net_total()?)
    }
}

/// Sum that stops with `None` at `Decimal` overflow.
pub(crate) fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}
