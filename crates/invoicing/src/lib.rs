//! Invoicing domain module.
//!
//! Invoice data model, VAT arithmetic and the list filter, implemented as
//! plain data and pure functions (no IO, no HTTP, no storage).

pub mod filter;
pub mod invoice;
pub mod summary;
pub mod vat;

pub use filter::{filter_by_number, matches_number};
pub use invoice::{Company, Invoice, InvoiceEntry};
pub use summary::{RateSummary, TaxSummary};
pub use vat::Vat;
