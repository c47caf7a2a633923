//! Client-side filtering of an invoice list by number.

use crate::invoice::Invoice;

/// Case-insensitive substring match on the invoice number.
///
/// The empty query matches every invoice.
pub fn matches_number(invoice: &Invoice, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    invoice
        .number
        .to_lowercase()
        .contains(&query.to_lowercase())
}

/// Invoices whose number contains `query`, in input order.
pub fn filter_by_number<'a>(invoices: &'a [Invoice], query: &str) -> Vec<&'a Invoice> {
    invoices
        .iter()
        .filter(|invoice| matches_number(invoice, query))
        .collect()
}
