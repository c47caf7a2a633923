//! Invoice list screen state.

use invoicer_core::InvoiceId;
use invoicer_invoicing::{filter_by_number, Invoice};

use crate::api::InvoiceClient;

/// Fetched invoices, the number filter typed by the user, and the last error.
#[derive(Debug)]
pub struct InvoiceListView {
    client: InvoiceClient,
    invoices: Vec<Invoice>,
    filter: String,
    error_message: Option<String>,
}

impl InvoiceListView {
    pub fn new(client: InvoiceClient) -> Self {
        Self {
            client,
            invoices: Vec::new(),
            filter: String::new(),
            error_message: None,
        }
    }

    /// Fetch the list. On failure the previous list is kept and the error stored.
    pub async fn load(&mut self) {
        match self.client.list().await {
            Ok(invoices) => {
                self.invoices = invoices;
                self.error_message = None;
            }
            Err(e) => self.error_message = Some(e.to_string()),
        }
    }

    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    /// Invoices whose number contains the filter text, ignoring case.
    pub fn visible(&self) -> Vec<&Invoice> {
        filter_by_number(&self.invoices, &self.filter)
    }

    /// Delete one invoice, then re-fetch the list once the delete resolved.
    pub async fn delete(&mut self, id: InvoiceId) {
        if let Err(e) = self.client.delete(id).await {
            self.error_message = Some(e.to_string());
            return;
        }
        self.load().await;
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn pdf_url(&self, id: InvoiceId) -> String {
        self.client.pdf_url(id)
    }
}
