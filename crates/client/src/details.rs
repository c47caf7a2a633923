//! Invoice detail screen state.

use invoicer_core::InvoiceId;
use invoicer_invoicing::Invoice;

use crate::api::InvoiceClient;

pub const PAGE_TITLE: &str = "Invoice detail";
/// Where "back" leads from the detail page.
pub const BACK_ROUTE: &str = "/invoices";

#[derive(Debug)]
pub struct InvoiceDetailView {
    client: InvoiceClient,
    invoice: Option<Invoice>,
    error_message: Option<String>,
}

impl InvoiceDetailView {
    pub fn new(client: InvoiceClient) -> Self {
        Self {
            client,
            invoice: None,
            error_message: None,
        }
    }

    pub fn title(&self) -> &'static str {
        PAGE_TITLE
    }

    /// Load the invoice named by the route parameter.
    pub async fn load(&mut self, id_param: &str) {
        let id: InvoiceId = match id_param.parse() {
            Ok(id) => id,
            Err(e) => {
                self.invoice = None;
                self.error_message = Some(format!("{e}"));
                return;
            }
        };

        match self.client.get(id).await {
            Ok(invoice) => {
                self.invoice = Some(invoice);
                self.error_message = None;
            }
            Err(e) => {
                self.invoice = None;
                self.error_message = Some(e.to_string());
            }
        }
    }

    pub fn invoice(&self) -> Option<&Invoice> {
        self.invoice.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn back_route(&self) -> &'static str {
        BACK_ROUTE
    }
}
