//! Invoice PDF rendering (A4, builtin Helvetica fonts).

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};
use rust_decimal::Decimal;
use thiserror::Error;

use invoicer_invoicing::{Company, Invoice, TaxSummary};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const TOP: f32 = 280.0;
const BOTTOM: f32 = 25.0;
const LEFT: f32 = 15.0;
const RIGHT: f32 = 195.0;

const COL_DESCRIPTION: f32 = LEFT;
const COL_QUANTITY: f32 = 95.0;
const COL_PRICE: f32 = 110.0;
const COL_VAT: f32 = 135.0;
const COL_NET: f32 = 150.0;
const COL_GROSS: f32 = 173.0;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("pdf rendering failed: {0}")]
    Render(String),
    #[error("invoice {0} totals exceed the representable amount")]
    TotalsOverflow(String),
}

impl From<printpdf::Error> for PdfError {
    fn from(value: printpdf::Error) -> Self {
        PdfError::Render(value.to_string())
    }
}

/// Cursor over the document that starts a new page when the current one is full.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, PdfError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: TOP,
            pages: 1,
        })
    }

    /// Move down by `step`, breaking to a fresh page below the bottom margin.
    fn advance(&mut self, step: f32) {
        self.y -= step;
        if self.y < BOTTOM {
            self.pages += 1;
            let (page, layer) =
                self.doc
                    .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Layer {}", self.pages));
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP;
        }
    }

    fn text(&self, text: &str, size: f32, x: f32) {
        self.layer.use_text(text, size, Mm(x), Mm(self.y), &self.regular);
    }

    fn bold(&self, text: &str, size: f32, x: f32) {
        self.layer.use_text(text, size, Mm(x), Mm(self.y), &self.bold);
    }

    fn rule(&self) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(LEFT), Mm(self.y)), false),
                (Point::new(Mm(RIGHT), Mm(self.y)), false),
            ],
            is_closed: false,
        });
    }

    fn finish(self) -> Result<Vec<u8>, PdfError> {
        let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
        self.doc.save(&mut writer)?;
        writer
            .into_inner()
            .map_err(|e| PdfError::Render(e.to_string()))
    }
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

fn company_lines(company: &Company) -> Vec<String> {
    let mut lines = vec![company.name.clone()];
    if let Some(address) = &company.address {
        lines.push(address.clone());
    }
    if let Some(tax_id) = &company.tax_id {
        lines.push(format!("Tax ID: {tax_id}"));
    }
    if let Some(account) = &company.account_number {
        lines.push(format!("Account: {account}"));
    }
    if let Some(phone) = &company.phone_number {
        lines.push(format!("Phone: {phone}"));
    }
    if let Some(email) = &company.email {
        lines.push(format!("Email: {email}"));
    }
    lines
}

fn entries_header(w: &PageWriter) {
    w.bold("Description", 10.0, COL_DESCRIPTION);
    w.bold("Qty", 10.0, COL_QUANTITY);
    w.bold("Price", 10.0, COL_PRICE);
    w.bold("VAT", 10.0, COL_VAT);
    w.bold("Net", 10.0, COL_NET);
    w.bold("Gross", 10.0, COL_GROSS);
}

/// Rate, tax, net and gross cells of each tax summary row.
fn summary_rows(summary: &TaxSummary) -> Vec<[String; 4]> {
    summary
        .rates
        .iter()
        .map(|r| [r.rate.to_string(), money(r.tax), money(r.net), money(r.gross)])
        .collect()
}

/// Render `invoice` as a PDF document.
pub fn render_invoice_pdf(invoice: &Invoice) -> Result<Vec<u8>, PdfError> {
    let summary = TaxSummary::from_invoice(invoice)
        .ok_or_else(|| PdfError::TotalsOverflow(invoice.number.clone()))?;

    let mut w = PageWriter::new(&format!("Invoice {}", invoice.number))?;

    w.bold("INVOICE", 24.0, LEFT);
    w.bold(&invoice.number, 12.0, 140.0);
    w.advance(8.0);
    w.text(&format!("Issued: {}", invoice.issued_date), 10.0, 140.0);
    w.advance(5.0);
    w.text(&format!("Due: {}", invoice.due_date), 10.0, 140.0);
    w.advance(5.0);
    w.rule();

    w.advance(10.0);
    w.bold("Seller:", 12.0, LEFT);
    w.bold("Buyer:", 12.0, 110.0);
    let seller = company_lines(&invoice.seller);
    let buyer = company_lines(&invoice.buyer);
    for i in 0..seller.len().max(buyer.len()) {
        w.advance(5.5);
        if let Some(line) = seller.get(i) {
            w.text(line, 10.0, LEFT);
        }
        if let Some(line) = buyer.get(i) {
            w.text(line, 10.0, 110.0);
        }
    }

    w.advance(12.0);
    entries_header(&w);
    w.advance(3.5);
    w.rule();

    for (idx, entry) in invoice.entries.iter().enumerate() {
        let before = w.pages;
        w.advance(6.5);
        if w.pages != before {
            entries_header(&w);
            w.advance(6.5);
        }
        w.text(&format!("{}. {}", idx + 1, entry.description), 10.0, COL_DESCRIPTION);
        w.text(&entry.quantity.to_string(), 10.0, COL_QUANTITY);
        w.text(&money(entry.price), 10.0, COL_PRICE);
        w.text(&entry.vat_rate.to_string(), 10.0, COL_VAT);
        w.text(&money(entry.net_value), 10.0, COL_NET);
        w.text(&money(entry.gross_value), 10.0, COL_GROSS);
    }

    w.advance(4.0);
    w.rule();

    w.advance(8.0);
    w.bold("Tax summary", 11.0, LEFT);
    w.bold("Rate", 10.0, COL_PRICE);
    w.bold("Tax", 10.0, COL_VAT);
    w.bold("Net", 10.0, COL_NET);
    w.bold("Gross", 10.0, COL_GROSS);
    for [rate, tax, net, gross] in summary_rows(&summary) {
        w.advance(6.0);
        w.text(&rate, 10.0, COL_PRICE);
        w.text(&tax, 10.0, COL_VAT);
        w.text(&net, 10.0, COL_NET);
        w.text(&gross, 10.0, COL_GROSS);
    }

    w.advance(8.0);
    w.text("Net total:", 11.0, 120.0);
    w.bold(&money(summary.net_total), 11.0, COL_GROSS);
    w.advance(6.0);
    w.text("VAT total:", 11.0, 120.0);
    w.bold(&money(summary.tax_total), 11.0, COL_GROSS);
    w.advance(7.0);
    w.bold("TOTAL:", 13.0, 120.0);
    w.bold(&money(summary.gross_total), 13.0, COL_GROSS);

    tracing::debug!(number = %invoice.number, pages = w.pages, "invoice pdf rendered");
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use invoicer_invoicing::{InvoiceEntry, Vat};
    use rust_decimal_macros::dec;

    fn invoice(entries: usize) -> Invoice {
        let day = NaiveDate::from_ymd_opt(2019, 11, 21).unwrap();
        let mut seller = Company::named("CodersTrust");
        seller.tax_id = Some("1234567890".into());
        Invoice {
            id: None,
            number: "FV/1/2019".into(),
            issued_date: day,
            due_date: day,
            seller,
            buyer: Company::named("Acme"),
            entries: (0..entries)
                .map(|i| InvoiceEntry::new(format!("Item {i}"), 2, dec!(10.50), Vat::Vat23))
                .collect(),
        }
    }

    #[test]
    fn renders_a_pdf_document() {
        let bytes = render_invoice_pdf(&invoice(3)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn renders_without_entries() {
        let bytes = render_invoice_pdf(&invoice(0)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn summary_rows_carry_the_tax_amount() {
        let mut inv = invoice(2);
        inv.entries.push(InvoiceEntry::new("Other", 1, dec!(100), Vat::Vat8));
        let summary = TaxSummary::from_invoice(&inv).unwrap();

        let rows = summary_rows(&summary);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ["8%".to_string(), "8.00".into(), "100.00".into(), "108.00".into()]);
        // 2 x (21.00 net, 4.83 tax)
        assert_eq!(rows[1], ["23%".to_string(), "9.66".into(), "42.00".into(), "51.66".into()]);
    }

    #[test]
    fn overflowing_totals_are_an_error() {
        let mut entry = InvoiceEntry::new("Huge", 1, dec!(1), Vat::Vat0);
        entry.net_value = Decimal::MAX;
        entry.gross_value = Decimal::MAX;
        let mut inv = invoice(0);
        inv.entries = vec![entry.clone(), entry];

        let err = render_invoice_pdf(&inv).unwrap_err();
        assert!(matches!(err, PdfError::TotalsOverflow(number) if number == "FV/1/2019"));
    }

    #[test]
    fn long_invoices_spill_onto_more_pages() {
        let short = render_invoice_pdf(&invoice(1)).unwrap();
        let long = render_invoice_pdf(&invoice(120)).unwrap();
        assert!(long.starts_with(b"%PDF"));
        assert!(long.len() > short.len());
    }
}
