//! Per-rate tax breakdown of an invoice (printed at the bottom of the PDF).

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::invoice::{checked_sum, Invoice};
use crate::vat::{round_money, Vat};

/// Totals for all entries sharing one VAT rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateSummary {
    pub rate: Vat,
    pub net: Decimal,
    pub tax: Decimal,
    pub gross: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxSummary {
    /// Ordered by rate, lowest first.
    pub rates: Vec<RateSummary>,
    pub net_total: Decimal,
    pub tax_total: Decimal,
    pub gross_total: Decimal,
}

impl TaxSummary {
    /// Breakdown of `invoice`, or `None` when any sum overflows `Decimal`.
    pub fn from_invoice(invoice: &Invoice) -> Option<Self> {
        let mut by_rate: BTreeMap<Vat, (Decimal, Decimal)> = BTreeMap::new();
        for entry in &invoice.entries {
            let slot = by_rate
                .entry(entry.vat_rate)
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            slot.0 = slot.0.checked_add(entry.net_value)?;
            slot.1 = slot.1.checked_add(entry.gross_value)?;
        }

        let rates = by_rate
            .into_iter()
            .map(|(rate, (net, gross))| {
                Some(RateSummary {
                    rate,
                    net: round_money(net),
                    tax: round_money(gross.checked_sub(net)?),
                    gross: round_money(gross),
                })
            })
            .collect::<Option<Vec<RateSummary>>>()?;

        Some(Self {
            net_total: checked_sum(rates.iter().map(|r| r.net))?,
            tax_total: checked_sum(rates.iter().map(|r| r.tax))?,
            gross_total: checked_sum(rates.iter().map(|r| r.gross))?,
            rates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{Company, InvoiceEntry};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn groups_entries_by_rate() {
        let day = NaiveDate::from_ymd_opt(2019, 5, 1).unwrap();
        let invoice = Invoice {
            id: None,
            number: "FV/1/05/2019".into(),
            issued_date: day,
            due_date: day,
            seller: Company::named("s"),
            buyer: Company::named("b"),
            entries: vec![
                InvoiceEntry::new("a", 1, dec!(100), Vat::Vat23),
                InvoiceEntry::new("b", 2, dec!(50), Vat::Vat5),
                InvoiceEntry::new("c", 1, dec!(10), Vat::Vat23),
            ],
        };

        let summary = TaxSummary::from_invoice(&invoice).unwrap();
        assert_eq!(summary.rates.len(), 2);
        assert_eq!(summary.rates[0].rate, Vat::Vat5);
        assert_eq!(summary.rates[0].net, dec!(100));
        assert_eq!(summary.rates[0].tax, dec!(5));
        assert_eq!(summary.rates[1].rate, Vat::Vat23);
        assert_eq!(summary.rates[1].net, dec!(110));
        assert_eq!(summary.rates[1].tax, dec!(25.30));
        assert_eq!(summary.net_total, dec!(210));
        assert_eq!(summary.tax_total, dec!(30.30));
        assert_eq!(summary.gross_total, dec!(240.30));
        assert_eq!(Some(summary.gross_total), invoice.gross_total());
    }

    #[test]
    fn empty_invoice_has_no_rates() {
        let day = NaiveDate::from_ymd_opt(2019, 5, 1).unwrap();
        let invoice = Invoice {
            id: None,
            number: "x".into(),
            issued_date: day,
            due_date: day,
            seller: Company::named("s"),
            buyer: Company::named("b"),
            entries: vec![],
        };
        let summary = TaxSummary::from_invoice(&invoice).unwrap();
        assert!(summary.rates.is_empty());
        assert_eq!(summary.gross_total, Decimal::ZERO);
    }

    #[test]
    fn overflowing_entries_yield_none() {
        let day = NaiveDate::from_ymd_opt(2019, 5, 1).unwrap();
        let mut entry = InvoiceEntry::new("a", 1, dec!(1), Vat::Vat23);
        entry.net_value = Decimal::MAX;
        entry.gross_value = Decimal::MAX;
        let invoice = Invoice {
            id: None,
            number: "x".into(),
            issued_date: day,
            due_date: day,
            seller: Company::named("s"),
            buyer: Company::named("b"),
            entries: vec![entry.clone(), entry],
        };
        assert_eq!(TaxSummary::from_invoice(&invoice), None);
    }
}
