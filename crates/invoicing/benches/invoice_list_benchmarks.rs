use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::NaiveDate;
use invoicer_invoicing::{filter_by_number, Company, Invoice, InvoiceEntry, TaxSummary, Vat};
use rust_decimal::Decimal;

fn invoice_list(count: usize) -> Vec<Invoice> {
    let day = NaiveDate::from_ymd_opt(2019, 11, 21).unwrap();
    (0..count)
        .map(|i| Invoice {
            id: None,
            number: format!("FV/{}/{:02}/2019", i, i % 12 + 1),
            issued_date: day,
            due_date: day,
            seller: Company::named("CodersTrust"),
            buyer: Company::named(format!("Buyer {i}")),
            entries: (0..5)
                .map(|n| {
                    InvoiceEntry::new(
                        format!("item {n}"),
                        (n + 1) as u64,
                        Decimal::new(1_234 + n as i64, 2),
                        Vat::ALL[n % Vat::ALL.len()],
                    )
                })
                .collect(),
        })
        .collect()
}

fn bench_number_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("number_filter");
    for size in [100usize, 1_000, 10_000] {
        let list = invoice_list(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &list, |b, list| {
            b.iter(|| filter_by_number(black_box(list), black_box("/1")).len());
        });
    }
    group.finish();
}

fn bench_tax_summary(c: &mut Criterion) {
    let list = invoice_list(1_000);
    c.bench_function("tax_summary_1000_invoices", |b| {
        b.iter(|| {
            list.iter()
                .filter_map(|invoice| TaxSummary::from_invoice(black_box(invoice)))
                .map(|summary| summary.gross_total)
                .sum::<Decimal>()
        });
    });
}

criterion_group!(benches, bench_number_filter, bench_tax_summary);
criterion_main!(benches);
