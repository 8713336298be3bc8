//! Criterion benchmarks for the per-month hot path.
//!
//! Benchmarks:
//! 1. Chart-data JSON extraction of a full month
//! 2. HTML table extraction of a full month
//! 3. Monthly averaging

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use euribor_core::{average, extract, RawDocument, SourceFormat, YearMonth};

fn chart_document(period: YearMonth) -> RawDocument {
    let points: Vec<String> = (0..period.days_in_month())
        .map(|i| {
            let ms = period.start_millis() + i64::from(i) * 86_400_000;
            format!("[{ms},{}.{:03}]", 3, (i * 37) % 1000)
        })
        .collect();
    RawDocument {
        period,
        format: SourceFormat::Highcharts,
        body: format!("[{{\"Data\":[{}]}}]", points.join(",")),
    }
}

fn html_document(period: YearMonth) -> RawDocument {
    let rows: String = (1..=period.days_in_month())
        .map(|day| {
            format!(
                "<tr><td>{}-{:02}-{day:02}</td><td>3.{:03} %</td></tr>",
                period.year(),
                period.month(),
                (day * 37) % 1000
            )
        })
        .collect();
    RawDocument {
        period,
        format: SourceFormat::Html,
        body: format!("<html><body><table><tr><th>Date</th><th>Rate</th></tr>{rows}</table></body></html>"),
    }
}

fn bench_extract(c: &mut Criterion) {
    let period = YearMonth::new(2024, 3).unwrap();
    let chart = chart_document(period);
    let html = html_document(period);

    c.bench_function("extract_highcharts_month", |b| {
        b.iter(|| extract(black_box(&chart)).unwrap())
    });
    c.bench_function("extract_html_month", |b| {
        b.iter(|| extract(black_box(&html)).unwrap())
    });
}

fn bench_average(c: &mut Criterion) {
    let period = YearMonth::new(2024, 3).unwrap();
    let month = extract(&chart_document(period)).unwrap();

    c.bench_function("average_month", |b| b.iter(|| average(black_box(&month))));
}

criterion_group!(benches, bench_extract, bench_average);
criterion_main!(benches);
