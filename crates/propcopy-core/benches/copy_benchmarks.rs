//! Benchmarks for the property copier
//!
//! Compares a cold copy, which introspects both types, with warm copies
//! served from the accessor cache, and measures batch conversion.
//!
//! Copyright (c) 2025 Propcopy Team
//! Licensed under the Apache-2.0 license

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use propcopy_core::{introspect, AccessorCache, Copier, CopyConfig};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
struct Invoice {
    number: i64,
    customer: String,
    total: String,
    paid: bool,
    lines: i32,
}

introspect! {
    Invoice {
        Number => number: i64,
        Customer => customer: String,
        Total => total: String,
        Paid => paid: bool,
        Lines => lines: i32,
    }
}

#[derive(Debug, Clone, Default)]
struct InvoiceDto {
    number: Option<i64>,
    customer: Option<String>,
    total: f64,
    paid: String,
    lines: String,
}

introspect! {
    InvoiceDto {
        Number => number: Option<i64>,
        Customer => customer: Option<String>,
        Total => total: f64,
        Paid => paid: String,
        Lines => lines: String,
    }
}

fn invoice(i: i64) -> Invoice {
    Invoice {
        number: i,
        customer: format!("Customer {}", i),
        total: format!("{}.25", i * 3),
        paid: i % 2 == 0,
        lines: (i % 17) as i32,
    }
}

fn private_copier() -> Copier {
    Copier::with_cache(Arc::new(AccessorCache::new()), CopyConfig {
        log_skipped: false,
        ..CopyConfig::default()
    })
    .unwrap()
}

fn bench_single_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_copy");
    let source = invoice(42);

    group.bench_function("cold_cache", |b| {
        b.iter(|| {
            let copier = private_copier();
            let dto: Option<InvoiceDto> = copier.copy_properties(Some(black_box(&source))).unwrap();
            black_box(dto)
        })
    });

    let warm = private_copier();
    let _: Option<InvoiceDto> = warm.copy_properties(Some(&source)).unwrap();
    group.bench_function("warm_cache", |b| {
        b.iter(|| {
            let dto: Option<InvoiceDto> = warm.copy_properties(Some(black_box(&source))).unwrap();
            black_box(dto)
        })
    });

    group.finish();
}

fn bench_convert_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_list");
    let copier = private_copier();

    for size in [10usize, 100, 1000] {
        let invoices: Vec<Invoice> = (0..size as i64).map(invoice).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &invoices, |b, invoices| {
            b.iter(|| {
                let dtos: Vec<InvoiceDto> = copier.convert_list(Some(black_box(invoices))).unwrap();
                black_box(dtos)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_copy, bench_convert_list);
criterion_main!(benches);
