// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for fingerprint generation and per-page derivation in
// the pagearmor-security crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use pagearmor_security::{FingerprintGenerator, mosaic_seed, payload_for_page};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark fingerprint generation at various input sizes.
///
/// Sizes: 10 KiB, 1 MiB, 10 MiB -- from a single-page text PDF to a large
/// scanned document.
fn bench_fingerprint(c: &mut Criterion) {
    let sizes: &[(&str, usize)] = &[
        ("10 KiB", 10 * 1024),
        ("1 MiB", 1024 * 1024),
        ("10 MiB", 10 * 1024 * 1024),
    ];

    let mut group = c.benchmark_group("fingerprint_generate");
    for &(label, size) in sizes {
        let data = vec![0xABu8; size];
        group.bench_function(label, |b| {
            let mut generator = FingerprintGenerator::seeded(7);
            b.iter(|| black_box(generator.generate(black_box(&data))));
        });
    }
    group.finish();
}

/// Benchmark deriving the payload and mosaic seed for 100 pages.
fn bench_page_derivation(c: &mut Criterion) {
    let fingerprint = FingerprintGenerator::seeded(7).generate(b"bench");

    c.bench_function("page_derivation (100 pages)", |b| {
        b.iter(|| {
            for page in 0..100 {
                black_box(payload_for_page(&fingerprint, page));
                black_box(mosaic_seed(&fingerprint, page));
            }
        });
    });
}

criterion_group!(benches, bench_fingerprint, bench_page_derivation);
criterion_main!(benches);
