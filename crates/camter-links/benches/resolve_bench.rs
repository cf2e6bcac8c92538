// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for deep-link resolution in the camter-links crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use camter_core::ShellConfig;
use camter_links::DeepLinkResolver;

/// Resolve a fresh URL per iteration so the dedup set never short-circuits.
fn bench_resolve_product_link(c: &mut Criterion) {
    let mut resolver = DeepLinkResolver::new(&ShellConfig::default());
    let mut n: u64 = 0;

    c.bench_function("resolve camterapp product link", |b| {
        b.iter(|| {
            n += 1;
            let url = format!("camterapp://open?eventId=9&productId={n}&utm_source=push");
            black_box(resolver.resolve(black_box(&url)));
        });
    });
}

/// Repeated deliveries of one URL only hit the seen-set.
fn bench_resolve_duplicate(c: &mut Criterion) {
    let mut resolver = DeepLinkResolver::new(&ShellConfig::default());
    resolver.resolve("camterapp://auth?code=ABC&state=XYZ");

    c.bench_function("resolve duplicate link", |b| {
        b.iter(|| {
            black_box(resolver.resolve(black_box("camterapp://auth?code=ABC&state=XYZ")));
        });
    });
}

criterion_group!(benches, bench_resolve_product_link, bench_resolve_duplicate);
criterion_main!(benches);
