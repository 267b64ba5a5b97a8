//! Criterion benchmarks for smart query parsing and key resolution.
//!
//! Both run on every request-layer call, so they should stay well under the
//! cost of a single network round trip.
//!
//! Run with:
//! ```bash
//! cargo bench --package tvremote-core --bench query_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tvremote_core::{parse_smart_query, resolve_key};

const BENCH_QUERIES: &[&str] = &[
    "play stranger things on netflix",
    "search for cat videos",
    "put on the mandalorian on disney plus",
    "find the last of us in hbo max",
    "look up the boys on amazon prime",
    "watch lofi hip hop radio",
    "",
];

const BENCH_KEYS: &[&str] = &["home", "KEY_VOLUP", "volume_down", "KEY_AMBIENT", "blue"];

fn bench_parse_smart_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    group.bench_function("parse_single", |b| {
        b.iter(|| parse_smart_query(black_box("play stranger things on netflix")))
    });

    group.bench_function("parse_batch", |b| {
        b.iter(|| {
            BENCH_QUERIES
                .iter()
                .map(|q| parse_smart_query(black_box(q)))
                .count()
        })
    });

    group.finish();
}

fn bench_resolve_key(c: &mut Criterion) {
    c.bench_function("resolve_key_batch", |b| {
        b.iter(|| {
            BENCH_KEYS
                .iter()
                .map(|k| resolve_key(black_box(k)))
                .count()
        })
    });
}

criterion_group!(benches, bench_parse_smart_query, bench_resolve_key);
criterion_main!(benches);
