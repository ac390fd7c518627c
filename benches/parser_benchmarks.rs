//! Parsing performance benchmarks.
//!
//! - Size-based: tiny to large sample sources
//! - Feature-specific: expressions, classes, control flow
//! - Real-world: a composite script mixing several constructs

use bumpalo::Bump;
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use glyph_syntax::ast::Parser;
use std::hint::black_box;

fn bench_source(group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>, name: &str, source: &str) {
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function(name, |b| {
        b.iter(|| {
            let arena = Bump::new();
            let items = Parser::parse_source(black_box(source), &arena).expect("demo sources must parse");
            black_box(items.len())
        });
    });
}

fn size_based_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser/file_sizes");

    bench_source(&mut group, "tiny_hello", include_str!("../demos/hello.glyph"));
    bench_source(&mut group, "small_classes", include_str!("../demos/classes.glyph"));
    bench_source(&mut group, "medium_control_flow", include_str!("../demos/control_flow.glyph"));
    bench_source(&mut group, "large_many_functions", include_str!("../demos/many_functions.glyph"));
    bench_source(&mut group, "large_single_function", include_str!("../demos/large.glyph"));

    group.finish();
}

fn feature_specific_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser/features");

    bench_source(&mut group, "expressions", include_str!("../demos/expressions.glyph"));
    bench_source(&mut group, "classes", include_str!("../demos/classes.glyph"));
    bench_source(&mut group, "control_flow", include_str!("../demos/control_flow.glyph"));
    bench_source(&mut group, "many_functions", include_str!("../demos/many_functions.glyph"));

    group.finish();
}

fn real_world_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser/real_world");

    bench_source(&mut group, "deep_arithmetic_chain", include_str!("../demos/large.glyph"));

    group.finish();
}

criterion_group!(benches, size_based_benchmarks, feature_specific_benchmarks, real_world_benchmarks);
criterion_main!(benches);
