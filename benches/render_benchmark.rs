//! Render benchmarks
//!
//! Full render calls over synthetic cohorts of growing size, plus the
//! normalizer and reconciler on their own.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use violin_swarm::svg::Document;
use violin_swarm::vis::{LayoutEngine, Palette, PlotSettings, ViolinSwarmLayout};
use violin_swarm::{reconcile, render, CohortGenerator, ObservationFrame};

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for students in [20, 100, 500].iter() {
        let request = CohortGenerator::new(42).request(*students).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(students), &request, |b, request| {
            b.iter(|| render(request).unwrap())
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let series = CohortGenerator::new(42).generate(1000).unwrap();
    c.bench_function("normalize_1000", |b| {
        b.iter(|| ObservationFrame::from_series(&series).unwrap())
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let series = CohortGenerator::new(42).generate(500).unwrap();
    let frame = ObservationFrame::from_series(&series).unwrap();
    let palette = Palette::bright(frame.series_count());
    let figure = ViolinSwarmLayout::new()
        .layout(&frame, &palette, &PlotSettings::default())
        .unwrap();
    let text = figure.to_svg().unwrap();

    c.bench_function("parse_and_reconcile_500", |b| {
        b.iter(|| {
            let doc = Document::parse(&text).unwrap();
            reconcile(&doc, &frame, &palette).unwrap()
        })
    });
}

criterion_group!(benches, bench_render, bench_normalize, bench_reconcile);
criterion_main!(benches);
