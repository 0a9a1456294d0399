use criterion::{Criterion, criterion_group, criterion_main};
use flexchart::core::{DataType, Point, Series, Size, Spline, VolumeHelper};
use flexchart::interaction::{HitArea, HitTestArena};
use flexchart::render::RecordingEngine;
use flexchart::{ChartConfig, ChartCore, ChartType};
use std::hint::black_box;

fn bench_spline_1k(c: &mut Criterion) {
    let xs: Vec<f64> = (0..1_000).map(|i| f64::from(i) * 2.0).collect();
    let ys: Vec<f64> = (0..1_000)
        .map(|i| (f64::from(i) * 0.05).sin() * 300.0 + 400.0)
        .collect();

    c.bench_function("spline_calculate_1k", |b| {
        b.iter(|| {
            let spline = Spline::new(black_box(&xs), black_box(&ys));
            let _ = spline.calculate().count();
        })
    });
}

fn bench_arena_hit_test_10k(c: &mut Criterion) {
    let mut arena = HitTestArena::new();
    arena.clear(0..10);
    for i in 0..10_000 {
        let t = f64::from(i);
        arena.add(
            HitArea::circle(Point::new(t * 0.19, (t * 0.01).cos() * 500.0 + 500.0), 5.0),
            i as usize % 10,
        );
    }

    c.bench_function("arena_hit_test_10k", |b| {
        b.iter(|| {
            let _ = arena.hit_test(black_box(Point::new(951.0, 433.0)), black_box(true));
        })
    });
}

fn bench_volume_convert(c: &mut Criterion) {
    let volumes: Vec<f64> = (0..2_000).map(|i| f64::from(i % 17) + 1.0).collect();
    let helper = VolumeHelper::new(&volumes, None, None, None, DataType::Number);

    c.bench_function("volume_convert_round_trip", |b| {
        b.iter(|| {
            let fraction = helper
                .convert(black_box(1_234.4), 0.0, 1_999.0)
                .expect("mapped");
            let _ = helper.convert_back(fraction, 0.0, 1_999.0);
        })
    });
}

fn bench_chart_render_2k(c: &mut Criterion) {
    let mut chart = ChartCore::new(ChartConfig::new(ChartType::LineSymbols)).expect("chart init");
    chart.set_series(
        (0..3)
            .map(|s| {
                Series::new(format!("series {s}")).with_y_values(
                    (0..2_000)
                        .map(|i| f64::from(i).mul_add(0.03, f64::from(s) * 10.0))
                        .collect(),
                )
            })
            .collect(),
    );
    let mut engine = RecordingEngine::new();

    c.bench_function("chart_render_3x2k", |b| {
        b.iter(|| {
            chart
                .render(&mut engine, black_box(Size::new(1600.0, 900.0)))
                .expect("render should succeed");
        })
    });
}

criterion_group!(
    benches,
    bench_spline_1k,
    bench_arena_hit_test_10k,
    bench_volume_convert,
    bench_chart_render_2k
);
criterion_main!(benches);
