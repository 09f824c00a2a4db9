use criterion::{Criterion, criterion_group, criterion_main};
use inkpage_engine::models::{Point, Timestamp};
mod common;

fn bench_eraser(c: &mut Criterion) {
    let mut group = c.benchmark_group("eraser");
    group.sample_size(20);

    let page = common::ruled_page(200);

    group.bench_function("erase_miss_200_strokes", |b| {
        b.iter_batched_ref(
            || common::ruled_page(200),
            |engine| {
                let removed = engine.erase_at(std::hint::black_box(Point::new(1000.0, 1000.0)));
                std::hint::black_box(removed);
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("erase_hit_200_strokes", |b| {
        b.iter_batched_ref(
            || common::ruled_page(200),
            |engine| {
                let removed = engine.erase_at(std::hint::black_box(Point::new(200.0, 3000.0)));
                std::hint::black_box(removed);
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("strokes_view_200_strokes", |b| {
        b.iter(|| {
            let view = page.strokes_view(std::hint::black_box(Timestamp::ZERO));
            std::hint::black_box(view);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_eraser);
criterion_main!(benches);
