use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rir2d_core::prelude::*;

fn bench_image_sources(c: &mut Criterion) {
    let room = Room::new(12.0, 9.0, Source::new((2.0, -7.5)), Receiver::new((-4.0, -1.0))).unwrap();
    c.bench_function("image_sources_order_6", |b| {
        b.iter(|| room.image_sources_for_order(black_box(6)).unwrap())
    });
    c.bench_function("reflection_paths_order_6", |b| {
        b.iter(|| room.reflection_paths_for_order(black_box(6)).unwrap())
    });
}

fn bench_build_rir(c: &mut Criterion) {
    let room = Room::new(12.0, 9.0, Source::new((2.0, -7.5)), Receiver::new((-4.0, -1.0))).unwrap();
    let paths = room.reflection_paths_for_order(6).unwrap();
    c.bench_function("build_rir_order_6", |b| {
        b.iter(|| build_rir(black_box(&paths), DEFAULT_SAMPLE_RATE, DEFAULT_LENGTH_SEC).unwrap())
    });
}

criterion_group!(benches, bench_image_sources, bench_build_rir);
criterion_main!(benches);
