//! 粒子场性能基准测试
//!
//! 测试不同表面尺寸下的单帧开销和连线阶段开销

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use virus_field::config::FieldConfig;
use virus_field::core::ManualScheduler;
use virus_field::render::particles::{FieldEngine, ParticleField, PointerSample};
use virus_field::render::surface::{DeviceSize, LogicalSize, PixelRatio};
use virus_field::render::{RasterSurface, RecordingSurface};

const SIZES: [(u32, u32); 3] = [(320, 240), (900, 900), (1920, 1080)];

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_update");

    for (width, height) in SIZES.iter() {
        let mut field = ParticleField::new(FieldConfig::default(), PixelRatio::default());
        field.reset(DeviceSize::new(*width, *height), &mut StdRng::seed_from_u64(1));
        let pointer = PointerSample::new(*width as f32 / 2.0, *height as f32 / 2.0, true);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &pointer,
            |b, pointer| {
                b.iter(|| {
                    field.update(Some(black_box(pointer)));
                });
            },
        );
    }

    group.finish();
}

fn bench_links(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_links");

    for (width, height) in SIZES.iter() {
        let mut field = ParticleField::new(FieldConfig::default(), PixelRatio::default());
        field.reset(DeviceSize::new(*width, *height), &mut StdRng::seed_from_u64(2));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &field,
            |b, field| {
                b.iter(|| black_box(field.links().count()));
            },
        );
    }

    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_tick");

    for (width, height) in SIZES.iter() {
        let logical = LogicalSize::new(*width as f32, *height as f32);
        let pointer = PointerSample::new(logical.width / 2.0, logical.height / 2.0, true);

        group.bench_function(BenchmarkId::new("recording", format!("{}x{}", width, height)), |b| {
            let mut engine: FieldEngine<RecordingSurface, ManualScheduler> =
                FieldEngine::seeded(FieldConfig::default(), 1.0, ManualScheduler::new(), 3);
            engine.mount(RecordingSurface::new(logical));
            engine.activate();
            b.iter(|| {
                engine.step(Some(&pointer));
                if let Some(surface) = engine.surface_mut() {
                    black_box(surface.take_commands());
                }
            });
        });

        group.bench_function(BenchmarkId::new("raster", format!("{}x{}", width, height)), |b| {
            let mut engine: FieldEngine<RasterSurface, ManualScheduler> =
                FieldEngine::seeded(FieldConfig::default(), 1.0, ManualScheduler::new(), 3);
            engine.mount(RasterSurface::new(logical));
            engine.activate();
            b.iter(|| black_box(engine.step(Some(&pointer))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_update, bench_links, bench_tick);
criterion_main!(benches);
