//! Benchmark for the per-tick chunk scheduling path.
//!
//! Run with: cargo bench --bench grid_update

use cgmath::Point2;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tile_streamer::config::WorldConfig;
use tile_streamer::engine_state::rendering::{MeshBatch, MeshHandle};
use tile_streamer::engine_state::tiles::{ChunkGrid, OrderingPolicy, Rectangle};
use tile_streamer::engine_state::EngineState;

fn seeded(ordering: OrderingPolicy) -> WorldConfig {
    WorldConfig {
        seed: Some(42),
        ordering,
        ..WorldConfig::default()
    }
}

fn benchmark_single_chunk_load(c: &mut Criterion) {
    let config = seeded(OrderingPolicy::Approach);
    let view = Rectangle::new(-10.0, -10.0, 20.0, 20.0);
    let away = Rectangle::new(5000.0, 5000.0, 10.0, 10.0);

    let mut group = c.benchmark_group("chunk_load");
    group.throughput(Throughput::Elements(256));
    group.bench_function("load_and_release_centre_chunk", |b| {
        let mut batch = MeshBatch::new();
        let mut grid: ChunkGrid<MeshHandle> = ChunkGrid::new(Point2::new(0.0, 0.0), &config);
        b.iter(|| {
            for _ in 0..4 {
                black_box(grid.update(&mut batch, &view));
            }
            black_box(grid.update(&mut batch, &away));
        });
    });
    group.finish();
}

fn benchmark_panning_camera(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_update");

    for (name, ordering) in [
        ("approach", OrderingPolicy::Approach),
        ("shuffled", OrderingPolicy::Shuffled),
    ] {
        let config = seeded(ordering);
        group.bench_function(format!("panning_{name}"), |b| {
            let mut batch = MeshBatch::new();
            let mut grid: ChunkGrid<MeshHandle> = ChunkGrid::new(Point2::new(0.0, 0.0), &config);
            let mut tick = 0u32;
            b.iter(|| {
                tick = tick.wrapping_add(1);
                let phase = (tick % 240) as f32 / 240.0 * std::f32::consts::TAU;
                let view = Rectangle::new(
                    300.0 * phase.cos() - 200.0,
                    300.0 * phase.sin() - 160.0,
                    400.0,
                    320.0,
                );
                black_box(grid.update(&mut batch, &view))
            });
        });
    }

    group.finish();
}

fn benchmark_engine_tick(c: &mut Criterion) {
    let config = seeded(OrderingPolicy::Approach);

    c.bench_function("engine_tick", |b| {
        let mut engine = EngineState::new(MeshBatch::new(), &config);
        let mut tick = 0u32;
        b.iter(|| {
            tick = tick.wrapping_add(1);
            let phase = (tick % 240) as f32 / 240.0 * std::f32::consts::TAU;
            engine.pan(-phase.sin(), phase.cos());
            black_box(engine.update(1.0 / 60.0))
        });
    });
}

criterion_group!(
    benches,
    benchmark_single_chunk_load,
    benchmark_panning_camera,
    benchmark_engine_tick
);
criterion_main!(benches);
