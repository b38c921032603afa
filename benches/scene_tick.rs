use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use particle_backdrop::camera::PerspectiveCamera;
use particle_backdrop::config::{BackdropConfig, DEFAULT_ROTATION_STEP};
use particle_backdrop::particles::ParticleGroup;
use particle_backdrop::scene::Scene;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Benchmark: scattering particle layouts of increasing size
fn bench_scatter(c: &mut Criterion) {
    let mut group = c.benchmark_group("scatter");

    for count in [100usize, 500, 5_000].iter() {
        group.bench_with_input(BenchmarkId::new("particles", count), count, |b, &count| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| black_box(ParticleGroup::scatter(count, 50.0, [0.5, 1.0], &mut rng)))
        });
    }

    group.finish();
}

/// Benchmark: the CPU side of one frame, rotate then rebuild instance data
fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for count in [500usize, 5_000].iter() {
        let config = BackdropConfig {
            particle_count: *count,
            ..Default::default()
        };
        let mut scene = Scene::build(&config, &mut StdRng::seed_from_u64(42));
        let camera = PerspectiveCamera::new(&config.camera, 16.0 / 9.0);

        group.bench_with_input(BenchmarkId::new("advance", count), count, |b, _| {
            b.iter(|| scene.group.advance(black_box(DEFAULT_ROTATION_STEP)))
        });

        group.bench_with_input(BenchmarkId::new("instances", count), count, |b, _| {
            b.iter(|| black_box(scene.instances()))
        });

        group.bench_with_input(BenchmarkId::new("uniform", count), count, |b, _| {
            b.iter(|| black_box(scene.uniform(&camera)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scatter, bench_frame);
criterion_main!(benches);
