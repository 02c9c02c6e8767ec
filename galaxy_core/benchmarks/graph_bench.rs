use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use galaxy_core::{
    find_best_connected, CellRegion, GalaxyConfig, JumpGraph, Star, StarFieldGenerator,
};

fn stars_for(cells_per_side: u32) -> (GalaxyConfig, Vec<Star>) {
    let mut config = GalaxyConfig::default();
    config.region = CellRegion {
        min: [0, 0, 0],
        max: [cells_per_side - 1, cells_per_side - 1, 0],
    };
    let stars = StarFieldGenerator::new(&config).generate_region(&config.region);
    (config, stars)
}

fn bench_graph_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("jump_graph");
    group.sample_size(20);

    for side in [1u32, 2, 3] {
        let (config, stars) = stars_for(side);
        group.bench_with_input(BenchmarkId::new("build", stars.len()), &stars, |b, stars| {
            b.iter(|| JumpGraph::build(stars, &config.jumps));
        });
    }

    group.finish();
}

fn bench_best_connected(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace");
    group.sample_size(20);

    for side in [1u32, 2] {
        let (config, stars) = stars_for(side);
        group.bench_with_input(
            BenchmarkId::new("best_connected", stars.len()),
            &stars,
            |b, stars| {
                b.iter_batched(
                    || JumpGraph::build(stars, &config.jumps),
                    |graph| find_best_connected(&graph, config.trace.max_iterations),
                    BatchSize::LargeInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group!(graph_benches, bench_graph_build, bench_best_connected);
criterion_main!(graph_benches);
