//! Benchmark for cellular automaton throughput.
//!
//! TARGET: 80x200 cave, 5 rounds, under 5ms
//!
//! Run with: cargo bench --package cavern_procedural --bench automaton_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cavern_procedural::{
    generate_from_seed, generate_from_seed_with_steps, AutomatonRule, CellState, CellularAutomaton,
    Grid, MapRng, MapSeed,
};

fn noise_grid(height: usize, width: usize) -> Grid {
    let mut grid = Grid::new(height, width, CellState::Wall).unwrap();
    let mut rng = MapRng::new(MapSeed::new(42));
    CellularAutomaton::default().fill_noise(&mut grid, &mut rng);
    grid
}

fn benchmark_single_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_round");

    for &(h, w) in &[(32, 32), (80, 200), (256, 256)] {
        let grid = noise_grid(h, w);
        group.throughput(Throughput::Elements((h * w) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(format!("{h}x{w}")), &grid, |b, grid| {
            b.iter(|| black_box(AutomatonRule::CAVE.apply(black_box(grid))));
        });
    }

    group.finish();
}

fn benchmark_full_generation(c: &mut Criterion) {
    c.bench_function("generate_80x200", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            black_box(generate_from_seed(80, 200, black_box(seed)))
        });
    });
}

fn benchmark_step_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_history");
    group.sample_size(20);

    for iterations in [5, 20, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(iterations), &iterations, |b, &n| {
            b.iter(|| black_box(generate_from_seed_with_steps(80, 200, 42, n)));
        });
    }

    group.finish();
}

fn benchmark_neighbor_count(c: &mut Criterion) {
    let grid = noise_grid(80, 200);

    c.bench_function("neighbor_count_radius_2", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) % (80 * 200);
            black_box(grid.neighbor_count(i / 200, i % 200, CellState::Wall, 2))
        });
    });
}

criterion_group!(
    benches,
    benchmark_single_round,
    benchmark_full_generation,
    benchmark_step_history,
    benchmark_neighbor_count,
);
criterion_main!(benches);
