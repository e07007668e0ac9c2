//! Benchmark for room placement and carving.
//!
//! Run with: cargo bench --package cavern_procedural --bench rooms_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cavern_procedural::{
    find_regions, generate_from_seed, CaveGenerator, MapRng, MapSeed, RoomCarver, RoomConfig,
};

fn benchmark_placement(c: &mut Criterion) {
    let carver = RoomCarver::new(RoomConfig {
        room_count: 20,
        ..RoomConfig::default()
    });

    let cave = generate_from_seed(80, 200, 42).unwrap();

    c.bench_function("place_20_rooms_80x200", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let mut rng = MapRng::new(MapSeed::new(seed));
            black_box(carver.place(&cave, &mut rng))
        });
    });
}

fn benchmark_carving(c: &mut Criterion) {
    let generator = CaveGenerator::default();

    c.bench_function("generate_with_rooms_32x96", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            black_box(generator.carve_rooms(32, 96, MapSeed::new(black_box(seed))))
        });
    });
}

fn benchmark_region_scan(c: &mut Criterion) {
    let cave = generate_from_seed(80, 200, 42).unwrap();

    c.bench_function("find_regions_80x200", |b| {
        b.iter(|| black_box(find_regions(black_box(&cave))));
    });
}

criterion_group!(benches, benchmark_placement, benchmark_carving, benchmark_region_scan);
criterion_main!(benches);
