//! # Room Connectivity Tests
//!
//! Every carved room must be reachable from every other room.

use cavern_procedural::{
    find_regions, generate_from_seed, generate_with_rooms, reachable_from, CaveGenerator, CellState,
    GenerationConfig, MapSeed, PlacementStatus, RoomConfig,
};

/// Test: All rooms share one flood-fill component across many seeds.
#[test]
fn test_rooms_are_mutually_reachable() {
    let generator = CaveGenerator::default();

    for seed in 0..25 {
        let carving = generator.carve_rooms(32, 96, MapSeed::new(seed)).unwrap();
        let rooms = carving.layout.rooms();
        assert!(!rooms.is_empty(), "Seed {seed}: no rooms placed on 32x96");

        let (row, col) = rooms[0].centroid();
        let reached = reachable_from(&carving.grid, row, col);

        for room in rooms {
            for (r, c) in room.cells() {
                assert!(
                    reached[r * carving.grid.width() + c],
                    "Seed {seed}: cell ({r}, {c}) of {room:?} unreachable"
                );
            }
        }
    }
}

/// Test: Room count never exceeds the request and rooms never overlap.
#[test]
fn test_room_count_and_spacing() {
    let config = RoomConfig::default();
    let generator = CaveGenerator::default();

    for seed in 0..25 {
        let carving = generator.carve_rooms(32, 96, MapSeed::new(seed)).unwrap();
        let rooms = carving.layout.rooms();
        assert!(rooms.len() <= config.room_count);

        for (i, a) in rooms.iter().enumerate() {
            assert!(a.row >= 1 && a.col >= 1);
            assert!(a.row_end() < 32 && a.col_end() < 96);
            for b in &rooms[i + 1..] {
                assert!(!a.overlaps(b, config.spacing), "Seed {seed}: {a:?} overlaps {b:?}");
            }
        }
    }
}

/// Test: Each room after the first is joined to an earlier room.
#[test]
fn test_corridors_form_a_tree() {
    let carving = CaveGenerator::default()
        .carve_rooms(40, 120, MapSeed::new(2024))
        .unwrap();
    let layout = &carving.layout;

    assert_eq!(layout.connections().len(), layout.rooms().len().saturating_sub(1));
    for (k, &(room, joined)) in layout.connections().iter().enumerate() {
        assert_eq!(room, k + 1);
        assert!(joined < room);
    }
}

/// Test: Carving opens rock but never closes floor.
#[test]
fn test_rooms_only_add_floor() {
    for seed in 0..10 {
        let cave = generate_from_seed(32, 96, seed).unwrap();
        let rooms = generate_with_rooms(32, 96, seed).unwrap();

        for (before, after) in cave.cells().iter().zip(rooms.cells()) {
            if before.is_floor() {
                assert!(after.is_floor());
            }
        }
    }
}

/// Test: Rooms settle into rock rather than re-opening the cave.
#[test]
fn test_rooms_sit_mostly_in_rock() {
    let generator = CaveGenerator::default();
    let mut in_rock = 0;
    let mut total = 0;

    for seed in 0..20 {
        let seed = MapSeed::new(seed);
        let cave = generator.generate(32, 96, seed).unwrap();
        let carving = generator.carve_rooms(32, 96, seed).unwrap();

        for room in carving.layout.rooms() {
            let open = room
                .cells()
                .filter(|&(r, c)| cave.get(r, c) == Ok(CellState::Floor))
                .count();
            if open as f64 <= room.area() as f64 * 0.2 {
                in_rock += 1;
            }
            total += 1;
        }
    }

    println!("Rooms in rock: {in_rock}/{total}");
    assert!(in_rock * 3 >= total, "Only {in_rock}/{total} rooms were placed in rock");
}

/// Test: Room carving is deterministic.
#[test]
fn test_room_generation_is_deterministic() {
    let a = generate_with_rooms(30, 90, 555).unwrap();
    let b = generate_with_rooms(30, 90, 555).unwrap();
    assert_eq!(a, b);
}

/// Test: A grid too small for any room returns the plain cave.
#[test]
fn test_tiny_grid_has_no_rooms() {
    let carving = CaveGenerator::default()
        .carve_rooms(4, 4, MapSeed::new(1))
        .unwrap();

    assert!(carving.layout.rooms().is_empty());
    assert_eq!(
        carving.layout.status(),
        PlacementStatus::Exhausted {
            placed: 0,
            requested: 6
        }
    );
    assert_eq!(carving.grid, generate_from_seed(4, 4, 1).unwrap());
}

/// Test: Crowded layouts stop early instead of failing.
#[test]
fn test_crowded_layout_exhausts() {
    let config = GenerationConfig {
        rooms: RoomConfig {
            room_count: 50,
            min_width: 6,
            max_width: 8,
            min_height: 4,
            max_height: 5,
            max_attempts: 20,
            spacing: 2,
            max_open_fraction: 0.2,
        },
        ..GenerationConfig::default()
    };
    let carving = CaveGenerator::new(config)
        .unwrap()
        .carve_rooms(24, 40, MapSeed::new(3))
        .unwrap();

    let placed = carving.layout.rooms().len();
    assert!(placed >= 1 && placed < 50);
    assert_eq!(
        carving.layout.status(),
        PlacementStatus::Exhausted {
            placed,
            requested: 50
        }
    );
}

/// Test: Rooms in solid rock leave a single connected region.
#[test]
fn test_solid_rock_yields_one_region() {
    let config = GenerationConfig {
        wall_probability: 1.0,
        ..GenerationConfig::default()
    };
    let carving = CaveGenerator::new(config)
        .unwrap()
        .carve_rooms(32, 96, MapSeed::new(11))
        .unwrap();

    assert!(!carving.layout.rooms().is_empty());
    assert_eq!(find_regions(&carving.grid).len(), 1);

    let carved: usize = carving.layout.rooms().iter().map(|r| r.area()).sum();
    assert!(carving.grid.count(CellState::Floor) >= carved);
}
