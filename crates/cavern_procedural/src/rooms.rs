//! # Room Carving
//!
//! Overlays rectangular rooms on a settled cave and joins them up.
//!
//! ## Pipeline
//!
//! 1. **Place**: draw room sizes and positions from the RNG, rejecting any
//!    that overlap an earlier room (plus `spacing`). A candidate that is
//!    mostly rock (open share at most `max_open_fraction`) is taken at
//!    once; otherwise the least open candidate of `max_attempts` draws is
//!    used. If no draw fits, placement stops and fewer rooms are returned.
//! 2. **Carve**: force every room cell to floor.
//! 3. **Connect**: join each room to the nearest earlier room with an
//!    L-shaped corridor, so the rooms form a tree.
//! 4. **Verify**: flood fill from the first room must reach every room cell.
//!
//! Rooms stay strictly inside the one-cell map border.

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, GenerationResult};
use crate::grid::{CellState, Grid};
use crate::regions::{distance_sq, reachable_from};
use crate::seed::MapRng;

/// An axis-aligned rectangular room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Room {
    /// Top row.
    pub row: usize,
    /// Left column.
    pub col: usize,
    /// Number of rows.
    pub height: usize,
    /// Number of columns.
    pub width: usize,
}

impl Room {
    /// Creates a room.
    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize, height: usize, width: usize) -> Self {
        Self {
            row,
            col,
            height,
            width,
        }
    }

    /// One past the bottom row.
    #[inline]
    #[must_use]
    pub const fn row_end(&self) -> usize {
        self.row + self.height
    }

    /// One past the right column.
    #[inline]
    #[must_use]
    pub const fn col_end(&self) -> usize {
        self.col + self.width
    }

    /// Centre cell, used as the corridor anchor.
    #[inline]
    #[must_use]
    pub const fn centroid(&self) -> (usize, usize) {
        (self.row + self.height / 2, self.col + self.width / 2)
    }

    /// Returns true if `(row, col)` lies inside the room.
    #[inline]
    #[must_use]
    pub const fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row && row < self.row_end() && col >= self.col && col < self.col_end()
    }

    /// Returns true if the rooms intersect once `self` is grown by `spacing`
    /// cells on every side.
    #[inline]
    #[must_use]
    pub const fn overlaps(&self, other: &Self, spacing: usize) -> bool {
        self.row < other.row_end().saturating_add(spacing)
            && other.row < self.row_end().saturating_add(spacing)
            && self.col < other.col_end().saturating_add(spacing)
            && other.col < self.col_end().saturating_add(spacing)
    }

    /// Iterates over every cell of the room.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (row, row_end, col, col_end) = (self.row, self.row_end(), self.col, self.col_end());
        (row..row_end).flat_map(move |r| (col..col_end).map(move |c| (r, c)))
    }

    /// Number of cells in the room.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> usize {
        self.height * self.width
    }
}

/// Room placement parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Number of rooms to try to place.
    pub room_count: usize,
    /// Minimum room width (columns).
    pub min_width: usize,
    /// Maximum room width (columns).
    pub max_width: usize,
    /// Minimum room height (rows).
    pub min_height: usize,
    /// Maximum room height (rows).
    pub max_height: usize,
    /// Failed draws allowed per room before placement gives up.
    pub max_attempts: usize,
    /// Minimum rock gap between two rooms.
    pub spacing: usize,
    /// Largest share of already-open cells a room may cover and still be
    /// taken on the first fitting draw.
    pub max_open_fraction: f64,
}

impl RoomConfig {
    /// Largest rock gap a config may request.
    pub const MAX_SPACING: usize = 64;

    /// Checks the bounds for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfig`] for zero-sized rooms,
    /// inverted min/max bounds, oversized spacing or `max_attempts == 0`.
    pub fn validate(&self) -> GenerationResult<()> {
        if self.min_width == 0 || self.min_height == 0 {
            return Err(GenerationError::InvalidConfig(
                "rooms: minimum width and height must be at least 1".into(),
            ));
        }
        if self.min_width > self.max_width {
            return Err(GenerationError::InvalidConfig(format!(
                "rooms: min_width {} exceeds max_width {}",
                self.min_width, self.max_width
            )));
        }
        if self.min_height > self.max_height {
            return Err(GenerationError::InvalidConfig(format!(
                "rooms: min_height {} exceeds max_height {}",
                self.min_height, self.max_height
            )));
        }
        if self.spacing > Self::MAX_SPACING {
            return Err(GenerationError::InvalidConfig(format!(
                "rooms: spacing {} exceeds {}",
                self.spacing,
                Self::MAX_SPACING
            )));
        }
        if !(0.0..=1.0).contains(&self.max_open_fraction) {
            return Err(GenerationError::InvalidConfig(format!(
                "rooms: max_open_fraction {} outside [0, 1]",
                self.max_open_fraction
            )));
        }
        if self.max_attempts == 0 {
            return Err(GenerationError::InvalidConfig(
                "rooms: max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            room_count: 6,
            min_width: 4,
            max_width: 12,
            min_height: 3,
            max_height: 7,
            max_attempts: 64,
            spacing: 1,
            max_open_fraction: 0.2,
        }
    }
}

/// Whether every requested room was placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementStatus {
    /// All requested rooms were placed.
    Complete,
    /// Placement ran out of attempts. Not an error; the map simply has
    /// fewer rooms.
    Exhausted {
        /// Rooms actually placed.
        placed: usize,
        /// Rooms requested.
        requested: usize,
    },
}

/// Result of a room carving pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomLayout {
    /// Placed rooms, in placement order.
    rooms: Vec<Room>,
    /// `(room, joined_to)` pairs, one per corridor.
    connections: Vec<(usize, usize)>,
    /// Rooms requested by the config.
    requested: usize,
}

impl RoomLayout {
    /// Placed rooms, in placement order.
    #[inline]
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Corridors as `(room, earlier_room)` index pairs.
    #[inline]
    #[must_use]
    pub fn connections(&self) -> &[(usize, usize)] {
        &self.connections
    }

    /// Number of rooms requested.
    #[inline]
    #[must_use]
    pub const fn requested(&self) -> usize {
        self.requested
    }

    /// Placement outcome.
    #[must_use]
    pub fn status(&self) -> PlacementStatus {
        if self.rooms.len() >= self.requested {
            PlacementStatus::Complete
        } else {
            PlacementStatus::Exhausted {
                placed: self.rooms.len(),
                requested: self.requested,
            }
        }
    }
}

/// Places, carves and connects rooms.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RoomCarver {
    config: RoomConfig,
}

impl RoomCarver {
    /// Creates a carver.
    #[must_use]
    pub const fn new(config: RoomConfig) -> Self {
        Self { config }
    }

    /// Draws non-overlapping rooms that fit inside the grid border,
    /// preferring solid rock.
    ///
    /// Returns fewer than `room_count` rooms when none of `max_attempts`
    /// draws fits beside the rooms already placed.
    pub fn place(&self, grid: &Grid, rng: &mut MapRng) -> Vec<Room> {
        let cfg = &self.config;
        let (height, width) = (grid.height(), grid.width());
        let mut rooms = Vec::with_capacity(cfg.room_count);

        // Interior available once the border is reserved
        let avail_h = height.saturating_sub(2);
        let avail_w = width.saturating_sub(2);
        if avail_h < cfg.min_height || avail_w < cfg.min_width {
            return rooms;
        }
        let max_h = cfg.max_height.min(avail_h);
        let max_w = cfg.max_width.min(avail_w);

        'rooms: while rooms.len() < cfg.room_count {
            let mut fallback: Option<(usize, Room)> = None;

            for _ in 0..cfg.max_attempts {
                let room_h = rng.next_index(cfg.min_height, max_h);
                let room_w = rng.next_index(cfg.min_width, max_w);
                let row = rng.next_index(1, height - 1 - room_h);
                let col = rng.next_index(1, width - 1 - room_w);
                let candidate = Room::new(row, col, room_h, room_w);

                if rooms.iter().any(|room| room.overlaps(&candidate, cfg.spacing)) {
                    continue;
                }

                let open = open_cells(grid, &candidate);
                if open as f64 <= candidate.area() as f64 * cfg.max_open_fraction {
                    rooms.push(candidate);
                    continue 'rooms;
                }
                if !matches!(fallback, Some((best, _)) if best <= open) {
                    fallback = Some((open, candidate));
                }
            }

            match fallback {
                Some((_, room)) => rooms.push(room),
                None => break,
            }
        }

        rooms
    }

    /// Places rooms, carves them and their corridors into `grid`, then
    /// verifies connectivity.
    ///
    /// `grid` is only modified on success.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::ConnectivityViolation`] if any room cell
    /// is unreachable from the first room after carving.
    pub fn carve(&self, grid: &mut Grid, rng: &mut MapRng) -> GenerationResult<RoomLayout> {
        let rooms = self.place(grid, rng);
        let mut work = grid.clone();

        for room in &rooms {
            work.fill_rect(room.row, room.col, room.height, room.width, CellState::Floor);
        }

        let mut connections = Vec::with_capacity(rooms.len().saturating_sub(1));
        for (i, room) in rooms.iter().enumerate().skip(1) {
            let from = room.centroid();
            let nearest = rooms[..i]
                .iter()
                .enumerate()
                .min_by_key(|(_, other)| distance_sq(from, other.centroid()))
                .map_or(0, |(j, _)| j);

            let horizontal_first = rng.next_bool(0.5);
            carve_corridor(&mut work, from, rooms[nearest].centroid(), horizontal_first);
            connections.push((i, nearest));
        }

        verify_connected(&work, &rooms)?;

        let layout = RoomLayout {
            rooms,
            connections,
            requested: self.config.room_count,
        };

        match layout.status() {
            PlacementStatus::Complete => {
                tracing::debug!(rooms = layout.rooms.len(), "rooms carved");
            }
            PlacementStatus::Exhausted { placed, requested } => {
                tracing::warn!(placed, requested, "room placement exhausted attempts");
            }
        }

        *grid = work;
        Ok(layout)
    }
}

/// Number of floor cells inside a room's footprint.
fn open_cells(grid: &Grid, room: &Room) -> usize {
    room.cells()
        .filter(|&(r, c)| grid.cells()[grid.index(r, c)].is_floor())
        .count()
}

/// Forces an L-shaped path between two cells to floor.
fn carve_corridor(grid: &mut Grid, from: (usize, usize), to: (usize, usize), horizontal_first: bool) {
    let corner = if horizontal_first {
        (from.0, to.1)
    } else {
        (to.0, from.1)
    };

    for (a, b) in [(from, corner), (corner, to)] {
        let (r0, r1) = (a.0.min(b.0), a.0.max(b.0));
        let (c0, c1) = (a.1.min(b.1), a.1.max(b.1));
        // One leg is always a single row or column
        grid.fill_rect(r0, c0, r1 - r0 + 1, c1 - c0 + 1, CellState::Floor);
    }
}

/// Flood fills from the first room and checks every room cell was reached.
fn verify_connected(grid: &Grid, rooms: &[Room]) -> GenerationResult<()> {
    let Some(first) = rooms.first() else {
        return Ok(());
    };
    let (row, col) = first.centroid();
    let reached = reachable_from(grid, row, col);

    let unreached = rooms
        .iter()
        .flat_map(Room::cells)
        .filter(|&(r, c)| !reached[grid.index(r, c)])
        .count();

    if unreached > 0 {
        tracing::error!(unreached, rooms = rooms.len(), "rooms disconnected after carving");
        return Err(GenerationError::ConnectivityViolation {
            unreached,
            rooms: rooms.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::MapSeed;

    fn solid(height: usize, width: usize) -> Grid {
        Grid::new(height, width, CellState::Wall).unwrap()
    }

    #[test]
    fn test_room_geometry() {
        let room = Room::new(2, 3, 4, 5);
        assert_eq!(room.row_end(), 6);
        assert_eq!(room.col_end(), 8);
        assert_eq!(room.centroid(), (4, 5));
        assert_eq!(room.area(), 20);
        assert_eq!(room.cells().count(), 20);
        assert!(room.contains(5, 7));
        assert!(!room.contains(6, 7));
    }

    #[test]
    fn test_overlap_with_spacing() {
        let a = Room::new(1, 1, 3, 3);
        let touching = Room::new(1, 4, 3, 3);
        let gapped = Room::new(1, 5, 3, 3);

        assert!(!a.overlaps(&touching, 0));
        assert!(a.overlaps(&touching, 1));
        assert!(!a.overlaps(&gapped, 1));
        assert!(a.overlaps(&a, 0));

        // Huge gaps saturate instead of overflowing
        assert!(a.overlaps(&Room::new(30, 30, 2, 2), usize::MAX));
        assert!(Room::new(usize::MAX - 2, 0, 2, 2).overlaps(&a, usize::MAX));
    }

    #[test]
    fn test_config_validation() {
        assert!(RoomConfig::default().validate().is_ok());

        let inverted = RoomConfig { min_width: 9, max_width: 3, ..RoomConfig::default() };
        assert!(inverted.validate().is_err());

        let flat = RoomConfig { min_height: 0, ..RoomConfig::default() };
        assert!(flat.validate().is_err());

        let hopeless = RoomConfig { max_attempts: 0, ..RoomConfig::default() };
        assert!(hopeless.validate().is_err());

        let sprawling = RoomConfig { spacing: usize::MAX, ..RoomConfig::default() };
        assert!(sprawling.validate().is_err());

        let greedy = RoomConfig { max_open_fraction: 1.5, ..RoomConfig::default() };
        assert!(greedy.validate().is_err());
    }

    #[test]
    fn test_placed_rooms_fit_and_never_overlap() {
        let carver = RoomCarver::default();
        for seed in 0..50 {
            let mut rng = MapRng::new(MapSeed::new(seed));
            let rooms = carver.place(&solid(32, 96), &mut rng);

            assert!(rooms.len() <= RoomConfig::default().room_count);
            for (i, a) in rooms.iter().enumerate() {
                assert!(a.row >= 1 && a.col >= 1);
                assert!(a.row_end() <= 31 && a.col_end() <= 95);
                for b in &rooms[i + 1..] {
                    assert!(!a.overlaps(b, 0), "Seed {seed}: {a:?} overlaps {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_tiny_grid_places_nothing() {
        let carver = RoomCarver::default();
        let mut rng = MapRng::new(MapSeed::new(1));
        assert!(carver.place(&solid(4, 4), &mut rng).is_empty());

        let mut grid = solid(1, 1);
        let layout = carver.carve(&mut grid, &mut rng).unwrap();
        assert_eq!(
            layout.status(),
            PlacementStatus::Exhausted { placed: 0, requested: 6 }
        );
        assert_eq!(grid.get(0, 0), Ok(CellState::Wall));
    }

    #[test]
    fn test_rooms_prefer_rock() {
        // Left half open cave, right half solid rock
        let mut grid = solid(32, 96);
        grid.fill_rect(0, 0, 32, 48, CellState::Floor);
        let carver = RoomCarver::default();

        for seed in 0..20 {
            let mut rng = MapRng::new(MapSeed::new(seed));
            let rooms = carver.place(&grid, &mut rng);

            assert!(!rooms.is_empty());
            for room in &rooms {
                let open = open_cells(&grid, room);
                assert!(
                    open as f64 <= room.area() as f64 * 0.2,
                    "Seed {seed}: {room:?} is {open}/{} open",
                    room.area()
                );
            }
        }
    }

    #[test]
    fn test_open_field_still_gets_rooms() {
        let grid = Grid::new(32, 96, CellState::Floor).unwrap();
        let mut rng = MapRng::new(MapSeed::new(8));
        let rooms = RoomCarver::default().place(&grid, &mut rng);
        assert_eq!(rooms.len(), RoomConfig::default().room_count);
    }

    #[test]
    fn test_unbounded_spacing_does_not_overflow() {
        let config = RoomConfig { spacing: usize::MAX, ..RoomConfig::default() };
        let mut rng = MapRng::new(MapSeed::new(4));
        let rooms = RoomCarver::new(config).place(&solid(32, 96), &mut rng);
        assert_eq!(rooms.len(), 1);
    }

    #[test]
    fn test_crowded_grid_exhausts() {
        let config = RoomConfig {
            room_count: 50,
            min_width: 5,
            max_width: 5,
            min_height: 5,
            max_height: 5,
            max_attempts: 32,
            spacing: 1,
            max_open_fraction: 0.2,
        };
        let mut grid = solid(20, 20);
        let mut rng = MapRng::new(MapSeed::new(3));
        let layout = RoomCarver::new(config).carve(&mut grid, &mut rng).unwrap();

        // At most 9 rooms of 5x5 with a gap fit in an 18x18 interior
        assert!(layout.rooms().len() <= 9);
        assert!(matches!(layout.status(), PlacementStatus::Exhausted { requested: 50, .. }));
    }

    #[test]
    fn test_carve_connects_rooms_in_solid_rock() {
        let carver = RoomCarver::default();
        for seed in 0..25 {
            let mut grid = solid(32, 96);
            let mut rng = MapRng::new(MapSeed::new(seed));
            let layout = carver.carve(&mut grid, &mut rng).unwrap();

            assert!(!layout.rooms().is_empty());
            assert_eq!(layout.connections().len(), layout.rooms().len() - 1);
            for &(room, joined) in layout.connections() {
                assert!(joined < room);
            }

            // Solid rock means only rooms and corridors are open, and they
            // must form exactly one region
            assert_eq!(crate::regions::find_regions(&grid).len(), 1, "Seed {seed}");
            for room in layout.rooms() {
                assert!(room.cells().all(|(r, c)| grid.get(r, c) == Ok(CellState::Floor)));
            }
        }
    }

    #[test]
    fn test_corridor_shapes() {
        let mut grid = solid(6, 6);
        carve_corridor(&mut grid, (1, 1), (4, 4), true);
        // Row 1 from col 1..=4, then col 4 from row 1..=4
        assert_eq!(grid.count(CellState::Floor), 7);
        assert_eq!(grid.get(1, 4), Ok(CellState::Floor));
        assert_eq!(grid.get(4, 1), Ok(CellState::Wall));

        let mut grid = solid(6, 6);
        carve_corridor(&mut grid, (1, 1), (4, 4), false);
        assert_eq!(grid.get(4, 1), Ok(CellState::Floor));
        assert_eq!(grid.get(1, 4), Ok(CellState::Wall));
    }

    #[test]
    fn test_verify_detects_disconnection() {
        let mut grid = solid(10, 10);
        let rooms = [Room::new(1, 1, 2, 2), Room::new(6, 6, 2, 2)];
        for room in &rooms {
            grid.fill_rect(room.row, room.col, room.height, room.width, CellState::Floor);
        }

        assert_eq!(
            verify_connected(&grid, &rooms),
            Err(GenerationError::ConnectivityViolation { unreached: 4, rooms: 2 })
        );

        carve_corridor(&mut grid, rooms[1].centroid(), rooms[0].centroid(), true);
        assert_eq!(verify_connected(&grid, &rooms), Ok(()));
    }
}
