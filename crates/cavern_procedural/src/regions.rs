//! # Region Analysis
//!
//! Flood-fill tools over floor cells.
//!
//! A region is a maximal 4-connected set of floor cells. Regions are
//! discovered in row-major order, so the output is a pure function of
//! the grid.
//!
//! Used after the automaton settles to:
//! - fill pockets too small to matter (`prune_regions`)
//! - tunnel the remaining pockets into the main cave (`connect_regions`)
//! - verify room connectivity (`reachable_from`)

use std::collections::VecDeque;

use crate::grid::{CellState, Grid};

/// 4-connected offsets (row, col).
const ORTHOGONAL: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// A connected set of floor cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    /// Member cells as `(row, col)`, in discovery order.
    cells: Vec<(usize, usize)>,
}

impl Region {
    /// Number of cells in the region.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the region has no cells.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Member cells as `(row, col)`.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    /// Inclusive bounding box as `((min_row, min_col), (max_row, max_col))`.
    #[must_use]
    pub fn bounds(&self) -> Option<((usize, usize), (usize, usize))> {
        let (&(r0, c0), rest) = self.cells.split_first()?;
        let mut min = (r0, c0);
        let mut max = (r0, c0);

        for &(r, c) in rest {
            min = (min.0.min(r), min.1.min(c));
            max = (max.0.max(r), max.1.max(c));
        }

        Some((min, max))
    }

    /// The member cell closest to the centre of the bounding box.
    ///
    /// For concave regions the box centre may be rock, so the nearest
    /// member is returned instead.
    #[must_use]
    pub fn center(&self) -> Option<(usize, usize)> {
        let ((r0, c0), (r1, c1)) = self.bounds()?;
        let target = ((r0 + r1) / 2, (c0 + c1) / 2);

        self.cells
            .iter()
            .copied()
            .min_by_key(|&cell| distance_sq(cell, target))
    }
}

/// Squared Euclidean distance between two cells.
#[inline]
#[must_use]
pub(crate) fn distance_sq(a: (usize, usize), b: (usize, usize)) -> usize {
    let dr = a.0.abs_diff(b.0);
    let dc = a.1.abs_diff(b.1);
    dr * dr + dc * dc
}

/// Visits the 4-connected floor cells reachable from `start`.
fn flood(grid: &Grid, start: (usize, usize), visited: &mut [bool]) -> Vec<(usize, usize)> {
    let mut members = Vec::new();
    let mut queue = VecDeque::new();

    let start_idx = grid.index(start.0, start.1);
    if visited[start_idx] || !grid.cells()[start_idx].is_floor() {
        return members;
    }
    visited[start_idx] = true;
    queue.push_back(start);

    while let Some((row, col)) = queue.pop_front() {
        members.push((row, col));

        for (dr, dc) in ORTHOGONAL {
            let (nr, nc) = (row as isize + dr, col as isize + dc);
            if grid.at_signed(nr, nc) != Some(CellState::Floor) {
                continue;
            }
            let (nr, nc) = (nr as usize, nc as usize);
            let idx = grid.index(nr, nc);
            if !visited[idx] {
                visited[idx] = true;
                queue.push_back((nr, nc));
            }
        }
    }

    members
}

/// Finds every floor region, in row-major order of first cell.
#[must_use]
pub fn find_regions(grid: &Grid) -> Vec<Region> {
    let mut visited = vec![false; grid.height() * grid.width()];
    let mut regions = Vec::new();

    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let cells = flood(grid, (row, col), &mut visited);
            if !cells.is_empty() {
                regions.push(Region { cells });
            }
        }
    }

    regions
}

/// Mask (row-major) of floor cells reachable from `(row, col)`.
///
/// All-false if the start is off-grid or not floor.
#[must_use]
pub fn reachable_from(grid: &Grid, row: usize, col: usize) -> Vec<bool> {
    let mut visited = vec![false; grid.height() * grid.width()];
    if grid.contains(row, col) {
        let cells = flood(grid, (row, col), &mut visited);
        visited.fill(false);
        for (r, c) in cells {
            visited[grid.index(r, c)] = true;
        }
    }
    visited
}

/// Index of the largest region (first one wins ties).
#[must_use]
pub fn largest_region(regions: &[Region]) -> Option<usize> {
    regions
        .iter()
        .enumerate()
        .rev()
        .max_by_key(|(_, region)| region.len())
        .map(|(i, _)| i)
}

/// Walls up regions smaller than `min_fraction` of the largest region.
///
/// Returns the number of regions filled.
pub fn prune_regions(grid: &mut Grid, min_fraction: f64) -> usize {
    let regions = find_regions(grid);
    let Some(largest) = largest_region(&regions) else {
        return 0;
    };
    let threshold = (regions[largest].len() as f64 * min_fraction) as usize;

    let mut pruned = 0;
    for region in regions.iter().filter(|r| r.len() < threshold) {
        for &(row, col) in region.cells() {
            grid.put(row, col, CellState::Wall);
        }
        pruned += 1;
    }

    if pruned > 0 {
        tracing::debug!(pruned, threshold, "pruned small cave pockets");
    }
    pruned
}

/// Tunnels every region into the largest one.
///
/// Each corridor runs in a straight 4-connected line between region
/// centres and is two cells thick where the grid allows.
/// Returns the number of corridors carved.
pub fn connect_regions(grid: &mut Grid) -> usize {
    let regions = find_regions(grid);
    let Some(largest) = largest_region(&regions) else {
        return 0;
    };
    let Some(hub) = regions[largest].center() else {
        return 0;
    };

    let mut carved = 0;
    for (i, region) in regions.iter().enumerate() {
        if i == largest {
            continue;
        }
        let Some(from) = region.center() else {
            continue;
        };
        for (row, col) in line(from, hub) {
            grid.put(row, col, CellState::Floor);
            if row + 1 < grid.height() {
                grid.put(row + 1, col, CellState::Floor);
            }
        }
        carved += 1;
    }

    if carved > 0 {
        tracing::debug!(carved, "connected cave regions");
    }
    carved
}

/// Cells on a 4-connected line from `from` to `to`, both ends included.
///
/// Steps along whichever axis keeps the path closest to the ideal line,
/// so consecutive cells always share an edge.
#[must_use]
pub fn line(from: (usize, usize), to: (usize, usize)) -> Vec<(usize, usize)> {
    let nr = from.0.abs_diff(to.0);
    let nc = from.1.abs_diff(to.1);
    let step_r: isize = if to.0 >= from.0 { 1 } else { -1 };
    let step_c: isize = if to.1 >= from.1 { 1 } else { -1 };

    let mut path = Vec::with_capacity(nr + nc + 1);
    let (mut row, mut col) = (from.0 as isize, from.1 as isize);
    let (mut ir, mut ic) = (0usize, 0usize);
    path.push(from);

    while ir < nr || ic < nc {
        if (1 + 2 * ic) * nr < (1 + 2 * ir) * nc {
            col += step_c;
            ic += 1;
        } else {
            row += step_r;
            ir += 1;
        }
        path.push((row as usize, col as usize));
    }

    path
}
