//! # Cellular Automaton Engine
//!
//! Turns random noise into caves by repeated neighbour counting.
//!
//! ## Update Rule
//!
//! For every cell, count wall neighbours within the rule's radius
//! (off-grid counts as wall):
//!
//! - `count >= wall_threshold` → wall
//! - `count <  floor_threshold` → floor
//! - otherwise the cell keeps its state
//!
//! Updates are synchronous. Each round reads one grid and writes a new
//! one, so snapshots never see a half-updated neighbour.

use serde::{Deserialize, Serialize};

use crate::grid::{CellState, Grid};
use crate::seed::MapRng;

/// Neighbour-count thresholds for one automaton round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomatonRule {
    /// A cell with at least this many wall neighbours becomes wall.
    pub wall_threshold: usize,
    /// A cell with fewer than this many wall neighbours becomes floor.
    pub floor_threshold: usize,
    /// Chebyshev radius of the neighbourhood (1 = 8 neighbours).
    pub radius: usize,
}

impl AutomatonRule {
    /// Largest radius a config may request.
    pub const MAX_RADIUS: usize = 16;

    /// Cave rule: wall at 5 or more wall neighbours, floor below 4, and a
    /// cell with exactly 4 keeps its state.
    ///
    /// Equivalent to a 5-of-9 majority vote over the cell and its ring.
    pub const CAVE: Self = Self {
        wall_threshold: 5,
        floor_threshold: 4,
        radius: 1,
    };

    /// No hold band: wall iff at least 5 of 8 neighbours are walls.
    ///
    /// Erodes 45% noise into open floor; mostly useful for smoothing
    /// already dense rock.
    pub const STRICT: Self = Self {
        wall_threshold: 5,
        floor_threshold: 5,
        radius: 1,
    };

    /// Widening pass: opens any cell with nearby floor, keeps dense rock.
    pub const POLISH: Self = Self {
        wall_threshold: 7,
        floor_threshold: 5,
        radius: 1,
    };

    /// Number of cells in the neighbourhood (excluding the centre).
    #[inline]
    #[must_use]
    pub const fn neighborhood_size(&self) -> usize {
        let side = self.radius.saturating_mul(2).saturating_add(1);
        side.saturating_mul(side) - 1
    }

    /// Next state of a cell given its current state and wall count.
    #[inline]
    #[must_use]
    pub const fn next_state(&self, current: CellState, walls: usize) -> CellState {
        if walls >= self.wall_threshold {
            CellState::Wall
        } else if walls < self.floor_threshold {
            CellState::Floor
        } else {
            current
        }
    }

    /// Applies one synchronous round, returning the new grid.
    #[must_use]
    pub fn apply(&self, grid: &Grid) -> Grid {
        let mut next = grid.clone();

        for row in 0..grid.height() {
            for col in 0..grid.width() {
                let walls = grid.neighbor_count(row, col, CellState::Wall, self.radius);
                let current = grid.cells()[grid.index(row, col)];
                next.put(row, col, self.next_state(current, walls));
            }
        }

        next
    }
}

impl Default for AutomatonRule {
    fn default() -> Self {
        Self::CAVE
    }
}

/// Ordered history of automaton rounds.
///
/// Step 0 is the initial noise; step `i` is the rule applied to step `i - 1`.
/// Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepSequence {
    steps: Vec<Grid>,
}

impl StepSequence {
    /// Starts a sequence from its initial grid.
    #[must_use]
    pub fn new(initial: Grid) -> Self {
        Self {
            steps: vec![initial],
        }
    }

    /// Appends the next round.
    pub(crate) fn push(&mut self, grid: Grid) {
        self.steps.push(grid);
    }

    /// Number of steps, including the initial noise.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; a sequence holds at least the initial grid.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Gets a step by index.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Grid> {
        self.steps.get(index)
    }

    /// The initial noise grid.
    #[inline]
    #[must_use]
    pub fn first(&self) -> &Grid {
        &self.steps[0]
    }

    /// The final, most settled grid.
    #[inline]
    #[must_use]
    pub fn last(&self) -> &Grid {
        &self.steps[self.steps.len() - 1]
    }

    /// Iterates over all steps in generation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Grid> {
        self.steps.iter()
    }

    /// Iterates over `(index, grid)` skipping steps identical to the one before.
    ///
    /// The sequence itself is untouched; this is for consumers that only
    /// want to show visible changes.
    pub fn distinct(&self) -> impl Iterator<Item = (usize, &Grid)> + '_ {
        self.steps
            .iter()
            .enumerate()
            .filter(|&(i, grid)| i == 0 || self.steps[i - 1] != *grid)
    }

    /// Consumes the sequence, returning the final grid.
    #[must_use]
    pub fn into_last(mut self) -> Grid {
        let last = self.steps.len() - 1;
        self.steps.swap_remove(last)
    }

    /// Consumes the sequence into its grids.
    #[must_use]
    pub fn into_vec(self) -> Vec<Grid> {
        self.steps
    }
}

impl<'a> IntoIterator for &'a StepSequence {
    type Item = &'a Grid;
    type IntoIter = std::slice::Iter<'a, Grid>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl IntoIterator for StepSequence {
    type Item = Grid;
    type IntoIter = std::vec::IntoIter<Grid>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

/// Noise fill plus a rule, run for a number of rounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellularAutomaton {
    /// Probability that a noise cell starts as wall.
    pub wall_probability: f64,
    /// Rule applied every round.
    pub rule: AutomatonRule,
}

impl CellularAutomaton {
    /// Default wall probability for the noise fill.
    pub const DEFAULT_WALL_PROBABILITY: f64 = 0.45;

    /// Creates an automaton.
    #[must_use]
    pub const fn new(wall_probability: f64, rule: AutomatonRule) -> Self {
        Self {
            wall_probability,
            rule,
        }
    }

    /// Fills `grid` with Bernoulli noise, row-major.
    pub fn fill_noise(&self, grid: &mut Grid, rng: &mut MapRng) {
        for row in 0..grid.height() {
            for col in 0..grid.width() {
                let state = if rng.next_bool(self.wall_probability) {
                    CellState::Wall
                } else {
                    CellState::Floor
                };
                grid.put(row, col, state);
            }
        }
    }

    /// Runs `iterations` rounds from `initial`, keeping every snapshot.
    #[must_use]
    pub fn run_with_steps(&self, initial: Grid, iterations: usize) -> StepSequence {
        let mut steps = StepSequence::new(initial);

        for round in 1..=iterations {
            let next = self.rule.apply(steps.last());
            tracing::trace!(round, walls = next.count(CellState::Wall), "automaton round");
            steps.push(next);
        }

        steps
    }

    /// Runs `iterations` rounds from `initial`, keeping only the result.
    ///
    /// Stops early at a fixed point.
    #[must_use]
    pub fn run(&self, initial: Grid, iterations: usize) -> Grid {
        let mut current = initial;

        for round in 1..=iterations {
            let next = self.rule.apply(&current);
            if next == current {
                tracing::trace!(round, "automaton settled early");
                return next;
            }
            current = next;
        }

        current
    }
}

impl Default for CellularAutomaton {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WALL_PROBABILITY, AutomatonRule::CAVE)
    }
}
