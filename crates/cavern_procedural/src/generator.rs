//! # Generation Facade
//!
//! Stable entry points: seed in, grid (or step history) out.
//!
//! ## Pipeline
//!
//! ```text
//! seed ─┬─ derive(NOISE) ─> noise grid ─> automaton rounds ─> polish ─> cleanup ─┐
//!       └─ derive(ROOMS) ──────────────────────────────────────> room carving <─┘
//! ```
//!
//! Noise and rooms draw from independent streams, so the cave under a
//! room layout is the same cave `generate_from_seed` returns.
//!
//! Every call is a pure function of its arguments and the config. A
//! `CaveGenerator` holds no mutable state and can be shared across threads.

use crate::automaton::{AutomatonRule, StepSequence};
use crate::config::GenerationConfig;
use crate::error::{GenerationError, GenerationResult};
use crate::grid::{CellState, Grid};
use crate::regions::{connect_regions, prune_regions};
use crate::rooms::{RoomCarver, RoomLayout};
use crate::seed::{MapRng, MapSeed};

/// A cave with rooms, plus the layout that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomCarving {
    /// The final grid.
    pub grid: Grid,
    /// Rooms and corridors that were carved.
    pub layout: RoomLayout,
}

/// Configured cave generator.
///
/// # Example
///
/// ```rust
/// use cavern_procedural::{CaveGenerator, GenerationConfig, MapSeed};
///
/// let generator = CaveGenerator::new(GenerationConfig::default()).unwrap();
/// let steps = generator.generate_with_steps(20, 40, MapSeed::new(42), 6).unwrap();
/// assert_eq!(steps.len(), 7);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaveGenerator {
    config: GenerationConfig,
}

impl CaveGenerator {
    /// Creates a generator from a validated config.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfig`] if the config is unusable.
    pub fn new(config: GenerationConfig) -> GenerationResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generates a cave with the configured number of rounds.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidDimensions`] if either dimension is zero.
    pub fn generate(&self, height: usize, width: usize, seed: MapSeed) -> GenerationResult<Grid> {
        self.generate_final(height, width, seed, self.config.iterations)
    }

    /// Generates a cave, returning only the final state.
    ///
    /// Polish passes and cleanup run after the automaton rounds.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidDimensions`] if either dimension is zero.
    pub fn generate_final(
        &self,
        height: usize,
        width: usize,
        seed: MapSeed,
        iterations: usize,
    ) -> GenerationResult<Grid> {
        let initial = self.noise(height, width, seed)?;
        let settled = self.config.automaton().run(initial, iterations);
        let cave = self.finish(settled);

        tracing::debug!(
            height,
            width,
            seed = seed.value(),
            iterations,
            floor = cave.count(CellState::Floor),
            "cave generated"
        );
        Ok(cave)
    }

    /// Generates a cave, returning every automaton round.
    ///
    /// The result has exactly `iterations + 1` grids: the noise, then one
    /// per round. Polish and cleanup are not applied.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidDimensions`] if either dimension is zero.
    pub fn generate_with_steps(
        &self,
        height: usize,
        width: usize,
        seed: MapSeed,
        iterations: usize,
    ) -> GenerationResult<StepSequence> {
        let initial = self.noise(height, width, seed)?;
        let steps = self.config.automaton().run_with_steps(initial, iterations);

        tracing::debug!(
            height,
            width,
            seed = seed.value(),
            steps = steps.len(),
            "cave steps generated"
        );
        Ok(steps)
    }

    /// Generates a cave and carves connected rooms into it.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidDimensions`] if either dimension is
    /// zero, or [`GenerationError::ConnectivityViolation`] if corridor
    /// carving failed to join the rooms.
    pub fn carve_rooms(&self, height: usize, width: usize, seed: MapSeed) -> GenerationResult<RoomCarving> {
        let mut grid = self.generate(height, width, seed)?;
        let mut rng = MapRng::new(seed.derive(MapSeed::ROOMS));
        let layout = RoomCarver::new(self.config.rooms).carve(&mut grid, &mut rng)?;
        Ok(RoomCarving { grid, layout })
    }

    /// Generates a cave with connected rooms, returning only the grid.
    ///
    /// # Errors
    ///
    /// See [`CaveGenerator::carve_rooms`].
    pub fn generate_with_rooms(&self, height: usize, width: usize, seed: MapSeed) -> GenerationResult<Grid> {
        self.carve_rooms(height, width, seed).map(|carving| carving.grid)
    }

    /// Validates dimensions and fills the initial noise grid.
    fn noise(&self, height: usize, width: usize, seed: MapSeed) -> GenerationResult<Grid> {
        if height == 0 || width == 0 {
            return Err(GenerationError::InvalidDimensions { height, width });
        }
        let mut grid = Grid::new(height, width, CellState::Wall)?;
        let mut rng = MapRng::new(seed.derive(MapSeed::NOISE));
        self.config.automaton().fill_noise(&mut grid, &mut rng);
        Ok(grid)
    }

    /// Polish passes, then pocket pruning and connection.
    fn finish(&self, mut grid: Grid) -> Grid {
        for _ in 0..self.config.polish_passes {
            grid = AutomatonRule::POLISH.apply(&grid);
        }

        let cleanup = self.config.cleanup;
        if let Some(fraction) = cleanup.prune_fraction {
            prune_regions(&mut grid, fraction);
        }
        if cleanup.connect {
            connect_regions(&mut grid);
        }

        grid
    }
}

/// Generates a cave with the default configuration.
///
/// # Errors
///
/// Returns [`GenerationError::InvalidDimensions`] if either dimension is zero.
pub fn generate_from_seed(height: usize, width: usize, seed: u64) -> GenerationResult<Grid> {
    CaveGenerator::default().generate(height, width, MapSeed::new(seed))
}

/// Generates a cave with the default rule, returning only the state after
/// `iterations` rounds.
///
/// # Errors
///
/// Returns [`GenerationError::InvalidDimensions`] if either dimension is zero.
pub fn generate_final(height: usize, width: usize, seed: u64, iterations: usize) -> GenerationResult<Grid> {
    CaveGenerator::default().generate_final(height, width, MapSeed::new(seed), iterations)
}

/// Generates every automaton round with the default configuration.
///
/// # Errors
///
/// Returns [`GenerationError::InvalidDimensions`] if either dimension is zero.
pub fn generate_from_seed_with_steps(
    height: usize,
    width: usize,
    seed: u64,
    iterations: usize,
) -> GenerationResult<StepSequence> {
    CaveGenerator::default().generate_with_steps(height, width, MapSeed::new(seed), iterations)
}

/// Generates a cave with connected rooms using the default configuration.
///
/// # Errors
///
/// See [`CaveGenerator::carve_rooms`].
pub fn generate_with_rooms(height: usize, width: usize, seed: u64) -> GenerationResult<Grid> {
    CaveGenerator::default().generate_with_rooms(height, width, MapSeed::new(seed))
}
