//! # CAVERN Procedural Generation
//!
//! Deterministic cave maps from a seed, grown by a cellular automaton.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed and dimensions always produce the same map
//! 2. **Synchronous**: Every automaton round reads only the previous grid
//! 3. **Observable**: Each intermediate round can be returned for replay
//! 4. **Connected**: Carved rooms are always mutually reachable
//!
//! ## Core Components
//!
//! - `Grid`: Dense two-state map (floor / wall)
//! - `CellularAutomaton`: Noise fill and neighbour-count rounds
//! - `RoomCarver`: Room placement and corridor carving
//! - `CaveGenerator`: The seed-to-grid facade
//! - `GenerationConfig`: TOML-loadable tunables
//!
//! ## Example
//!
//! ```rust
//! use cavern_procedural::{generate_from_seed, generate_with_rooms, CellState};
//!
//! let cave = generate_from_seed(30, 80, 12345).unwrap();
//! assert_eq!(cave, generate_from_seed(30, 80, 12345).unwrap());
//!
//! let rooms = generate_with_rooms(30, 80, 12345).unwrap();
//! assert!(rooms.count(CellState::Floor) >= cave.count(CellState::Floor));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod automaton;
pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod regions;
pub mod rooms;
pub mod seed;

pub use automaton::{AutomatonRule, CellularAutomaton, StepSequence};
pub use config::{CleanupConfig, GenerationConfig, DEFAULT_ITERATIONS};
pub use error::{GenerationError, GenerationResult};
pub use generator::{
    generate_final, generate_from_seed, generate_from_seed_with_steps, generate_with_rooms,
    CaveGenerator, RoomCarving,
};
pub use grid::{CellState, Grid};
pub use regions::{connect_regions, find_regions, largest_region, prune_regions, reachable_from, Region};
pub use rooms::{PlacementStatus, Room, RoomCarver, RoomConfig, RoomLayout};
pub use seed::{MapRng, MapSeed};
