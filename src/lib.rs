//! Fixed-tick gameplay simulation core for a 2D side-view action game
//!
//! Every logical tick the simulation runs Think, Weapon, and Movement (with
//! collision against the level's linedefs) for each active entity, then
//! camera bookkeeping. Rendering, audio, input polling, and level-script
//! parsing are external: the window layer hands in an [`sim::InputSnapshot`]
//! per tick, the ingestion layer hands in a [`level::LevelData`] up front,
//! and the fx layer consumes the [`sim::SimEvent`]s each tick returns plus
//! the per-entity transforms and cosmetic timers.
//!
//! Everything is single-threaded and deterministic: simulation state lives
//! in an explicit [`sim::Simulation`] context (no globals), timers advance
//! in simulation seconds, and the only randomness is a seeded per-simulation
//! RNG.

pub mod config;
pub mod level;
pub mod sim;
pub mod util;

pub use config::{ConfigError, SimConfig};
pub use level::{LevelData, LevelError};
pub use sim::{EntityId, InputSnapshot, SimEvent, Simulation};
