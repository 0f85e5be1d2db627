//! The engine: configuration, the per-iteration pass, census recording,
//! and the `Sim` state machine that owns everything

mod census;
mod config;
mod engine;
mod stats;
mod step;

pub use census::CensusRecorder;
pub use config::{ElementSpec, PlacementSpec, ReactionSpec, SimConfig};
pub use engine::{ProgressReport, Sim, SimPhase};
pub use stats::{CountingStats, NoopStats, SimStats};
pub use step::{DiffusionSystem, PassOptions};
