//! Simulation engine for the metabolism simulator
//!
//! Discrete atoms of typed elements diffuse over a toroidal 2-D lattice,
//! collide, and probabilistically transform according to a reaction table.
//! The engine is a plain step function: a host calls [`Sim::initialize`]
//! once, then [`Sim::iterate`] repeatedly (one diffusion/reaction pass per
//! call), then [`Sim::finalize`]. Pausing is the host simply not calling
//! `iterate` again; the engine holds no timers or background threads.

pub mod error;
pub mod rng;
pub mod sim;
pub mod world;

pub use error::SimError;
pub use rng::{BufferedRng, RandomSource};
pub use sim::{
    CensusRecorder, CountingStats, ElementSpec, NoopStats, PassOptions, PlacementSpec,
    ProgressReport, ReactionSpec, Sim, SimConfig, SimPhase, SimStats,
};
pub use world::{Atom, Direction, Neighborhood, World};
