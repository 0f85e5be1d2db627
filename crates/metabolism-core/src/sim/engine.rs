//! The engine state machine
//!
//! `Sim` owns the registries, world, RNG, and census recorder, and walks
//! `Uninitialized -> Ready -> Running -> Finished`. The host drives it:
//! `initialize()` once, `iterate()` until it returns false, `finalize()`
//! once. Each `iterate()` performs exactly one diffusion/reaction pass and
//! always runs to completion; pause/resume is the host not calling again.

use crate::error::SimError;
use crate::rng::{BufferedRng, RandomSource};
use crate::sim::census::CensusRecorder;
use crate::sim::config::SimConfig;
use crate::sim::stats::CountingStats;
use crate::sim::step::{DiffusionSystem, PassOptions};
use crate::world::World;
use glam::IVec2;
use metabolism_chemistry::{PeriodicTable, Reaction, ReactionTable};
use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPhase {
    Uninitialized,
    Ready,
    Running,
    Finished,
}

/// Pull-based progress snapshot for the host to render
#[derive(Clone, Copy, Debug)]
pub struct ProgressReport {
    pub iters_completed: u64,
    pub max_iters: u64,
}

impl ProgressReport {
    pub fn percent(&self) -> f64 {
        if self.max_iters == 0 {
            100.0
        } else {
            self.iters_completed as f64 / self.max_iters as f64 * 100.0
        }
    }
}

/// The simulation engine
///
/// Exclusively owns its world, RNG, and registries; single-threaded and
/// synchronous by contract. Two engines never share state, so parallel
/// seeds are just two instances.
pub struct Sim {
    config: SimConfig,
    phase: SimPhase,
    table: PeriodicTable,
    reactions: ReactionTable,
    world: Option<World>,
    rng: BufferedRng,
    census_out: Option<Box<dyn Write>>,
    census: Option<CensusRecorder>,
    iters_completed: u64,
    finalized: bool,
    stats: CountingStats,
}

impl Sim {
    pub fn new(config: SimConfig) -> Self {
        let seed = config.seed;
        Self {
            config,
            phase: SimPhase::Uninitialized,
            table: PeriodicTable::new(),
            reactions: ReactionTable::new(),
            world: None,
            rng: BufferedRng::new(seed),
            census_out: None,
            census: None,
            iters_completed: 0,
            finalized: false,
            stats: CountingStats::default(),
        }
    }

    /// Hand the engine the stream census rows are appended to. Must be set
    /// before `initialize()`; without one the engine runs censusless.
    pub fn set_census_writer(&mut self, out: Box<dyn Write>) {
        self.census_out = Some(out);
    }

    /// Load elements/reactions/placement from the configuration, seed the
    /// RNG, allocate the world, and write the initial census row.
    ///
    /// Validation is eager: a bad configuration leaves the engine
    /// untouched in `Uninitialized`.
    pub fn initialize(&mut self) -> Result<(), SimError> {
        if self.phase != SimPhase::Uninitialized {
            return Err(SimError::InvalidPhase {
                phase: self.phase,
                operation: "initialize",
            });
        }
        self.validate_config()?;

        let mut table = PeriodicTable::new();
        for spec in &self.config.elements {
            table.register(&spec.name, spec.color, spec.charge);
        }

        let mut reactions = ReactionTable::new();
        for spec in &self.config.reactions {
            let resolve = |name: &str| {
                table.key_of(name).ok_or_else(|| {
                    SimError::InvalidConfig(format!("reaction references unknown element {name:?}"))
                })
            };
            let input_a = resolve(&spec.reactants.0)?;
            let input_b = resolve(&spec.reactants.1)?;
            let output_a = spec.products.0.as_deref().map(resolve).transpose()?;
            let output_b = spec.products.1.as_deref().map(resolve).transpose()?;
            reactions.register(Reaction {
                input_a,
                input_b,
                output_a,
                output_b,
                probability: spec.probability,
            });
        }

        self.rng.reseed(self.config.seed);
        let mut world = World::new(self.config.width, self.config.height);
        Self::place_atoms(&self.config, &mut world, &mut table, &mut self.rng)?;

        if let Some(out) = self.census_out.take() {
            let mut census = CensusRecorder::new(out, self.config.census_interval);
            census.write_header(&table)?;
            census.record(0, &table)?;
            self.census = Some(census);
        }

        log::info!(
            "initialized {}x{} world: {} atoms, {} elements, {} reactions, seed {}",
            self.config.width,
            self.config.height,
            table.total_atoms(),
            table.len(),
            reactions.len(),
            self.config.seed
        );

        self.table = table;
        self.reactions = reactions;
        self.world = Some(world);
        self.phase = SimPhase::Ready;
        Ok(())
    }

    fn validate_config(&self) -> Result<(), SimError> {
        let config = &self.config;
        if config.width <= 0 || config.height <= 0 {
            return Err(SimError::InvalidConfig(format!(
                "world dimensions must be positive, got {}x{}",
                config.width, config.height
            )));
        }
        if config.max_iters == 0 {
            return Err(SimError::InvalidConfig("max_iters must be at least 1".into()));
        }
        if config.census_interval == 0 {
            return Err(SimError::InvalidConfig("census_interval must be at least 1".into()));
        }
        for spec in &config.reactions {
            if !(0.0..=1.0).contains(&spec.probability) {
                return Err(SimError::InvalidConfig(format!(
                    "reaction ({}, {}) probability {} outside [0, 1]",
                    spec.reactants.0, spec.reactants.1, spec.probability
                )));
            }
        }
        let cells = (config.width as usize) * (config.height as usize);
        if config.total_atoms() > cells {
            return Err(SimError::InvalidConfig(format!(
                "{} atoms placed in a world of {} cells",
                config.total_atoms(),
                cells
            )));
        }
        Ok(())
    }

    /// Explicit positions first (validated against collisions), then the
    /// randomly placed counts in spec order, so a given seed always yields
    /// the same initial lattice.
    fn place_atoms(
        config: &SimConfig,
        world: &mut World,
        table: &mut PeriodicTable,
        rng: &mut BufferedRng,
    ) -> Result<(), SimError> {
        for spec in &config.placement {
            let element = table.key_of(&spec.element).ok_or_else(|| {
                SimError::InvalidConfig(format!("placement references unknown element {:?}", spec.element))
            })?;
            for &(x, y) in &spec.positions {
                let pos = world.wrap(IVec2::new(x, y));
                if world.element_at(pos).is_some() {
                    return Err(SimError::InvalidConfig(format!(
                        "cell ({}, {}) assigned twice in explicit placement",
                        pos.x, pos.y
                    )));
                }
                world.place(pos, element);
                table.add_atom(element);
            }
        }

        let cell_count = world.cell_count() as u32;
        for spec in &config.placement {
            let element = table.key_of(&spec.element).expect("validated above");
            for _ in 0..spec.count {
                // Rejection sampling over the whole lattice; capacity was
                // validated so an empty cell always exists.
                let pos = loop {
                    let index = rng.next_in_range(cell_count);
                    let pos = world.coords(index);
                    if world.element_at(pos).is_none() {
                        break pos;
                    }
                };
                world.place(pos, element);
                table.add_atom(element);
            }
        }
        Ok(())
    }

    /// Perform exactly one diffusion/reaction pass. Returns `Ok(true)`
    /// while iterations remain, `Ok(false)` on the call that reaches the
    /// configured cap.
    pub fn iterate(&mut self) -> Result<bool, SimError> {
        match self.phase {
            SimPhase::Ready => self.phase = SimPhase::Running,
            SimPhase::Running => {}
            _ => {
                return Err(SimError::InvalidPhase {
                    phase: self.phase,
                    operation: "iterate",
                })
            }
        }

        let world = self.world.as_mut().expect("world exists while Ready/Running");
        let options = PassOptions {
            shuffle: self.config.shuffle,
            reactions_enabled: self.config.reactions_enabled,
            neighborhood: self.config.neighborhood,
        };
        DiffusionSystem::run_pass(
            world,
            &mut self.table,
            &self.reactions,
            options,
            &mut self.rng,
            &mut self.stats,
        );
        self.iters_completed += 1;

        if let Some(census) = &mut self.census {
            census.record_if_due(self.iters_completed, &self.table)?;
        }

        if self.iters_completed >= self.config.max_iters {
            self.phase = SimPhase::Finished;
            log::info!(
                "finished after {} iterations: {} moves, {} reactions",
                self.iters_completed,
                self.stats.moves,
                self.stats.reactions
            );
            Ok(false)
        } else {
            Ok(true)
        }
    }

    /// Flush residual state once the iteration cap is reached: final
    /// census row, then release the lattice. Valid exactly once, in
    /// `Finished`.
    pub fn finalize(&mut self) -> Result<(), SimError> {
        if self.phase != SimPhase::Finished || self.finalized {
            return Err(SimError::InvalidPhase {
                phase: self.phase,
                operation: "finalize",
            });
        }
        if let Some(census) = &mut self.census {
            census.finish(self.iters_completed, &self.table)?;
        }
        self.world = None;
        self.finalized = true;
        log::debug!("finalized; lattice released");
        Ok(())
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn iters_completed(&self) -> u64 {
        self.iters_completed
    }

    pub fn max_iters(&self) -> u64 {
        self.config.max_iters
    }

    /// Completed fraction in `[0, 1]`
    pub fn progress(&self) -> f64 {
        self.iters_completed as f64 / self.config.max_iters as f64
    }

    /// Snapshot for the host's progress rendering
    pub fn force_progress_report(&self) -> ProgressReport {
        ProgressReport {
            iters_completed: self.iters_completed,
            max_iters: self.config.max_iters,
        }
    }

    /// Read-only view of the lattice; `None` once finalized
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn periodic_table(&self) -> &PeriodicTable {
        &self.table
    }

    pub fn reaction_table(&self) -> &ReactionTable {
        &self.reactions
    }

    pub fn stats(&self) -> &CountingStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::config::{ElementSpec, PlacementSpec};

    fn tiny_config() -> SimConfig {
        SimConfig {
            width: 4,
            height: 4,
            max_iters: 5,
            seed: 1,
            reactions_enabled: false,
            shuffle: false,
            census_interval: 1,
            elements: vec![ElementSpec {
                name: "A".into(),
                color: 0xff0000,
                charge: 0,
            }],
            reactions: Vec::new(),
            placement: vec![PlacementSpec {
                element: "A".into(),
                count: 1,
                positions: Vec::new(),
            }],
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_phase_walk() {
        let mut sim = Sim::new(tiny_config());
        assert_eq!(sim.phase(), SimPhase::Uninitialized);

        sim.initialize().unwrap();
        assert_eq!(sim.phase(), SimPhase::Ready);

        assert!(sim.iterate().unwrap());
        assert_eq!(sim.phase(), SimPhase::Running);

        while sim.iterate().unwrap() {}
        assert_eq!(sim.phase(), SimPhase::Finished);

        sim.finalize().unwrap();
        assert!(sim.world().is_none());
    }

    #[test]
    fn test_iterate_before_initialize_rejected() {
        let mut sim = Sim::new(tiny_config());
        assert!(matches!(
            sim.iterate(),
            Err(SimError::InvalidPhase { operation: "iterate", .. })
        ));
    }

    #[test]
    fn test_double_initialize_rejected() {
        let mut sim = Sim::new(tiny_config());
        sim.initialize().unwrap();
        assert!(matches!(
            sim.initialize(),
            Err(SimError::InvalidPhase { operation: "initialize", .. })
        ));
    }

    #[test]
    fn test_finalize_requires_finished() {
        let mut sim = Sim::new(tiny_config());
        sim.initialize().unwrap();
        assert!(matches!(
            sim.finalize(),
            Err(SimError::InvalidPhase { operation: "finalize", .. })
        ));
    }

    #[test]
    fn test_double_finalize_rejected() {
        let mut sim = Sim::new(tiny_config());
        sim.initialize().unwrap();
        while sim.iterate().unwrap() {}
        sim.finalize().unwrap();
        assert!(matches!(
            sim.finalize(),
            Err(SimError::InvalidPhase { operation: "finalize", .. })
        ));
    }

    #[test]
    fn test_iterate_after_finished_rejected() {
        let mut sim = Sim::new(tiny_config());
        sim.initialize().unwrap();
        while sim.iterate().unwrap() {}
        assert!(sim.iterate().is_err());
    }

    #[test]
    fn test_bad_dimensions_rejected() {
        let config = SimConfig {
            width: 0,
            ..tiny_config()
        };
        assert!(matches!(
            Sim::new(config).initialize(),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_over_capacity_placement_rejected() {
        let mut config = tiny_config();
        config.placement[0].count = 17;
        assert!(matches!(
            Sim::new(config).initialize(),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unknown_reaction_element_rejected() {
        let mut config = tiny_config();
        config.reactions.push(crate::sim::config::ReactionSpec {
            reactants: ("A".into(), "missing".into()),
            products: (None, None),
            probability: 1.0,
        });
        assert!(matches!(
            Sim::new(config).initialize(),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let mut config = tiny_config();
        config.reactions.push(crate::sim::config::ReactionSpec {
            reactants: ("A".into(), "A".into()),
            products: (None, None),
            probability: 1.5,
        });
        assert!(matches!(
            Sim::new(config).initialize(),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_explicit_placement_collision_rejected() {
        let mut config = tiny_config();
        // (1, 1) and (5, 5) wrap to the same cell in a 4x4 world
        config.placement[0].count = 0;
        config.placement[0].positions = vec![(1, 1), (5, 5)];
        assert!(matches!(
            Sim::new(config).initialize(),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_progress_accessors() {
        let mut sim = Sim::new(tiny_config());
        sim.initialize().unwrap();
        sim.iterate().unwrap();
        sim.iterate().unwrap();

        assert_eq!(sim.iters_completed(), 2);
        assert_eq!(sim.max_iters(), 5);
        let report = sim.force_progress_report();
        assert_eq!(report.iters_completed, 2);
        assert!((sim.progress() - 0.4).abs() < 1e-12);
        assert!((report.percent() - 40.0).abs() < 1e-12);
    }
}
