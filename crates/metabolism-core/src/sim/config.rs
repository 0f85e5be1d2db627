//! Engine configuration
//!
//! The host (CLI, scenario file, or test) resolves all of this before the
//! engine is initialized; `Sim::initialize` validates it eagerly and never
//! starts on a bad config.

use crate::world::Neighborhood;
use serde::{Deserialize, Serialize};

/// A chemical species definition to register at initialization
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElementSpec {
    pub name: String,
    /// Display color, integer-encoded (0xRRGGBB)
    pub color: u32,
    #[serde(default)]
    pub charge: i32,
}

/// A reaction rule, by element name. `None` in a product slot annihilates
/// that reactant, leaving its cell empty.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReactionSpec {
    pub reactants: (String, String),
    pub products: (Option<String>, Option<String>),
    pub probability: f64,
}

/// Initial placement for one element: a number of atoms dropped on random
/// empty cells, explicit positions, or both
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlacementSpec {
    pub element: String,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub positions: Vec<(i32, i32)>,
}

/// Everything `Sim::initialize` needs to build a runnable world
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimConfig {
    pub width: i32,
    pub height: i32,
    pub max_iters: u64,
    pub seed: u64,
    pub reactions_enabled: bool,
    pub shuffle: bool,
    #[serde(default)]
    pub neighborhood: Neighborhood,
    /// Record a census row every this many completed iterations
    pub census_interval: u64,
    pub elements: Vec<ElementSpec>,
    pub reactions: Vec<ReactionSpec>,
    pub placement: Vec<PlacementSpec>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
            max_iters: 100_000,
            seed: 42,
            reactions_enabled: true,
            shuffle: false,
            neighborhood: Neighborhood::Orthogonal,
            census_interval: 1000,
            elements: Vec::new(),
            reactions: Vec::new(),
            placement: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Total atoms the placement will create
    pub fn total_atoms(&self) -> usize {
        self.placement
            .iter()
            .map(|spec| spec.count + spec.positions.len())
            .sum()
    }
}
