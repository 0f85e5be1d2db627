//! Scenario loading and option resolution
//!
//! A scenario file is the RON serialization of the engine's `SimConfig`.
//! Resolution happens in two layers: load the scenario (or the built-in
//! demo), then let command-line flags override individual values.

use crate::options::Options;
use anyhow::{Context, Result};
use metabolism_core::{ElementSpec, PlacementSpec, ReactionSpec, SimConfig};
use std::fs;
use std::path::Path;

/// Resolve the engine configuration from the scenario file and flags
pub fn resolve(options: &Options) -> Result<SimConfig> {
    let mut config = match &options.load {
        Some(path) => parse(
            &fs::read_to_string(path)
                .with_context(|| format!("reading scenario {}", path.display()))?,
        )
        .with_context(|| format!("parsing scenario {}", path.display()))?,
        None => demo_scenario(),
    };
    apply_overrides(&mut config, options)?;
    Ok(config)
}

fn parse(text: &str) -> Result<SimConfig> {
    Ok(ron::from_str(text)?)
}

fn apply_overrides(config: &mut SimConfig, options: &Options) -> Result<()> {
    if let Some(width) = options.width {
        config.width = width;
    }
    if let Some(height) = options.height {
        config.height = height;
    }
    if let Some(iters) = options.iters {
        config.max_iters = iters;
    }
    if let Some(seed) = options.seed {
        config.seed = seed;
    }
    if let Some(interval) = options.census_interval {
        config.census_interval = interval;
    }
    if let Some(enabled) = options.rxns_override() {
        config.reactions_enabled = enabled;
    }
    if let Some(shuffle) = options.shuffle_override() {
        config.shuffle = shuffle;
    }
    if let Some(total) = options.atoms {
        distribute_atoms(config, total)?;
    }
    Ok(())
}

/// Spread a requested atom total evenly over the scenario's count-based
/// placements, leaving explicit positions untouched
fn distribute_atoms(config: &mut SimConfig, total: usize) -> Result<()> {
    let mut counted: Vec<&mut PlacementSpec> = config
        .placement
        .iter_mut()
        .filter(|spec| spec.positions.is_empty())
        .collect();
    anyhow::ensure!(
        !counted.is_empty(),
        "--atoms needs a scenario with count-based placement, but this one places every atom explicitly"
    );
    let share = total / counted.len();
    let extra = total % counted.len();
    for (slot, spec) in counted.iter_mut().enumerate() {
        spec.count = share + usize::from(slot < extra);
    }
    Ok(())
}

/// Echo the fully-resolved configuration, as a scenario that reproduces
/// the run
pub fn echo(config: &SimConfig, path: &Path) -> Result<()> {
    let text = ron::ser::to_string_pretty(config, ron::ser::PrettyConfig::default())
        .context("serializing resolved configuration")?;
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    log::debug!("configuration echoed to {}", path.display());
    Ok(())
}

/// Built-in two-species demo used when no scenario is loaded: A and B
/// diffuse and slowly fuse into C. Seeded from the system time so ad-hoc
/// runs differ unless `--seed` pins them.
fn demo_scenario() -> SimConfig {
    SimConfig {
        seed: time_seed(),
        elements: vec![
            ElementSpec {
                name: "A".into(),
                color: 0xe63946,
                charge: 0,
            },
            ElementSpec {
                name: "B".into(),
                color: 0x457b9d,
                charge: 0,
            },
            ElementSpec {
                name: "C".into(),
                color: 0x2a9d8f,
                charge: 0,
            },
        ],
        reactions: vec![ReactionSpec {
            reactants: ("A".into(), "B".into()),
            products: (Some("C".into()), None),
            probability: 0.1,
        }],
        placement: vec![
            PlacementSpec {
                element: "A".into(),
                count: 32,
                positions: Vec::new(),
            },
            PlacementSpec {
                element: "B".into(),
                count: 32,
                positions: Vec::new(),
            },
        ],
        ..SimConfig::default()
    }
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
