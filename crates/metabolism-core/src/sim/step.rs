//! The per-iteration diffusion/reaction pass
//!
//! One pass visits every cell once in the current processing order. Each
//! atom attempts a single random-direction move; contacts resolve through
//! the reaction table. The `claimed` markers are the correctness invariant:
//! within one pass no cell is used as the source or target of more than one
//! move/reaction resolution, so an atom never moves more than one lattice
//! unit per iteration and a contact never fires twice.

use crate::rng::RandomSource;
use crate::sim::stats::SimStats;
use crate::world::{Neighborhood, World};
use metabolism_chemistry::{ElementKey, PeriodicTable, ReactionTable};

/// Per-pass switches, resolved from the engine configuration
#[derive(Clone, Copy, Debug)]
pub struct PassOptions {
    pub shuffle: bool,
    pub reactions_enabled: bool,
    pub neighborhood: Neighborhood,
}

/// The diffusion/reaction step - stateless, operates on the engine's world
pub struct DiffusionSystem;

impl DiffusionSystem {
    /// Run one full pass over the lattice
    pub fn run_pass<R: RandomSource>(
        world: &mut World,
        table: &mut PeriodicTable,
        reactions: &ReactionTable,
        options: PassOptions,
        rng: &mut R,
        stats: &mut dyn SimStats,
    ) {
        world.clear_claims();
        if options.shuffle {
            world.shuffle_positions(rng);
        }

        for slot in 0..world.cell_count() {
            let pos = world.coords(world.position_at(slot));
            if world.is_claimed(pos) {
                continue;
            }
            let Some(source) = world.element_at(pos) else {
                continue;
            };

            let direction = options.neighborhood.sample(rng);
            let target = world.neighbor(pos, direction);

            // Degenerate dimension can wrap a neighbor back onto its own
            // cell; treat as a no-op move.
            if target == pos {
                world.claim(pos);
                continue;
            }

            // The target was already resolved this pass; the atom fails to
            // move (dense-region rule).
            if world.is_claimed(target) {
                world.claim(pos);
                continue;
            }

            match world.element_at(target) {
                None => {
                    world.swap(pos, target);
                    world.claim(pos);
                    world.claim(target);
                    stats.record_move();
                }
                Some(other) => {
                    let fired = options.reactions_enabled
                        && Self::try_react(world, table, reactions, rng, pos, source, target, other);
                    if fired {
                        stats.record_reaction();
                    } else {
                        stats.record_inert_contact();
                    }
                    // Claim both sides either way so this contact is not
                    // reprocessed from the other side.
                    world.claim(pos);
                    world.claim(target);
                }
            }
        }
    }

    /// Resolve a contact through the reaction table. Returns whether a
    /// reaction fired.
    #[allow(clippy::too_many_arguments)]
    fn try_react<R: RandomSource>(
        world: &mut World,
        table: &mut PeriodicTable,
        reactions: &ReactionTable,
        rng: &mut R,
        pos: glam::IVec2,
        source: ElementKey,
        target: glam::IVec2,
        other: ElementKey,
    ) -> bool {
        let Some(reaction) = reactions.find(source, other) else {
            return false;
        };
        if !rng.check_probability(reaction.probability) {
            return false;
        }

        let (out_source, out_other) = ReactionTable::outputs_for(reaction, source, other);
        Self::apply_product(world, table, pos, source, out_source);
        Self::apply_product(world, table, target, other, out_other);
        true
    }

    /// Apply one slot of a fired reaction, keeping element counts in step
    /// with the lattice
    fn apply_product(
        world: &mut World,
        table: &mut PeriodicTable,
        pos: glam::IVec2,
        current: ElementKey,
        product: Option<ElementKey>,
    ) {
        match product {
            Some(element) if element == current => {}
            Some(element) => {
                world.set_element(pos, element);
                table.remove_atom(current);
                table.add_atom(element);
            }
            None => {
                world.clear_cell(pos);
                table.remove_atom(current);
            }
        }
    }
}
