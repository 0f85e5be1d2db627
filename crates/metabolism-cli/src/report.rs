//! Diagnostic pretty-printers for verbose runs
//!
//! Read-only views over the engine's snapshot accessors; nothing here
//! writes back into the simulation.

use glam::IVec2;
use metabolism_chemistry::{ElementKey, PeriodicTable, ReactionTable};
use metabolism_core::World;

pub fn print_elements(table: &PeriodicTable) {
    println!("elements:");
    for element in table.elements() {
        println!(
            "  [{:3}] {:<12} color #{:06x}  charge {:+}  count {}",
            element.key, element.name, element.color, element.charge, element.count
        );
    }
}

pub fn print_reactions(reactions: &ReactionTable, table: &PeriodicTable) {
    println!("reactions:");
    if reactions.is_empty() {
        println!("  (none)");
        return;
    }
    for reaction in reactions.reactions() {
        println!(
            "  {} + {} -> {} + {}  @ {}",
            element_name(table, reaction.input_a),
            element_name(table, reaction.input_b),
            product_name(table, reaction.output_a),
            product_name(table, reaction.output_b),
            reaction.probability
        );
    }
}

/// Render the lattice one character per cell: the first letter of the
/// element's name, `.` for empty
pub fn print_world(world: &World, table: &PeriodicTable) {
    for y in 0..world.height() {
        let mut row = String::with_capacity(world.width() as usize);
        for x in 0..world.width() {
            row.push(match world.element_at(IVec2::new(x, y)) {
                Some(key) => table
                    .get(key)
                    .and_then(|element| element.name.chars().next())
                    .unwrap_or('?'),
                None => '.',
            });
        }
        println!("{row}");
    }
}

fn element_name(table: &PeriodicTable, key: ElementKey) -> &str {
    table.get(key).map(|element| element.name.as_str()).unwrap_or("?")
}

fn product_name(table: &PeriodicTable, product: Option<ElementKey>) -> &str {
    match product {
        Some(key) => element_name(table, key),
        None => "-",
    }
}
