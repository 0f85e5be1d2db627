//! Element definitions and the periodic table registry

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key assigned to an element at registration. Stable for the lifetime of
/// the table and used as the fast index into it and into reaction pair keys.
pub type ElementKey = u16;

/// A registered chemical species
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Element {
    pub key: ElementKey,
    pub name: String,

    /// Display color, integer-encoded (0xRRGGBB). Opaque to the engine.
    pub color: u32,
    /// Net charge of the species
    pub charge: i32,

    /// Live atom population for this element. Maintained incrementally by
    /// the world as atoms are placed, transformed, and annihilated.
    pub count: usize,
}

/// Registry of all elements, keyed by name at registration time and by
/// `ElementKey` for lookups on the hot path.
pub struct PeriodicTable {
    elements: Vec<Element>,
    by_name: HashMap<String, ElementKey>,
}

impl PeriodicTable {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register an element by name, assigning the next unused key.
    ///
    /// A duplicate name overwrites the previous definition in place and
    /// keeps its key, so reactions registered against the old definition
    /// stay valid. Last registration wins.
    pub fn register(&mut self, name: &str, color: u32, charge: i32) -> ElementKey {
        if let Some(&key) = self.by_name.get(name) {
            log::warn!("element {name:?} registered twice; last definition wins");
            let element = &mut self.elements[key as usize];
            element.color = color;
            element.charge = charge;
            return key;
        }

        let key = self.elements.len() as ElementKey;
        self.elements.push(Element {
            key,
            name: name.to_string(),
            color,
            charge,
            count: 0,
        });
        self.by_name.insert(name.to_string(), key);
        key
    }

    pub fn get(&self, key: ElementKey) -> Option<&Element> {
        self.elements.get(key as usize)
    }

    pub fn lookup(&self, name: &str) -> Option<&Element> {
        self.by_name.get(name).map(|&key| &self.elements[key as usize])
    }

    pub fn key_of(&self, name: &str) -> Option<ElementKey> {
        self.by_name.get(name).copied()
    }

    /// Elements in key order (the stable order census rows use)
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Record one atom created with this element
    pub fn add_atom(&mut self, key: ElementKey) {
        self.elements[key as usize].count += 1;
    }

    /// Record one atom destroyed or transformed away from this element
    pub fn remove_atom(&mut self, key: ElementKey) {
        let element = &mut self.elements[key as usize];
        assert!(element.count > 0, "count underflow for element {}", element.name);
        element.count -= 1;
    }

    /// Per-element populations in key order
    pub fn counts(&self) -> Vec<usize> {
        self.elements.iter().map(|e| e.count).collect()
    }

    /// Total live atoms across all elements
    pub fn total_atoms(&self) -> usize {
        self.elements.iter().map(|e| e.count).sum()
    }

    /// Redefine the display color of a species variant. Identity (key, name)
    /// is immutable after registration; only display attributes may change.
    pub fn set_color(&mut self, key: ElementKey, color: u32) {
        self.elements[key as usize].color = color;
    }

    /// Redefine the charge of a species variant
    pub fn set_charge(&mut self, key: ElementKey, charge: i32) {
        self.elements[key as usize].charge = charge;
    }
}

impl Default for PeriodicTable {
    fn default() -> Self {
        Self::new()
    }
}
