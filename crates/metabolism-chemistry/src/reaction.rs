//! Chemical reaction rules and the pair-keyed reaction table
//!
//! A reaction fires when two atoms of its reactant pair collide during a
//! diffusion pass. Lookup is symmetric: the colliding pair (A, B) finds the
//! same rule as (B, A), and the rule's outputs are oriented to the caller's
//! argument order before being applied.

use crate::element::ElementKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Symmetric encoding of an unordered element pair into a single table key.
/// The smaller key lands in the high half so (A, B) and (B, A) collapse to
/// the same entry.
pub fn pair_key(a: ElementKey, b: ElementKey) -> u32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    (u32::from(lo) << 16) | u32::from(hi)
}

/// A transformation rule for one unordered pair of colliding elements
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reaction {
    // Reactant slots as registered (lookup itself is order-insensitive)
    pub input_a: ElementKey,
    pub input_b: ElementKey,

    /// What each reactant slot becomes when the reaction fires.
    /// `Some(key)` assigns that element (possibly the unchanged input);
    /// `None` annihilates the slot, leaving its cell empty.
    pub output_a: Option<ElementKey>,
    pub output_b: Option<ElementKey>,

    /// Probability of firing on contact (0.0 - 1.0)
    pub probability: f64,
}

impl Reaction {
    /// Table key for this rule's reactant pair
    pub fn key(&self) -> u32 {
        pair_key(self.input_a, self.input_b)
    }
}

/// Registry of reaction rules with O(1) lookup by unordered reactant pair.
/// At most one rule per pair; a duplicate registration overwrites.
pub struct ReactionTable {
    reactions: HashMap<u32, Reaction>,
}

impl ReactionTable {
    pub fn new() -> Self {
        Self {
            reactions: HashMap::new(),
        }
    }

    /// Register a rule for its reactant pair. Last registration wins.
    pub fn register(&mut self, reaction: Reaction) {
        let key = reaction.key();
        if self.reactions.insert(key, reaction).is_some() {
            log::warn!("reaction pair key {key:#x} registered twice; last definition wins");
        }
    }

    /// Symmetric lookup: `find(a, b)` and `find(b, a)` return the same rule
    pub fn find(&self, a: ElementKey, b: ElementKey) -> Option<&Reaction> {
        self.reactions.get(&pair_key(a, b))
    }

    /// Orient a rule's outputs to the caller's argument order.
    ///
    /// Returns `(output_for_a, output_for_b)` where `a` and `b` are the
    /// element keys the caller observed in its own slot order.
    pub fn outputs_for(
        reaction: &Reaction,
        a: ElementKey,
        b: ElementKey,
    ) -> (Option<ElementKey>, Option<ElementKey>) {
        if reaction.input_a == a && reaction.input_b == b {
            (reaction.output_a, reaction.output_b)
        } else {
            (reaction.output_b, reaction.output_a)
        }
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    /// All registered rules, in unspecified order (diagnostics only)
    pub fn reactions(&self) -> impl Iterator<Item = &Reaction> {
        self.reactions.values()
    }
}

impl Default for ReactionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(a: ElementKey, b: ElementKey, out_a: Option<ElementKey>, out_b: Option<ElementKey>) -> Reaction {
        Reaction {
            input_a: a,
            input_b: b,
            output_a: out_a,
            output_b: out_b,
            probability: 1.0,
        }
    }

    #[test]
    fn test_pair_key_symmetric() {
        assert_eq!(pair_key(2, 5), pair_key(5, 2));
        assert_eq!(pair_key(0, 0), 0);
        assert_ne!(pair_key(1, 2), pair_key(1, 3));
    }

    #[test]
    fn test_find_symmetric() {
        let mut table = ReactionTable::new();
        table.register(rule(1, 2, Some(3), Some(2)));

        let forward = table.find(1, 2).unwrap();
        let backward = table.find(2, 1).unwrap();
        assert_eq!(forward.key(), backward.key());
        assert!(table.find(1, 3).is_none());
    }

    #[test]
    fn test_outputs_oriented_to_argument_order() {
        let table = {
            let mut t = ReactionTable::new();
            t.register(rule(1, 2, Some(3), None));
            t
        };

        let reaction = table.find(1, 2).unwrap();

        // Caller saw (1, 2): outputs as registered
        assert_eq!(ReactionTable::outputs_for(reaction, 1, 2), (Some(3), None));
        // Caller saw (2, 1): outputs swapped
        assert_eq!(ReactionTable::outputs_for(reaction, 2, 1), (None, Some(3)));
    }

    #[test]
    fn test_duplicate_pair_last_wins() {
        let mut table = ReactionTable::new();
        table.register(rule(1, 2, Some(3), Some(3)));
        // Registered under the reversed slot order; same unordered pair
        table.register(rule(2, 1, None, None));

        assert_eq!(table.len(), 1);
        let reaction = table.find(1, 2).unwrap();
        assert_eq!(reaction.output_a, None);
        assert_eq!(reaction.output_b, None);
    }

    #[test]
    fn test_self_pair() {
        let mut table = ReactionTable::new();
        table.register(rule(4, 4, Some(4), None));

        let reaction = table.find(4, 4).unwrap();
        assert_eq!(ReactionTable::outputs_for(reaction, 4, 4), (Some(4), None));
    }
}
