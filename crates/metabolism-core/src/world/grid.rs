//! The lattice: a flat arena of atom slots with toroidal wraparound
//!
//! Three same-sized buffers, all addressed by `index = y * width + x`:
//! the cells themselves, the per-pass `claimed` markers, and the
//! `positions` permutation that fixes processing order for a pass.

use crate::rng::RandomSource;
use crate::world::Direction;
use glam::IVec2;
use metabolism_chemistry::ElementKey;

/// One atom occupying exactly one lattice cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Atom {
    pub element: ElementKey,
}

/// Toroidal 2-D grid of cell slots, each empty or holding one atom
pub struct World {
    width: i32,
    height: i32,
    cells: Vec<Option<Atom>>,
    /// Per-pass markers preventing a cell from being processed twice in
    /// the same pass. Fully cleared at the start of each pass.
    claimed: Vec<bool>,
    /// Permutation of all cell indices; fixes the processing order of a
    /// pass. Row-major until shuffled.
    positions: Vec<u32>,
}

impl World {
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "world dimensions must be positive");
        let size = (width * height) as usize;
        Self {
            width,
            height,
            cells: vec![None; size],
            claimed: vec![false; size],
            positions: (0..size as u32).collect(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Canonical coordinates of `pos`, wrapped into `[0, width) x [0, height)`.
    /// The single place toroidal topology is implemented; every neighbor
    /// computation routes through here.
    pub fn wrap(&self, pos: IVec2) -> IVec2 {
        IVec2::new(pos.x.rem_euclid(self.width), pos.y.rem_euclid(self.height))
    }

    /// Flat index of `pos` after toroidal wrap
    pub fn index(&self, pos: IVec2) -> usize {
        let wrapped = self.wrap(pos);
        (wrapped.y * self.width + wrapped.x) as usize
    }

    /// Coordinates of a flat cell index
    pub fn coords(&self, index: u32) -> IVec2 {
        let index = index as i32;
        IVec2::new(index % self.width, index / self.width)
    }

    /// Wrapped coordinate of the cell adjacent to `pos` in `direction`
    pub fn neighbor(&self, pos: IVec2, direction: Direction) -> IVec2 {
        self.wrap(pos + direction.offset())
    }

    pub fn atom(&self, pos: IVec2) -> Option<Atom> {
        self.cells[self.index(pos)]
    }

    /// Element key of the atom at `pos`, or `None` for an empty cell
    pub fn element_at(&self, pos: IVec2) -> Option<ElementKey> {
        self.atom(pos).map(|atom| atom.element)
    }

    /// Put an atom into an empty cell (initial placement / reaction product)
    pub fn place(&mut self, pos: IVec2, element: ElementKey) {
        let index = self.index(pos);
        debug_assert!(self.cells[index].is_none(), "cell already occupied");
        self.cells[index] = Some(Atom { element });
    }

    /// Reassign the element of the atom at `pos`
    pub fn set_element(&mut self, pos: IVec2, element: ElementKey) {
        let index = self.index(pos);
        let atom = self.cells[index].as_mut().expect("no atom to reassign");
        atom.element = element;
    }

    /// Empty the cell at `pos`, returning the atom that occupied it
    pub fn clear_cell(&mut self, pos: IVec2) -> Option<Atom> {
        let index = self.index(pos);
        self.cells[index].take()
    }

    /// Exchange the occupants (including empties) of two cells in O(1)
    pub fn swap(&mut self, a: IVec2, b: IVec2) {
        let ia = self.index(a);
        let ib = self.index(b);
        self.cells.swap(ia, ib);
    }

    pub fn claim(&mut self, pos: IVec2) {
        let index = self.index(pos);
        self.claimed[index] = true;
    }

    pub fn is_claimed(&self, pos: IVec2) -> bool {
        self.claimed[self.index(pos)]
    }

    /// Reset all per-pass markers; called at the start of each pass
    pub fn clear_claims(&mut self) {
        self.claimed.fill(false);
    }

    /// Number of cells claimed so far this pass
    pub fn claimed_count(&self) -> usize {
        self.claimed.iter().filter(|&&claimed| claimed).count()
    }

    /// Cell index processed at `slot` in the current pass order
    pub fn position_at(&self, slot: usize) -> u32 {
        self.positions[slot]
    }

    /// Shuffle the processing order in place: for `i` descending from
    /// `N-1` to `1`, swap `positions[i]` with a partner drawn uniformly
    /// from `[i, N)`. Changes only the order of consideration, never which
    /// atoms exist.
    pub fn shuffle_positions<R: RandomSource>(&mut self, rng: &mut R) {
        let n = self.positions.len();
        for i in (1..n).rev() {
            let partner = i + rng.next_in_range((n - i) as u32) as usize;
            self.positions.swap(i, partner);
        }
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// Read-only snapshot of the grid: per-cell element key, row-major.
    /// For rendering and diagnostics; nothing writes back through it.
    pub fn snapshot(&self) -> Vec<Option<ElementKey>> {
        self.cells
            .iter()
            .map(|cell| cell.map(|atom| atom.element))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::BufferedRng;

    #[test]
    fn test_index_wraps_toroidally() {
        let world = World::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                let pos = IVec2::new(x, y);
                assert_eq!(world.index(pos + IVec2::new(4, 0)), world.index(pos));
                assert_eq!(world.index(pos + IVec2::new(0, 3)), world.index(pos));
                assert_eq!(world.index(pos - IVec2::new(8, 6)), world.index(pos));
            }
        }
    }

    #[test]
    fn test_index_wraps_negative_offsets() {
        let world = World::new(4, 4);
        assert_eq!(world.index(IVec2::new(-1, 0)), world.index(IVec2::new(3, 0)));
        assert_eq!(world.index(IVec2::new(0, -1)), world.index(IVec2::new(0, 3)));
        assert_eq!(world.index(IVec2::new(-5, -5)), world.index(IVec2::new(3, 3)));
    }

    #[test]
    fn test_coords_inverts_index() {
        let world = World::new(5, 7);
        for index in 0..world.cell_count() as u32 {
            assert_eq!(world.index(world.coords(index)), index as usize);
        }
    }

    #[test]
    fn test_neighbor_wraps_at_edges() {
        let world = World::new(4, 4);
        assert_eq!(
            world.neighbor(IVec2::new(0, 0), Direction::West),
            IVec2::new(3, 0)
        );
        assert_eq!(
            world.neighbor(IVec2::new(0, 0), Direction::North),
            IVec2::new(0, 3)
        );
        assert_eq!(
            world.neighbor(IVec2::new(3, 3), Direction::SouthEast),
            IVec2::new(0, 0)
        );
    }

    #[test]
    fn test_neighbor_degenerate_dimension() {
        // In a 1-wide world, east and west wrap back to the same cell
        let world = World::new(1, 4);
        assert_eq!(
            world.neighbor(IVec2::new(0, 2), Direction::East),
            IVec2::new(0, 2)
        );
    }

    #[test]
    fn test_place_and_swap() {
        let mut world = World::new(3, 3);
        world.place(IVec2::new(0, 0), 1);

        world.swap(IVec2::new(0, 0), IVec2::new(2, 2));
        assert_eq!(world.element_at(IVec2::new(0, 0)), None);
        assert_eq!(world.element_at(IVec2::new(2, 2)), Some(1));

        // Swapping two empties is a no-op
        world.swap(IVec2::new(0, 0), IVec2::new(1, 1));
        assert_eq!(world.empty_count(), 8);
    }

    #[test]
    fn test_set_and_clear_cell() {
        let mut world = World::new(2, 2);
        world.place(IVec2::new(1, 1), 0);
        world.set_element(IVec2::new(1, 1), 5);
        assert_eq!(world.element_at(IVec2::new(1, 1)), Some(5));

        let atom = world.clear_cell(IVec2::new(1, 1)).unwrap();
        assert_eq!(atom.element, 5);
        assert_eq!(world.empty_count(), 4);
    }

    #[test]
    fn test_claims_reset() {
        let mut world = World::new(2, 2);
        world.claim(IVec2::new(0, 0));
        world.claim(IVec2::new(1, 1));
        assert!(world.is_claimed(IVec2::new(0, 0)));
        assert_eq!(world.claimed_count(), 2);

        world.clear_claims();
        assert_eq!(world.claimed_count(), 0);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut world = World::new(8, 8);
        let mut rng = BufferedRng::new(23);
        world.shuffle_positions(&mut rng);

        let mut seen: Vec<u32> = (0..world.cell_count())
            .map(|slot| world.position_at(slot))
            .collect();
        seen.sort_unstable();
        let expected: Vec<u32> = (0..world.cell_count() as u32).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_shuffle_deterministic_for_seed() {
        let mut first = World::new(6, 6);
        let mut second = World::new(6, 6);
        first.shuffle_positions(&mut BufferedRng::new(31));
        second.shuffle_positions(&mut BufferedRng::new(31));

        for slot in 0..first.cell_count() {
            assert_eq!(first.position_at(slot), second.position_at(slot));
        }
    }
}
