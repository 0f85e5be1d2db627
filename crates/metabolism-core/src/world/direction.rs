//! Move directions and the configurable neighborhood they are drawn from

use crate::rng::RandomSource;
use glam::IVec2;
use serde::{Deserialize, Serialize};

/// One step to an adjacent lattice cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

impl Direction {
    /// Lattice offset of this direction
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::North => IVec2::new(0, -1),
            Direction::East => IVec2::new(1, 0),
            Direction::South => IVec2::new(0, 1),
            Direction::West => IVec2::new(-1, 0),
            Direction::NorthEast => IVec2::new(1, -1),
            Direction::SouthEast => IVec2::new(1, 1),
            Direction::SouthWest => IVec2::new(-1, 1),
            Direction::NorthWest => IVec2::new(-1, -1),
        }
    }
}

/// Which adjacent cells count as neighbors when an atom picks a move target
///
/// Each draw consumes a fixed number of random bits (2 for orthogonal, 3
/// for Moore), so the bits-to-direction mapping is reproducible per seed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Neighborhood {
    /// Four cardinal neighbors
    #[default]
    Orthogonal,
    /// Cardinal plus diagonal neighbors
    Moore,
}

const ORTHOGONAL: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

const MOORE: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

impl Neighborhood {
    /// Random bits consumed per direction draw
    pub const fn draw_bits(self) -> u32 {
        match self {
            Neighborhood::Orthogonal => 2,
            Neighborhood::Moore => 3,
        }
    }

    /// The direction set, in draw order
    pub fn directions(self) -> &'static [Direction] {
        match self {
            Neighborhood::Orthogonal => &ORTHOGONAL,
            Neighborhood::Moore => &MOORE,
        }
    }

    /// Draw a uniform direction from this neighborhood
    pub fn sample<R: RandomSource>(self, rng: &mut R) -> Direction {
        self.directions()[rng.next_bits(self.draw_bits()) as usize]
    }
}
