//! The toroidal lattice and its neighbor arithmetic

mod direction;
mod grid;

pub use direction::{Direction, Neighborhood};
pub use grid::{Atom, World};
