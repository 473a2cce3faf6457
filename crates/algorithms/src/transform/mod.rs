//! Lattice transformations

mod unrotate;

pub use unrotate::{unrotate, UnrotateParams};
