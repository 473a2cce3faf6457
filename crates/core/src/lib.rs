//! # regsurf core
//!
//! Core types and I/O for regular surfaces: 2D property or elevation grids
//! placed on a possibly rotated rectangular lattice in map space.
//!
//! This crate provides:
//! - `SurfaceGeometry`: lattice placement and grid/map coordinate transforms
//! - `SurfaceValues`: node values with explicit undefined cells
//! - `RegularSurface`: geometry and values kept consistent together
//! - Irap classic binary and ASCII reading/writing

pub mod error;
pub mod io;
pub mod surface;

pub use error::{Error, Result};
pub use io::SurfaceFormat;
pub use surface::{BoundingBox, RegularSurface, SurfaceGeometry, SurfaceValues, YFlip};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::io::SurfaceFormat;
    pub use crate::surface::{
        AngleMode, BoundingBox, RegularSurface, SurfaceGeometry, SurfaceStatistics,
        SurfaceValues, YFlip,
    };
}
