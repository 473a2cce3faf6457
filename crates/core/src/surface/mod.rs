//! Regular surface data structures

mod angle;
mod geometry;
mod regular;
mod values;

pub use angle::{convert_angle, normalize_degrees, AngleMode};
pub use geometry::{BoundingBox, SurfaceGeometry, YFlip};
pub use regular::RegularSurface;
pub use values::{SurfaceStatistics, SurfaceValues};
