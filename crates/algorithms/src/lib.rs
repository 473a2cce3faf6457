//! # regsurf algorithms
//!
//! Spatial queries and derived surfaces for regsurf.
//!
//! ## Available Algorithm Categories
//!
//! - **sampling**: bilinear value lookup, fence sampling, resampling
//! - **transform**: unrotation onto an axis-aligned lattice
//! - **fields**: distance-from-point fields
//! - **compare**: similarity index between surfaces
//!
//! Lookups never extrapolate: positions outside a surface, or next to an
//! undefined node, give `None`.

pub mod compare;
pub mod fields;
pub mod sampling;
pub mod transform;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::compare::similarity_index;
    pub use crate::fields::{distance_from_point, DistanceParams};
    pub use crate::sampling::{
        densify_fence, resample, resample_to, sample_fence, value_at, value_at_index, FencePoint,
    };
    pub use crate::transform::{unrotate, UnrotateParams};
    pub use regsurf_core::prelude::*;
}
