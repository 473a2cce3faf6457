//! Point, polyline and lattice sampling of surfaces
//!
//! - Bilinear lookup at map positions
//! - Fence (polyline) sampling
//! - Resampling onto another lattice

mod bilinear;
mod fence;
mod resample;

pub use bilinear::{value_at, value_at_index};
pub use fence::{densify_fence, sample_fence, FencePoint, MAX_DENSIFIED_VERTICES};
pub use resample::{resample, resample_to};
