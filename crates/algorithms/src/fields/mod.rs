//! Derived value fields computed from node positions

mod distance;

pub use distance::{distance_from_point, DistanceParams};
