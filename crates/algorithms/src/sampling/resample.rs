//! Resampling one surface onto another lattice

use regsurf_core::{RegularSurface, Result, SurfaceGeometry, SurfaceValues};

use super::value_at;

/// Build a surface on `geometry` whose nodes take the bilinear value of
/// `source` at their map positions.
///
/// Nodes outside `source`, or touching undefined `source` nodes, are
/// undefined.
pub fn resample_to(geometry: SurfaceGeometry, source: &RegularSurface) -> RegularSurface {
    RegularSurface::from_fn(geometry, |i, j| {
        let (x, y) = geometry.node_xy(i, j);
        value_at(source, x, y)
    })
}

/// Replace every node value of `target` by sampling `source`.
///
/// `target` keeps its geometry; see [`resample_to`].
pub fn resample(target: &mut RegularSurface, source: &RegularSurface) -> Result<()> {
    let geometry = *target.geometry();
    let values = SurfaceValues::from_fn(geometry.ncol(), geometry.nrow(), |i, j| {
        let (x, y) = geometry.node_xy(i, j);
        value_at(source, x, y)
    });
    target.set_values(values)
}
