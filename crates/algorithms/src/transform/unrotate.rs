//! Axis-aligned resampling of rotated surfaces

use regsurf_core::{Error, RegularSurface, Result, SurfaceGeometry};
use tracing::debug;

use crate::sampling::resample_to;

/// Parameters for [`unrotate`]
#[derive(Debug, Clone)]
pub struct UnrotateParams {
    /// Node count multiplier along each axis of the new lattice
    pub factor: usize,
}

impl Default for UnrotateParams {
    fn default() -> Self {
        Self { factor: 2 }
    }
}

/// Resample a surface onto an unrotated, unflipped lattice covering its
/// bounding box.
///
/// The new lattice has `ncol * factor` by `nrow * factor` nodes spanning
/// `[xmin, xmax] × [ymin, ymax]` of the input. Each node takes the bilinear
/// value of the input at its map position; nodes that fall outside the
/// input lattice (the corners of the bounding box for a rotated input) are
/// undefined.
pub fn unrotate(surface: &RegularSurface, params: UnrotateParams) -> Result<RegularSurface> {
    if params.factor == 0 {
        return Err(Error::InvalidParameter {
            name: "factor",
            value: "0".into(),
            reason: "must be at least 1".into(),
        });
    }

    let bbox = surface.bounds();
    let (ncol, xinc) = axis(surface.ncol() * params.factor, bbox.width(), surface.xinc());
    let (nrow, yinc) = axis(surface.nrow() * params.factor, bbox.height(), surface.yinc());

    let geometry = SurfaceGeometry::new(ncol, nrow, bbox.xmin, bbox.ymin, xinc, yinc)?;
    debug!(
        "unrotating {} x {} surface (rotation {}) onto {} x {} lattice",
        surface.ncol(),
        surface.nrow(),
        surface.rotation(),
        ncol,
        nrow
    );

    Ok(resample_to(geometry, surface))
}

/// Node count and spacing spanning `length`; a degenerate extent keeps a
/// single node line with the original spacing
fn axis(count: usize, length: f64, fallback_inc: f64) -> (usize, f64) {
    if count > 1 && length > 0.0 {
        (count, length / (count - 1) as f64)
    } else {
        (1, fallback_inc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use regsurf_core::YFlip;

    fn rotated_plane(rotation: f64) -> RegularSurface {
        let geometry = SurfaceGeometry::new(20, 10, 1000.0, 2000.0, 25.0, 25.0)
            .unwrap()
            .with_rotation(rotation)
            .unwrap();
        RegularSurface::from_fn(geometry, |i, j| {
            let (x, y) = geometry.node_xy(i, j);
            Some(0.1 * x + 0.2 * y)
        })
    }

    #[test]
    fn test_unrotate_geometry() {
        let s = rotated_plane(30.0);
        let u = unrotate(&s, UnrotateParams::default()).unwrap();

        assert_eq!(u.rotation(), 0.0);
        assert_eq!(u.yflip(), YFlip::Normal);
        assert_eq!((u.ncol(), u.nrow()), (40, 20));

        let (a, b) = (s.bounds(), u.bounds());
        assert_abs_diff_eq!(a.xmin, b.xmin, epsilon = 1e-6);
        assert_abs_diff_eq!(a.xmax, b.xmax, epsilon = 1e-6);
        assert_abs_diff_eq!(a.ymin, b.ymin, epsilon = 1e-6);
        assert_abs_diff_eq!(a.ymax, b.ymax, epsilon = 1e-6);
    }

    #[test]
    fn test_unrotate_values_follow_plane() {
        let s = rotated_plane(30.0);
        let u = unrotate(&s, UnrotateParams { factor: 1 }).unwrap();

        let mut defined = 0;
        for (i, j, v) in u.values().iter_nodes() {
            if let Some(v) = v {
                let (x, y) = u.node_xy(i, j);
                assert_abs_diff_eq!(v, 0.1 * x + 0.2 * y, epsilon = 1e-6);
                defined += 1;
            }
        }
        assert!(defined > 0);
        // The bounding box corners are off the rotated lattice
        assert_eq!(u.get_value(0, u.nrow() - 1).unwrap(), None);
        assert_eq!(u.get_value(u.ncol() - 1, 0).unwrap(), None);
    }

    #[test]
    fn test_unrotate_unrotated_is_identity_on_nodes() {
        let s = rotated_plane(0.0);
        let u = unrotate(&s, UnrotateParams { factor: 1 }).unwrap();
        assert_eq!((u.ncol(), u.nrow()), (20, 10));
        for (i, j, v) in s.values().iter_nodes() {
            assert_abs_diff_eq!(u.get_value(i, j).unwrap().unwrap(), v.unwrap(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_unrotate_single_column() {
        let geometry = SurfaceGeometry::new(1, 4, 0.0, 0.0, 10.0, 10.0).unwrap();
        let s = RegularSurface::filled(geometry, 7.0);
        let u = unrotate(&s, UnrotateParams::default()).unwrap();
        assert_eq!(u.ncol(), 1);
        assert_eq!(u.nrow(), 8);
        assert_eq!(u.statistics().defined_count, 8);
    }

    #[test]
    fn test_zero_factor_rejected() {
        assert!(unrotate(&rotated_plane(10.0), UnrotateParams { factor: 0 }).is_err());
    }
}
