//! Sampling a surface along a polyline ("fence")

use regsurf_core::{Error, RegularSurface, Result};

use super::value_at;

/// A polyline vertex in map space.
///
/// `z` is `None` where no value is known (e.g. a sampled position outside
/// the surface).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FencePoint {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl FencePoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Horizontal distance to another point
    #[inline]
    pub fn dist_xy(&self, other: &FencePoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl From<[f64; 3]> for FencePoint {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<(f64, f64)> for FencePoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y, z: None }
    }
}

/// Sample the surface at every fence vertex.
///
/// Each vertex keeps its XY position and gets `z` replaced with the
/// bilinear surface value there, `None` where the surface is undefined or
/// the vertex lies outside it. The number and order of vertices are
/// preserved; no resampling along the polyline happens here (see
/// [`densify_fence`]).
pub fn sample_fence(surface: &RegularSurface, fence: &[FencePoint]) -> Vec<FencePoint> {
    fence
        .iter()
        .map(|p| FencePoint {
            x: p.x,
            y: p.y,
            z: value_at(surface, p.x, p.y),
        })
        .collect()
}

/// Upper bound on the vertex count [`densify_fence`] will produce
pub const MAX_DENSIFIED_VERTICES: usize = 10_000_000;

/// Insert vertices so that no segment is longer than `max_spacing`.
///
/// Original vertices are kept. Inserted vertices are evenly spaced on each
/// segment; their `z` is interpolated linearly when both segment ends have
/// one, and `None` otherwise. Fails if the result would exceed
/// [`MAX_DENSIFIED_VERTICES`].
pub fn densify_fence(fence: &[FencePoint], max_spacing: f64) -> Result<Vec<FencePoint>> {
    if !max_spacing.is_finite() || max_spacing <= 0.0 {
        return Err(Error::InvalidParameter {
            name: "max_spacing",
            value: max_spacing.to_string(),
            reason: "must be a positive number".into(),
        });
    }

    let total: f64 = fence
        .windows(2)
        .map(|pair| (pair[0].dist_xy(&pair[1]) / max_spacing).ceil())
        .sum::<f64>()
        + 1.0;
    if !total.is_finite() || total > MAX_DENSIFIED_VERTICES as f64 {
        return Err(Error::InvalidParameter {
            name: "max_spacing",
            value: max_spacing.to_string(),
            reason: format!("would produce more than {MAX_DENSIFIED_VERTICES} vertices"),
        });
    }

    let mut out = Vec::with_capacity(total as usize);
    for pair in fence.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        out.push(a);

        let pieces = (a.dist_xy(&b) / max_spacing).ceil() as usize;
        for k in 1..pieces {
            let t = k as f64 / pieces as f64;
            out.push(FencePoint {
                x: a.x + (b.x - a.x) * t,
                y: a.y + (b.y - a.y) * t,
                z: a.z.zip(b.z).map(|(za, zb)| za + (zb - za) * t),
            });
        }
    }
    if let Some(&last) = fence.last() {
        out.push(last);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use regsurf_core::SurfaceGeometry;

    fn ramp() -> RegularSurface {
        let geometry = SurfaceGeometry::new(11, 11, 0.0, 0.0, 10.0, 10.0).unwrap();
        RegularSurface::from_fn(geometry, |i, j| Some((i * 10 + j) as f64))
    }

    #[test]
    fn test_sample_fence_replaces_z() {
        let fence: Vec<FencePoint> = vec![
            [5.0, 5.0, 721.7].into(),
            [25.0, 50.0, 720.9].into(),
            [500.0, 50.0, 712.5].into(),
        ];
        let sampled = sample_fence(&ramp(), &fence);

        assert_eq!(sampled.len(), 3);
        assert_abs_diff_eq!(sampled[0].z.unwrap(), 5.5, epsilon = 1e-9);
        assert_abs_diff_eq!(sampled[1].z.unwrap(), 25.0 + 5.0, epsilon = 1e-9);
        assert_eq!(sampled[2].z, None);
        // Positions untouched
        for (a, b) in fence.iter().zip(&sampled) {
            assert_eq!((a.x, a.y), (b.x, b.y));
        }
    }

    #[test]
    fn test_sample_fence_empty() {
        assert!(sample_fence(&ramp(), &[]).is_empty());
    }

    #[test]
    fn test_densify_fence() {
        let fence = vec![FencePoint::new(0.0, 0.0, 0.0), FencePoint::new(10.0, 0.0, 100.0)];
        let dense = densify_fence(&fence, 2.5).unwrap();

        assert_eq!(dense.len(), 5);
        assert_eq!(dense[0], fence[0]);
        assert_eq!(dense[4], fence[1]);
        assert_abs_diff_eq!(dense[2].x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dense[2].z.unwrap(), 50.0, epsilon = 1e-12);
    }

    #[test]
    fn test_densify_rejects_runaway_vertex_count() {
        let fence = vec![FencePoint::new(0.0, 0.0, 0.0), FencePoint::new(1.0e5, 0.0, 1.0)];
        assert!(matches!(
            densify_fence(&fence, 1.0e-9),
            Err(Error::InvalidParameter { name: "max_spacing", .. })
        ));

        let far = vec![FencePoint::new(0.0, 0.0, 0.0), FencePoint::new(f64::MAX, f64::MAX, 1.0)];
        assert!(densify_fence(&far, 1.0).is_err());

        assert!(densify_fence(&fence, 1.0).is_ok());
    }

    #[test]
    fn test_densify_keeps_short_segments_and_unknown_z() {
        let fence = vec![
            FencePoint::from((0.0, 0.0)),
            FencePoint::new(1.0, 0.0, 3.0),
            FencePoint::new(1.0, 4.0, 3.0),
        ];
        let dense = densify_fence(&fence, 2.0).unwrap();
        assert_eq!(dense.len(), 4);
        assert_eq!(dense[0].z, None);
        assert_abs_diff_eq!(dense[2].y, 2.0, epsilon = 1e-12);
        assert_eq!(dense[2].z, Some(3.0));

        assert!(densify_fence(&fence, 0.0).is_err());
        assert!(densify_fence(&[], 1.0).unwrap().is_empty());
    }
}
