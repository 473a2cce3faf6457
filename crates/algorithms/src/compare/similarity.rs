//! Similarity between two surfaces on the same lattice

use regsurf_core::{Error, RegularSurface, Result};

/// Relative difference in mean value between two surfaces.
///
/// ```text
/// index = |mean(surface) - mean(other)| / |mean(surface)|
/// ```
///
/// Means are taken over nodes defined in both surfaces. Identical surfaces
/// give `0.0`; doubling every value of `other` gives exactly `1.0`. When the
/// mean of `surface` is zero the index is `0.0` if the other mean is zero
/// too and `+∞` otherwise.
///
/// # Errors
/// - [`Error::ShapeMismatch`] / [`Error::GeometryMismatch`] when the
///   surfaces do not share a lattice
/// - [`Error::Algorithm`] when no node is defined in both
pub fn similarity_index(surface: &RegularSurface, other: &RegularSurface) -> Result<f64> {
    surface.check_same_geometry(other)?;

    let mut sum_a = 0.0;
    let mut sum_b = 0.0;
    let mut count = 0usize;
    for (a, b) in surface.values().view().iter().zip(other.values().view().iter()) {
        if let (Some(a), Some(b)) = (a, b) {
            sum_a += a;
            sum_b += b;
            count += 1;
        }
    }

    if count == 0 {
        return Err(Error::Algorithm(
            "no node is defined in both surfaces".into(),
        ));
    }

    let mean_a = sum_a / count as f64;
    let mean_b = sum_b / count as f64;
    let diff = (mean_a - mean_b).abs();

    if mean_a == 0.0 {
        return Ok(if diff == 0.0 { 0.0 } else { f64::INFINITY });
    }
    Ok(diff / mean_a.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regsurf_core::SurfaceGeometry;

    fn surface() -> RegularSurface {
        let geometry = SurfaceGeometry::new(30, 20, 460000.0, 5930000.0, 25.0, 25.0)
            .unwrap()
            .with_rotation(30.0)
            .unwrap();
        RegularSurface::from_fn(geometry, |i, j| {
            if (i + j) % 7 == 0 {
                None
            } else {
                Some(1600.0 + (i as f64 * 0.37).sin() * 40.0 + j as f64 * 1.3)
            }
        })
    }

    #[test]
    fn test_identical_is_zero() {
        let s = surface();
        assert_eq!(similarity_index(&s, &s.clone()).unwrap(), 0.0);
    }

    #[test]
    fn test_doubled_is_one() {
        let s = surface();
        let mut doubled = s.clone();
        doubled.apply(|z| z * 2.0);
        assert_eq!(similarity_index(&s, &doubled).unwrap(), 1.0);

        let mut negative = s.clone();
        negative.apply(|z| -z);
        let mut negative_doubled = negative.clone();
        negative_doubled.apply(|z| z * 2.0);
        assert_eq!(similarity_index(&negative, &negative_doubled).unwrap(), 1.0);
    }

    #[test]
    fn test_only_common_nodes_count() {
        let s = surface();
        let mut other = s.clone();
        other.set_value(1, 1, None).unwrap();
        other.set_value(2, 1, None).unwrap();
        assert_eq!(similarity_index(&s, &other).unwrap(), 0.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let s = surface();
        let other = RegularSurface::filled(SurfaceGeometry::new(29, 20, 460000.0, 5930000.0, 25.0, 25.0).unwrap(), 1.0);
        assert!(matches!(similarity_index(&s, &other), Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_geometry_mismatch() {
        let s = surface();
        let mut other = s.clone();
        other.set_rotation(31.0).unwrap();
        assert!(matches!(similarity_index(&s, &other), Err(Error::GeometryMismatch(_))));
    }

    #[test]
    fn test_zero_reference_mean() {
        let geometry = SurfaceGeometry::new(2, 1, 0.0, 0.0, 1.0, 1.0).unwrap();
        let zero = RegularSurface::filled(geometry, 0.0);
        let one = RegularSurface::filled(geometry, 1.0);
        assert_eq!(similarity_index(&zero, &zero).unwrap(), 0.0);
        assert_eq!(similarity_index(&zero, &one).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_no_common_nodes() {
        let geometry = SurfaceGeometry::new(2, 2, 0.0, 0.0, 1.0, 1.0).unwrap();
        let a = RegularSurface::undefined(geometry);
        assert!(matches!(similarity_index(&a, &a), Err(Error::Algorithm(_))));
    }
}
