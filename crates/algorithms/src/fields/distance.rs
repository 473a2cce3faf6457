//! Distance-from-point fields

use regsurf_core::surface::{convert_angle, AngleMode};
use regsurf_core::{RegularSurface, Result};

/// Parameters for [`distance_from_point`]
#[derive(Debug, Clone)]
pub struct DistanceParams {
    /// Reference point in map coordinates
    pub point: (f64, f64),
    /// Direction of the reference ray, degrees clockwise from north.
    /// `None` for plain radial distance.
    pub azimuth: Option<f64>,
}

impl Default for DistanceParams {
    fn default() -> Self {
        Self {
            point: (0.0, 0.0),
            azimuth: None,
        }
    }
}

/// Overwrite every defined node with its horizontal distance from a point.
///
/// Without an azimuth the value is the straight-line distance to
/// `params.point`. With an azimuth the value is the distance to the ray
/// leaving `params.point` in that direction: the perpendicular distance for
/// nodes ahead of the point, the straight-line distance for nodes behind
/// it. Nodes on the ray score zero. Undefined nodes stay undefined.
pub fn distance_from_point(surface: &mut RegularSurface, params: &DistanceParams) -> Result<()> {
    let direction = match params.azimuth {
        Some(azimuth) => {
            let angle = convert_angle(azimuth, AngleMode::AzimuthDegrees, AngleMode::Radians)?;
            Some((angle.cos(), angle.sin()))
        }
        None => None,
    };
    let (px, py) = params.point;

    surface.apply_with_xy(|x, y, _| ray_distance(x - px, y - py, direction));
    Ok(())
}

/// Distance from offset `(dx, dy)` to a ray from the origin along unit `direction`
fn ray_distance(dx: f64, dy: f64, direction: Option<(f64, f64)>) -> f64 {
    match direction {
        Some((ux, uy)) if dx * ux + dy * uy > 0.0 => (dx * uy - dy * ux).abs(),
        _ => dx.hypot(dy),
    }
}
