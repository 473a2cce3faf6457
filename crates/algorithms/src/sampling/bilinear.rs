//! Bilinear value lookup at arbitrary map positions

use regsurf_core::RegularSurface;

/// Slack, in node units, for positions that land on the lattice edge up to rounding
const EDGE_TOLERANCE: f64 = 1e-9;

/// Bilinear value of the surface at map position `(x, y)`.
///
/// The position is converted to fractional node indices and the four
/// surrounding nodes are blended by fractional distance along each local
/// axis. Returns `None` when the position lies outside the node lattice
/// (no extrapolation) or when any of the four nodes is undefined.
pub fn value_at(surface: &RegularSurface, x: f64, y: f64) -> Option<f64> {
    let (fi, fj) = surface.to_grid(x, y);
    value_at_index(surface, fi, fj)
}

/// Bilinear value at fractional node indices `(fi, fj)`
pub fn value_at_index(surface: &RegularSurface, fi: f64, fj: f64) -> Option<f64> {
    let (i0, i1, ti) = bracket(fi, surface.ncol())?;
    let (j0, j1, tj) = bracket(fj, surface.nrow())?;

    // Storage is indexed [j, i]
    let values = surface.values().view();
    let v00 = values[[j0, i0]]?;
    let v10 = values[[j0, i1]]?;
    let v01 = values[[j1, i0]]?;
    let v11 = values[[j1, i1]]?;

    let near = v00 * (1.0 - ti) + v10 * ti;
    let far = v01 * (1.0 - ti) + v11 * ti;
    Some(near * (1.0 - tj) + far * tj)
}

/// Lower node, upper node and weight of the upper node along one axis
fn bracket(f: f64, n: usize) -> Option<(usize, usize, f64)> {
    let max = (n - 1) as f64;
    if !f.is_finite() || f < -EDGE_TOLERANCE || f > max + EDGE_TOLERANCE {
        return None;
    }
    if n == 1 {
        return Some((0, 0, 0.0));
    }

    let f = f.clamp(0.0, max);
    let lo = (f.floor() as usize).min(n - 2);
    Some((lo, lo + 1, f - lo as f64))
}
