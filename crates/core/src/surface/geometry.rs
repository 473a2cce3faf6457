//! Rotated-lattice placement of a regular surface

use serde::{Deserialize, Serialize};

use super::angle::normalize_degrees;
use crate::error::{Error, Result};

/// Orientation of the local Y axis relative to a right-handed map frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum YFlip {
    /// Local Y follows the right-handed convention
    #[default]
    Normal,
    /// Local Y is mirrored (left-handed lattice)
    Flipped,
}

impl YFlip {
    /// `1.0` for [`YFlip::Normal`], `-1.0` for [`YFlip::Flipped`]
    pub fn sign(self) -> f64 {
        match self {
            YFlip::Normal => 1.0,
            YFlip::Flipped => -1.0,
        }
    }

    /// Flipped for negative signs, normal otherwise
    pub fn from_sign(sign: f64) -> Self {
        if sign < 0.0 {
            YFlip::Flipped
        } else {
            YFlip::Normal
        }
    }
}

/// Axis-aligned map-space extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl BoundingBox {
    /// Whether a map point lies inside the box (edges included)
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

/// Placement of an `ncol × nrow` node lattice in map space.
///
/// Node `(i, j)` maps to map coordinates by scaling with the increments,
/// mirroring local Y when flipped, rotating anticlockwise by `rotation`
/// degrees and translating by the origin:
/// ```text
/// u = i * xinc
/// v = j * yinc * yflip
/// x = xori + u * cos(rot) - v * sin(rot)
/// y = yori + u * sin(rot) + v * cos(rot)
/// ```
/// Node `(0, 0)` sits exactly on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGeometry {
    ncol: usize,
    nrow: usize,
    xori: f64,
    yori: f64,
    xinc: f64,
    yinc: f64,
    rotation: f64,
    yflip: YFlip,
}

impl SurfaceGeometry {
    /// Create an unrotated, unflipped lattice
    pub fn new(ncol: usize, nrow: usize, xori: f64, yori: f64, xinc: f64, yinc: f64) -> Result<Self> {
        if ncol == 0 || nrow == 0 {
            return Err(Error::InvalidDimensions { ncol, nrow });
        }
        check_finite("xori", xori)?;
        check_finite("yori", yori)?;
        check_increment("xinc", xinc)?;
        check_increment("yinc", yinc)?;

        Ok(Self {
            ncol,
            nrow,
            xori,
            yori,
            xinc,
            yinc,
            rotation: 0.0,
            yflip: YFlip::Normal,
        })
    }

    /// Same lattice rotated by `degrees` anticlockwise from the map X axis
    pub fn with_rotation(mut self, degrees: f64) -> Result<Self> {
        self.set_rotation(degrees)?;
        Ok(self)
    }

    /// Same lattice with the given Y orientation
    pub fn with_yflip(mut self, yflip: YFlip) -> Self {
        self.yflip = yflip;
        self
    }

    // Dimensions

    pub fn ncol(&self) -> usize {
        self.ncol
    }

    pub fn nrow(&self) -> usize {
        self.nrow
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.ncol * self.nrow
    }

    // Placement

    pub fn xori(&self) -> f64 {
        self.xori
    }

    pub fn yori(&self) -> f64 {
        self.yori
    }

    pub fn xinc(&self) -> f64 {
        self.xinc
    }

    pub fn yinc(&self) -> f64 {
        self.yinc
    }

    /// Rotation in degrees, always within `[0, 360)`
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn yflip(&self) -> YFlip {
        self.yflip
    }

    pub fn is_rotated(&self) -> bool {
        self.rotation != 0.0
    }

    pub fn set_origin(&mut self, xori: f64, yori: f64) -> Result<()> {
        check_finite("xori", xori)?;
        check_finite("yori", yori)?;
        self.xori = xori;
        self.yori = yori;
        Ok(())
    }

    pub fn set_increments(&mut self, xinc: f64, yinc: f64) -> Result<()> {
        check_increment("xinc", xinc)?;
        check_increment("yinc", yinc)?;
        self.xinc = xinc;
        self.yinc = yinc;
        Ok(())
    }

    /// Set the rotation; the stored value is normalized into `[0, 360)`
    pub fn set_rotation(&mut self, degrees: f64) -> Result<()> {
        check_finite("rotation", degrees)?;
        self.rotation = normalize_degrees(degrees);
        Ok(())
    }

    pub fn set_yflip(&mut self, yflip: YFlip) {
        self.yflip = yflip;
    }

    /// Unrotated X extent of the last column, `xori + (ncol - 1) * xinc`
    pub fn local_xmax(&self) -> f64 {
        self.xori + (self.ncol - 1) as f64 * self.xinc
    }

    /// Unrotated Y extent of the last row, `yori + (nrow - 1) * yinc`
    pub fn local_ymax(&self) -> f64 {
        self.yori + (self.nrow - 1) as f64 * self.yinc
    }

    // Coordinate conversion

    /// Convert (possibly fractional) node indices to map coordinates
    pub fn to_map(&self, i: f64, j: f64) -> (f64, f64) {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let u = i * self.xinc;
        let v = j * self.yinc * self.yflip.sign();

        (self.xori + u * cos - v * sin, self.yori + u * sin + v * cos)
    }

    /// Map coordinates of node `(i, j)`
    pub fn node_xy(&self, i: usize, j: usize) -> (f64, f64) {
        self.to_map(i as f64, j as f64)
    }

    /// Convert map coordinates to fractional node indices
    ///
    /// Exact inverse of [`SurfaceGeometry::to_map`]; the result is not
    /// clamped to the lattice.
    pub fn to_grid(&self, x: f64, y: f64) -> (f64, f64) {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let dx = x - self.xori;
        let dy = y - self.yori;

        let u = dx * cos + dy * sin;
        let v = -dx * sin + dy * cos;

        (u / self.xinc, v / (self.yinc * self.yflip.sign()))
    }

    /// Map-space extent of the four corner nodes
    pub fn bounds(&self) -> BoundingBox {
        let imax = (self.ncol - 1) as f64;
        let jmax = (self.nrow - 1) as f64;
        let corners = [
            self.to_map(0.0, 0.0),
            self.to_map(imax, 0.0),
            self.to_map(0.0, jmax),
            self.to_map(imax, jmax),
        ];

        let mut bbox = BoundingBox {
            xmin: f64::INFINITY,
            xmax: f64::NEG_INFINITY,
            ymin: f64::INFINITY,
            ymax: f64::NEG_INFINITY,
        };
        for (x, y) in corners {
            bbox.xmin = bbox.xmin.min(x);
            bbox.xmax = bbox.xmax.max(x);
            bbox.ymin = bbox.ymin.min(y);
            bbox.ymax = bbox.ymax.max(y);
        }
        bbox
    }

    /// Whether two lattices have the same dimensions and placement
    ///
    /// Real-valued parameters are compared with a relative tolerance of
    /// `1e-9`.
    pub fn same_as(&self, other: &SurfaceGeometry) -> bool {
        self.ncol == other.ncol
            && self.nrow == other.nrow
            && self.yflip == other.yflip
            && nearly_equal(self.xori, other.xori)
            && nearly_equal(self.yori, other.yori)
            && nearly_equal(self.xinc, other.xinc)
            && nearly_equal(self.yinc, other.yinc)
            && nearly_equal(self.rotation, other.rotation)
    }
}

impl Default for SurfaceGeometry {
    fn default() -> Self {
        Self {
            ncol: 5,
            nrow: 3,
            xori: 0.0,
            yori: 0.0,
            xinc: 25.0,
            yinc: 25.0,
            rotation: 0.0,
            yflip: YFlip::Normal,
        }
    }
}

fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

fn check_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: "must be finite".into(),
        })
    }
}

fn check_increment(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: "must be a positive number".into(),
        })
    }
}
