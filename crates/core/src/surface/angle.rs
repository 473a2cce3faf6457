//! Angle conventions and conversions
//!
//! Surface rotation is stored as degrees anticlockwise from the map X axis.
//! Azimuths (directions supplied by users, well paths, fences) are measured
//! clockwise from north. This module converts between the two, in degrees
//! or radians.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How an angle value is to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleMode {
    /// Degrees, anticlockwise from the X axis
    Degrees,
    /// Radians, anticlockwise from the X axis
    Radians,
    /// Degrees, clockwise from north (Y axis)
    AzimuthDegrees,
    /// Radians, clockwise from north (Y axis)
    AzimuthRadians,
}

impl AngleMode {
    fn is_radians(self) -> bool {
        matches!(self, AngleMode::Radians | AngleMode::AzimuthRadians)
    }

    fn is_azimuth(self) -> bool {
        matches!(self, AngleMode::AzimuthDegrees | AngleMode::AzimuthRadians)
    }
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let r = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Convert an angle between modes.
///
/// Input is accepted within one full turn in either direction
/// (`[-360, 360]` degrees or `[-2π, 2π]` radians). The result is normalized
/// into `[0, 360)` degrees or `[0, 2π)` radians.
pub fn convert_angle(angle: f64, from: AngleMode, to: AngleMode) -> Result<f64> {
    let limit = if from.is_radians() { 2.0 * PI } else { 360.0 };
    if !angle.is_finite() || angle.abs() > limit {
        return Err(Error::InvalidParameter {
            name: "angle",
            value: angle.to_string(),
            reason: format!("must be within one turn (±{limit}) for {from:?}"),
        });
    }

    let degrees = if from.is_radians() {
        angle.to_degrees()
    } else {
        angle
    };
    // Anticlockwise from X, in degrees
    let math = if from.is_azimuth() {
        normalize_degrees(90.0 - degrees)
    } else {
        normalize_degrees(degrees)
    };

    let out = if to.is_azimuth() {
        normalize_degrees(90.0 - math)
    } else {
        math
    };

    if to.is_radians() {
        let rad = out.to_radians();
        Ok(if rad >= 2.0 * PI { 0.0 } else { rad })
    } else {
        Ok(out)
    }
}
