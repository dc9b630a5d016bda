use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};
use std::f64::consts::FRAC_PI_2;

/// An infinite double cone.
///
/// Defined by the apex, the axis direction, and the half-opening angle.
/// The implicit value is `radial^2 - (axial * tan(angle))^2`: negative
/// inside either nappe, positive outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Cone {
    apex: Point3,
    axis: Vector3,
    tan_angle: f64,
}

impl Cone {
    /// Creates a new cone from apex, axis and half-opening angle in radians.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis is zero-length or the angle is not in
    /// `(0, pi/2)`.
    pub fn new(apex: Point3, axis: Vector3, half_angle: f64) -> Result<Self> {
        let len = axis.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        if half_angle < TOLERANCE || half_angle > FRAC_PI_2 - TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "cone half-angle {half_angle} must lie in (0, pi/2)"
            ))
            .into());
        }
        Ok(Self {
            apex,
            axis: axis / len,
            tan_angle: half_angle.tan(),
        })
    }

    /// Returns the apex point.
    #[must_use]
    pub fn apex(&self) -> &Point3 {
        &self.apex
    }

    /// Returns the axis direction (unit vector).
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    /// Returns the tangent of the half-opening angle.
    #[must_use]
    pub fn tan_angle(&self) -> f64 {
        self.tan_angle
    }

    /// Signed implicit value at `point`: negative inside, positive outside.
    #[must_use]
    pub fn implicit(&self, point: &Point3) -> f64 {
        let d = point - self.apex;
        let axial = d.dot(&self.axis);
        let radial_sq = d.norm_squared() - axial * axial;
        radial_sq - (axial * self.tan_angle) * (axial * self.tan_angle)
    }

    /// Whether two cones describe the same surface. The double cone is
    /// symmetric under axis reversal.
    #[must_use]
    pub fn coincident(&self, other: &Self) -> bool {
        (self.apex - other.apex).norm() < TOLERANCE
            && self.axis.dot(&other.axis).abs() > 1.0 - TOLERANCE
            && (self.tan_angle - other.tan_angle).abs() < TOLERANCE
    }
}
