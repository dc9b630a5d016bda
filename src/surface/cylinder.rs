use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// An infinite circular cylinder.
///
/// Defined by a point on the axis, the axis direction, and a radius.
/// The implicit value is `dist_to_axis^2 - r^2`: negative inside the
/// cylinder, positive outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    center: Point3,
    axis: Vector3,
    radius: f64,
}

impl Cylinder {
    /// Creates a new cylinder.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or the axis is
    /// zero-length.
    pub fn new(center: Point3, axis: Vector3, radius: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::NonPositive {
                parameter: "cylinder radius",
                value: radius,
            }
            .into());
        }
        let len = axis.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            center,
            axis: axis / len,
            radius,
        })
    }

    /// Returns the point on the axis.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the axis direction (unit vector).
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Signed implicit value at `point`: negative inside, positive outside.
    #[must_use]
    pub fn implicit(&self, point: &Point3) -> f64 {
        let d = point - self.center;
        let axial = d.dot(&self.axis);
        let radial_sq = d.norm_squared() - axial * axial;
        radial_sq - self.radius * self.radius
    }

    /// Whether two cylinders describe the same surface (same axis line,
    /// same radius; the axis point may differ along the axis).
    #[must_use]
    pub fn coincident(&self, other: &Self) -> bool {
        if (self.radius - other.radius).abs() >= TOLERANCE {
            return false;
        }
        if self.axis.dot(&other.axis).abs() < 1.0 - TOLERANCE {
            return false;
        }
        // other.center must lie on this axis line
        let d = other.center - self.center;
        let off_axis = d - self.axis * d.dot(&self.axis);
        off_axis.norm() < TOLERANCE
    }
}
