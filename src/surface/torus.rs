use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// A torus.
///
/// Defined by a center, the axis of revolution, the major radius (center to
/// tube center) and the minor radius (tube). With `z` the axial and `rho`
/// the radial distance from the center, the implicit value is
/// `(rho - R)^2 + z^2 - r^2`: negative inside the tube, positive outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Torus {
    center: Point3,
    axis: Vector3,
    major_radius: f64,
    minor_radius: f64,
}

impl Torus {
    /// Creates a new torus.
    ///
    /// # Errors
    ///
    /// Returns an error if either radius is non-positive, or the minor
    /// radius exceeds the major radius (self-intersecting tube).
    pub fn new(
        center: Point3,
        axis: Vector3,
        major_radius: f64,
        minor_radius: f64,
    ) -> Result<Self> {
        if major_radius < TOLERANCE {
            return Err(GeometryError::NonPositive {
                parameter: "torus major radius",
                value: major_radius,
            }
            .into());
        }
        if minor_radius < TOLERANCE {
            return Err(GeometryError::NonPositive {
                parameter: "torus minor radius",
                value: minor_radius,
            }
            .into());
        }
        if minor_radius > major_radius {
            return Err(GeometryError::Degenerate(
                "torus minor radius exceeds major radius".into(),
            )
            .into());
        }
        let len = axis.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            center,
            axis: axis / len,
            major_radius,
            minor_radius,
        })
    }

    /// Returns the center.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the axis of revolution (unit vector).
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    /// Returns the major radius.
    #[must_use]
    pub fn major_radius(&self) -> f64 {
        self.major_radius
    }

    /// Returns the minor radius.
    #[must_use]
    pub fn minor_radius(&self) -> f64 {
        self.minor_radius
    }

    /// Signed implicit value at `point`: negative inside the tube.
    #[must_use]
    pub fn implicit(&self, point: &Point3) -> f64 {
        let d = point - self.center;
        let z = d.dot(&self.axis);
        let rho = (d.norm_squared() - z * z).max(0.0).sqrt();
        let dr = rho - self.major_radius;
        dr * dr + z * z - self.minor_radius * self.minor_radius
    }

    /// Whether two tori describe the same surface.
    #[must_use]
    pub fn coincident(&self, other: &Self) -> bool {
        (self.center - other.center).norm() < TOLERANCE
            && self.axis.dot(&other.axis).abs() > 1.0 - TOLERANCE
            && (self.major_radius - other.major_radius).abs() < TOLERANCE
            && (self.minor_radius - other.minor_radius).abs() < TOLERANCE
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn z_torus() -> Torus {
        Torus::new(Point3::origin(), Vector3::z(), 3.0, 1.0).unwrap()
    }

    #[test]
    fn tube_center_is_inside() {
        let t = z_torus();
        assert!(t.implicit(&Point3::new(3.0, 0.0, 0.0)) < 0.0);
    }

    #[test]
    fn hole_is_outside() {
        let t = z_torus();
        assert!(t.implicit(&Point3::origin()) > 0.0);
    }

    #[test]
    fn tube_surface_is_zero() {
        let t = z_torus();
        assert!(t.implicit(&Point3::new(4.0, 0.0, 0.0)).abs() < TOLERANCE);
        assert!(t.implicit(&Point3::new(3.0, 0.0, 1.0)).abs() < TOLERANCE);
    }

    #[test]
    fn self_intersecting_tube_is_rejected() {
        assert!(Torus::new(Point3::origin(), Vector3::z(), 1.0, 2.0).is_err());
    }
}
