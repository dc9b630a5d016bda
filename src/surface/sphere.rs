use crate::error::{GeometryError, Result};
use crate::math::{Point3, TOLERANCE};

/// A sphere.
///
/// The implicit value is `|p - c|^2 - r^2`: negative inside, positive
/// outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Point3,
    radius: f64,
}

impl Sphere {
    /// Creates a new sphere.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive.
    pub fn new(center: Point3, radius: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::NonPositive {
                parameter: "sphere radius",
                value: radius,
            }
            .into());
        }
        Ok(Self { center, radius })
    }

    /// Returns the center.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Signed implicit value at `point`: negative inside, positive outside.
    #[must_use]
    pub fn implicit(&self, point: &Point3) -> f64 {
        (point - self.center).norm_squared() - self.radius * self.radius
    }

    /// Whether two spheres describe the same surface.
    #[must_use]
    pub fn coincident(&self, other: &Self) -> bool {
        (self.center - other.center).norm() < TOLERANCE
            && (self.radius - other.radius).abs() < TOLERANCE
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn center_is_inside() {
        let s = Sphere::new(Point3::new(1.0, 2.0, 3.0), 2.0).unwrap();
        assert!(s.implicit(&Point3::new(1.0, 2.0, 3.0)) < 0.0);
    }

    #[test]
    fn far_point_is_outside() {
        let s = Sphere::new(Point3::origin(), 2.0).unwrap();
        assert!(s.implicit(&Point3::new(5.0, 0.0, 0.0)) > 0.0);
    }

    #[test]
    fn surface_point_is_zero() {
        let s = Sphere::new(Point3::origin(), 2.0).unwrap();
        assert!(s.implicit(&Point3::new(0.0, 2.0, 0.0)).abs() < TOLERANCE);
    }

    #[test]
    fn invalid_radius() {
        assert!(Sphere::new(Point3::origin(), -1.0).is_err());
    }
}
