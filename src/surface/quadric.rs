use crate::error::{GeometryError, Result};
use crate::math::{Point3, TOLERANCE};

/// A general quadric surface.
///
/// Ten coefficients `[a, b, c, d, e, f, g, h, j, k]` for
/// `a x^2 + b y^2 + c z^2 + d xy + e yz + f zx + g x + h y + j z + k = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Quadric {
    coeffs: [f64; 10],
}

impl Quadric {
    /// Creates a quadric from its ten coefficients.
    ///
    /// # Errors
    ///
    /// Returns an error if every variable coefficient is zero (the surface
    /// would be either all of space or empty).
    pub fn new(coeffs: [f64; 10]) -> Result<Self> {
        if coeffs[..9].iter().all(|c| c.abs() < TOLERANCE) {
            return Err(GeometryError::Degenerate(
                "quadric has no variable terms".into(),
            )
            .into());
        }
        Ok(Self { coeffs })
    }

    /// Returns the coefficients.
    #[must_use]
    pub fn coeffs(&self) -> &[f64; 10] {
        &self.coeffs
    }

    /// Signed implicit value at `point`.
    #[must_use]
    pub fn implicit(&self, point: &Point3) -> f64 {
        let [a, b, c, d, e, f, g, h, j, k] = self.coeffs;
        let (x, y, z) = (point.x, point.y, point.z);
        a * x * x + b * y * y + c * z * z + d * x * y + e * y * z + f * z * x
            + g * x
            + h * y
            + j * z
            + k
    }

    /// Whether two quadrics have the same coefficients within tolerance.
    ///
    /// Proportional coefficient sets describe the same zero set but a scaled
    /// implicit value; they are deliberately not merged.
    #[must_use]
    pub fn coincident(&self, other: &Self) -> bool {
        self.coeffs
            .iter()
            .zip(other.coeffs.iter())
            .all(|(a, b)| (a - b).abs() < TOLERANCE)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unit_sphere_as_quadric() {
        // x^2 + y^2 + z^2 - 1
        let q = Quadric::new([1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0]).unwrap();
        assert!(q.implicit(&Point3::origin()) < 0.0);
        assert!(q.implicit(&Point3::new(2.0, 0.0, 0.0)) > 0.0);
        assert!(q.implicit(&Point3::new(1.0, 0.0, 0.0)).abs() < TOLERANCE);
    }

    #[test]
    fn constant_quadric_is_rejected() {
        assert!(Quadric::new([0.0; 10]).is_err());
        let mut only_k = [0.0; 10];
        only_k[9] = 4.0;
        assert!(Quadric::new(only_k).is_err());
    }
}
