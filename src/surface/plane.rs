use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// An infinite plane, stored in Hesse normal form.
///
/// Defined by a unit normal `n` and a signed offset `d` such that the plane
/// is the zero set of `f(p) = n . p - d`. The implicit value is positive on
/// the side the normal points toward.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    normal: Vector3,
    offset: f64,
}

impl Plane {
    /// Creates a plane through `origin` with the given normal direction.
    ///
    /// The normal is normalized; its orientation selects which side of the
    /// plane carries positive implicit values.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal is zero-length.
    pub fn new(origin: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;
        let offset = normal.dot(&origin.coords);
        Ok(Self { normal, offset })
    }

    /// Creates a plane directly from a normal direction and a signed offset
    /// along that normal (`n . p = d`).
    ///
    /// # Errors
    ///
    /// Returns an error if the normal is zero-length.
    pub fn from_offset(normal: Vector3, offset: f64) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            normal: normal / len,
            offset: offset / len,
        })
    }

    /// Returns the unit normal.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Returns the signed offset along the normal.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Signed implicit value at `point`: positive on the normal side.
    #[must_use]
    pub fn implicit(&self, point: &Point3) -> f64 {
        self.normal.dot(&point.coords) - self.offset
    }

    /// Whether two planes describe the same oriented half-space boundary.
    #[must_use]
    pub fn coincident(&self, other: &Self) -> bool {
        self.normal.dot(&other.normal) > 1.0 - TOLERANCE
            && (self.offset - other.offset).abs() < TOLERANCE
    }
}
