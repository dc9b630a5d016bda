mod cone;
mod cylinder;
mod plane;
mod quadric;
mod registry;
mod sphere;
mod torus;

pub use cone::Cone;
pub use cylinder::Cylinder;
pub use plane::Plane;
pub use quadric::Quadric;
pub use registry::SurfaceRegistry;
pub use sphere::Sphere;
pub use torus::Torus;

use crate::math::Point3;
use std::fmt;
use std::num::{NonZeroI64, NonZeroU64};

/// Numeric surface identifier. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(NonZeroU64);

impl SurfaceId {
    /// The lowest valid identifier.
    pub(crate) const FIRST: Self = Self(NonZeroU64::MIN);

    /// Creates an identifier from a raw value, rejecting zero.
    #[must_use]
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of a surface's two half-spaces a signed reference selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The half-space where the implicit function is non-negative.
    Positive,
    /// The half-space where the implicit function is non-positive.
    Negative,
}

impl Side {
    /// Returns the opposite side.
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }
}

/// A signed reference to a surface, selecting one of its two half-spaces.
///
/// Serializes as a nonzero signed integer; the sign encodes the side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignedSurface {
    id: SurfaceId,
    side: Side,
}

impl SignedSurface {
    /// Creates a signed reference.
    #[must_use]
    pub fn new(id: SurfaceId, side: Side) -> Self {
        Self { id, side }
    }

    /// Reference to the positive half-space of `id`.
    #[must_use]
    pub fn positive(id: SurfaceId) -> Self {
        Self::new(id, Side::Positive)
    }

    /// Reference to the negative half-space of `id`.
    #[must_use]
    pub fn negative(id: SurfaceId) -> Self {
        Self::new(id, Side::Negative)
    }

    /// Parses a raw signed integer, rejecting zero.
    #[must_use]
    pub fn from_i64(raw: i64) -> Option<Self> {
        let nz = NonZeroI64::new(raw)?;
        let id = SurfaceId::new(nz.get().unsigned_abs())?;
        let side = if nz.get() > 0 {
            Side::Positive
        } else {
            Side::Negative
        };
        Some(Self { id, side })
    }

    /// Returns the signed integer form (negative selects the negative side).
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn to_i64(self) -> i64 {
        let raw = self.id.get() as i64;
        match self.side {
            Side::Positive => raw,
            Side::Negative => -raw,
        }
    }

    /// Returns the unsigned surface identifier.
    #[must_use]
    pub fn id(self) -> SurfaceId {
        self.id
    }

    /// Returns the selected side.
    #[must_use]
    pub fn side(self) -> Side {
        self.side
    }

    /// Returns the reference to the opposite half-space of the same surface.
    #[must_use]
    pub fn complement(self) -> Self {
        Self {
            id: self.id,
            side: self.side.flip(),
        }
    }

    /// Rewrites the reference onto another surface, keeping the side.
    #[must_use]
    pub fn with_id(self, id: SurfaceId) -> Self {
        Self { id, side: self.side }
    }
}

impl fmt::Display for SignedSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_i64())
    }
}

/// Kind tag for a surface, used to key implication handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Plane,
    Cylinder,
    Cone,
    Sphere,
    Torus,
    Quadric,
}

/// A geometric primitive: one variant per surface kind.
///
/// Every kind exposes a closed-form implicit function; the sign of its value
/// at a point selects the half-space the point belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    Plane(Plane),
    Cylinder(Cylinder),
    Cone(Cone),
    Sphere(Sphere),
    Torus(Torus),
    Quadric(Quadric),
}

impl Surface {
    /// Returns the kind tag.
    #[must_use]
    pub fn kind(&self) -> SurfaceKind {
        match self {
            Self::Plane(_) => SurfaceKind::Plane,
            Self::Cylinder(_) => SurfaceKind::Cylinder,
            Self::Cone(_) => SurfaceKind::Cone,
            Self::Sphere(_) => SurfaceKind::Sphere,
            Self::Torus(_) => SurfaceKind::Torus,
            Self::Quadric(_) => SurfaceKind::Quadric,
        }
    }

    /// Signed implicit value at `point`.
    #[must_use]
    pub fn implicit(&self, point: &Point3) -> f64 {
        match self {
            Self::Plane(s) => s.implicit(point),
            Self::Cylinder(s) => s.implicit(point),
            Self::Cone(s) => s.implicit(point),
            Self::Sphere(s) => s.implicit(point),
            Self::Torus(s) => s.implicit(point),
            Self::Quadric(s) => s.implicit(point),
        }
    }

    /// Whether `point` lies in the half-space selected by `side`.
    ///
    /// Points exactly on the surface belong to both half-spaces.
    #[must_use]
    pub fn side_contains(&self, side: Side, point: &Point3) -> bool {
        let value = self.implicit(point);
        match side {
            Side::Positive => value >= 0.0,
            Side::Negative => value <= 0.0,
        }
    }

    /// Whether two surfaces describe the same primitive, within tolerance.
    ///
    /// Conservative: surfaces of different kinds are never considered
    /// coincident even when their point sets agree.
    #[must_use]
    pub fn coincident(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Plane(a), Self::Plane(b)) => a.coincident(b),
            (Self::Cylinder(a), Self::Cylinder(b)) => a.coincident(b),
            (Self::Cone(a), Self::Cone(b)) => a.coincident(b),
            (Self::Sphere(a), Self::Sphere(b)) => a.coincident(b),
            (Self::Torus(a), Self::Torus(b)) => a.coincident(b),
            (Self::Quadric(a), Self::Quadric(b)) => a.coincident(b),
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    #[test]
    fn signed_reference_roundtrip() {
        let r = SignedSurface::from_i64(-42).unwrap();
        assert_eq!(r.id().get(), 42);
        assert_eq!(r.side(), Side::Negative);
        assert_eq!(r.to_i64(), -42);
        assert_eq!(r.complement().to_i64(), 42);
    }

    #[test]
    fn zero_reference_is_rejected() {
        assert!(SignedSurface::from_i64(0).is_none());
        assert!(SurfaceId::new(0).is_none());
    }

    #[test]
    fn side_contains_boundary_belongs_to_both() {
        let s = Surface::Plane(Plane::new(Point3::origin(), Vector3::z()).unwrap());
        let on = Point3::new(1.0, 1.0, 0.0);
        assert!(s.side_contains(Side::Positive, &on));
        assert!(s.side_contains(Side::Negative, &on));
        let above = Point3::new(0.0, 0.0, 1.0);
        assert!(s.side_contains(Side::Positive, &above));
        assert!(!s.side_contains(Side::Negative, &above));
    }

    #[test]
    fn different_kinds_never_coincident() {
        let plane = Surface::Plane(Plane::new(Point3::origin(), Vector3::z()).unwrap());
        let sphere = Surface::Sphere(Sphere::new(Point3::origin(), 1.0).unwrap());
        assert!(!plane.coincident(&sphere));
    }
}
