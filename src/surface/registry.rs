use crate::error::{ExistsError, ReferenceError, Result};
use crate::math::Point3;
use std::collections::BTreeMap;
use tracing::debug;

use super::{SignedSurface, Surface, SurfaceId};

/// Central store for geometric primitives, keyed by stable numeric ids.
///
/// Components either let the registry mint fresh ids ([`register`]) or bring
/// their own ids carved out of an allocator block ([`register_as`]). Ids are
/// never zero and are never reused until [`reset`].
///
/// [`register`]: SurfaceRegistry::register
/// [`register_as`]: SurfaceRegistry::register_as
/// [`reset`]: SurfaceRegistry::reset
#[derive(Debug)]
pub struct SurfaceRegistry {
    surfaces: BTreeMap<SurfaceId, Surface>,
    next: SurfaceId,
}

impl Default for SurfaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceRegistry {
    /// Creates a new, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            surfaces: BTreeMap::new(),
            next: SurfaceId::FIRST,
        }
    }

    /// Registers a surface under the next fresh identifier.
    ///
    /// Every call mints a distinct id; geometric duplicates are only merged
    /// by an explicit [`deduplicate`](SurfaceRegistry::deduplicate) pass.
    pub fn register(&mut self, surface: Surface) -> SurfaceId {
        while self.surfaces.contains_key(&self.next) {
            self.next = self.next.next();
        }
        let id = self.next;
        debug!(id = id.get(), kind = ?surface.kind(), "registering surface");
        self.surfaces.insert(id, surface);
        self.next = self.next.next();
        id
    }

    /// Registers a surface under a caller-chosen identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is already taken.
    pub fn register_as(&mut self, id: SurfaceId, surface: Surface) -> Result<SurfaceId> {
        if self.surfaces.contains_key(&id) {
            return Err(ExistsError::SurfaceTaken(id.get()).into());
        }
        debug!(id = id.get(), kind = ?surface.kind(), "registering surface");
        self.surfaces.insert(id, surface);
        Ok(id)
    }

    /// Returns the surface registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is unknown.
    pub fn lookup(&self, id: SurfaceId) -> Result<&Surface> {
        self.surfaces
            .get(&id)
            .ok_or_else(|| ReferenceError::UnknownSurface(id.get()).into())
    }

    /// Evaluates whether `point` lies in the half-space selected by the
    /// signed reference. Closed-form sign check, no iteration.
    ///
    /// # Errors
    ///
    /// Returns an error if the referenced surface is unknown.
    pub fn side_test(&self, reference: SignedSurface, point: &Point3) -> Result<bool> {
        let surface = self.lookup(reference.id())?;
        Ok(surface.side_contains(reference.side(), point))
    }

    /// Merges geometrically coincident surfaces, keeping the lowest id of
    /// each coincident set.
    ///
    /// Returns the remap from removed ids to their surviving ids, so the
    /// caller can rewrite rules that referenced the duplicates. This is an
    /// explicit pass invoked by the driver, never a side effect of
    /// registration.
    pub fn deduplicate(&mut self) -> BTreeMap<SurfaceId, SurfaceId> {
        let ids: Vec<SurfaceId> = self.surfaces.keys().copied().collect();
        let mut remap = BTreeMap::new();
        for (i, &keep) in ids.iter().enumerate() {
            if remap.contains_key(&keep) {
                continue;
            }
            for &candidate in &ids[i + 1..] {
                if remap.contains_key(&candidate) {
                    continue;
                }
                let coincident = match (self.surfaces.get(&keep), self.surfaces.get(&candidate)) {
                    (Some(a), Some(b)) => a.coincident(b),
                    _ => false,
                };
                if coincident {
                    remap.insert(candidate, keep);
                }
            }
        }
        for removed in remap.keys() {
            self.surfaces.remove(removed);
        }
        if !remap.is_empty() {
            debug!(merged = remap.len(), "deduplicated surfaces");
        }
        remap
    }

    /// Clears all registered surfaces and restarts id numbering.
    pub fn reset(&mut self) {
        self.surfaces.clear();
        self.next = SurfaceId::FIRST;
    }

    /// Number of registered surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Iterates over `(id, surface)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (SurfaceId, &Surface)> {
        self.surfaces.iter().map(|(id, s)| (*id, s))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use crate::surface::{Plane, Sphere};

    fn z_plane(z: f64) -> Surface {
        Surface::Plane(Plane::new(Point3::new(0.0, 0.0, z), Vector3::z()).unwrap())
    }

    #[test]
    fn register_mints_fresh_nonzero_ids() {
        let mut reg = SurfaceRegistry::new();
        let a = reg.register(z_plane(0.0));
        let b = reg.register(z_plane(0.0));
        assert_ne!(a, b);
        assert!(a.get() >= 1);
    }

    #[test]
    fn register_as_rejects_taken_id() {
        let mut reg = SurfaceRegistry::new();
        let id = SurfaceId::new(100).unwrap();
        reg.register_as(id, z_plane(0.0)).unwrap();
        assert!(reg.register_as(id, z_plane(1.0)).is_err());
    }

    #[test]
    fn register_skips_caller_chosen_ids() {
        let mut reg = SurfaceRegistry::new();
        reg.register_as(SurfaceId::new(1).unwrap(), z_plane(0.0))
            .unwrap();
        reg.register_as(SurfaceId::new(2).unwrap(), z_plane(1.0))
            .unwrap();
        let fresh = reg.register(z_plane(2.0));
        assert_eq!(fresh.get(), 3);
    }

    #[test]
    fn lookup_unknown_fails() {
        let reg = SurfaceRegistry::new();
        assert!(reg.lookup(SurfaceId::new(7).unwrap()).is_err());
    }

    #[test]
    fn side_test_selects_half_space() {
        let mut reg = SurfaceRegistry::new();
        let id = reg.register(z_plane(0.0));
        let above = Point3::new(0.0, 0.0, 1.0);
        assert!(reg.side_test(SignedSurface::positive(id), &above).unwrap());
        assert!(!reg.side_test(SignedSurface::negative(id), &above).unwrap());
    }

    #[test]
    fn deduplicate_keeps_lowest_id() {
        let mut reg = SurfaceRegistry::new();
        let a = reg.register(z_plane(0.0));
        let b = reg.register(Surface::Sphere(Sphere::new(Point3::origin(), 1.0).unwrap()));
        let c = reg.register(z_plane(0.0));
        let remap = reg.deduplicate();
        assert_eq!(remap.get(&c), Some(&a));
        assert_eq!(reg.len(), 2);
        assert!(reg.lookup(b).is_ok());
        assert!(reg.lookup(c).is_err());
    }

    #[test]
    fn opposite_orientation_planes_are_not_merged() {
        let mut reg = SurfaceRegistry::new();
        reg.register(z_plane(0.0));
        reg.register(Surface::Plane(
            Plane::new(Point3::origin(), -Vector3::z()).unwrap(),
        ));
        assert!(reg.deduplicate().is_empty());
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn reset_restarts_numbering() {
        let mut reg = SurfaceRegistry::new();
        reg.register(z_plane(0.0));
        reg.reset();
        assert!(reg.is_empty());
        let id = reg.register(z_plane(0.0));
        assert_eq!(id.get(), 1);
    }

    #[test]
    fn positive_side_is_implicit_sign() {
        let mut reg = SurfaceRegistry::new();
        let s = reg.register(Surface::Sphere(Sphere::new(Point3::origin(), 2.0).unwrap()));
        // sphere implicit is positive outside: +s selects the exterior
        let outside = Point3::new(5.0, 0.0, 0.0);
        let inside = Point3::origin();
        assert!(reg.side_test(SignedSurface::positive(s), &outside).unwrap());
        assert!(reg.side_test(SignedSurface::negative(s), &inside).unwrap());
    }
}
