use crate::alloc::IdAllocator;
use crate::cell::{Cell, CellId};
use crate::error::{ExistsError, ReferenceError, Result};
use crate::group::GroupTracker;
use crate::surface::{SignedSurface, SurfaceRegistry};
use std::collections::BTreeMap;
use tracing::info;

/// Owned per-run context: every registry a facility build touches.
///
/// One `Session` is created per simulation build and threaded `&mut` through
/// the component pipeline; there is no hidden process-wide state. Between
/// independent runs in the same process (parameter scans), the driver calls
/// [`reset`](Session::reset) exactly once. No identifier is reused before
/// that.
#[derive(Debug, Default)]
pub struct Session {
    surfaces: SurfaceRegistry,
    allocator: IdAllocator,
    groups: GroupTracker,
    cells: BTreeMap<CellId, Cell>,
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the surface registry.
    #[must_use]
    pub fn surfaces(&self) -> &SurfaceRegistry {
        &self.surfaces
    }

    /// Returns the surface registry mutably.
    pub fn surfaces_mut(&mut self) -> &mut SurfaceRegistry {
        &mut self.surfaces
    }

    /// Returns the identifier allocator.
    #[must_use]
    pub fn allocator(&self) -> &IdAllocator {
        &self.allocator
    }

    /// Returns the identifier allocator mutably.
    pub fn allocator_mut(&mut self) -> &mut IdAllocator {
        &mut self.allocator
    }

    /// Returns the group tracker.
    #[must_use]
    pub fn groups(&self) -> &GroupTracker {
        &self.groups
    }

    /// Returns the group tracker mutably.
    pub fn groups_mut(&mut self) -> &mut GroupTracker {
        &mut self.groups
    }

    /// Adds a cell to the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell id is already taken.
    pub fn add_cell(&mut self, cell: Cell) -> Result<CellId> {
        let id = cell.id();
        if self.cells.contains_key(&id) {
            return Err(ExistsError::CellTaken(id.get()).into());
        }
        self.cells.insert(id, cell);
        Ok(id)
    }

    /// Returns the cell registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is unknown.
    pub fn cell(&self, id: CellId) -> Result<&Cell> {
        self.cells
            .get(&id)
            .ok_or_else(|| ReferenceError::UnknownCell(id.get()).into())
    }

    /// Returns the cell registered under `id` mutably.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is unknown.
    pub fn cell_mut(&mut self, id: CellId) -> Result<&mut Cell> {
        self.cells
            .get_mut(&id)
            .ok_or_else(|| ReferenceError::UnknownCell(id.get()).into())
    }

    /// Removes a cell from the run and from every group it belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is unknown.
    pub fn remove_cell(&mut self, id: CellId) -> Result<Cell> {
        let cell = self
            .cells
            .remove(&id)
            .ok_or(ReferenceError::UnknownCell(id.get()))?;
        self.groups.remove_cell(id);
        Ok(cell)
    }

    /// Iterates over cell ids in numeric order.
    pub fn cell_ids(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells.keys().copied()
    }

    /// Number of cells in the run.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Finds, among the candidate cells, the one on the opposite side of the
    /// given boundary half-space.
    ///
    /// # Errors
    ///
    /// Returns an error if any candidate id is unknown.
    pub fn find_neighbor(
        &self,
        boundary: SignedSurface,
        candidates: &[CellId],
    ) -> Result<Option<&Cell>> {
        let opposite = boundary.complement();
        for &id in candidates {
            let cell = self.cell(id)?;
            if cell.rule().contains_signed(opposite) {
                return Ok(Some(cell));
            }
        }
        Ok(None)
    }

    /// Runs the explicit surface-deduplication pass and rewrites every cell
    /// rule onto the surviving surface ids. Returns the number of surfaces
    /// merged away.
    pub fn deduplicate_surfaces(&mut self) -> usize {
        let remap = self.surfaces.deduplicate();
        for cell in self.cells.values_mut() {
            for (&old, &new) in &remap {
                cell.substitute_surface(old, new);
            }
        }
        if !remap.is_empty() {
            info!(merged = remap.len(), "deduplicated session surfaces");
        }
        remap.len()
    }

    /// Clears every registry. Called by the driver between independent runs;
    /// after this, all identifiers may be reissued.
    pub fn reset(&mut self) {
        info!(
            cells = self.cells.len(),
            surfaces = self.surfaces.len(),
            "resetting session"
        );
        self.surfaces.reset();
        self.allocator.reset();
        self.groups.reset();
        self.cells.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};
    use crate::rule::HeadRule;
    use crate::surface::{Plane, Surface, SurfaceId};

    fn cid(raw: u64) -> CellId {
        CellId::new(raw).unwrap()
    }

    fn z_plane(z: f64) -> Surface {
        Surface::Plane(Plane::new(Point3::new(0.0, 0.0, z), Vector3::z()).unwrap())
    }

    #[test]
    fn duplicate_cell_id_is_rejected() {
        let mut session = Session::new();
        session
            .add_cell(Cell::new(cid(1), 0, 0.0, HeadRule::default()))
            .unwrap();
        assert!(session
            .add_cell(Cell::new(cid(1), 5, 1.0, HeadRule::default()))
            .is_err());
    }

    #[test]
    fn remove_cell_drops_group_membership() {
        let mut session = Session::new();
        session
            .add_cell(Cell::new(cid(7), 0, 0.0, HeadRule::default()))
            .unwrap();
        session.groups_mut().add_to_group("Void", cid(7));
        session.remove_cell(cid(7)).unwrap();
        assert!(session.cell(cid(7)).is_err());
        assert!(!session.groups().contains("Void", cid(7)));
    }

    #[test]
    fn neighbor_query_over_candidate_ids() {
        let mut session = Session::new();
        session
            .add_cell(Cell::new(cid(1), 0, 0.0, HeadRule::parse("1 -2").unwrap()))
            .unwrap();
        session
            .add_cell(Cell::new(cid(2), 0, 0.0, HeadRule::parse("2 -3").unwrap()))
            .unwrap();
        let boundary = SignedSurface::from_i64(-2).unwrap();
        let neighbor = session
            .find_neighbor(boundary, &[cid(1), cid(2)])
            .unwrap()
            .unwrap();
        assert_eq!(neighbor.id(), cid(2));
    }

    #[test]
    fn dedup_rewrites_cell_rules() {
        let mut session = Session::new();
        let a = session.surfaces_mut().register(z_plane(0.0));
        let b = session.surfaces_mut().register(z_plane(0.0));
        assert_ne!(a, b);
        session
            .add_cell(Cell::new(
                cid(1),
                0,
                0.0,
                HeadRule::leaf(SignedSurface::negative(b)),
            ))
            .unwrap();

        let merged = session.deduplicate_surfaces();
        assert_eq!(merged, 1);
        let cell = session.cell(cid(1)).unwrap();
        assert!(cell.rule().contains_signed(SignedSurface::negative(a)));
        // the rewritten rule still evaluates
        assert!(cell
            .contains(session.surfaces(), &Point3::new(0.0, 0.0, -1.0))
            .unwrap());
    }

    #[test]
    fn reset_clears_every_registry() {
        let mut session = Session::new();
        let base = session.allocator_mut().allocate_block("PipeA");
        let sid = SurfaceId::new(session.allocator_mut().next("PipeA").unwrap()).unwrap();
        session
            .surfaces_mut()
            .register_as(sid, z_plane(0.0))
            .unwrap();
        session
            .add_cell(Cell::new(cid(base), 0, 0.0, HeadRule::default()))
            .unwrap();
        session.groups_mut().add_to_group("Void", cid(base));

        session.reset();
        assert!(session.surfaces().is_empty());
        assert!(session.allocator().is_empty());
        assert_eq!(session.cell_count(), 0);
        assert!(session.groups().cells_in_group("Void").is_empty());
        // the id space restarts only after reset
        assert_eq!(session.allocator_mut().allocate_block("PipeB"), base);
    }
}
