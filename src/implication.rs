use crate::error::Result;
use crate::math::TOLERANCE;
use crate::surface::{Side, SignedSurface, Surface, SurfaceKind, SurfaceRegistry};
use std::collections::HashMap;

/// Relation between two half-spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Implication {
    /// Membership in the first half-space guarantees membership in the second.
    FirstImpliesSecond,
    /// Membership in the second half-space guarantees membership in the first.
    SecondImpliesFirst,
    /// No implication is known.
    Independent,
}

/// Handler for one ordered pair of surface kinds. Receives the concrete
/// surfaces and the selected sides.
pub type PairHandler = fn(&Surface, Side, &Surface, Side) -> Implication;

/// Decides whether one half-space constraint is redundant given another.
///
/// Dispatch is a table keyed by the ordered pair of surface kinds; new pairs
/// are supported by registering a handler. Any unregistered pair is
/// `Independent`.
///
/// The oracle is conservative by contract: callers delete rule terms based
/// on its answers, so under-reporting (`Independent`) is always safe and a
/// false implication never is. Handlers must honor this.
#[derive(Debug)]
pub struct ImplicationOracle {
    table: HashMap<(SurfaceKind, SurfaceKind), PairHandler>,
}

impl Default for ImplicationOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ImplicationOracle {
    /// Creates an oracle with the built-in plane/plane rule registered.
    #[must_use]
    pub fn new() -> Self {
        let mut oracle = Self {
            table: HashMap::new(),
        };
        oracle.register((SurfaceKind::Plane, SurfaceKind::Plane), plane_plane);
        oracle
    }

    /// Registers a handler for an ordered pair of kinds, replacing any
    /// existing entry.
    pub fn register(&mut self, kinds: (SurfaceKind, SurfaceKind), handler: PairHandler) {
        self.table.insert(kinds, handler);
    }

    /// Classifies the relation between two half-spaces.
    ///
    /// # Errors
    ///
    /// Returns an error if either referenced surface is unregistered.
    pub fn classify(
        &self,
        surfaces: &SurfaceRegistry,
        first: SignedSurface,
        second: SignedSurface,
    ) -> Result<Implication> {
        let a = surfaces.lookup(first.id())?;
        let b = surfaces.lookup(second.id())?;
        match self.table.get(&(a.kind(), b.kind())) {
            Some(handler) => Ok(handler(a, first.side(), b, second.side())),
            None => Ok(Implication::Independent),
        }
    }
}

/// Plane/plane rule: along a shared normal the farther half-space implies
/// the nearer one. Anti-parallel normals are folded onto the first plane's
/// frame (offset and side both flip) before the offsets are compared.
fn plane_plane(a: &Surface, side_a: Side, b: &Surface, side_b: Side) -> Implication {
    let (Surface::Plane(pa), Surface::Plane(pb)) = (a, b) else {
        return Implication::Independent;
    };
    let alignment = pa.normal().dot(pb.normal());
    if alignment > 1.0 - TOLERANCE {
        aligned_offsets(pa.offset(), side_a, pb.offset(), side_b)
    } else if alignment < -(1.0 - TOLERANCE) {
        aligned_offsets(pa.offset(), side_a, -pb.offset(), side_b.flip())
    } else {
        Implication::Independent
    }
}

/// Both constraints reduced to the same normal direction: `Positive` means
/// `t >= d`, `Negative` means `t <= d`, with `t` the projection on the
/// shared normal.
fn aligned_offsets(d1: f64, s1: Side, d2: f64, s2: Side) -> Implication {
    match (s1, s2) {
        (Side::Positive, Side::Positive) => {
            if d1 >= d2 {
                Implication::FirstImpliesSecond
            } else {
                Implication::SecondImpliesFirst
            }
        }
        (Side::Negative, Side::Negative) => {
            if d1 <= d2 {
                Implication::FirstImpliesSecond
            } else {
                Implication::SecondImpliesFirst
            }
        }
        // opposite senses along one axis never nest
        _ => Implication::Independent,
    }
}
