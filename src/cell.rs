use crate::error::Result;
use crate::math::Point3;
use crate::rule::{HeadRule, Rule};
use crate::surface::{SignedSurface, SurfaceId, SurfaceRegistry};
use std::fmt;
use std::num::NonZeroU64;

/// Numeric cell identifier, carved out of an allocator block. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(NonZeroU64);

impl CellId {
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
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A region of space: a boolean rule over half-spaces bound to a material.
///
/// A cell stays mutable after construction; later-built components AND
/// exclusion terms into it as they insert themselves into its volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    id: CellId,
    material: i32,
    density: f64,
    rule: HeadRule,
}

impl Cell {
    /// Binds a rule to a material and density under the given id.
    #[must_use]
    pub fn new(id: CellId, material: i32, density: f64, rule: HeadRule) -> Self {
        Self {
            id,
            material,
            density,
            rule,
        }
    }

    /// Returns the cell identifier.
    #[must_use]
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Returns the material identifier.
    #[must_use]
    pub fn material(&self) -> i32 {
        self.material
    }

    /// Returns the density.
    #[must_use]
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Returns the boundary rule.
    #[must_use]
    pub fn rule(&self) -> &HeadRule {
        &self.rule
    }

    /// Evaluates whether `point` lies inside the cell, short-circuiting
    /// AND/OR nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule references an unregistered surface.
    pub fn contains(&self, surfaces: &SurfaceRegistry, point: &Point3) -> Result<bool> {
        evaluate(self.rule.root(), surfaces, point)
    }

    /// ANDs an extra exclusion rule into the cell's boundary. May be called
    /// any number of times; the empty rule leaves the cell unchanged.
    pub fn intersect_with(&mut self, extra: &HeadRule) {
        self.rule.intersect_with(extra);
    }

    /// Rewrites every reference to `old` onto `new` in the boundary rule.
    pub fn substitute_surface(&mut self, old: SurfaceId, new: SurfaceId) {
        self.rule.substitute(old, new);
    }
}

fn evaluate(rule: &Rule, surfaces: &SurfaceRegistry, point: &Point3) -> Result<bool> {
    match rule {
        Rule::True => Ok(true),
        Rule::Leaf(reference) => surfaces.side_test(*reference, point),
        Rule::And(a, b) => {
            if !evaluate(a, surfaces, point)? {
                return Ok(false);
            }
            evaluate(b, surfaces, point)
        }
        Rule::Or(a, b) => {
            if evaluate(a, surfaces, point)? {
                return Ok(true);
            }
            evaluate(b, surfaces, point)
        }
    }
}

/// Finds the candidate cell on the opposite side of a physical boundary:
/// the one whose rule references the negated signed id.
///
/// Candidate sets are expected to be pre-filtered (typically by group
/// membership); the scan is linear.
#[must_use]
pub fn find_neighbor<'a>(
    boundary: SignedSurface,
    candidates: &[&'a Cell],
) -> Option<&'a Cell> {
    let opposite = boundary.complement();
    candidates
        .iter()
        .find(|cell| cell.rule.contains_signed(opposite))
        .copied()
}
