mod parse;

use crate::surface::{SignedSurface, SurfaceId};
use std::collections::BTreeSet;
use std::fmt;

/// A boolean expression tree over signed surface references.
///
/// `True` is the "no constraint" rule: it is the identity element of AND,
/// which is what lets optional boundary cuts be absent without special
/// casing at every composition site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// No constraint; contains every point.
    True,
    /// Membership in one half-space.
    Leaf(SignedSurface),
    /// Intersection of two sub-rules.
    And(Box<Rule>, Box<Rule>),
    /// Union of two sub-rules.
    Or(Box<Rule>, Box<Rule>),
}

impl Rule {
    fn complemented(&self) -> Rule {
        match self {
            Self::True => Self::True,
            Self::Leaf(s) => Self::Leaf(s.complement()),
            Self::And(a, b) => Self::Or(Box::new(a.complemented()), Box::new(b.complemented())),
            Self::Or(a, b) => Self::And(Box::new(a.complemented()), Box::new(b.complemented())),
        }
    }

    fn collect_surfaces(&self, out: &mut BTreeSet<SurfaceId>) {
        match self {
            Self::True => {}
            Self::Leaf(s) => {
                out.insert(s.id());
            }
            Self::And(a, b) | Self::Or(a, b) => {
                a.collect_surfaces(out);
                b.collect_surfaces(out);
            }
        }
    }

    fn contains_signed(&self, reference: SignedSurface) -> bool {
        match self {
            Self::True => false,
            Self::Leaf(s) => *s == reference,
            Self::And(a, b) | Self::Or(a, b) => {
                a.contains_signed(reference) || b.contains_signed(reference)
            }
        }
    }

    fn substitute(&mut self, old: SurfaceId, new: SurfaceId) {
        match self {
            Self::True => {}
            Self::Leaf(s) => {
                if s.id() == old {
                    *s = s.with_id(new);
                }
            }
            Self::And(a, b) | Self::Or(a, b) => {
                a.substitute(old, new);
                b.substitute(old, new);
            }
        }
    }

    fn write(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => Ok(()),
            Self::Leaf(s) => write!(f, "{s}"),
            Self::And(a, b) => {
                a.write(f)?;
                write!(f, " ")?;
                b.write(f)
            }
            // OR groups are always parenthesized, so that concatenating two
            // serialized fragments reparses as their intersection.
            Self::Or(a, b) => {
                write!(f, "(")?;
                a.write(f)?;
                write!(f, " : ")?;
                b.write(f)?;
                write!(f, ")")
            }
        }
    }
}

/// Owner of one boolean rule tree.
///
/// The textual grammar ([`parse`](HeadRule::parse) / [`Display`]) is the
/// interop boundary with component code; composition inside the kernel goes
/// through the tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadRule {
    root: Rule,
}

impl Default for HeadRule {
    /// The empty ("always true") rule.
    fn default() -> Self {
        Self { root: Rule::True }
    }
}

impl HeadRule {
    /// Wraps an explicit rule tree.
    #[must_use]
    pub fn new(root: Rule) -> Self {
        Self { root }
    }

    /// A single half-space membership rule.
    #[must_use]
    pub fn leaf(reference: SignedSurface) -> Self {
        Self {
            root: Rule::Leaf(reference),
        }
    }

    /// Returns the root of the tree.
    #[must_use]
    pub fn root(&self) -> &Rule {
        &self.root
    }

    /// Whether this is the empty ("always true") rule.
    #[must_use]
    pub fn is_true(&self) -> bool {
        matches!(self.root, Rule::True)
    }

    /// De Morgan complement: AND and OR swap, every leaf's sign flips.
    ///
    /// The empty rule complements to itself; there is no "always false"
    /// node, and no caller complements an absent constraint.
    #[must_use]
    pub fn complement(&self) -> Self {
        Self {
            root: self.root.complemented(),
        }
    }

    /// Builds the union of two rules. The empty rule dominates.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_true() || other.is_true() {
            return Self::default();
        }
        Self {
            root: Rule::Or(Box::new(self.root.clone()), Box::new(other.root.clone())),
        }
    }

    /// Builds the intersection of two rules. The empty rule is the identity.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        if self.is_true() {
            return other.clone();
        }
        if other.is_true() {
            return self.clone();
        }
        Self {
            root: Rule::And(Box::new(self.root.clone()), Box::new(other.root.clone())),
        }
    }

    /// In-place AND with another rule.
    pub fn intersect_with(&mut self, other: &Self) {
        if other.is_true() {
            return;
        }
        let current = std::mem::replace(&mut self.root, Rule::True);
        self.root = if matches!(current, Rule::True) {
            other.root.clone()
        } else {
            Rule::And(Box::new(current), Box::new(other.root.clone()))
        };
    }

    /// Every unsigned surface id referenced anywhere in the tree.
    #[must_use]
    pub fn surfaces(&self) -> BTreeSet<SurfaceId> {
        let mut out = BTreeSet::new();
        self.root.collect_surfaces(&mut out);
        out
    }

    /// Whether the tree has a leaf equal to the given signed reference.
    #[must_use]
    pub fn contains_signed(&self, reference: SignedSurface) -> bool {
        self.root.contains_signed(reference)
    }

    /// Rewrites every reference to `old` onto `new`, preserving sides.
    /// Consumes the remap produced by surface deduplication.
    pub fn substitute(&mut self, old: SurfaceId, new: SurfaceId) {
        self.root.substitute(old, new);
    }
}

impl fmt::Display for HeadRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.write(f)
    }
}
