//! Axis-aligned bounds and the provider seam the framing solver reads from.

use glam::{Mat4, Vec3};

/// World- or local-space axis-aligned box.
///
/// A box with zero [`size`](Self::size) means "nothing to fit": an empty mesh,
/// or a mesh collapsed to a single point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    pub const EMPTY: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    /// Builds a box from two opposite corners in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box holding every finite point. Empty input yields [`Self::EMPTY`].
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut acc: Option<Self> = None;
        for p in points {
            if !p.is_finite() {
                continue;
            }
            acc = Some(match acc {
                Some(b) => b.expanded_to(p),
                None => Self { min: p, max: p },
            });
        }
        acc.unwrap_or(Self::EMPTY)
    }

    pub fn expanded_to(self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Component-wise extent, never negative.
    pub fn size(&self) -> Vec3 {
        (self.max - self.min).max(Vec3::ZERO)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn is_degenerate(&self) -> bool {
        self.size() == Vec3::ZERO
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Re-boxes the eight transformed corners.
    pub fn transformed(&self, m: &Mat4) -> Self {
        Self::from_points(self.corners().into_iter().map(|c| m.transform_point3(c)))
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Anything that can report the bounds of the geometry it displays.
///
/// Implementations must not mutate state and must cover the whole object,
/// children included. Objects without geometry report a zero-size box.
pub trait BoundsProvider {
    fn compute_bounds(&self) -> BoundingBox;
}
