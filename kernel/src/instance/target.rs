//! Target records and the immutable target table.

use crate::digest::hash::{canonical_hash, ContentHash, HashDomain};
use crate::error::KernelError;

/// Target identifier: the target's index in its [`TargetSet`].
pub type TargetId = u32;

/// A point on the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The fixed start position of every route.
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// One row of the input table, before ids and rewards are assigned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRow {
    pub x: f64,
    pub y: f64,
    pub mass: f64,
}

/// An immutable target record.
///
/// `reward` is derived once at construction as `2·mass − 1` and never
/// recomputed afterwards. It is negative for `mass < 0.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub position: Point,
    pub mass: f64,
    pub reward: f64,
}

impl Target {
    /// Build a target, deriving its reward from its mass.
    #[must_use]
    pub fn from_mass(id: TargetId, position: Point, mass: f64) -> Self {
        Self {
            id,
            position,
            mass,
            reward: 2.0 * mass - 1.0,
        }
    }
}

/// The full, validated target table.
///
/// Ids run from `0` to `len() - 1` and equal the index of each target.
/// There is no mutable access: share it by reference or `Arc` across workers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TargetSet {
    targets: Vec<Target>,
}

impl TargetSet {
    /// Validate rows and assign ids in input order.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::NonFiniteTarget`] for NaN or infinite
    /// coordinates or mass, and [`KernelError::TooManyTargets`] if the row
    /// count exceeds the `TargetId` range.
    pub fn from_rows<I>(rows: I) -> Result<Self, KernelError>
    where
        I: IntoIterator<Item = TargetRow>,
    {
        let mut targets = Vec::new();
        for (index, row) in rows.into_iter().enumerate() {
            for (field, value) in [("x", row.x), ("y", row.y), ("mass", row.mass)] {
                if !value.is_finite() {
                    return Err(KernelError::NonFiniteTarget {
                        id: index,
                        field,
                        value,
                    });
                }
            }
            let id = TargetId::try_from(index)
                .map_err(|_| KernelError::TooManyTargets { count: index + 1 })?;
            targets.push(Target::from_mass(id, Point::new(row.x, row.y), row.mass));
        }
        Ok(Self { targets })
    }

    /// Number of targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Look up a target by id.
    #[must_use]
    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.get(id as usize)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Target> {
        self.targets.iter()
    }

    /// All ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.targets.iter().map(|t| t.id)
    }

    /// Positions of the given ids, in order. Unknown ids are skipped.
    #[must_use]
    pub fn positions(&self, path: &[TargetId]) -> Vec<Point> {
        path.iter()
            .filter_map(|&id| self.get(id).map(|t| t.position))
            .collect()
    }

    /// Content commitment over `(x, y, mass)` bit patterns in id order.
    ///
    /// Two tables with the same digest produce identical evaluations.
    #[must_use]
    pub fn digest(&self) -> ContentHash {
        let mut data = Vec::with_capacity(8 + self.targets.len() * 24);
        data.extend_from_slice(&(self.targets.len() as u64).to_le_bytes());
        for t in &self.targets {
            data.extend_from_slice(&t.position.x.to_bits().to_le_bytes());
            data.extend_from_slice(&t.position.y.to_bits().to_le_bytes());
            data.extend_from_slice(&t.mass.to_bits().to_le_bytes());
        }
        canonical_hash(HashDomain::TargetSet, &data)
    }
}

impl<'a> IntoIterator for &'a TargetSet {
    type Item = &'a Target;
    type IntoIter = std::slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}

/// Commitment over a visiting order (ids as `u32` little-endian).
#[must_use]
pub fn route_digest(path: &[TargetId]) -> ContentHash {
    let mut data = Vec::with_capacity(path.len() * 4);
    for id in path {
        data.extend_from_slice(&id.to_le_bytes());
    }
    canonical_hash(HashDomain::Route, &data)
}
