//! Canopy and threshold types.

use crate::error::{Error, Result};

/// The validated threshold pair of a canopy run.
///
/// `t1` (loose) bounds membership, `t2` (tight) bounds seed exclusion.
/// Construction enforces `t1 >= t2 > 0` with both values finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    t1: f32,
    t2: f32,
}

impl Thresholds {
    /// Validate and create a threshold pair.
    ///
    /// ```rust
    /// use canopy::Thresholds;
    ///
    /// assert!(Thresholds::new(3.0, 2.8).is_ok());
    /// assert!(Thresholds::new(0.5, 1.0).is_err());
    /// ```
    pub fn new(t1: f32, t2: f32) -> Result<Self> {
        if !(t1.is_finite() && t2.is_finite()) || t2 <= 0.0 || t1 < t2 {
            return Err(Error::InvalidThreshold { t1, t2 });
        }
        Ok(Self { t1, t2 })
    }

    /// Loose threshold: maximum distance for membership.
    pub fn t1(&self) -> f32 {
        self.t1
    }

    /// Tight threshold: maximum distance for exclusion from seeding.
    pub fn t2(&self) -> f32 {
        self.t2
    }
}

/// An overlapping, cheaply computed cluster.
///
/// Members are indices into the point slice the canopy was built from, in
/// input order. A point may belong to many canopies.
#[derive(Debug, Clone, PartialEq)]
pub struct Canopy {
    id: usize,
    center: Vec<f32>,
    members: Vec<usize>,
    thresholds: Thresholds,
}

impl Canopy {
    pub(crate) fn new(
        id: usize,
        center: Vec<f32>,
        members: Vec<usize>,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            id,
            center,
            members,
            thresholds,
        }
    }

    /// Identifier, unique within one run (creation order).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Current center.
    pub fn center(&self) -> &[f32] {
        &self.center
    }

    /// Member indices, in input order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the canopy has no members.
    ///
    /// Never the case for canopies produced by a builder.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether point `index` is a member.
    pub fn contains(&self, index: usize) -> bool {
        // Members are sorted (input order).
        self.members.binary_search(&index).is_ok()
    }

    /// Threshold pair the canopy was built with.
    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Loose threshold.
    pub fn t1(&self) -> f32 {
        self.thresholds.t1
    }

    /// Tight threshold.
    pub fn t2(&self) -> f32 {
        self.thresholds.t2
    }

    /// Resolve member indices against the point slice the canopy came from.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] when a member index falls outside `points`,
    /// which means `points` is not the slice the canopy was built from.
    pub fn member_points<'a>(&self, points: &'a [Vec<f32>]) -> Result<Vec<&'a [f32]>> {
        self.members
            .iter()
            .map(|&i| {
                points
                    .get(i)
                    .map(Vec::as_slice)
                    .ok_or(Error::InvalidParameter {
                        name: "members",
                        message: "member index out of range",
                    })
            })
            .collect()
    }

    pub(crate) fn with_center(&self, center: Vec<f32>) -> Self {
        Self {
            center,
            ..self.clone()
        }
    }

    pub(crate) fn with_members(&self, members: Vec<usize>) -> Self {
        Self {
            members,
            ..self.clone()
        }
    }
}
