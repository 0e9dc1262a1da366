//! Canopy construction.
//!
//! # The Algorithm (McCallum, Nigam & Ungar, 2000)
//!
//! Two thresholds, `T1 >= T2`:
//!
//! 1. Start with every point as a seed candidate.
//! 2. Take the first remaining candidate `p` as the seed of a new canopy.
//! 3. Every point within `T1` of `p` joins the canopy, including points that
//!    are no longer candidates. Canopies overlap.
//! 4. Every candidate within `T2` of `p` stops being a candidate.
//! 5. Repeat until no candidates remain.
//!
//! The seed is always removed, so the loop makes progress and creates at most
//! one canopy per point. Input order decides which point claims a region
//! first: the result is deterministic for a given order, not across orders.
//!
//! ```text
//!            T1
//!        .---------.
//!      /   .-----.   \      members:  within T1 of the seed
//!     |   |  T2 p |   |     excluded: within T2, never a future seed
//!      \   '-----'   /
//!        '---------'
//! ```
//!
//! # Scaling
//!
//! The candidate loop is inherently sequential. [`CanopyBuilder::build_sharded`]
//! partitions the input into contiguous shards, canopy-clusters each shard on
//! its own (in parallel with the `parallel` feature), then runs the same
//! threshold logic over the shard centers to merge them.
//!
//! # Complexity
//!
//! - **Time**: O(n · c) distance evaluations for c canopies.
//! - **Space**: O(n) for candidates plus the member lists.
//!
//! # References
//!
//! McCallum, Nigam & Ungar (2000). "Efficient Clustering of High-Dimensional
//! Data Sets with Application to Reference Matching." KDD-2000.

use super::canopy::{Canopy, Thresholds};
use super::centroid::centroid;
use crate::distance::{DistanceMeasure, Euclidean};
use crate::error::{Error, Result};
use log::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Canopy construction with a pluggable distance measure.
#[derive(Debug, Clone)]
pub struct CanopyBuilder<D = Euclidean> {
    /// Loose (membership) threshold.
    t1: f32,
    /// Tight (seed exclusion) threshold.
    t2: f32,
    /// Thresholds for the merge level of a sharded build.
    merge: Option<(f32, f32)>,
    /// Points per shard for a sharded build.
    shard_size: Option<usize>,
    measure: D,
}

impl CanopyBuilder<Euclidean> {
    /// Create a builder with Euclidean distance.
    ///
    /// Thresholds are validated when building.
    pub fn new(t1: f32, t2: f32) -> Self {
        Self {
            t1,
            t2,
            merge: None,
            shard_size: None,
            measure: Euclidean,
        }
    }
}

impl<D: DistanceMeasure> CanopyBuilder<D> {
    /// Use a different distance measure.
    pub fn with_measure<M: DistanceMeasure>(self, measure: M) -> CanopyBuilder<M> {
        CanopyBuilder {
            t1: self.t1,
            t2: self.t2,
            merge: self.merge,
            shard_size: self.shard_size,
            measure,
        }
    }

    /// Set thresholds used when merging shard centers (default: `t1`, `t2`).
    pub fn with_merge_thresholds(mut self, t3: f32, t4: f32) -> Self {
        self.merge = Some((t3, t4));
        self
    }

    /// Set the shard size for [`build_sharded`](Self::build_sharded).
    pub fn with_shard_size(mut self, shard_size: usize) -> Self {
        self.shard_size = Some(shard_size);
        self
    }

    /// Configured shard size, if any.
    pub fn shard_size(&self) -> Option<usize> {
        self.shard_size
    }

    /// The distance measure.
    pub fn measure(&self) -> &D {
        &self.measure
    }

    /// Validated `(t1, t2)`.
    pub fn thresholds(&self) -> Result<Thresholds> {
        Thresholds::new(self.t1, self.t2)
    }

    /// Validated merge thresholds, falling back to `(t1, t2)`.
    pub fn merge_thresholds(&self) -> Result<Thresholds> {
        match self.merge {
            Some((t3, t4)) => Thresholds::new(t3, t4),
            None => self.thresholds(),
        }
    }

    /// Build canopies in a single pass over `points`, in the order given.
    ///
    /// Empty input yields no canopies.
    ///
    /// ```rust
    /// use canopy::CanopyBuilder;
    ///
    /// let points = vec![vec![0.0, 0.0], vec![0.1, 0.1], vec![10.0, 10.0]];
    /// let canopies = CanopyBuilder::new(1.0, 0.5).build(&points).unwrap();
    ///
    /// assert_eq!(canopies.len(), 2);
    /// assert_eq!(canopies[0].members(), &[0, 1]);
    /// assert_eq!(canopies[1].members(), &[2]);
    /// ```
    pub fn build(&self, points: &[Vec<f32>]) -> Result<Vec<Canopy>> {
        let thresholds = self.thresholds()?;
        let dim = check_points(points)?;

        debug!(
            "building canopies: n={} dim={} t1={} t2={} measure={}",
            points.len(),
            dim,
            thresholds.t1(),
            thresholds.t2(),
            self.measure.name()
        );

        let canopies = single_pass(points, &self.measure, thresholds);
        debug!("built {} canopies from {} points", canopies.len(), points.len());
        Ok(canopies)
    }

    /// Build canopies shard by shard, then merge shard centers.
    ///
    /// Each contiguous shard of `shard_size` points is canopy-clustered on its
    /// own and every shard canopy is centered on its member mean. The shard
    /// centers are then canopy-clustered with the merge thresholds. A merged
    /// canopy is centered on its seed shard center, carries the merge
    /// thresholds, and its members are the union of the members of every
    /// shard canopy it absorbed, in input order.
    pub fn build_sharded(&self, points: &[Vec<f32>]) -> Result<Vec<Canopy>> {
        let thresholds = self.thresholds()?;
        let merge = self.merge_thresholds()?;
        let shard_size = match self.shard_size {
            Some(s) if s > 0 => s,
            Some(_) => {
                return Err(Error::InvalidParameter {
                    name: "shard_size",
                    message: "must be at least 1",
                })
            }
            None => {
                return Err(Error::InvalidParameter {
                    name: "shard_size",
                    message: "not configured",
                })
            }
        };
        check_points(points)?;

        if points.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            "building sharded canopies: n={} shard_size={} t1={} t2={} t3={} t4={}",
            points.len(),
            shard_size,
            thresholds.t1(),
            thresholds.t2(),
            merge.t1(),
            merge.t2()
        );

        #[cfg(feature = "parallel")]
        let shards: Vec<Vec<Canopy>> = points
            .par_chunks(shard_size)
            .enumerate()
            .map(|(i, shard)| self.build_shard(points, i * shard_size, shard, thresholds))
            .collect::<Result<_>>()?;

        #[cfg(not(feature = "parallel"))]
        let shards: Vec<Vec<Canopy>> = points
            .chunks(shard_size)
            .enumerate()
            .map(|(i, shard)| self.build_shard(points, i * shard_size, shard, thresholds))
            .collect::<Result<_>>()?;

        let local: Vec<Canopy> = shards.into_iter().flatten().collect();
        let centers: Vec<Vec<f32>> = local.iter().map(|c| c.center().to_vec()).collect();

        let merged: Vec<Canopy> = single_pass(&centers, &self.measure, merge)
            .into_iter()
            .map(|m| {
                let mut members: Vec<usize> = m
                    .members()
                    .iter()
                    .flat_map(|&li| local[li].members().iter().copied())
                    .collect();
                members.sort_unstable();
                members.dedup();
                m.with_members(members)
            })
            .collect();

        debug!(
            "merged {} shard canopies into {} canopies",
            local.len(),
            merged.len()
        );
        Ok(merged)
    }

    /// Canopy-cluster one shard and center each canopy on its member mean.
    ///
    /// Member indices are rebased onto the full point slice.
    fn build_shard(
        &self,
        points: &[Vec<f32>],
        offset: usize,
        shard: &[Vec<f32>],
        thresholds: Thresholds,
    ) -> Result<Vec<Canopy>> {
        let canopies = single_pass(shard, &self.measure, thresholds);
        trace!(
            "shard at {}: {} points -> {} canopies",
            offset,
            shard.len(),
            canopies.len()
        );

        canopies
            .into_iter()
            .map(|c| {
                let members: Vec<usize> = c.members().iter().map(|&i| i + offset).collect();
                let center =
                    centroid(points, &members)?.ok_or(Error::EmptyCanopy { id: c.id() })?;
                Ok(Canopy::new(c.id(), center, members, thresholds))
            })
            .collect()
    }
}

/// Build canopies in one pass with the given measure and thresholds.
///
/// Shorthand for `CanopyBuilder::new(t1, t2).with_measure(measure).build(points)`.
pub fn build_canopies<D: DistanceMeasure>(
    points: &[Vec<f32>],
    measure: D,
    t1: f32,
    t2: f32,
) -> Result<Vec<Canopy>> {
    CanopyBuilder::new(t1, t2).with_measure(measure).build(points)
}

/// Check every point has the same dimension and finite coordinates.
///
/// Returns the common dimension (0 for empty input).
pub(crate) fn check_points(points: &[Vec<f32>]) -> Result<usize> {
    let Some(first) = points.first() else {
        return Ok(0);
    };
    let dim = first.len();
    for point in points {
        if point.len() != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                found: point.len(),
            });
        }
        if point.iter().any(|x| !x.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "points",
                message: "coordinates must be finite",
            });
        }
    }
    Ok(dim)
}

/// The candidate loop. Inputs are already validated.
fn single_pass<D: DistanceMeasure>(
    points: &[Vec<f32>],
    measure: &D,
    thresholds: Thresholds,
) -> Vec<Canopy> {
    let (t1, t2) = (thresholds.t1(), thresholds.t2());
    let mut candidates: Vec<usize> = (0..points.len()).collect();
    let mut canopies = Vec::new();

    while let Some(&seed) = candidates.first() {
        let center = &points[seed];

        // Seed is a member even if the measure disagrees.
        #[cfg(feature = "parallel")]
        let members: Vec<usize> = (0..points.len())
            .into_par_iter()
            .filter(|&q| q == seed || measure.distance(center, &points[q]) <= t1)
            .collect();

        #[cfg(not(feature = "parallel"))]
        let members: Vec<usize> = (0..points.len())
            .filter(|&q| q == seed || measure.distance(center, &points[q]) <= t1)
            .collect();

        candidates.retain(|&q| q != seed && measure.distance(center, &points[q]) > t2);

        canopies.push(Canopy::new(
            canopies.len(),
            center.clone(),
            members,
            thresholds,
        ));
    }

    canopies
}
