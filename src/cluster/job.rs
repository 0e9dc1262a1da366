//! In-memory canopy clustering job.
//!
//! The whole pipeline in one place:
//!
//! ```text
//! points → CanopyBuilder → update_centroids → [Refinement] → SignificanceFilter → Cluster
//! ```

use super::builder::CanopyBuilder;
use super::canopy::Thresholds;
use super::centroid::{update_centroids, Refinement};
use super::export::{export_all, Cluster, ClusterHistory};
use super::significance::SignificanceFilter;
use super::traits::ClusteringJob;
use crate::distance::{DistanceMeasure, Metric};
use crate::error::{Error, Result};
use log::debug;

/// Job-level configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CanopyConfig {
    /// Loose threshold (default: 3.0)
    pub t1: f32,
    /// Tight threshold (default: 2.8)
    pub t2: f32,
    /// Minimum population fraction of a reported cluster (default: 0.05)
    pub significance: f64,
    /// Distance measure (default: Manhattan)
    pub metric: Metric,
    /// Smallest reportable canopy (default: 0)
    pub min_members: usize,
    /// Build shard by shard with this many points per shard (default: off)
    pub shard_size: Option<usize>,
    /// Thresholds for merging shard centers (default: `t1`, `t2`)
    pub merge_thresholds: Option<(f32, f32)>,
    /// Multi-pass refinement after the first centroid update (default: off)
    pub refine: Option<Refinement>,
}

impl Default for CanopyConfig {
    fn default() -> Self {
        Self {
            t1: 3.0,
            t2: 2.8,
            significance: 0.05,
            metric: Metric::Manhattan,
            min_members: 0,
            shard_size: None,
            merge_thresholds: None,
            refine: None,
        }
    }
}

/// Canopy clustering run entirely in memory.
#[derive(Debug, Clone)]
pub struct LocalCanopyJob<D = Metric> {
    builder: CanopyBuilder<D>,
    filter: SignificanceFilter,
    refinement: Option<Refinement>,
}

impl LocalCanopyJob<Metric> {
    /// Build a job from configuration, validating every parameter up front.
    ///
    /// ```rust
    /// use canopy::{CanopyConfig, ClusterHistory, ClusteringJob, LocalCanopyJob};
    ///
    /// let job = LocalCanopyJob::from_config(&CanopyConfig::default()).unwrap();
    /// let points = vec![vec![0.0, 0.0], vec![0.5, 0.5], vec![20.0, 20.0]];
    ///
    /// let mut history = ClusterHistory::new();
    /// let clusters = job.run(&points, &mut history).unwrap();
    /// assert_eq!(clusters.len(), 2);
    /// assert_eq!(history.len(), 1);
    /// ```
    pub fn from_config(config: &CanopyConfig) -> Result<Self> {
        let mut builder = CanopyBuilder::new(config.t1, config.t2).with_measure(config.metric);
        if let Some((t3, t4)) = config.merge_thresholds {
            builder = builder.with_merge_thresholds(t3, t4);
        }
        if let Some(shard_size) = config.shard_size {
            if shard_size == 0 {
                return Err(Error::InvalidParameter {
                    name: "shard_size",
                    message: "must be at least 1",
                });
            }
            builder = builder.with_shard_size(shard_size);
        }
        builder.thresholds()?;
        builder.merge_thresholds()?;

        let filter =
            SignificanceFilter::new(config.significance)?.with_min_members(config.min_members);
        let mut job = LocalCanopyJob::new(builder, filter);
        if let Some(refinement) = config.refine {
            if refinement.max_iter() == 0 {
                return Err(Error::InvalidParameter {
                    name: "max_iter",
                    message: "must be at least 1",
                });
            }
            job = job.with_refinement(refinement);
        }
        Ok(job)
    }
}

impl<D: DistanceMeasure> LocalCanopyJob<D> {
    /// Create a job from a builder and a significance filter.
    ///
    /// The builder's shard size, if set, switches the job to a sharded build.
    pub fn new(builder: CanopyBuilder<D>, filter: SignificanceFilter) -> Self {
        Self {
            builder,
            filter,
            refinement: None,
        }
    }

    /// Refine centers after the first update.
    pub fn with_refinement(mut self, refinement: Refinement) -> Self {
        self.refinement = Some(refinement);
        self
    }

    /// The canopy builder.
    pub fn builder(&self) -> &CanopyBuilder<D> {
        &self.builder
    }

    /// The significance filter.
    pub fn filter(&self) -> &SignificanceFilter {
        &self.filter
    }

    /// Validated `(t1, t2)`.
    pub fn thresholds(&self) -> Result<Thresholds> {
        self.builder.thresholds()
    }
}

impl<D: DistanceMeasure> ClusteringJob for LocalCanopyJob<D> {
    /// Records one snapshot after the initial centroid update and one per
    /// refinement pass. `history` is only extended when the run succeeds.
    fn run(&self, points: &[Vec<f32>], history: &mut ClusterHistory) -> Result<Vec<Cluster>> {
        let total = points.len();

        let built = if self.builder.shard_size().is_some() {
            self.builder.build_sharded(points)?
        } else {
            self.builder.build(points)?
        };
        let mut canopies = update_centroids(&built, points)?;
        let mut snapshots = vec![export_all(&canopies, &self.filter, total)?];

        if let Some(refinement) = &self.refinement {
            let mut failed = None;
            let outcome = refinement.run_with(
                &canopies,
                points,
                self.builder.measure(),
                |_, pass| match export_all(pass, &self.filter, total) {
                    Ok(snapshot) => snapshots.push(snapshot),
                    Err(e) => {
                        failed.get_or_insert(e);
                    }
                },
            )?;
            if let Some(e) = failed {
                return Err(e);
            }
            canopies = outcome.canopies;
        }

        let clusters = export_all(&canopies, &self.filter, total)?;
        debug!(
            "canopy job: {} points, {} canopies, {} significant",
            total,
            canopies.len(),
            clusters.len()
        );
        history.extend(snapshots);
        Ok(clusters)
    }
}
