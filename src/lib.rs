//! # canopy
//!
//! Canopy clustering: a cheap, two-threshold pre-clustering that splits a
//! point set into overlapping canopies before an expensive clustering pass.
//!
//! **Default build** is sequential and dependency-light. Sharded builds run
//! shards in parallel with the `parallel` feature; `serde` makes configuration
//! and cluster records persistable.

pub mod cluster;
pub mod distance;
/// Error types used across `canopy`.
pub mod error;
pub mod plot;

#[cfg(test)]
mod pipeline_tests;

pub use cluster::{
    build_canopies, export, export_all, update_centroid, update_centroids, Canopy, CanopyBuilder,
    CanopyConfig, Cluster, ClusterHistory, ClusteringJob, LocalCanopyJob, Refinement,
    RefinementOutcome, SignificanceFilter, Thresholds,
};
pub use distance::{
    Chebyshev, Cosine, DistanceMeasure, Euclidean, Manhattan, Metric, Minkowski, SquaredEuclidean,
};
pub use error::{Error, Result};
pub use plot::{plot_history, Ellipse, EllipseKind, PlotPolicy};
