//! Canopy clustering.
//!
//! Canopies are a cheap first pass over a large point set. Two thresholds,
//! a loose `T1` and a tight `T2` (`T1 >= T2`), carve the data into overlapping
//! regions; an expensive algorithm (k-means, EM) then only has to compare
//! points that share a canopy.
//!
//! ## Pipeline
//!
//! | Stage | Item | Output |
//! |-------|------|--------|
//! | Build | [`CanopyBuilder`] | canopies centered on seeds |
//! | Recenter | [`update_centroids`], [`Refinement`] | canopies centered on member means |
//! | Filter | [`SignificanceFilter`] | which canopies count as clusters |
//! | Export | [`export`], [`export_all`] | [`Cluster`] records |
//!
//! [`LocalCanopyJob`] runs all four behind the [`ClusteringJob`] trait.
//!
//! ## Hard vs Overlapping
//!
//! Unlike k-means labels, canopy membership is not a partition: a point
//! within `T1` of two seeds belongs to both. Population fractions of the
//! canopies of one run may therefore sum past 1.
//!
//! ## Usage
//!
//! ```rust
//! use canopy::cluster::{export_all, update_centroids, CanopyBuilder, SignificanceFilter};
//! use canopy::distance::Manhattan;
//!
//! let points = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//! ];
//!
//! let canopies = CanopyBuilder::new(1.0, 0.5)
//!     .with_measure(Manhattan)
//!     .build(&points)
//!     .unwrap();
//! let canopies = update_centroids(&canopies, &points).unwrap();
//!
//! let filter = SignificanceFilter::new(0.5).unwrap();
//! let clusters = export_all(&canopies, &filter, points.len()).unwrap();
//! assert_eq!(clusters.len(), 1);
//! assert_eq!(clusters[0].radius, vec![0.5, 0.5]);
//! ```

mod builder;
mod canopy;
mod centroid;
mod export;
mod job;
mod significance;
mod traits;

pub use builder::{build_canopies, CanopyBuilder};
pub use canopy::{Canopy, Thresholds};
pub use centroid::{centroid, update_centroid, update_centroids, Refinement, RefinementOutcome};
pub use export::{export, export_all, Cluster, ClusterHistory};
pub use job::{CanopyConfig, LocalCanopyJob};
pub use significance::SignificanceFilter;
pub use traits::ClusteringJob;
