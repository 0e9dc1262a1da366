//! Clustering job trait.

use super::export::{Cluster, ClusterHistory};
use crate::error::Result;

/// Something that turns a fully materialized point set into cluster records.
///
/// [`LocalCanopyJob`](super::LocalCanopyJob) runs in memory. A distributed
/// driver can implement the same trait; callers pick one explicitly.
pub trait ClusteringJob {
    /// Cluster `points`, appending per-iteration snapshots to `history`.
    ///
    /// Returns the final clusters (the same records as the last snapshot).
    fn run(&self, points: &[Vec<f32>], history: &mut ClusterHistory) -> Result<Vec<Cluster>>;
}
