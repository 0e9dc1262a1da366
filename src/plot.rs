//! Ellipse geometry for drawing cluster histories.
//!
//! Nothing here draws. [`plot_history`] turns a [`ClusterHistory`] into the
//! ellipses a renderer should paint:
//!
//! - one ellipse at `t1` and one at `t2` around every cluster center, and
//! - one at `radius × radius_scale`, banded by snapshot age (newest = band 0).
//!
//! `radius_scale` and `max_bands` are presentation choices. They say nothing
//! statistical about the clusters; callers reusing the clustering without a
//! renderer can ignore this module.

use crate::cluster::{ClusterHistory, Thresholds};

/// Presentation constants for cluster plots.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlotPolicy {
    /// Multiplier applied to the reported radius (default: 3.0)
    pub radius_scale: f32,
    /// Distinct age bands; older snapshots share the last one (default: 7)
    pub max_bands: usize,
    /// Stroke width of the newest snapshot's extent ellipses (default: 3)
    pub latest_stroke: u32,
    /// Stroke width of everything else (default: 1)
    pub stroke: u32,
}

impl Default for PlotPolicy {
    fn default() -> Self {
        Self {
            radius_scale: 3.0,
            max_bands: 7,
            latest_stroke: 3,
            stroke: 1,
        }
    }
}

/// What an ellipse outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EllipseKind {
    /// Membership threshold `t1`.
    Loose,
    /// Seed exclusion threshold `t2`.
    Tight,
    /// Scaled cluster radius.
    Extent,
}

/// One ellipse to draw.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipse {
    /// Id of the cluster it belongs to.
    pub cluster_id: usize,
    /// What it outlines.
    pub kind: EllipseKind,
    /// Center point.
    pub center: Vec<f32>,
    /// Per-dimension radii.
    pub radii: Vec<f32>,
    /// Age band for [`EllipseKind::Extent`]; `None` for threshold ellipses.
    pub band: Option<usize>,
    /// Stroke width.
    pub stroke: u32,
}

/// Ellipses for every cluster of every snapshot, oldest snapshot first.
///
/// ```rust
/// use canopy::plot::{plot_history, EllipseKind, PlotPolicy};
/// use canopy::{Cluster, ClusterHistory, Thresholds};
///
/// let mut history = ClusterHistory::new();
/// history.push(vec![Cluster {
///     id: 0,
///     center: vec![0.0, 0.0],
///     radius: vec![0.5, 0.5],
///     population_fraction: 1.0,
/// }]);
///
/// let th = Thresholds::new(1.0, 0.5).unwrap();
/// let ellipses = plot_history(&history, th, &PlotPolicy::default());
/// assert_eq!(ellipses.len(), 3);
/// assert_eq!(ellipses[2].kind, EllipseKind::Extent);
/// assert_eq!(ellipses[2].radii, vec![1.5, 1.5]);
/// ```
pub fn plot_history(
    history: &ClusterHistory,
    thresholds: Thresholds,
    policy: &PlotPolicy,
) -> Vec<Ellipse> {
    let last_band = policy.max_bands.saturating_sub(1);
    let newest = history.len().saturating_sub(1);
    let mut out = Vec::new();

    for (index, snapshot) in history.iter().enumerate() {
        let age = newest - index;
        let band = age.min(last_band);
        let extent_stroke = if age == 0 {
            policy.latest_stroke
        } else {
            policy.stroke
        };

        for cluster in snapshot {
            let dim = cluster.center.len();
            for (kind, r) in [
                (EllipseKind::Loose, thresholds.t1()),
                (EllipseKind::Tight, thresholds.t2()),
            ] {
                out.push(Ellipse {
                    cluster_id: cluster.id,
                    kind,
                    center: cluster.center.clone(),
                    radii: vec![r; dim],
                    band: None,
                    stroke: policy.stroke,
                });
            }
            out.push(Ellipse {
                cluster_id: cluster.id,
                kind: EllipseKind::Extent,
                center: cluster.center.clone(),
                radii: cluster.radius.iter().map(|r| r * policy.radius_scale).collect(),
                band: Some(band),
                stroke: extent_stroke,
            });
        }
    }

    out
}
