//! Export of canopies as generic cluster records.
//!
//! A [`Cluster`] is what leaves the crate: a center, a per-dimension radius
//! and the population fraction. The reported radius is the canopy's tight
//! threshold `t2` in every dimension; `t1` bounds membership but is not the
//! extent of the cluster.

use super::canopy::Canopy;
use super::significance::SignificanceFilter;
use crate::error::{Error, Result};

/// Read-only cluster record handed to renderers and job drivers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cluster {
    /// Id of the canopy this record came from.
    pub id: usize,
    /// Center point.
    pub center: Vec<f32>,
    /// Per-dimension spread.
    pub radius: Vec<f32>,
    /// Members over total points, in `[0, 1]`.
    pub population_fraction: f64,
}

/// Export one canopy from a run over `total_points` points.
///
/// # Errors
///
/// [`Error::InvalidParameter`] when `total_points` is zero or smaller than
/// the canopy's member count.
pub fn export(canopy: &Canopy, total_points: usize) -> Result<Cluster> {
    if total_points == 0 || total_points < canopy.len() {
        return Err(Error::InvalidParameter {
            name: "total_points",
            message: "must be positive and at least the canopy size",
        });
    }

    Ok(Cluster {
        id: canopy.id(),
        center: canopy.center().to_vec(),
        radius: vec![canopy.t2(); canopy.center().len()],
        population_fraction: canopy.len() as f64 / total_points as f64,
    })
}

/// Drop non-significant canopies and export the rest, in order.
pub fn export_all(
    canopies: &[Canopy],
    filter: &SignificanceFilter,
    total_points: usize,
) -> Result<Vec<Cluster>> {
    canopies
        .iter()
        .filter(|c| filter.is_significant(c, total_points))
        .map(|c| export(c, total_points))
        .collect()
}

/// Per-iteration cluster snapshots of one run, oldest first.
///
/// Owned by the caller and passed to a job explicitly, so separate runs never
/// share state and can be compared side by side.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterHistory {
    snapshots: Vec<Vec<Cluster>>,
}

impl ClusterHistory {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot.
    pub fn push(&mut self, snapshot: Vec<Cluster>) {
        self.snapshots.push(snapshot);
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Most recent snapshot.
    pub fn latest(&self) -> Option<&[Cluster]> {
        self.snapshots.last().map(Vec::as_slice)
    }

    /// Snapshot by iteration index (0 = first recorded).
    pub fn get(&self, iteration: usize) -> Option<&[Cluster]> {
        self.snapshots.get(iteration).map(Vec::as_slice)
    }

    /// Snapshots, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &[Cluster]> {
        self.snapshots.iter().map(Vec::as_slice)
    }

    /// Snapshots paired with their age, newest first (age 0 = latest).
    pub fn iter_newest_first(&self) -> impl Iterator<Item = (usize, &[Cluster])> {
        self.snapshots
            .iter()
            .rev()
            .enumerate()
            .map(|(age, s)| (age, s.as_slice()))
    }
}

impl Extend<Vec<Cluster>> for ClusterHistory {
    fn extend<I: IntoIterator<Item = Vec<Cluster>>>(&mut self, snapshots: I) {
        self.snapshots.extend(snapshots);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{CanopyBuilder, Thresholds};

    #[test]
    fn test_export_broadcasts_t2() {
        let points = vec![vec![0.0, 0.0, 0.0], vec![0.1, 0.1, 0.1], vec![9.0, 9.0, 9.0]];
        let canopies = CanopyBuilder::new(1.0, 0.5).build(&points).unwrap();

        let c = export(&canopies[0], points.len()).unwrap();
        assert_eq!(c.id, 0);
        assert_eq!(c.center, vec![0.0, 0.0, 0.0]);
        assert_eq!(c.radius, vec![0.5, 0.5, 0.5]);
        assert!((c.population_fraction - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_export_rejects_bad_totals() {
        let th = Thresholds::new(1.0, 0.5).unwrap();
        let canopy = Canopy::new(0, vec![0.0], vec![0, 1, 2], th);

        assert!(export(&canopy, 0).is_err());
        assert!(export(&canopy, 2).is_err());
        assert!(export(&canopy, 3).is_ok());
    }

    #[test]
    fn test_export_all_drops_insignificant() {
        let points = vec![vec![0.0], vec![0.1], vec![0.2], vec![10.0]];
        let canopies = CanopyBuilder::new(1.0, 0.5).build(&points).unwrap();
        let filter = SignificanceFilter::new(0.5).unwrap();

        let clusters = export_all(&canopies, &filter, points.len()).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].id, 0);
        assert_eq!(clusters[0].population_fraction, 0.75);
    }

    #[test]
    fn test_fractions_may_sum_past_one() {
        let points = vec![vec![0.0], vec![1.0], vec![1.8]];
        let canopies = CanopyBuilder::new(1.0, 1.0).build(&points).unwrap();

        let total: f64 = canopies
            .iter()
            .map(|c| export(c, points.len()).unwrap().population_fraction)
            .sum();
        assert!(total > 1.0);
    }

    #[test]
    fn test_history_order() {
        let mut h = ClusterHistory::new();
        assert!(h.is_empty());
        assert!(h.latest().is_none());

        let snap = |id| {
            vec![Cluster {
                id,
                center: vec![0.0],
                radius: vec![1.0],
                population_fraction: 1.0,
            }]
        };
        h.push(snap(0));
        h.push(snap(1));
        h.push(snap(2));

        assert_eq!(h.len(), 3);
        assert_eq!(h.latest().unwrap()[0].id, 2);
        assert_eq!(h.get(0).unwrap()[0].id, 0);

        let ages: Vec<(usize, usize)> = h
            .iter_newest_first()
            .map(|(age, s)| (age, s[0].id))
            .collect();
        assert_eq!(ages, vec![(0, 2), (1, 1), (2, 0)]);
        let oldest_first: Vec<usize> = h.iter().map(|s| s[0].id).collect();
        assert_eq!(oldest_first, vec![0, 1, 2]);

        h.extend([snap(3), snap(4)]);
        assert_eq!(h.len(), 5);
        assert_eq!(h.latest().unwrap()[0].id, 4);
    }
}
