//! Centroid updates and bounded refinement.
//!
//! A canopy built in one pass is centered on its seed, which is just the
//! first point that happened to claim the region. Recentering on the member
//! mean gives a better summary:
//!
//! ```text
//! center = (1 / |members|) · Σ members
//! ```
//!
//! [`Refinement`] goes further and alternates, k-means style, between
//! reassigning members (every point within `t1` of the current center) and
//! recentering, until centers stop moving or an iteration limit is hit.

use super::builder::check_points;
use super::canopy::Canopy;
use crate::distance::DistanceMeasure;
use crate::error::{Error, Result};
use log::{debug, warn};

/// Coordinate-wise mean of the points at `members`.
///
/// The first member fixes the dimension every other member must share.
/// Returns `Ok(None)` when `members` is empty.
///
/// # Errors
///
/// [`Error::InvalidParameter`] when an index falls outside `points`;
/// [`Error::DimensionMismatch`] when members differ in length.
pub fn centroid(points: &[Vec<f32>], members: &[usize]) -> Result<Option<Vec<f32>>> {
    let resolved: Vec<&[f32]> = members
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
        .collect::<Result<_>>()?;
    match resolved.first() {
        Some(first) => mean(&resolved, first.len()).map(Some),
        None => Ok(None),
    }
}

/// Return a copy of `canopy` centered on the mean of its members.
///
/// The input is left untouched, so the update can be repeated safely.
///
/// # Errors
///
/// - [`Error::EmptyCanopy`] when the canopy has no members.
/// - [`Error::InvalidParameter`] when a member index falls outside `points`.
/// - [`Error::DimensionMismatch`] when a member's length differs from the
///   canopy center's.
pub fn update_centroid(canopy: &Canopy, points: &[Vec<f32>]) -> Result<Canopy> {
    if canopy.is_empty() {
        return Err(Error::EmptyCanopy { id: canopy.id() });
    }
    let resolved = canopy.member_points(points)?;
    let center = mean(&resolved, canopy.center().len())?;
    Ok(canopy.with_center(center))
}

// `resolved` must be non-empty.
fn mean(resolved: &[&[f32]], dim: usize) -> Result<Vec<f32>> {
    let mut sum = vec![0.0f64; dim];
    for point in resolved {
        if point.len() != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                found: point.len(),
            });
        }
        for (s, &x) in sum.iter_mut().zip(point.iter()) {
            *s += f64::from(x);
        }
    }

    let count = resolved.len() as f64;
    Ok(sum.into_iter().map(|s| (s / count) as f32).collect())
}

/// [`update_centroid`] over every canopy, preserving order.
pub fn update_centroids(canopies: &[Canopy], points: &[Vec<f32>]) -> Result<Vec<Canopy>> {
    canopies
        .iter()
        .map(|c| update_centroid(c, points))
        .collect()
}

/// Bounded multi-pass centroid refinement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Refinement {
    /// Maximum reassign-and-recenter passes.
    max_iter: usize,
    /// Stop once no center moves further than this.
    tol: f32,
}

/// Canopies after refinement, with how it ended.
#[derive(Debug, Clone, PartialEq)]
pub struct RefinementOutcome {
    /// Refined canopies, same order and ids as the input.
    pub canopies: Vec<Canopy>,
    /// Reassign-and-recenter passes performed.
    pub iterations: usize,
    /// Whether the largest center shift fell within tolerance.
    pub converged: bool,
}

impl Default for Refinement {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Refinement {
    /// Refine for at most `max_iter` passes.
    pub fn new(max_iter: usize) -> Self {
        Self {
            max_iter,
            tol: 1e-4,
        }
    }

    /// Set maximum passes.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance (in units of the distance measure).
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Maximum passes.
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Refine `canopies` against `points`.
    pub fn run<D: DistanceMeasure>(
        &self,
        canopies: &[Canopy],
        points: &[Vec<f32>],
        measure: &D,
    ) -> Result<RefinementOutcome> {
        self.run_with(canopies, points, measure, |_, _| {})
    }

    /// Like [`run`](Self::run), calling `on_pass(pass, canopies)` after every
    /// pass (starting at 1).
    ///
    /// Centers are first moved to their member means. Each pass then
    /// reassigns members as all points within the canopy's `t1` of its center
    /// and recenters again. A reassignment that would leave a canopy empty
    /// keeps its previous members.
    pub fn run_with<D, F>(
        &self,
        canopies: &[Canopy],
        points: &[Vec<f32>],
        measure: &D,
        mut on_pass: F,
    ) -> Result<RefinementOutcome>
    where
        D: DistanceMeasure,
        F: FnMut(usize, &[Canopy]),
    {
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        if self.tol.is_nan() || self.tol < 0.0 {
            return Err(Error::InvalidParameter {
                name: "tol",
                message: "must be non-negative",
            });
        }
        let dim = check_points(points)?;
        if let Some(c) = canopies.iter().find(|c| c.center().len() != dim) {
            return Err(Error::DimensionMismatch {
                expected: dim,
                found: c.center().len(),
            });
        }

        let mut current = update_centroids(canopies, points)?;
        let mut iterations = 0;
        let mut converged = false;

        for pass in 1..=self.max_iter {
            let reassigned: Vec<Canopy> = current
                .iter()
                .map(|c| reassign(c, points, measure))
                .collect();
            let next = update_centroids(&reassigned, points)?;

            let shift = current
                .iter()
                .zip(next.iter())
                .map(|(a, b)| measure.distance(a.center(), b.center()))
                .fold(0.0f32, f32::max);

            current = next;
            iterations = pass;
            on_pass(pass, &current);
            debug!("refinement pass {pass}: max center shift {shift}");

            if shift <= self.tol {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                "canopy refinement stopped after {} passes without converging",
                iterations
            );
        }

        Ok(RefinementOutcome {
            canopies: current,
            iterations,
            converged,
        })
    }
}

/// Members become every point within `t1` of the current center.
fn reassign<D: DistanceMeasure>(canopy: &Canopy, points: &[Vec<f32>], measure: &D) -> Canopy {
    let t1 = canopy.t1();
    let members: Vec<usize> = points
        .iter()
        .enumerate()
        .filter(|(_, p)| measure.distance(canopy.center(), p) <= t1)
        .map(|(i, _)| i)
        .collect();

    if members.is_empty() {
        canopy.clone()
    } else {
        canopy.with_members(members)
    }
}
