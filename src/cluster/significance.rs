//! Significance filtering.
//!
//! A canopy is significant when it holds at least a given fraction of the
//! points of the run:
//!
//! ```text
//! |members| / n >= significance
//! ```
//!
//! `n` is the number of input points, not the sum of canopy sizes: canopies
//! overlap, so fractions across canopies may sum past 1.

use super::canopy::Canopy;
use crate::error::{Error, Result};

/// Decides which canopies are worth reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignificanceFilter {
    significance: f64,
    min_members: usize,
}

impl SignificanceFilter {
    /// Create a filter.
    ///
    /// Any positive fraction is accepted. Values of 1 or more are legal and
    /// usually keep nothing.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSignificance`] for zero, negative or non-finite values.
    pub fn new(significance: f64) -> Result<Self> {
        if !significance.is_finite() || significance <= 0.0 {
            return Err(Error::InvalidSignificance { significance });
        }
        Ok(Self {
            significance,
            min_members: 0,
        })
    }

    /// Canopies with fewer members are never significant (default: 0).
    pub fn with_min_members(mut self, min_members: usize) -> Self {
        self.min_members = min_members;
        self
    }

    /// Configured fraction.
    pub fn significance(&self) -> f64 {
        self.significance
    }

    /// Configured member floor.
    pub fn min_members(&self) -> usize {
        self.min_members
    }

    /// Whether `canopy` is significant in a run over `total_points` points.
    ///
    /// Nothing is significant in a run without points.
    pub fn is_significant(&self, canopy: &Canopy, total_points: usize) -> bool {
        if total_points == 0 || canopy.len() < self.min_members {
            return false;
        }
        canopy.len() as f64 / total_points as f64 >= self.significance
    }

    /// One flag per canopy, in order. Nothing is removed.
    pub fn mark(&self, canopies: &[Canopy], total_points: usize) -> Vec<bool> {
        canopies
            .iter()
            .map(|c| self.is_significant(c, total_points))
            .collect()
    }

    /// The significant canopies, in their original order.
    pub fn filter(&self, canopies: &[Canopy], total_points: usize) -> Vec<Canopy> {
        canopies
            .iter()
            .filter(|c| self.is_significant(c, total_points))
            .cloned()
            .collect()
    }
}
