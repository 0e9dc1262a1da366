//! Distance measures between points.
//!
//! Canopy construction only ever asks "is `q` within `t` of `p`?", so any
//! cheap, non-negative function with `distance(p, p) == 0` will do. The cheaper
//! the measure, the more canopies pay off: the expensive clustering pass that
//! follows runs only inside each canopy.
//!
//! | Measure | Formula |
//! |---------|---------|
//! | [`Euclidean`] | `sqrt(Σ (a-b)²)` |
//! | [`SquaredEuclidean`] | `Σ (a-b)²` |
//! | [`Manhattan`] | `Σ |a-b|` |
//! | [`Chebyshev`] | `max |a-b|` |
//! | [`Cosine`] | `1 - a·b / (|a| |b|)` |
//! | [`Minkowski`] | `(Σ |a-b|^p)^(1/p)` |
//!
//! Closures work too:
//!
//! ```rust
//! use canopy::distance::DistanceMeasure;
//!
//! let first_axis = |a: &[f32], b: &[f32]| (a[0] - b[0]).abs();
//! assert_eq!(first_axis.distance(&[1.0, 5.0], &[3.0, -5.0]), 2.0);
//! ```

/// A scalar distance between two points of equal dimension.
///
/// Implementations must be non-negative and return 0 for identical points.
/// Callers guarantee both slices have the same length.
pub trait DistanceMeasure: Send + Sync {
    /// Distance between `a` and `b`.
    fn distance(&self, a: &[f32], b: &[f32]) -> f32;

    /// Short human-readable name, used in logs.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> DistanceMeasure for F
where
    F: Fn(&[f32], &[f32]) -> f32 + Send + Sync,
{
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        self(a, b)
    }
}

/// Straight-line distance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Euclidean;

impl DistanceMeasure for Euclidean {
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        SquaredEuclidean.distance(a, b).sqrt()
    }

    fn name(&self) -> &'static str {
        "euclidean"
    }
}

/// Euclidean distance without the square root.
///
/// Thresholds must be squared accordingly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SquaredEuclidean;

impl DistanceMeasure for SquaredEuclidean {
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
    }

    fn name(&self) -> &'static str {
        "squared-euclidean"
    }
}

/// Sum of absolute coordinate differences (taxicab distance).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Manhattan;

impl DistanceMeasure for Manhattan {
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
    }

    fn name(&self) -> &'static str {
        "manhattan"
    }
}

/// Largest absolute coordinate difference.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Chebyshev;

impl DistanceMeasure for Chebyshev {
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f32::max)
    }

    fn name(&self) -> &'static str {
        "chebyshev"
    }
}

/// One minus cosine similarity, in `[0, 2]`.
///
/// Two zero vectors are at distance 0; a zero vector is at distance 1 from
/// anything else.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cosine;

impl DistanceMeasure for Cosine {
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        let mut dot = 0.0f32;
        let mut na = 0.0f32;
        let mut nb = 0.0f32;
        for (x, y) in a.iter().zip(b.iter()) {
            dot += x * y;
            na += x * x;
            nb += y * y;
        }
        if na == 0.0 && nb == 0.0 {
            return 0.0;
        }
        if na == 0.0 || nb == 0.0 {
            return 1.0;
        }
        // Rounding can push the ratio slightly past 1.
        (1.0 - dot / (na * nb).sqrt()).max(0.0)
    }

    fn name(&self) -> &'static str {
        "cosine"
    }
}

/// Minkowski distance of order `p` (`p = 1` is Manhattan, `p = 2` Euclidean).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minkowski {
    /// Order; values below 1 do not give a metric but are still computed.
    pub p: f32,
}

impl DistanceMeasure for Minkowski {
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs().powf(self.p))
            .sum::<f32>()
            .powf(1.0 / self.p)
    }

    fn name(&self) -> &'static str {
        "minkowski"
    }
}

/// Built-in measures by name, for configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Metric {
    /// [`Euclidean`].
    Euclidean,
    /// [`SquaredEuclidean`].
    SquaredEuclidean,
    /// [`Manhattan`].
    #[default]
    Manhattan,
    /// [`Chebyshev`].
    Chebyshev,
    /// [`Cosine`].
    Cosine,
    /// [`Minkowski`] with the given order.
    Minkowski(f32),
}

impl DistanceMeasure for Metric {
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match *self {
            Metric::Euclidean => Euclidean.distance(a, b),
            Metric::SquaredEuclidean => SquaredEuclidean.distance(a, b),
            Metric::Manhattan => Manhattan.distance(a, b),
            Metric::Chebyshev => Chebyshev.distance(a, b),
            Metric::Cosine => Cosine.distance(a, b),
            Metric::Minkowski(p) => Minkowski { p }.distance(a, b),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Metric::Euclidean => Euclidean.name(),
            Metric::SquaredEuclidean => SquaredEuclidean.name(),
            Metric::Manhattan => Manhattan.name(),
            Metric::Chebyshev => Chebyshev.name(),
            Metric::Cosine => Cosine.name(),
            Metric::Minkowski(_) => "minkowski",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: [f32; 2] = [1.0, 2.0];
    const B: [f32; 2] = [4.0, -2.0];

    #[test]
    fn test_basic_values() {
        assert_eq!(Euclidean.distance(&A, &B), 5.0);
        assert_eq!(SquaredEuclidean.distance(&A, &B), 25.0);
        assert_eq!(Manhattan.distance(&A, &B), 7.0);
        assert_eq!(Chebyshev.distance(&A, &B), 4.0);
    }

    #[test]
    fn test_self_distance_is_zero() {
        let measures: [Metric; 6] = [
            Metric::Euclidean,
            Metric::SquaredEuclidean,
            Metric::Manhattan,
            Metric::Chebyshev,
            Metric::Cosine,
            Metric::Minkowski(3.0),
        ];
        for m in measures {
            assert_eq!(m.distance(&A, &A), 0.0, "{}", m.name());
        }
    }

    #[test]
    fn test_minkowski_matches_special_cases() {
        let m1 = Minkowski { p: 1.0 }.distance(&A, &B);
        let m2 = Minkowski { p: 2.0 }.distance(&A, &B);
        assert!((m1 - Manhattan.distance(&A, &B)).abs() < 1e-5);
        assert!((m2 - Euclidean.distance(&A, &B)).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_edges() {
        assert_eq!(Cosine.distance(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
        assert_eq!(Cosine.distance(&[0.0, 0.0], &[1.0, 0.0]), 1.0);
        assert!((Cosine.distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
        assert!((Cosine.distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-6);
        // Scale invariant.
        assert!(Cosine.distance(&[1.0, 1.0], &[3.0, 3.0]).abs() < 1e-6);
    }

    #[test]
    fn test_closure_and_trait_object_measures() {
        let c = |a: &[f32], b: &[f32]| (a[0] - b[0]).abs();
        assert_eq!(c.distance(&A, &B), 3.0);
        assert_eq!(c.name(), "custom");

        let by_ref: &dyn DistanceMeasure = &Manhattan;
        assert_eq!(by_ref.distance(&A, &B), 7.0);
        assert_eq!(by_ref.name(), "manhattan");
    }
}
