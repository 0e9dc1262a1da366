use core::fmt;

/// Result alias for `canopy`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by canopy construction, refinement and export.
///
/// Every variant describes invalid input or a broken invariant. None of them
/// are transient, so callers should not retry.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Thresholds violate `t1 >= t2 > 0` (or are not finite).
    InvalidThreshold {
        /// Loose (membership) threshold.
        t1: f32,
        /// Tight (seed exclusion) threshold.
        t2: f32,
    },

    /// Significance is not a positive, finite fraction.
    InvalidSignificance {
        /// Rejected value.
        significance: f64,
    },

    /// Centroid requested for a canopy without members.
    EmptyCanopy {
        /// Canopy id.
        id: usize,
    },

    /// Points of differing dimensionality supplied to one run.
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidThreshold { t1, t2 } => {
                write!(f, "invalid thresholds: need t1 >= t2 > 0, got t1={t1}, t2={t2}")
            }
            Error::InvalidSignificance { significance } => {
                write!(f, "invalid significance {significance}: must be > 0")
            }
            Error::EmptyCanopy { id } => write!(f, "canopy {id} has no members"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
