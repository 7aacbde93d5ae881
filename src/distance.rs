//! Distance metrics for nearest-neighbour queries.
//!
//! This module provides the Minkowski family of metrics (Euclidean, Manhattan, Chebyshev and
//! general `p`). Any closure `Fn(&[N], &[N]) -> f64` is also accepted as a metric.
//!
//! The tree prunes subtrees using the distance from the query to a splitting hyperplane, so a
//! metric must satisfy `|a[axis] - b[axis]| <= distance(a, b)` for searches to stay exact. All
//! metrics shipped here do.

use crate::error::{KnnError, Result};
use crate::r#type::CoordNum;

/// A trait for calculating the distance between two points.
pub trait DistanceMetric<N: CoordNum>: Send + Sync {
    /// Calculate the distance between two points.
    ///
    /// Implementations should return [`KnnError::DimensionMismatch`] when the points have
    /// differing lengths instead of silently truncating.
    fn distance(&self, a: &[N], b: &[N]) -> Result<f64>;
}

impl<N, F> DistanceMetric<N> for F
where
    N: CoordNum,
    F: Fn(&[N], &[N]) -> f64 + Send + Sync,
{
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> Result<f64> {
        Ok(self(a, b))
    }
}

#[inline]
fn check_dims<N>(a: &[N], b: &[N]) -> Result<()> {
    if a.len() != b.len() {
        return Err(KnnError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

#[inline]
fn abs_diffs<'a, N: CoordNum>(a: &'a [N], b: &'a [N]) -> impl Iterator<Item = f64> + 'a {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x.as_f64() - y.as_f64()).abs())
}

/// Euclidean distance metric.
///
/// The square root of the sum of squared per-axis differences. This is the default metric of
/// every tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistance;

impl<N: CoordNum> DistanceMetric<N> for EuclideanDistance {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> Result<f64> {
        check_dims(a, b)?;
        Ok(abs_diffs(a, b).map(|d| d * d).sum::<f64>().sqrt())
    }
}

/// Manhattan (taxicab) distance metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManhattanDistance;

impl<N: CoordNum> DistanceMetric<N> for ManhattanDistance {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> Result<f64> {
        check_dims(a, b)?;
        Ok(abs_diffs(a, b).sum())
    }
}

/// Chebyshev distance metric: the largest per-axis difference.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChebyshevDistance;

impl<N: CoordNum> DistanceMetric<N> for ChebyshevDistance {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> Result<f64> {
        check_dims(a, b)?;
        Ok(abs_diffs(a, b).fold(0.0, f64::max))
    }
}

/// Minkowski distance metric of order `p`.
///
/// `p = 1` is Manhattan and `p = 2` is Euclidean. Orders below 1 do not define a metric and
/// break the pruning bound, so they are clamped to 1.
#[derive(Debug, Clone, Copy)]
pub struct MinkowskiDistance {
    /// The order of the metric
    pub p: f64,
}

impl MinkowskiDistance {
    /// Create a new Minkowski metric of the given order.
    pub fn new(p: f64) -> Self {
        Self { p: p.max(1.0) }
    }
}

impl<N: CoordNum> DistanceMetric<N> for MinkowskiDistance {
    fn distance(&self, a: &[N], b: &[N]) -> Result<f64> {
        check_dims(a, b)?;
        let p = self.p.max(1.0);
        Ok(abs_diffs(a, b).map(|d| d.powf(p)).sum::<f64>().powf(1.0 / p))
    }
}
