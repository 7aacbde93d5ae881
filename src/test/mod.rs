//! Shared fixtures for randomized tests.


use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::distance::DistanceMetric;
use crate::r#type::CoordNum;

/// `num_points` points of dimension `dim` with integer coordinates in `-500..500`.
pub(crate) fn random_points(seed: u64, num_points: usize, dim: usize) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_points)
        .map(|_| (0..dim).map(|_| rng.gen_range(-500..500) as f64).collect())
        .collect()
}

/// Distances from `query` to its `k` nearest points, by exhaustive scan.
pub(crate) fn brute_force_distances<N: CoordNum, M: DistanceMetric<N>>(
    points: &[Vec<N>],
    query: &[N],
    k: usize,
    metric: &M,
) -> Vec<f64> {
    let mut distances: Vec<f64> = points
        .iter()
        .map(|p| metric.distance(p, query).unwrap())
        .collect();
    distances.sort_by(f64::total_cmp);
    distances.truncate(k);
    distances
}

/// Distances from `query` to `result`, ascending.
pub(crate) fn sorted_distances<N: CoordNum, M: DistanceMetric<N>, P: AsRef<[N]>>(
    result: &[P],
    query: &[N],
    metric: &M,
) -> Vec<f64> {
    let mut distances: Vec<f64> = result
        .iter()
        .map(|p| metric.distance(p.as_ref(), query).unwrap())
        .collect();
    distances.sort_by(f64::total_cmp);
    distances
}
