//! The bounded candidate set used during one k-nearest-neighbour search.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::distance::DistanceMetric;
use crate::error::Result;
use crate::r#type::{CoordNum, Item, Point};

/// A neighbour returned by [`KDTreeIndex::neighbors`][crate::kdtree::KDTreeIndex::neighbors].
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor<N: CoordNum> {
    /// Insertion index of the point in the tree's input
    pub index: usize,
    /// Distance from the query point
    pub distance: f64,
    /// An owned copy of the point
    pub point: Point<N>,
}

/// A wrapper around a stored item and its distance for use in the priority queue.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a, N: CoordNum> {
    dist: f64,
    item: &'a Item<N>,
}

impl<N: CoordNum> PartialEq for Candidate<'_, N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N: CoordNum> Eq for Candidate<'_, N> {}

impl<N: CoordNum> Ord for Candidate<'_, N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist.total_cmp(&other.dist)
    }
}

impl<N: CoordNum> PartialOrd for Candidate<'_, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A capacity-limited max-heap keyed by distance to a reference point.
///
/// After any sequence of [`push`][Self::push] calls the set holds the `capacity` closest points
/// seen so far. A capacity of zero keeps the set empty forever.
#[derive(Debug)]
pub struct CandidateSet<'a, N: CoordNum, M: DistanceMetric<N>> {
    capacity: usize,
    metric: &'a M,
    heap: BinaryHeap<Candidate<'a, N>>,
}

impl<'a, N: CoordNum, M: DistanceMetric<N>> CandidateSet<'a, N, M> {
    /// Create an empty set retaining at most `capacity` points.
    pub fn new(capacity: usize, metric: &'a M) -> Self {
        Self {
            capacity,
            metric,
            // Cap the up-front allocation, k is user-controlled.
            heap: BinaryHeap::with_capacity(capacity.min(1024) + 1),
        }
    }

    /// Offer `candidate` to the set, measuring its distance to `reference`.
    ///
    /// Once full, the candidate only replaces the current maximum if it is strictly closer.
    pub fn push(&mut self, reference: &[N], candidate: &'a Item<N>) -> Result<()> {
        if self.capacity == 0 {
            return Ok(());
        }
        let dist = self.metric.distance(candidate.point.coords(), reference)?;
        if self.heap.len() < self.capacity {
            self.heap.push(Candidate {
                dist,
                item: candidate,
            });
        } else if dist < self.max_distance() {
            if let Some(mut top) = self.heap.peek_mut() {
                *top = Candidate {
                    dist,
                    item: candidate,
                };
            }
        }
        Ok(())
    }

    /// The largest distance currently retained, or `0.0` if the set is empty.
    #[inline]
    pub fn max_distance(&self) -> f64 {
        self.heap.peek().map_or(0.0, |c| c.dist)
    }

    /// The number of retained points.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if no point is retained.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns `true` once `capacity` points are retained.
    ///
    /// A capacity-zero set is always full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// The maximum number of retained points.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Owned copies of the retained points, in no particular order.
    pub fn extract_points(&self) -> Vec<Point<N>> {
        self.heap.iter().map(|c| c.item.point.clone()).collect()
    }

    /// Insertion indices of the retained points, in no particular order.
    pub fn into_indices(self) -> Vec<usize> {
        self.heap.into_iter().map(|c| c.item.index).collect()
    }

    /// The retained points sorted by increasing distance.
    pub fn into_sorted_neighbors(self) -> Vec<Neighbor<N>> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| Neighbor {
                index: c.item.index,
                distance: c.dist,
                point: c.item.point.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::distance::EuclideanDistance;

    fn items(coords: &[[f64; 2]]) -> Vec<Item<f64>> {
        coords
            .iter()
            .enumerate()
            .map(|(index, c)| Item::new(index, Point::from(*c)))
            .collect()
    }

    #[test]
    fn keeps_closest_points() {
        let items = items(&[[5., 5.], [1., 0.], [3., 0.], [0., 2.], [10., 0.]]);
        let metric = EuclideanDistance;
        let mut set = CandidateSet::new(2, &metric);
        for item in &items {
            set.push(&[0., 0.], item).unwrap();
            assert!(set.len() <= 2);
        }
        assert_eq!(set.len(), 2);
        assert!((set.max_distance() - 2.0).abs() < 1e-12);

        let mut indices = set.into_indices();
        indices.sort();
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn max_distance_tracks_retained_points() {
        let items = items(&[[3., 4.], [6., 8.], [0., 1.]]);
        let metric = EuclideanDistance;
        let mut set = CandidateSet::new(3, &metric);
        assert_eq!(set.max_distance(), 0.0);
        assert!(set.is_empty());

        set.push(&[0., 0.], &items[0]).unwrap();
        assert!((set.max_distance() - 5.0).abs() < 1e-12);
        set.push(&[0., 0.], &items[1]).unwrap();
        assert!((set.max_distance() - 10.0).abs() < 1e-12);
        set.push(&[0., 0.], &items[2]).unwrap();
        assert!((set.max_distance() - 10.0).abs() < 1e-12);
        assert!(set.is_full());
    }

    #[test]
    fn equal_distance_does_not_evict() {
        let items = items(&[[1., 0.], [0., 1.]]);
        let metric = EuclideanDistance;
        let mut set = CandidateSet::new(1, &metric);
        set.push(&[0., 0.], &items[0]).unwrap();
        set.push(&[0., 0.], &items[1]).unwrap();
        assert_eq!(set.into_indices(), vec![0]);
    }

    #[test]
    fn zero_capacity_never_retains() {
        let items = items(&[[1., 0.], [0., 1.], [0., 0.]]);
        let metric = EuclideanDistance;
        let mut set = CandidateSet::new(0, &metric);
        for item in &items {
            set.push(&[0., 0.], item).unwrap();
        }
        assert!(set.is_empty());
        assert_eq!(set.max_distance(), 0.0);
        assert!(set.extract_points().is_empty());
    }

    #[test]
    fn sorted_neighbors_ascend() {
        let items = items(&[[4., 0.], [1., 0.], [3., 0.], [2., 0.]]);
        let metric = EuclideanDistance;
        let mut set = CandidateSet::new(3, &metric);
        for item in &items {
            set.push(&[0., 0.], item).unwrap();
        }
        let neighbors = set.into_sorted_neighbors();
        let indices: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![1, 3, 2]);
        assert_eq!(neighbors[0].point, Point::from([1., 0.]));
        assert!((neighbors[2].distance - 3.0).abs() < 1e-12);
    }
}
