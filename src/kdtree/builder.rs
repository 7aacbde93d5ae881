use log::debug;

use crate::distance::{DistanceMetric, EuclideanDistance};
use crate::error::{KnnError, Result};
use crate::kdtree::index::Pruning;
use crate::kdtree::{KDTree, Node};
use crate::r#type::{CoordNum, Item, Point};

/// The leaf size used when none is given.
pub const DEFAULT_LEAF_SIZE: usize = 40;

/// Subtrees smaller than this are always built on the calling thread.
#[cfg(feature = "rayon")]
const PARALLEL_BUILD_THRESHOLD: usize = 4096;

/// A builder to create a [`KDTree`].
///
/// Points keep the order they were added in: the insertion index returned by
/// [`add`][Self::add] is what index-based queries report.
///
/// ```
/// use kd_knn::kdtree::{KDTreeBuilder, KDTreeIndex};
///
/// let mut builder = KDTreeBuilder::<f64>::new().with_leaf_size(2);
/// builder.add([0., 0.]);
/// builder.add([5., 5.]);
/// builder.add([1., 1.]);
/// let tree = builder.finish().unwrap();
///
/// assert_eq!(tree.k_nearest_indices(&[0.9, 0.9], 1).unwrap(), vec![2]);
/// ```
#[derive(Debug, Clone)]
pub struct KDTreeBuilder<N: CoordNum, M: DistanceMetric<N> = EuclideanDistance> {
    items: Vec<Item<N>>,
    leaf_size: usize,
    metric: M,
    pruning: Pruning,
}

impl<N: CoordNum> KDTreeBuilder<N, EuclideanDistance> {
    /// Create a new builder with the default leaf size and the Euclidean metric.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new builder with room for `num_items` points.
    pub fn with_capacity(num_items: usize) -> Self {
        Self {
            items: Vec::with_capacity(num_items),
            leaf_size: DEFAULT_LEAF_SIZE,
            metric: EuclideanDistance,
            pruning: Pruning::default(),
        }
    }
}

impl<N: CoordNum> Default for KDTreeBuilder<N, EuclideanDistance> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: CoordNum, M: DistanceMetric<N>> KDTreeBuilder<N, M> {
    /// Set the maximum number of points per leaf.
    ///
    /// `0` is accepted and turns every point into an internal pivot.
    pub fn with_leaf_size(mut self, leaf_size: usize) -> Self {
        self.leaf_size = leaf_size;
        self
    }

    /// Replace the distance metric.
    pub fn with_metric<M2: DistanceMetric<N>>(self, metric: M2) -> KDTreeBuilder<N, M2> {
        KDTreeBuilder {
            items: self.items,
            leaf_size: self.leaf_size,
            metric,
            pruning: self.pruning,
        }
    }

    /// Set the rule deciding when the search descends into the far side of a split.
    pub fn with_pruning(mut self, pruning: Pruning) -> Self {
        self.pruning = pruning;
        self
    }

    /// Add a point to the index, returning its insertion index.
    pub fn add(&mut self, point: impl Into<Point<N>>) -> usize {
        let index = self.items.len();
        self.items.push(Item::new(index, point.into()));
        index
    }

    /// Add every point of `points`, in order.
    pub fn extend<P: Into<Point<N>>>(&mut self, points: impl IntoIterator<Item = P>) {
        for point in points {
            self.add(point);
        }
    }

    /// The number of points added so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no point was added yet.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume this builder, partitioning the points and generating a KDTree ready for queries.
    ///
    /// All points must share one non-zero dimension. This is checked once, before any
    /// partitioning, so no partially built tree is ever observable.
    pub fn finish(self) -> Result<KDTree<N, M>> {
        let dim = validate_dims(&self.items)?;
        let num_items = self.items.len();
        let root = build(self.items, self.leaf_size, dim);

        debug!(
            "built kd-tree: {} points, dim {}, leaf size {}, height {}",
            num_items,
            dim,
            self.leaf_size,
            root.height()
        );

        Ok(KDTree {
            root,
            leaf_size: self.leaf_size,
            dim,
            num_items,
            metric: self.metric,
            pruning: self.pruning,
        })
    }
}

/// Returns the common dimension of `items`, or `0` when there are none.
fn validate_dims<N: CoordNum>(items: &[Item<N>]) -> Result<usize> {
    let Some(first) = items.first() else {
        return Ok(0);
    };
    let expected = first.point.dim();
    if expected == 0 {
        return Err(KnnError::EmptyPoint);
    }
    for item in items {
        let actual = item.point.dim();
        if actual != expected {
            return Err(KnnError::DimensionMismatch { expected, actual });
        }
    }
    Ok(expected)
}

/// Recursively split `items` around the median of their highest-variance axis.
///
/// The median is the lower median after a stable sort. Points sharing the pivot's coordinate may
/// land on either side, so duplicate-heavy data can produce lopsided subtrees.
fn build<N: CoordNum>(mut items: Vec<Item<N>>, leaf_size: usize, dim: usize) -> Node<N> {
    if items.len() <= leaf_size {
        return Node::Leaf { points: items };
    }

    let axis = max_variance_axis(&items, dim);
    items.sort_by(|a, b| CoordNum::total_cmp(&a.coord(axis), &b.coord(axis)));

    // [0..m) goes left, m is the pivot, (m..] goes right
    let m = items.len() >> 1;
    let right_items = items.split_off(m + 1);
    let pivot = items.swap_remove(m);

    let (left, right) = build_children(items, right_items, leaf_size, dim);

    Node::Internal {
        pivot,
        axis,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[cfg(feature = "rayon")]
fn build_children<N: CoordNum>(
    left: Vec<Item<N>>,
    right: Vec<Item<N>>,
    leaf_size: usize,
    dim: usize,
) -> (Node<N>, Node<N>) {
    if left.len() + right.len() < PARALLEL_BUILD_THRESHOLD {
        return (build(left, leaf_size, dim), build(right, leaf_size, dim));
    }
    rayon::join(
        || build(left, leaf_size, dim),
        || build(right, leaf_size, dim),
    )
}

#[cfg(not(feature = "rayon"))]
fn build_children<N: CoordNum>(
    left: Vec<Item<N>>,
    right: Vec<Item<N>>,
    leaf_size: usize,
    dim: usize,
) -> (Node<N>, Node<N>) {
    (build(left, leaf_size, dim), build(right, leaf_size, dim))
}

/// The axis with the largest population variance. Ties go to the lowest axis.
pub(crate) fn max_variance_axis<N: CoordNum>(items: &[Item<N>], dim: usize) -> usize {
    let mut best_axis = 0;
    let mut best_variance = f64::NEG_INFINITY;
    for axis in 0..dim {
        let variance = variance_along(items, axis);
        if variance > best_variance {
            best_axis = axis;
            best_variance = variance;
        }
    }
    best_axis
}

/// Population variance (mean squared deviation) of the coordinates on `axis`.
pub(crate) fn variance_along<N: CoordNum>(items: &[Item<N>], axis: usize) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let n = items.len() as f64;
    let mean = items.iter().map(|i| i.coord(axis).as_f64()).sum::<f64>() / n;
    items
        .iter()
        .map(|i| {
            let d = i.coord(axis).as_f64() - mean;
            d * d
        })
        .sum::<f64>()
        / n
}
