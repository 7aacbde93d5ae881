use crate::distance::{DistanceMetric, EuclideanDistance};
use crate::error::Result;
use crate::kdtree::{KDTreeBuilder, Node};
use crate::r#type::{CoordNum, Point};

/// When the search descends into the far side of a split.
///
/// The near side of every split is always searched. The far side is searched when the candidate
/// set still has room, or when the splitting hyperplane is strictly closer to the query than the
/// worst retained candidate. Both rules return the same points: once the set is full a far-side
/// point is never closer than the worst candidate, and only a strictly closer point evicts one.
/// They differ only in how many nodes are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pruning {
    /// Descend only when the hyperplane bound requires it.
    Bound,
    /// Also descend whenever the far child is a leaf.
    #[default]
    BoundOrFarLeaf,
}

/// An immutable K-D tree over points in R^d.
///
/// Usually this will be created via [`KDTree::new`], [`KDTree::with_metric`] or a
/// [`KDTreeBuilder`]. Queries live on the [`KDTreeIndex`][crate::kdtree::KDTreeIndex] trait.
#[derive(Debug, Clone)]
pub struct KDTree<N: CoordNum, M: DistanceMetric<N> = EuclideanDistance> {
    pub(crate) root: Node<N>,
    pub(crate) leaf_size: usize,
    pub(crate) dim: usize,
    pub(crate) num_items: usize,
    pub(crate) metric: M,
    pub(crate) pruning: Pruning,
}

impl<N: CoordNum> KDTree<N, EuclideanDistance> {
    /// Build a tree over `points` using Euclidean distance.
    ///
    /// ```
    /// use kd_knn::kdtree::{KDTree, KDTreeIndex};
    /// use kd_knn::Point;
    ///
    /// let points = vec![[1., 2.], [3., 4.], [5., 6.], [1.5, 2.5], [3.5, 4.5], [5.5, 6.5]];
    /// let tree: KDTree<f64> = KDTree::new(points, 1).unwrap();
    ///
    /// let mut result = tree.k_nearest(&[2., 3.], 2).unwrap();
    /// result.sort_by(|a, b| a[0].total_cmp(&b[0]));
    /// assert_eq!(result, vec![Point::from([1.5, 2.5]), Point::from([3., 4.])]);
    /// ```
    pub fn new<P: Into<Point<N>>>(
        points: impl IntoIterator<Item = P>,
        leaf_size: usize,
    ) -> Result<Self> {
        Self::with_metric(points, leaf_size, EuclideanDistance)
    }
}

impl<N: CoordNum, M: DistanceMetric<N>> KDTree<N, M> {
    /// Build a tree over `points` using a custom metric.
    pub fn with_metric<P: Into<Point<N>>>(
        points: impl IntoIterator<Item = P>,
        leaf_size: usize,
        metric: M,
    ) -> Result<Self> {
        let mut builder = KDTreeBuilder::new()
            .with_leaf_size(leaf_size)
            .with_metric(metric);
        builder.extend(points);
        builder.finish()
    }

    /// The maximum number of points per leaf this tree was built with.
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// The number of points in this tree.
    pub fn len(&self) -> usize {
        self.num_items
    }

    /// Returns `true` if the tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.num_items == 0
    }

    /// Consume the tree, returning its root node.
    pub fn into_root(self) -> Node<N> {
        self.root
    }
}
