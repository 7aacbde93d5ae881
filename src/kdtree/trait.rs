use log::trace;

#[cfg(feature = "rayon")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::distance::DistanceMetric;
use crate::error::{KnnError, Result};
use crate::kdtree::candidates::{CandidateSet, Neighbor};
use crate::kdtree::index::Pruning;
use crate::kdtree::{KDTree, Node};
use crate::r#type::{CoordNum, Item, Point};

/// A trait for searching and accessing data out of a KDTree.
pub trait KDTreeIndex<N: CoordNum>: Sized + Sync {
    /// The metric distances are measured with
    type Metric: DistanceMetric<N>;

    /// The root node of this tree, for manual traversal.
    fn root(&self) -> &Node<N>;

    /// The metric of this tree.
    fn metric(&self) -> &Self::Metric;

    /// The far-side descent rule used by searches.
    fn pruning(&self) -> Pruning;

    /// The dimension shared by every point, or `0` for an empty tree.
    fn dim(&self) -> usize;

    /// The number of points in this tree.
    fn num_items(&self) -> usize;

    /// The number of levels of this tree.
    fn height(&self) -> usize {
        self.root().height()
    }

    /// Run one search and return the filled candidate set.
    ///
    /// An empty tree yields an empty set for any query. Otherwise the query must have the tree's
    /// dimension.
    fn candidates(&self, point: &[N], k: usize) -> Result<CandidateSet<'_, N, Self::Metric>> {
        let mut candidates = CandidateSet::new(k, self.metric());
        if self.num_items() == 0 {
            return Ok(candidates);
        }
        if point.len() != self.dim() {
            return Err(KnnError::DimensionMismatch {
                expected: self.dim(),
                actual: point.len(),
            });
        }
        if k == 0 {
            return Ok(candidates);
        }

        search(point, self.root(), &mut candidates, self.pruning())?;
        trace!(
            "k-nearest search: k {}, retained {}, radius {}",
            k,
            candidates.len(),
            candidates.max_distance()
        );
        Ok(candidates)
    }

    /// Find the `k` points closest to `point`.
    ///
    /// Returns owned copies in no particular order. Fewer than `k` points are returned only when
    /// the tree holds fewer than `k` points.
    fn k_nearest(&self, point: &[N], k: usize) -> Result<Vec<Point<N>>> {
        Ok(self.candidates(point, k)?.extract_points())
    }

    /// Find the insertion indices of the `k` points closest to `point`, in no particular order.
    fn k_nearest_indices(&self, point: &[N], k: usize) -> Result<Vec<usize>> {
        Ok(self.candidates(point, k)?.into_indices())
    }

    /// Find the `k` points closest to `point`, sorted by increasing distance.
    fn neighbors(&self, point: &[N], k: usize) -> Result<Vec<Neighbor<N>>> {
        Ok(self.candidates(point, k)?.into_sorted_neighbors())
    }

    /// Run [`k_nearest`][Self::k_nearest] for every point of `points`.
    ///
    /// The result has one entry per query point, in the same order. With the `rayon` feature the
    /// searches run in parallel.
    fn query<P: AsRef<[N]> + Sync>(&self, points: &[P], k: usize) -> Result<Vec<Vec<Point<N>>>> {
        batch(points, |point| self.k_nearest(point, k))
    }

    /// Run [`k_nearest_indices`][Self::k_nearest_indices] for every point of `points`.
    fn query_indices<P: AsRef<[N]> + Sync>(
        &self,
        points: &[P],
        k: usize,
    ) -> Result<Vec<Vec<usize>>> {
        batch(points, |point| self.k_nearest_indices(point, k))
    }

    /// Iterate over every point of the tree with its insertion index.
    fn items(&self) -> impl Iterator<Item = &Item<N>> {
        self.root().iter()
    }
}

impl<N: CoordNum, M: DistanceMetric<N>> KDTreeIndex<N> for KDTree<N, M> {
    type Metric = M;

    fn root(&self) -> &Node<N> {
        &self.root
    }

    fn metric(&self) -> &M {
        &self.metric
    }

    fn pruning(&self) -> Pruning {
        self.pruning
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn num_items(&self) -> usize {
        self.num_items
    }
}

/// Recursive k-nearest search below `node`.
///
/// Leaves are scanned exhaustively. At a split the pivot is offered first, then the side of the
/// hyperplane containing the query, then the far side if it may still hide a closer point.
fn search<'a, N: CoordNum, M: DistanceMetric<N>>(
    query: &[N],
    node: &'a Node<N>,
    candidates: &mut CandidateSet<'a, N, M>,
    pruning: Pruning,
) -> Result<()> {
    match node {
        Node::Leaf { points } => {
            for item in points {
                candidates.push(query, item)?;
            }
        }
        Node::Internal {
            pivot,
            axis,
            left,
            right,
        } => {
            candidates.push(query, pivot)?;

            let q = query[*axis];
            let p = pivot.coord(*axis);
            let (near, far) = if q <= p { (left, right) } else { (right, left) };

            search(query, near, candidates, pruning)?;

            // lower bound on the distance to anything across the split
            let hyperplane_dist = (q.as_f64() - p.as_f64()).abs();
            let descend = !candidates.is_full()
                || hyperplane_dist < candidates.max_distance()
                || (pruning == Pruning::BoundOrFarLeaf && far.is_leaf());
            if descend {
                search(query, far, candidates, pruning)?;
            }
        }
    }
    Ok(())
}

#[cfg(feature = "rayon")]
fn batch<N, P, T, F>(points: &[P], f: F) -> Result<Vec<T>>
where
    N: CoordNum,
    P: AsRef<[N]> + Sync,
    T: Send,
    F: Fn(&[N]) -> Result<T> + Sync + Send,
{
    points.par_iter().map(|point| f(point.as_ref())).collect()
}

#[cfg(not(feature = "rayon"))]
fn batch<N, P, T, F>(points: &[P], f: F) -> Result<Vec<T>>
where
    N: CoordNum,
    P: AsRef<[N]> + Sync,
    T: Send,
    F: Fn(&[N]) -> Result<T> + Sync + Send,
{
    points.iter().map(|point| f(point.as_ref())).collect()
}
