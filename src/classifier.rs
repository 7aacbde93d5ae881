//! A k-nearest-neighbours classifier backed by a [`KDTree`].

use log::debug;

use crate::error::{KnnError, Result};
use crate::kdtree::{KDTree, KDTreeIndex, DEFAULT_LEAF_SIZE};
use crate::r#type::{CoordNum, Point};

/// Majority vote over the `k` nearest training points.
///
/// Labels are class ids `0..num_classes`. Neighbours are mapped back to their labels through
/// their insertion index, so duplicate training points keep their own labels.
///
/// ```
/// use kd_knn::KnnClassifier;
///
/// let mut classifier = KnnClassifier::<f64>::new(3, 1);
/// classifier
///     .fit(
///         vec![[0., 0.], [0., 1.], [1., 0.], [9., 9.], [9., 8.], [8., 9.]],
///         &[0, 0, 0, 1, 1, 1],
///     )
///     .unwrap();
/// assert_eq!(classifier.predict(&[[0.5, 0.5], [8.5, 8.5]]).unwrap(), vec![0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct KnnClassifier<N: CoordNum> {
    k: usize,
    leaf_size: usize,
    tree: Option<KDTree<N>>,
    labels: Vec<usize>,
    num_classes: usize,
}

impl<N: CoordNum> KnnClassifier<N> {
    /// Create an untrained classifier voting over `k` neighbours.
    pub fn new(k: usize, leaf_size: usize) -> Self {
        Self {
            k,
            leaf_size,
            tree: None,
            labels: vec![],
            num_classes: 0,
        }
    }

    /// The number of neighbours each prediction votes over.
    pub fn k(&self) -> usize {
        self.k
    }

    /// The leaf size of the underlying tree.
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// The number of classes seen during [`fit`][Self::fit]: the largest label plus one.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Returns `true` once [`fit`][Self::fit] has succeeded.
    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    /// Train the classifier on `points` and their `labels`.
    ///
    /// Refitting replaces the previous training set. On error the classifier is left unchanged.
    ///
    /// Fails with [`KnnError::ZeroNeighbors`] when `k` is `0` and with
    /// [`KnnError::InvalidLabel`] when the largest label is `usize::MAX`.
    pub fn fit<P: Into<Point<N>>>(
        &mut self,
        points: impl IntoIterator<Item = P>,
        labels: &[usize],
    ) -> Result<()> {
        if self.k == 0 {
            return Err(KnnError::ZeroNeighbors);
        }
        let points: Vec<Point<N>> = points.into_iter().map(Into::into).collect();
        if points.len() != labels.len() {
            return Err(KnnError::LengthMismatch {
                points: points.len(),
                labels: labels.len(),
            });
        }
        if points.is_empty() {
            return Err(KnnError::EmptyTrainingSet);
        }

        let num_classes = match labels.iter().max() {
            Some(&label) => label
                .checked_add(1)
                .ok_or(KnnError::InvalidLabel { label })?,
            None => 0,
        };
        let tree = KDTree::new(points, self.leaf_size)?;
        debug!(
            "fitted knn classifier: {} points, {} classes, k {}",
            labels.len(),
            num_classes,
            self.k
        );

        self.tree = Some(tree);
        self.labels = labels.to_vec();
        self.num_classes = num_classes;
        Ok(())
    }

    /// The share of the `k` neighbours in each class, for every point of `points`.
    ///
    /// Shares are divided by `k`, so they sum to less than one when the training set is
    /// smaller than `k`.
    pub fn predict_proba<P: AsRef<[N]> + Sync>(&self, points: &[P]) -> Result<Vec<Vec<f64>>> {
        let tree = self.tree.as_ref().ok_or(KnnError::NotFitted)?;
        let neighbours = tree.query_indices(points, self.k)?;
        Ok(neighbours
            .into_iter()
            .map(|indices| {
                let mut votes = vec![0usize; self.num_classes];
                for index in indices {
                    votes[self.labels[index]] += 1;
                }
                votes
                    .into_iter()
                    .map(|count| count as f64 / self.k as f64)
                    .collect()
            })
            .collect())
    }

    /// The most voted class for every point of `points`. Ties go to the lowest class id.
    pub fn predict<P: AsRef<[N]> + Sync>(&self, points: &[P]) -> Result<Vec<usize>> {
        Ok(self
            .predict_proba(points)?
            .iter()
            .map(|probabilities| argmax(probabilities))
            .collect())
    }
}

impl<N: CoordNum> Default for KnnClassifier<N> {
    fn default() -> Self {
        Self::new(5, DEFAULT_LEAF_SIZE)
    }
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
