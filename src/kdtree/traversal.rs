//! Utilities to traverse the KDTree structure.

use crate::r#type::{CoordNum, Item};

/// A node in the KDTree.
///
/// Every point handed to the tree lives in exactly one place: either in a leaf bucket or as the
/// pivot of one internal node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<N: CoordNum> {
    /// A bucket of at most `leaf_size` points, scanned exhaustively during search.
    ///
    /// Leaves are empty only at the root of an empty tree or on the empty side of an internal
    /// node.
    Leaf {
        /// The points of this bucket
        points: Vec<Item<N>>,
    },
    /// A split of the points around the median along `axis`.
    Internal {
        /// The median point, itself a search candidate
        pivot: Item<N>,
        /// The coordinate index the children are split over
        axis: usize,
        /// Points sorted before the pivot on `axis`
        left: Box<Node<N>>,
        /// Points sorted after the pivot on `axis`
        right: Box<Node<N>>,
    },
}

impl<N: CoordNum> Node<N> {
    /// An empty leaf.
    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Node::Leaf { points: vec![] }
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Returns `true` if this is an intermediate node with children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }

    /// The split axis, or `None` for leaves.
    pub fn axis(&self) -> Option<usize> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { axis, .. } => Some(*axis),
        }
    }

    /// The pivot of an internal node.
    pub fn pivot(&self) -> Option<&Item<N>> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { pivot, .. } => Some(pivot),
        }
    }

    /// The points stored directly on this node: the leaf bucket, or the single pivot.
    pub fn items(&self) -> &[Item<N>] {
        match self {
            Node::Leaf { points } => points,
            Node::Internal { pivot, .. } => std::slice::from_ref(pivot),
        }
    }

    /// The child node representing the "left" half.
    ///
    /// Note that this **does not include** the pivot of the current node.
    pub fn left_child(&self) -> Option<&Node<N>> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { left, .. } => Some(left),
        }
    }

    /// The child node representing the "right" half.
    ///
    /// Note that this **does not include** the pivot of the current node.
    pub fn right_child(&self) -> Option<&Node<N>> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { right, .. } => Some(right),
        }
    }

    /// The number of points stored in this subtree.
    pub fn num_items(&self) -> usize {
        match self {
            Node::Leaf { points } => points.len(),
            Node::Internal { left, right, .. } => 1 + left.num_items() + right.num_items(),
        }
    }

    /// The number of levels of this subtree. A single leaf has height 1.
    pub fn height(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => 1 + left.height().max(right.height()),
        }
    }

    /// Iterate over every point of this subtree, depth first, pivots before their children.
    pub fn iter(&self) -> impl Iterator<Item = &Item<N>> + '_ {
        let mut stack = vec![self];
        let mut pending: std::slice::Iter<'_, Item<N>> = Default::default();
        std::iter::from_fn(move || loop {
            if let Some(item) = pending.next() {
                return Some(item);
            }
            let node = stack.pop()?;
            if let Node::Internal { left, right, .. } = node {
                stack.push(right);
                stack.push(left);
            }
            pending = node.items().iter();
        })
    }
}
