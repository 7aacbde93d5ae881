//! An immutable K-D tree with exact k-nearest-neighbour search.
//!
//! Construction splits each node along its highest-variance axis at the median. Search descends
//! toward the query first and only crosses a split when the splitting hyperplane is closer than
//! the worst of the `k` candidates kept so far.

#![warn(missing_docs)]

mod builder;
mod candidates;
mod index;
mod r#trait;
mod traversal;

pub use builder::{KDTreeBuilder, DEFAULT_LEAF_SIZE};
pub use candidates::{CandidateSet, Neighbor};
pub use index::{KDTree, Pruning};
pub use r#trait::KDTreeIndex;
pub use traversal::Node;
