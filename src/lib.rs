#![doc = include_str!("../README.md")]

pub mod classifier;
pub mod distance;
mod error;
pub mod kdtree;
mod r#type;

pub use classifier::KnnClassifier;
pub use error::{KnnError, Result};
pub use r#type::{CoordNum, Item, Point};

#[cfg(test)]
pub(crate) mod test;
