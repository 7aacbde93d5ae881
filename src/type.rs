use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::Deref;

use num_traits::{Float, NumCast, ToPrimitive};

/// A trait for types that can be used as point coordinates.
///
/// This trait is sealed and cannot be implemented for external types. Distances are always
/// computed in `f64`, so every coordinate type must convert losslessly enough into it.
pub trait CoordNum:
    private::Sealed + Float + NumCast + ToPrimitive + PartialOrd + Debug + Send + Sync + 'static
{
    /// Total ordering used when sorting points along an axis.
    ///
    /// NaN sorts after every other value, so it never aborts construction.
    fn total_cmp(&self, other: &Self) -> Ordering;

    /// Lossy conversion into `f64`, the type all distances are computed in.
    #[inline]
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl CoordNum for f32 {
    #[inline]
    fn total_cmp(&self, other: &Self) -> Ordering {
        f32::total_cmp(self, other)
    }
}

impl CoordNum for f64 {
    #[inline]
    fn total_cmp(&self, other: &Self) -> Ordering {
        f64::total_cmp(self, other)
    }
}

/// A point in R^d.
///
/// Points are plain values: equality is coordinate-wise and every tree query hands back owned
/// copies.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Point<N: CoordNum> {
    coords: Vec<N>,
}

impl<N: CoordNum> Point<N> {
    /// Create a new point from its coordinates.
    pub fn new(coords: Vec<N>) -> Self {
        Self { coords }
    }

    /// The number of coordinates of this point.
    #[inline]
    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    /// The coordinates of this point.
    #[inline]
    pub fn coords(&self) -> &[N] {
        &self.coords
    }

    /// Consume this point, returning its coordinates.
    pub fn into_inner(self) -> Vec<N> {
        self.coords
    }
}

impl<N: CoordNum> Deref for Point<N> {
    type Target = [N];

    fn deref(&self) -> &[N] {
        &self.coords
    }
}

impl<N: CoordNum> AsRef<[N]> for Point<N> {
    fn as_ref(&self) -> &[N] {
        &self.coords
    }
}

impl<N: CoordNum> From<Vec<N>> for Point<N> {
    fn from(coords: Vec<N>) -> Self {
        Self { coords }
    }
}

impl<N: CoordNum> From<&[N]> for Point<N> {
    fn from(coords: &[N]) -> Self {
        Self {
            coords: coords.to_vec(),
        }
    }
}

impl<N: CoordNum, const D: usize> From<[N; D]> for Point<N> {
    fn from(coords: [N; D]) -> Self {
        Self {
            coords: coords.to_vec(),
        }
    }
}

/// A point stored in the tree together with its insertion index.
#[derive(Debug, Clone, PartialEq)]
pub struct Item<N: CoordNum> {
    pub(crate) index: usize,
    pub(crate) point: Point<N>,
}

impl<N: CoordNum> Item<N> {
    /// Pair a point with its insertion index.
    pub fn new(index: usize, point: Point<N>) -> Self {
        Self { index, point }
    }

    /// The 0-based position of this point in the tree's input.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The stored point.
    #[inline]
    pub fn point(&self) -> &Point<N> {
        &self.point
    }

    #[inline]
    pub(crate) fn coord(&self, axis: usize) -> N {
        self.point.coords[axis]
    }
}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
