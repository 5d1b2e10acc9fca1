//! Eager collections a lazy sequence can be realized into.
//!
//! [`LazySeq::realize_into`](super::LazySeq::realize_into) replays every
//! element, in order, into a [`Builder`] and returns the finished
//! collection.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};

/// An accumulator that receives elements one at a time and then produces
/// an eager collection.
///
/// # Examples
///
/// ```rust
/// use lambars_lazy::sequence::{Builder, LazySeq};
///
/// struct Sum(i64);
///
/// impl Builder<i64> for Sum {
///     type Output = i64;
///
///     fn add(&mut self, element: i64) {
///         self.0 += element;
///     }
///
///     fn result(self) -> i64 {
///         self.0
///     }
/// }
///
/// let total = LazySeq::from_producer(1_i64..=100).realize_into(Sum(0));
/// assert_eq!(total, 5050);
/// ```
pub trait Builder<T> {
    /// The collection produced once every element has been added.
    type Output;

    /// Appends one element.
    fn add(&mut self, element: T);

    /// Finishes the collection.
    fn result(self) -> Self::Output;
}

impl<T> Builder<T> for Vec<T> {
    type Output = Self;

    #[inline]
    fn add(&mut self, element: T) {
        self.push(element);
    }

    #[inline]
    fn result(self) -> Self {
        self
    }
}

impl<T> Builder<T> for VecDeque<T> {
    type Output = Self;

    #[inline]
    fn add(&mut self, element: T) {
        self.push_back(element);
    }

    #[inline]
    fn result(self) -> Self {
        self
    }
}

impl Builder<char> for String {
    type Output = Self;

    #[inline]
    fn add(&mut self, element: char) {
        self.push(element);
    }

    #[inline]
    fn result(self) -> Self {
        self
    }
}

impl<T: Ord> Builder<T> for BTreeSet<T> {
    type Output = Self;

    #[inline]
    fn add(&mut self, element: T) {
        self.insert(element);
    }

    #[inline]
    fn result(self) -> Self {
        self
    }
}

impl<T: Eq + Hash, S: BuildHasher> Builder<T> for HashSet<T, S> {
    type Output = Self;

    #[inline]
    fn add(&mut self, element: T) {
        self.insert(element);
    }

    #[inline]
    fn result(self) -> Self {
        self
    }
}
