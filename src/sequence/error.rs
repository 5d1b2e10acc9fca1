//! Error types for lazy sequence access.

use thiserror::Error;

/// Represents an attempt to read an element from an empty lazy sequence.
///
/// Returned by [`LazySeq::head`](super::LazySeq::head),
/// [`LazySeq::tail`](super::LazySeq::tail) and every other operation that
/// needs an element to exist. A view whose upstream ran out, or whose scan
/// found no matching element, is empty in the same sense as
/// [`LazySeq::empty`](super::LazySeq::empty).
///
/// # Examples
///
/// ```rust
/// use lambars_lazy::sequence::{EmptyAccessError, LazySeq};
///
/// let empty: LazySeq<i32> = LazySeq::empty();
/// let error = empty.head().unwrap_err();
///
/// assert_eq!(error, EmptyAccessError::new("head"));
/// assert_eq!(error.to_string(), "head called on an empty lazy sequence");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("{operation} called on an empty lazy sequence")]
pub struct EmptyAccessError {
    /// The name of the operation that required an element.
    pub operation: &'static str,
}

impl EmptyAccessError {
    /// Creates a new `EmptyAccessError` for the named operation.
    #[inline]
    #[must_use]
    pub const fn new(operation: &'static str) -> Self {
        Self { operation }
    }
}
