//! Iterators over lazy sequences.

use std::iter::FusedIterator;

use super::LazySeq;

/// An iterator over references to the elements of a [`LazySeq`].
///
/// Each call to `next` realizes exactly one cell. Elements borrowed from
/// the iterator live as long as the sequence it was created from.
///
/// # Examples
///
/// ```rust
/// use lambars_lazy::sequence::LazySeq;
///
/// let sequence = LazySeq::from_producer(1..);
/// let first_three: Vec<i32> = sequence.iter().take(3).copied().collect();
///
/// assert_eq!(first_three, vec![1, 2, 3]);
/// assert_eq!(sequence.realized_prefix_len(), 3);
/// ```
pub struct LazySeqIterator<'a, T> {
    current: Option<&'a LazySeq<T>>,
}

impl<'a, T> LazySeqIterator<'a, T> {
    pub(crate) const fn new(sequence: &'a LazySeq<T>) -> Self {
        Self {
            current: Some(sequence),
        }
    }
}

impl<'a, T: 'static> Iterator for LazySeqIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let Some((head, tail)) = self.current?.split() else {
            self.current = None;
            return None;
        };
        self.current = Some(tail);
        Some(head)
    }
}

impl<T: 'static> FusedIterator for LazySeqIterator<'_, T> {}

/// An owning iterator over a [`LazySeq`], yielding clones of its elements.
///
/// Realized cells behind the iterator are released as it advances unless
/// another handle still shares them.
pub struct LazySeqIntoIterator<T> {
    current: Option<LazySeq<T>>,
}

impl<T> LazySeqIntoIterator<T> {
    pub(crate) const fn new(sequence: LazySeq<T>) -> Self {
        Self {
            current: Some(sequence),
        }
    }
}

impl<T: Clone + 'static> Iterator for LazySeqIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let sequence = self.current.take()?;
        let (head, tail) = sequence.uncons()?;
        let head = head.clone();
        self.current = Some(tail);
        Some(head)
    }
}

impl<T: Clone + 'static> FusedIterator for LazySeqIntoIterator<T> {}
