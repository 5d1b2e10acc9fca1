//! The lazy, fusing, memoizing sequence.
//!
//! This module provides [`LazySeq`], a cons-style sequence whose `map`,
//! `filter` and `collect` operations are deferred until an element is
//! requested, and whose chained transformations are fused into a single
//! view at construction time.
//!
//! # Overview
//!
//! - O(1) prepend (`prepend`, `cons`)
//! - Every cell is realized at most once; later reads return the same value
//! - Any chain of `map`/`filter`/`collect` is one view over the original
//!   upstream, never a stack of views
//! - Traversal forces one cell per step, so unbounded producers are fine
//!   as long as only a finite prefix is demanded
//!
//! # Examples
//!
//! ```rust
//! use lambars_lazy::sequence::LazySeq;
//!
//! let squares_of_evens = LazySeq::from_producer(1..=10)
//!     .filter(|value| value % 2 == 0)
//!     .map(|value| value * value)
//!     .filter(|value| *value > 10);
//!
//! // One view over the source, however long the chain.
//! assert_eq!(squares_of_evens.transform_depth(), 1);
//! assert_eq!(squares_of_evens.to_vec(), vec![16, 36, 64, 100]);
//! ```
//!
//! # Hazards
//!
//! [`len`](LazySeq::len), equality, hashing and full materialization walk
//! the whole sequence. On an unbounded producer they do not return.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::builder::Builder;
use super::fusion::{Stage, Upstream};
use super::iter::{LazySeqIntoIterator, LazySeqIterator};
use super::node::{ConsCell, Node, NodeKind, Peek};
use super::view::{CollectView, FilterView, MapView};
use super::{EmptyAccessError, PartialFunction};
use crate::control::Memo;

/// A lazy, fusing, memoizing linear sequence.
///
/// A `LazySeq` is a shared handle to one node of a sequence. Cloning it is
/// O(1) and shares every realized cell. Nodes are immutable apart from
/// their memoization cells, which move from pending to realized exactly
/// once.
///
/// # Time Complexity
///
/// | Operation                    | Complexity                        |
/// |------------------------------|-----------------------------------|
/// | `empty`, `cons`, `prepend`   | O(1)                              |
/// | `map`, `filter`, `collect`   | O(1), nothing is evaluated        |
/// | `head`, `tail` of a map      | O(1) upstream cells               |
/// | `head`, `tail` of a filter   | O(skipped upstream cells)         |
/// | `get(n)`, `skip(n)`          | O(n) cells                        |
/// | `len`                        | O(n), unbounded on infinite input |
///
/// # Thread Safety
///
/// `LazySeq` is neither `Send` nor `Sync`. Memoization cells are written
/// without synchronization.
///
/// # Examples
///
/// ```rust
/// use lambars_lazy::sequence::LazySeq;
///
/// let list = LazySeq::empty().prepend(3).prepend(2).prepend(1);
/// assert_eq!(list.head(), Ok(&1));
/// assert_eq!(format!("{list}"), "[1, 2, 3]");
/// ```
pub struct LazySeq<T> {
    pub(crate) node: Rc<Node<T>>,
}

static_assertions::assert_not_impl_any!(LazySeq<i32>: Send, Sync);
static_assertions::assert_not_impl_any!(LazySeq<String>: Send, Sync);

impl<T> Clone for LazySeq<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
        }
    }
}

// =============================================================================
// Construction
// =============================================================================

impl<T: 'static> LazySeq<T> {
    pub(crate) fn from_node(node: Node<T>) -> Self {
        Self {
            node: Rc::new(node),
        }
    }

    pub(crate) fn from_map_view(view: MapView<T>) -> Self {
        Self::from_node(Node::Map(view))
    }

    pub(crate) fn from_filter_view(view: FilterView<T>) -> Self {
        Self::from_node(Node::Filter(view))
    }

    pub(crate) fn from_collect_view(view: CollectView<T>) -> Self {
        Self::from_node(Node::Collect(view))
    }

    pub(crate) fn erase(&self) -> Upstream {
        self.node.clone()
    }

    pub(crate) fn into_erased(self) -> Upstream {
        self.node
    }

    /// Returns the empty sequence.
    ///
    /// All empty sequences are equal, whichever node they were reached
    /// through.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::LazySeq;
    ///
    /// let empty: LazySeq<i32> = LazySeq::empty();
    /// assert!(empty.is_empty());
    /// assert!(empty.head().is_err());
    /// ```
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::from_node(Node::Empty)
    }

    /// Creates a sequence with `head` in front of `tail`.
    ///
    /// `tail` is shared, not copied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::LazySeq;
    ///
    /// let tail = LazySeq::from_producer(vec![2, 3]);
    /// let list = LazySeq::cons(1, tail.clone());
    ///
    /// assert_eq!(list.head(), Ok(&1));
    /// assert!(list.tail().unwrap().ptr_eq(&tail));
    /// ```
    #[inline]
    #[must_use]
    pub fn cons(head: T, tail: Self) -> Self {
        Self::from_node(Node::Cons(ConsCell {
            head,
            tail: Memo::realized(tail),
        }))
    }

    /// Returns a new sequence with `element` in front of this one.
    ///
    /// # Complexity
    ///
    /// O(1) time and space
    #[inline]
    #[must_use]
    pub fn prepend(&self, element: T) -> Self {
        Self::cons(element, self.clone())
    }

    /// Creates a sequence holding exactly one element.
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::cons(element, Self::empty())
    }
}

// =============================================================================
// Access
// =============================================================================

impl<T: 'static> LazySeq<T> {
    /// Returns the first element, realizing it if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyAccessError`] if the sequence is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::LazySeq;
    ///
    /// let evens = LazySeq::from_producer(1..).filter(|value| value % 2 == 0);
    /// assert_eq!(evens.head(), Ok(&2));
    /// ```
    #[inline]
    pub fn head(&self) -> Result<&T, EmptyAccessError> {
        self.node.head()
    }

    /// Returns the sequence after the first element.
    ///
    /// The tail is memoized: every call returns a handle to the same node.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyAccessError`] if the sequence is empty.
    #[inline]
    pub fn tail(&self) -> Result<Self, EmptyAccessError> {
        self.node.tail().cloned()
    }

    #[inline]
    pub(crate) fn tail_ref(&self) -> Result<&Self, EmptyAccessError> {
        self.node.tail()
    }

    /// Returns the first element, or `None` if the sequence is empty.
    #[inline]
    pub fn head_option(&self) -> Option<&T> {
        self.head().ok()
    }

    /// Decomposes the sequence into its head and tail.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::LazySeq;
    ///
    /// let list = LazySeq::from_producer(vec!['a', 'b']);
    /// let (head, tail) = list.uncons().unwrap();
    /// assert_eq!(*head, 'a');
    /// assert_eq!(tail.head(), Ok(&'b'));
    /// ```
    pub fn uncons(&self) -> Option<(&T, Self)> {
        self.split().map(|(head, tail)| (head, tail.clone()))
    }

    pub(crate) fn split(&self) -> Option<(&T, &Self)> {
        let head = self.head().ok()?;
        let tail = self.tail_ref().ok()?;
        Some((head, tail))
    }

    /// Returns `true` if the sequence has no elements.
    ///
    /// For source, filter and collect nodes this realizes the head. For a
    /// map view only the upstream is consulted, so the mapping function is
    /// not invoked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node.is_empty()
    }

    /// Returns the element at `index`, realizing every cell before it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::LazySeq;
    ///
    /// let squares = LazySeq::from_producer(0..).map(|value| value * value);
    /// assert_eq!(squares.get(12), Some(&144));
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        let mut current = self;
        for _ in 0..index {
            current = current.tail_ref().ok()?;
        }
        current.head().ok()
    }

    /// Returns the sequence that remains after the first `count` elements.
    ///
    /// The result shares its nodes with `self`. If the sequence has fewer
    /// than `count` elements the empty sequence is returned.
    #[must_use]
    pub fn skip(&self, count: usize) -> Self {
        let mut current = self;
        for _ in 0..count {
            match current.tail_ref() {
                Ok(tail) => current = tail,
                Err(_) => return Self::empty(),
            }
        }
        current.clone()
    }

    /// Returns `true` if both handles point at the same node.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

// =============================================================================
// Transformations
// =============================================================================

impl<T: 'static> LazySeq<T> {
    /// Applies `function` to every element, lazily.
    ///
    /// Nothing is evaluated until an element of the result is requested.
    /// Applied to a view, `function` is composed into that view instead of
    /// wrapping it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::LazySeq;
    ///
    /// let words = LazySeq::from_producer(vec!["lazy", "seq"]);
    /// let lengths = words.map(|word| word.len());
    /// assert_eq!(lengths.to_vec(), vec![4, 3]);
    /// ```
    pub fn map<U, F>(&self, function: F) -> LazySeq<U>
    where
        U: 'static,
        F: Fn(&T) -> U + 'static,
    {
        Stage::of(self).then_map(Rc::new(function))
    }

    /// Keeps the elements for which `predicate` holds, lazily.
    ///
    /// Realizing the head of the result scans the upstream until a match is
    /// found; the elements consumed by that scan are not revisited.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::LazySeq;
    ///
    /// let odd = LazySeq::from_producer(1..=5).filter(|value| value % 2 == 1);
    /// assert_eq!(odd.to_vec(), vec![1, 3, 5]);
    /// ```
    #[must_use]
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        Stage::of(self).then_filter(Rc::new(predicate))
    }

    /// Applies a partial function to the elements it is defined at and
    /// drops the rest, lazily.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::{LazySeq, PartialFunction};
    ///
    /// let reciprocal = PartialFunction::new(|value: &i32| *value != 0, |value: &i32| 1.0 / f64::from(*value));
    /// let values = LazySeq::from_producer(vec![2, 0, 4]).collect(reciprocal);
    /// assert_eq!(values.to_vec(), vec![0.5, 0.25]);
    /// ```
    pub fn collect<U: 'static>(&self, partial: PartialFunction<T, U>) -> LazySeq<U> {
        Stage::of(self).then_collect(partial.into_lifted())
    }

    /// Applies `function` and keeps the `Some` results, lazily.
    ///
    /// Equivalent to [`collect`](Self::collect) with
    /// [`PartialFunction::from_lifted`].
    pub fn filter_map<U, F>(&self, function: F) -> LazySeq<U>
    where
        U: 'static,
        F: Fn(&T) -> Option<U> + 'static,
    {
        Stage::of(self).then_collect(Rc::new(function))
    }
}

// =============================================================================
// Eager Operations
// =============================================================================

impl<T: 'static> LazySeq<T> {
    /// Returns the number of elements, realizing the whole sequence.
    ///
    /// Does not return on an unbounded sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::LazySeq;
    ///
    /// let sequence = LazySeq::from_producer(0..100).filter(|value| value % 10 == 0);
    /// assert_eq!(sequence.len(), 10);
    /// ```
    pub fn len(&self) -> usize {
        let mut length = 0;
        let mut current = self;
        while let Ok(tail) = current.tail_ref() {
            length += 1;
            current = tail;
        }
        length
    }

    /// Returns an iterator over references to the elements.
    ///
    /// Each call to `next` realizes exactly one more cell.
    #[inline]
    pub const fn iter(&self) -> LazySeqIterator<'_, T> {
        LazySeqIterator::new(self)
    }

    /// Folds the elements from front to back.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::LazySeq;
    ///
    /// let sum = LazySeq::from_producer(1..=4).fold_left(0, |accumulator, value| accumulator + value);
    /// assert_eq!(sum, 10);
    /// ```
    pub fn fold_left<B, F>(&self, initial: B, mut function: F) -> B
    where
        F: FnMut(B, &T) -> B,
    {
        self.iter()
            .fold(initial, |accumulator, element| function(accumulator, element))
    }

    /// Returns the first element satisfying `predicate`, realizing cells
    /// only up to it.
    pub fn find<P>(&self, mut predicate: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().find(|element| predicate(element))
    }

    /// Replays every element into `builder` in order and returns its result.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::LazySeq;
    /// use std::collections::VecDeque;
    ///
    /// let deque = LazySeq::from_producer(1..=3).realize_into(VecDeque::new());
    /// assert_eq!(deque, VecDeque::from(vec![1, 2, 3]));
    /// ```
    pub fn realize_into<B>(&self, mut builder: B) -> B::Output
    where
        T: Clone,
        B: Builder<T>,
    {
        for element in self {
            builder.add(element.clone());
        }
        builder.result()
    }

    /// Collects every element into a `Vec`.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.realize_into(Vec::new())
    }
}

// =============================================================================
// Introspection
// =============================================================================

impl<T: 'static> LazySeq<T> {
    /// Returns the kind of node this handle points at.
    ///
    /// The kind never changes after construction. An exhausted source still
    /// reports [`NodeKind::Source`], since its producer is pulled on demand
    /// rather than ahead of the tail being handed out.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::{LazySeq, NodeKind};
    ///
    /// let source = LazySeq::from_producer(1..=3);
    /// assert_eq!(source.node_kind(), NodeKind::Source);
    /// assert_eq!(source.map(|value| value + 1).node_kind(), NodeKind::Map);
    /// ```
    #[inline]
    pub fn node_kind(&self) -> NodeKind {
        self.node.kind()
    }

    /// Returns the number of transform views between this node and the
    /// untransformed upstream it reads from.
    ///
    /// Fusion keeps this at 0 for untransformed nodes and 1 for views, no
    /// matter how many operations were chained.
    #[inline]
    pub fn transform_depth(&self) -> usize {
        self.node.transform_depth()
    }

    /// Returns the number of leading cells whose head is already realized,
    /// without realizing anything.
    pub fn realized_prefix_len(&self) -> usize {
        let mut length = 0;
        let mut current = Some(self);
        while let Some(sequence) = current {
            match sequence.node.peek() {
                Peek::Element { tail, .. } => {
                    length += 1;
                    current = tail;
                }
                Peek::Empty | Peek::Pending => current = None,
            }
        }
        length
    }

    /// Writes the realized prefix, then `?` if anything is left unrealized.
    fn render(
        &self,
        formatter: &mut fmt::Formatter<'_>,
        mut write_element: impl FnMut(&T, &mut fmt::Formatter<'_>) -> fmt::Result,
    ) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        let mut current = Some(self);
        while let Some(sequence) = current {
            let peeked = sequence.node.peek();
            if !matches!(peeked, Peek::Empty) {
                if first {
                    first = false;
                } else {
                    write!(formatter, ", ")?;
                }
            }
            current = match peeked {
                Peek::Empty => None,
                Peek::Pending => {
                    write!(formatter, "?")?;
                    None
                }
                Peek::Element { head, tail } => {
                    write_element(head, formatter)?;
                    if tail.is_none() {
                        write!(formatter, ", ?")?;
                    }
                    tail
                }
            };
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T: 'static> Default for LazySeq<T> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

/// Buffers the iterator and exposes it as a source sequence.
///
/// Use [`LazySeq::from_producer`] to wrap an iterator without buffering it.
impl<T: 'static> FromIterator<T> for LazySeq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let elements: Vec<T> = iter.into_iter().collect();
        Self::from_producer(elements)
    }
}

impl<T: Clone + 'static> IntoIterator for LazySeq<T> {
    type Item = T;
    type IntoIter = LazySeqIntoIterator<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        LazySeqIntoIterator::new(self)
    }
}

impl<'a, T: 'static> IntoIterator for &'a LazySeq<T> {
    type Item = &'a T;
    type IntoIter = LazySeqIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Element-by-element comparison.
///
/// Stops at the first mismatch, at the first side to run out, or as soon
/// as both sides reach the same node.
impl<T: PartialEq + 'static> PartialEq for LazySeq<T> {
    fn eq(&self, other: &Self) -> bool {
        let mut left = self;
        let mut right = other;
        loop {
            if left.ptr_eq(right) {
                return true;
            }
            match (left.split(), right.split()) {
                (None, None) => return true,
                (Some((left_head, left_tail)), Some((right_head, right_tail))) => {
                    if left_head != right_head {
                        return false;
                    }
                    left = left_tail;
                    right = right_tail;
                }
                _ => return false,
            }
        }
    }
}

impl<T: Eq + 'static> Eq for LazySeq<T> {}

impl<T: Hash + 'static> Hash for LazySeq<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut length: usize = 0;
        for element in self {
            element.hash(state);
            length += 1;
        }
        length.hash(state);
    }
}

/// Renders the realized prefix; never realizes anything.
///
/// ```rust
/// use lambars_lazy::sequence::LazySeq;
///
/// let sequence = LazySeq::from_producer(vec![1, 2, 3]);
/// assert_eq!(format!("{sequence}"), "[?]");
///
/// sequence.head().unwrap();
/// assert_eq!(format!("{sequence}"), "[1, ?]");
/// ```
impl<T: fmt::Display + 'static> fmt::Display for LazySeq<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(formatter, |element, formatter| write!(formatter, "{element}"))
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for LazySeq<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "LazySeq")?;
        self.render(formatter, |element, formatter| write!(formatter, "{element:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    // =========================================================================
    // Display Tests
    // =========================================================================

    #[rstest]
    fn test_display_empty() {
        let empty: LazySeq<i32> = LazySeq::empty();
        assert_eq!(format!("{empty}"), "[]");
    }

    #[rstest]
    fn test_display_cons_list_is_fully_known() {
        let list = LazySeq::empty().prepend(3).prepend(2).prepend(1);
        assert_eq!(format!("{list}"), "[1, 2, 3]");
    }

    #[rstest]
    fn test_display_placeholder_for_unrealized_source() {
        let source = LazySeq::from_producer(vec![1, 2, 3]);
        assert_eq!(format!("{source}"), "[?]");

        source.head().unwrap();
        assert_eq!(format!("{source}"), "[1, ?]");
        assert_eq!(format!("{source}"), "[1, ?]");
        assert_eq!(source.realized_prefix_len(), 1);
    }

    #[rstest]
    fn test_display_fully_realized_source() {
        let source = LazySeq::from_producer(vec![1, 2]);
        assert_eq!(source.len(), 2);
        assert_eq!(format!("{source}"), "[1, 2]");
    }

    #[rstest]
    fn test_display_map_head_without_tail() {
        let mapped = LazySeq::from_producer(vec![1, 2, 3]).map(|value| value * 10);
        mapped.head().unwrap();
        assert_eq!(format!("{mapped}"), "[10, ?]");
    }

    #[rstest]
    fn test_debug_uses_debug_format() {
        let list = LazySeq::cons("a".to_string(), LazySeq::empty());
        assert_eq!(format!("{list:?}"), "LazySeq[\"a\"]");
    }

    // =========================================================================
    // Cons / Empty Tests
    // =========================================================================

    #[rstest]
    fn test_empty_head_and_tail_fail() {
        let empty: LazySeq<i32> = LazySeq::empty();
        assert_eq!(empty.head(), Err(EmptyAccessError::new("head")));
        assert_eq!(empty.tail().unwrap_err(), EmptyAccessError::new("tail"));
        assert_eq!(empty.node_kind(), NodeKind::Empty);
    }

    #[rstest]
    fn test_prepend_shares_tail() {
        let base = LazySeq::singleton(2);
        let extended = base.prepend(1);

        assert!(extended.tail().unwrap().ptr_eq(&base));
        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
    }

    #[rstest]
    fn test_uncons_on_empty() {
        let empty: LazySeq<i32> = LazySeq::empty();
        assert!(empty.uncons().is_none());
    }

    #[rstest]
    fn test_get_and_skip() {
        let list: LazySeq<i32> = (1..=5).collect();
        assert_eq!(list.get(0), Some(&1));
        assert_eq!(list.get(4), Some(&5));
        assert_eq!(list.get(5), None);
        assert_eq!(list.skip(3).to_vec(), vec![4, 5]);
        assert!(list.skip(10).is_empty());
    }

    // =========================================================================
    // Equality and Hashing
    // =========================================================================

    #[rstest]
    fn test_equality_across_node_kinds() {
        let explicit = LazySeq::empty().prepend(4).prepend(2);
        let filtered = LazySeq::from_producer(1..=4).filter(|value| value % 2 == 0);
        let mapped = LazySeq::from_producer(1..=2).map(|value| value * 2);

        assert_eq!(explicit, filtered);
        assert_eq!(filtered, mapped);
    }

    #[rstest]
    fn test_collapsed_views_equal_empty() {
        let nothing = LazySeq::from_producer(1..=5).filter(|value| *value > 100);
        assert_eq!(nothing, LazySeq::empty());
        assert_eq!(nothing.node_kind(), NodeKind::Filter);
    }

    #[rstest]
    #[case(vec![1, 2, 3], vec![1, 2])]
    #[case(vec![1, 2], vec![1, 2, 3])]
    #[case(vec![1, 2, 3], vec![1, 5, 3])]
    fn test_inequality(#[case] left: Vec<i32>, #[case] right: Vec<i32>) {
        let left = LazySeq::from_producer(left);
        let right = LazySeq::from_producer(right);
        assert_ne!(left, right);
    }

    #[rstest]
    fn test_inequality_short_circuits() {
        let pulls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulls);
        let unbounded = LazySeq::from_producer((0..).inspect(move |_| counter.set(counter.get() + 1)));
        let finite = LazySeq::from_producer(vec![0, 1, 7]);

        assert_ne!(unbounded, finite);
        assert_eq!(pulls.get(), 3);
    }

    #[rstest]
    fn test_equal_sequences_hash_equal() {
        let explicit = LazySeq::empty().prepend(3).prepend(1);
        let collected = LazySeq::from_producer(0..4).filter_map(|value| (value % 2 == 1).then_some(*value));
        assert_eq!(explicit, collected);
        assert_eq!(hash_of(&explicit), hash_of(&collected));
    }

    // =========================================================================
    // Laziness and Memoization
    // =========================================================================

    #[rstest]
    fn test_map_is_not_evaluated_on_construction() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mapped = LazySeq::from_producer(1..=3).map(move |value| {
            counter.set(counter.get() + 1);
            value + 1
        });

        assert_eq!(calls.get(), 0);
        assert_eq!(mapped.head(), Ok(&2));
        assert_eq!(mapped.head(), Ok(&2));
        assert_eq!(calls.get(), 1);
    }

    #[rstest]
    fn test_map_tail_does_not_evaluate_head() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mapped = LazySeq::from_producer(1..=3).map(move |value| {
            counter.set(counter.get() + 1);
            value * 2
        });

        let tail = mapped.tail().unwrap();
        assert_eq!(calls.get(), 0);
        assert_eq!(tail.head(), Ok(&4));
        assert_eq!(calls.get(), 1);
        assert!(mapped.tail().unwrap().ptr_eq(&tail));
    }

    #[rstest]
    fn test_map_is_empty_does_not_invoke_function() {
        let mapped = LazySeq::from_producer(Vec::<i32>::new()).map(|_| -> i32 {
            unreachable!("mapping function must not run on an empty upstream")
        });
        assert!(mapped.is_empty());
    }

    #[rstest]
    fn test_fold_and_find() {
        let sequence = LazySeq::from_producer(1..);
        assert_eq!(sequence.find(|value| value * value > 50), Some(&8));
        assert_eq!(sequence.realized_prefix_len(), 8);

        let total = LazySeq::from_producer(1..=10).fold_left(0, |sum, value| sum + value);
        assert_eq!(total, 55);
    }

    #[rstest]
    fn test_owned_iteration_clones_elements() {
        let words = LazySeq::from_producer(vec!["x".to_string(), "y".to_string()]);
        let collected: Vec<String> = words.clone().into_iter().collect();
        assert_eq!(collected, vec!["x".to_string(), "y".to_string()]);
        assert_eq!(words.len(), 2);
    }
}
