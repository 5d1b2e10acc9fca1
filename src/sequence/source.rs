//! Lazy sequences pulled from single-pass producers.
//!
//! A source cell wraps a shared [`Iterator`]. The first access to the cell
//! pulls exactly one element and memoizes it together with the next source
//! cell, which wraps the same iterator. Repeated access never pulls again,
//! so every cell observes the element that was current when it was first
//! forced.

use std::cell::RefCell;
use std::rc::Rc;

use super::LazySeq;
use super::node::{Node, Peek};
use crate::control::Memo;

/// A single-pass producer shared by every cell of one source chain.
pub(crate) type Producer<T> = Rc<RefCell<dyn Iterator<Item = T>>>;

pub(crate) struct SourceView<T> {
    producer: Producer<T>,
    cell: Memo<Option<(T, LazySeq<T>)>>,
}

impl<T: 'static> SourceView<T> {
    fn realize(&self) -> Option<&(T, LazySeq<T>)> {
        self.cell
            .force_with(|| {
                let pulled = self.producer.borrow_mut().next();
                match pulled {
                    Some(element) => Some((element, LazySeq::from_shared_producer(&self.producer))),
                    None => {
                        tracing::debug!("lazy sequence source exhausted");
                        None
                    }
                }
            })
            .as_ref()
    }

    pub(crate) fn head(&self) -> Option<&T> {
        self.realize().map(|(head, _)| head)
    }

    pub(crate) fn tail(&self) -> Option<&LazySeq<T>> {
        self.realize().map(|(_, tail)| tail)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.realize().is_none()
    }

    pub(crate) fn peek(&self) -> Peek<'_, T> {
        match self.cell.get() {
            None => Peek::Pending,
            Some(None) => Peek::Empty,
            Some(Some((head, tail))) => Peek::Element {
                head,
                tail: Some(tail),
            },
        }
    }
}

impl<T> SourceView<T> {
    pub(crate) fn take_tail(&mut self) -> Option<LazySeq<T>> {
        self.cell.take().flatten().map(|(_, tail)| tail)
    }
}

impl<T: 'static> LazySeq<T> {
    fn from_shared_producer(producer: &Producer<T>) -> Self {
        Self::from_node(Node::Source(SourceView {
            producer: Rc::clone(producer),
            cell: Memo::new(),
        }))
    }

    /// Wraps a single-pass producer as a lazy sequence.
    ///
    /// Nothing is pulled until the sequence is first accessed. Each cell
    /// pulls at most one element, so the producer is advanced exactly as
    /// far as the sequence has been explored.
    ///
    /// The producer is taken by value, so it cannot be wrapped by a second,
    /// independent chain.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::LazySeq;
    ///
    /// let naturals = LazySeq::from_producer(0_u64..);
    /// assert_eq!(naturals.head(), Ok(&0));
    /// assert_eq!(naturals.get(1_000), Some(&1_000));
    /// ```
    pub fn from_producer<I>(producer: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        let producer: Producer<T> = Rc::new(RefCell::new(producer.into_iter()));
        Self::from_shared_producer(&producer)
    }

    /// Creates a lazy sequence whose cells are produced by calling
    /// `produce` until it returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::LazySeq;
    ///
    /// let mut countdown = 3;
    /// let sequence = LazySeq::from_fn(move || {
    ///     (countdown > 0).then(|| {
    ///         countdown -= 1;
    ///         countdown + 1
    ///     })
    /// });
    /// assert_eq!(sequence.to_vec(), vec![3, 2, 1]);
    /// ```
    pub fn from_fn<F>(produce: F) -> Self
    where
        F: FnMut() -> Option<T> + 'static,
    {
        Self::from_producer(std::iter::from_fn(produce))
    }

    /// Creates the unbounded sequence `seed, step(seed), step(step(seed)), ...`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::LazySeq;
    ///
    /// let powers = LazySeq::iterate(1_u32, |value| value * 2);
    /// assert_eq!(powers.get(10), Some(&1024));
    /// ```
    pub fn iterate<F>(seed: T, step: F) -> Self
    where
        F: Fn(&T) -> T + 'static,
    {
        Self::from_producer(std::iter::successors(Some(seed), move |previous| {
            Some(step(previous))
        }))
    }

    /// Creates a sequence by repeatedly applying `step` to a state until it
    /// returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::LazySeq;
    ///
    /// let fibonacci = LazySeq::unfold((0_u64, 1_u64), |(current, next)| {
    ///     Some((current, (next, current + next)))
    /// });
    /// assert_eq!(fibonacci.get(10), Some(&55));
    /// ```
    pub fn unfold<S, F>(initial: S, step: F) -> Self
    where
        S: 'static,
        F: Fn(S) -> Option<(T, S)> + 'static,
    {
        let mut state = Some(initial);
        Self::from_fn(move || {
            let (element, next) = step(state.take()?)?;
            state = Some(next);
            Some(element)
        })
    }
}
