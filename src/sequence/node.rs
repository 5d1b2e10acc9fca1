//! The closed set of node kinds a [`LazySeq`] can point at.

use std::rc::Rc;

use super::fusion::Upstream;
use super::source::SourceView;
use super::view::{CollectView, FilterView, MapView};
use super::{EmptyAccessError, LazySeq};
use crate::control::Memo;

/// The variant of the node a [`LazySeq`] currently points at.
///
/// Returned by [`LazySeq::node_kind`]. The kind describes how the node was
/// built, not whether it turned out to be empty: a `Filter` view whose scan
/// found nothing still reports `Filter`, while [`LazySeq::is_empty`]
/// reports `true`. Likewise the tail of a source's last cell is a `Source`
/// node: the producer is only asked for the next element once that tail is
/// accessed, so nothing is known about it earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The canonical terminal.
    Empty,
    /// An explicit head paired with a tail.
    Cons,
    /// A cell pulled from a single-pass producer.
    Source,
    /// A fused map over an untransformed upstream.
    Map,
    /// A fused filter over an untransformed upstream.
    Filter,
    /// A fused partial map over an untransformed upstream.
    Collect,
}

/// An explicit cons cell. Its tail is stored pre-realized so every node
/// kind keeps its tail in a [`Memo`] that teardown can take from.
pub(crate) struct ConsCell<T> {
    pub(crate) head: T,
    pub(crate) tail: Memo<LazySeq<T>>,
}

pub(crate) enum Node<T> {
    Empty,
    Cons(ConsCell<T>),
    Source(SourceView<T>),
    Map(MapView<T>),
    Filter(FilterView<T>),
    Collect(CollectView<T>),
}

/// What is known about a node without realizing anything.
pub(crate) enum Peek<'a, T> {
    /// Known to hold no elements.
    Empty,
    /// Nothing realized yet.
    Pending,
    /// The head is realized. `tail` is `None` while the tail is not.
    Element {
        head: &'a T,
        tail: Option<&'a LazySeq<T>>,
    },
}

impl<T> Node<T> {
    pub(crate) const fn kind(&self) -> NodeKind {
        match self {
            Self::Empty => NodeKind::Empty,
            Self::Cons(_) => NodeKind::Cons,
            Self::Source(_) => NodeKind::Source,
            Self::Map(_) => NodeKind::Map,
            Self::Filter(_) => NodeKind::Filter,
            Self::Collect(_) => NodeKind::Collect,
        }
    }

    /// Moves every link this node owns out of it: realized tails, the cell
    /// a filter matched, and the links of an upstream nobody else holds.
    ///
    /// Upstreams themselves stay in place. They are never views, so
    /// detaching one does not recurse any further.
    pub(crate) fn detach(&mut self, typed: &mut Vec<LazySeq<T>>, erased: &mut Vec<Upstream>) {
        match self {
            Self::Empty => {}
            Self::Cons(cell) => typed.extend(cell.tail.take()),
            Self::Source(view) => typed.extend(view.take_tail()),
            Self::Map(view) => {
                typed.extend(view.take_tail());
                detach_upstream(&mut view.upstream, erased);
            }
            Self::Filter(view) => {
                if let Some((matched, tail)) = view.take_cell() {
                    typed.push(matched);
                    typed.push(tail);
                }
                if let Some(upstream) = Rc::get_mut(&mut view.upstream.node) {
                    upstream.detach(typed, erased);
                }
            }
            Self::Collect(view) => {
                typed.extend(view.take_tail());
                detach_upstream(&mut view.upstream, erased);
            }
        }
    }
}

fn detach_upstream(upstream: &mut Upstream, erased: &mut Vec<Upstream>) {
    if let Some(node) = Rc::get_mut(upstream) {
        node.detach_erased(erased);
    }
}

impl<T: 'static> Node<T> {
    pub(crate) fn head(&self) -> Result<&T, EmptyAccessError> {
        let head = match self {
            Self::Empty => None,
            Self::Cons(cell) => Some(&cell.head),
            Self::Source(view) => view.head(),
            Self::Map(view) => view.head(),
            Self::Filter(view) => view.head(),
            Self::Collect(view) => view.head(),
        };
        head.ok_or(EmptyAccessError::new("head"))
    }

    pub(crate) fn tail(&self) -> Result<&LazySeq<T>, EmptyAccessError> {
        let tail = match self {
            Self::Empty => None,
            Self::Cons(cell) => cell.tail.get(),
            Self::Source(view) => view.tail(),
            Self::Map(view) => view.tail(),
            Self::Filter(view) => view.tail(),
            Self::Collect(view) => view.tail(),
        };
        tail.ok_or(EmptyAccessError::new("tail"))
    }

    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Cons(_) => false,
            Self::Source(view) => view.is_empty(),
            Self::Map(view) => view.is_empty(),
            Self::Filter(view) => view.is_empty(),
            Self::Collect(view) => view.is_empty(),
        }
    }

    pub(crate) fn peek(&self) -> Peek<'_, T> {
        match self {
            Self::Empty => Peek::Empty,
            Self::Cons(cell) => Peek::Element {
                head: &cell.head,
                tail: cell.tail.get(),
            },
            Self::Source(view) => view.peek(),
            Self::Map(view) => view.peek(),
            Self::Filter(view) => view.peek(),
            Self::Collect(view) => view.peek(),
        }
    }

    pub(crate) fn transform_depth(&self) -> usize {
        match self {
            Self::Empty | Self::Cons(_) | Self::Source(_) => 0,
            Self::Map(view) => 1 + view.upstream.transform_depth(),
            Self::Filter(view) => 1 + view.upstream.node.transform_depth(),
            Self::Collect(view) => 1 + view.upstream.transform_depth(),
        }
    }
}

// Chains can be arbitrarily long, through tails as well as through the
// upstream of each view. Unlink them with a worklist instead of letting each
// node's drop recurse into its links. A node is only emptied while it is
// uniquely owned, so dropping it afterwards is shallow.
impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        let mut typed = Vec::new();
        let mut erased = Vec::new();
        self.detach(&mut typed, &mut erased);
        while !typed.is_empty() || !erased.is_empty() {
            while let Some(mut sequence) = typed.pop() {
                if let Some(node) = Rc::get_mut(&mut sequence.node) {
                    node.detach(&mut typed, &mut erased);
                }
            }
            while let Some(mut upstream) = erased.pop() {
                if let Some(node) = Rc::get_mut(&mut upstream) {
                    node.detach_erased(&mut erased);
                }
            }
        }
    }
}
