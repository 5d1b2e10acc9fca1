//! Fusion of chained transformations.
//!
//! Every sequence is, as far as fusion is concerned, one [`Stage`] over an
//! untransformed upstream:
//!
//! | Stage       | Node            | Upstream element | Per-element step            |
//! |-------------|-----------------|------------------|-----------------------------|
//! | `Identity`  | Empty/Cons/Source | the node itself | none                        |
//! | `Filtered`  | `FilterView`    | `T`              | `&T -> bool`                |
//! | `Mapped`    | `MapView`       | erased           | `&dyn Any -> T`             |
//! | `Collected` | `CollectView`   | erased           | `&dyn Any -> Option<T>`     |
//!
//! Requesting `map`, `filter` or `collect` composes the new step into the
//! existing one and returns a single view over the *same* upstream. The
//! result kind follows a small lattice: total steps compose into `Mapped`,
//! filters over filters stay `Filtered`, and anything mixing a domain
//! restriction with a value change becomes `Collected`.
//!
//! The upstream element type is erased behind [`ErasedNode`] so that a
//! view's own type does not mention it; the composed step receives the
//! upstream element as `&dyn Any` and downcasts it to the type it was
//! built for.

use std::any::Any;
use std::rc::Rc;

use super::node::Node;
use super::view::{CollectView, FilterView, MapView};
use super::{EmptyAccessError, LazySeq};

/// A type-erased, shared upstream sequence.
pub(crate) type Upstream = Rc<dyn ErasedNode>;

/// A total step from an erased upstream element.
pub(crate) type MapFn<T> = Rc<dyn Fn(&dyn Any) -> T>;

/// A partial step from an erased upstream element.
pub(crate) type CollectFn<T> = Rc<dyn Fn(&dyn Any) -> Option<T>>;

/// A domain restriction over upstream elements of the view's own type.
pub(crate) type Predicate<T> = Rc<dyn Fn(&T) -> bool>;

/// A step whose output type is hidden: it hands each produced value to a
/// continuation instead of returning it.
pub(crate) type Relay = Rc<dyn Fn(&dyn Any, &mut dyn FnMut(&dyn Any))>;

pub(crate) fn downcast<T: 'static>(element: &dyn Any) -> &T {
    element
        .downcast_ref::<T>()
        .unwrap_or_else(|| unreachable!("fused step received an upstream element of another type"))
}

// =============================================================================
// Erased Nodes
// =============================================================================

/// The part of a node's interface that does not depend on its element type.
pub(crate) trait ErasedNode {
    fn head_any(&self) -> Result<&dyn Any, EmptyAccessError>;

    fn tail_erased(&self) -> Result<Upstream, EmptyAccessError>;

    fn is_empty_erased(&self) -> bool;

    fn transform_depth(&self) -> usize;

    /// The node's step in relay form, or `None` for untransformed nodes.
    fn erased_stage(&self) -> Option<ErasedStage>;

    /// Moves the node's links out as erased upstreams, for teardown.
    fn detach_erased(&mut self, erased: &mut Vec<Upstream>);
}

pub(crate) struct ErasedStage {
    upstream: Upstream,
    /// Whether the relay calls its continuation for every element.
    total: bool,
    relay: Relay,
}

impl<T: 'static> ErasedNode for Node<T> {
    fn head_any(&self) -> Result<&dyn Any, EmptyAccessError> {
        self.head().map(|head| head as &dyn Any)
    }

    fn tail_erased(&self) -> Result<Upstream, EmptyAccessError> {
        self.tail().map(LazySeq::erase)
    }

    fn is_empty_erased(&self) -> bool {
        self.is_empty()
    }

    fn transform_depth(&self) -> usize {
        Node::transform_depth(self)
    }

    fn erased_stage(&self) -> Option<ErasedStage> {
        match self {
            Self::Empty | Self::Cons(_) | Self::Source(_) => None,
            Self::Map(view) => {
                let function = view.function.clone();
                Some(ErasedStage {
                    upstream: view.upstream.clone(),
                    total: true,
                    relay: Rc::new(
                        move |element: &dyn Any, continuation: &mut dyn FnMut(&dyn Any)| {
                            continuation(&function(element));
                        },
                    ),
                })
            }
            Self::Filter(view) => {
                let predicate = view.erased_predicate();
                Some(ErasedStage {
                    upstream: view.upstream.erase(),
                    total: false,
                    relay: Rc::new(
                        move |element: &dyn Any, continuation: &mut dyn FnMut(&dyn Any)| {
                            if predicate(element) {
                                continuation(element);
                            }
                        },
                    ),
                })
            }
            Self::Collect(view) => {
                let partial = view.partial.clone();
                Some(ErasedStage {
                    upstream: view.upstream.clone(),
                    total: false,
                    relay: Rc::new(
                        move |element: &dyn Any, continuation: &mut dyn FnMut(&dyn Any)| {
                            if let Some(value) = partial(element) {
                                continuation(&value);
                            }
                        },
                    ),
                })
            }
        }
    }

    fn detach_erased(&mut self, erased: &mut Vec<Upstream>) {
        let mut typed = Vec::new();
        self.detach(&mut typed, erased);
        erased.extend(typed.into_iter().map(LazySeq::into_erased));
    }
}

// =============================================================================
// Realization-time Fusion
// =============================================================================

/// Builds the tail of a map view: `function` applied over `rest`.
///
/// `rest` is the upstream's tail. When it is itself a view (a cons cell
/// whose tail was a view), `function` is composed into that view's step
/// so the new view still sits on an untransformed upstream.
pub(crate) fn remap<T: 'static>(rest: Upstream, function: MapFn<T>) -> LazySeq<T> {
    let Some(stage) = rest.erased_stage() else {
        return LazySeq::from_map_view(MapView::new(rest, function));
    };
    let ErasedStage {
        upstream,
        total,
        relay,
    } = stage;
    let partial: CollectFn<T> = Rc::new(move |element: &dyn Any| {
        let mut output = None;
        relay(element, &mut |value: &dyn Any| output = Some(function(value)));
        output
    });
    if total {
        let function: MapFn<T> = Rc::new(move |element: &dyn Any| {
            partial(element).unwrap_or_else(|| unreachable!("total step skipped an element"))
        });
        LazySeq::from_map_view(MapView::new(upstream, function))
    } else {
        LazySeq::from_collect_view(CollectView::new(upstream, partial))
    }
}

/// Builds the tail of a collect view: `partial` applied over `rest`.
pub(crate) fn recollect<T: 'static>(rest: Upstream, partial: CollectFn<T>) -> LazySeq<T> {
    let Some(ErasedStage {
        upstream, relay, ..
    }) = rest.erased_stage()
    else {
        return LazySeq::from_collect_view(CollectView::new(rest, partial));
    };
    let composed: CollectFn<T> = Rc::new(move |element: &dyn Any| {
        let mut output = None;
        relay(element, &mut |value: &dyn Any| output = partial(value));
        output
    });
    LazySeq::from_collect_view(CollectView::new(upstream, composed))
}

// =============================================================================
// Operation-time Fusion
// =============================================================================

/// A typed sequence decomposed into its step and untransformed upstream.
pub(crate) enum Stage<T> {
    Identity(LazySeq<T>),
    Filtered(LazySeq<T>, Predicate<T>),
    Mapped(Upstream, MapFn<T>),
    Collected(Upstream, CollectFn<T>),
}

impl<T: 'static> Stage<T> {
    pub(crate) fn of(sequence: &LazySeq<T>) -> Self {
        match &*sequence.node {
            Node::Empty | Node::Cons(_) | Node::Source(_) => Self::Identity(sequence.clone()),
            Node::Map(view) => Self::Mapped(view.upstream.clone(), view.function.clone()),
            Node::Filter(view) => Self::Filtered(view.upstream.clone(), view.predicate.clone()),
            Node::Collect(view) => Self::Collected(view.upstream.clone(), view.partial.clone()),
        }
    }

    pub(crate) fn then_map<U: 'static>(self, function: Rc<dyn Fn(&T) -> U>) -> LazySeq<U> {
        match self {
            Self::Identity(upstream) => LazySeq::from_map_view(MapView::new(
                upstream.erase(),
                Rc::new(move |element: &dyn Any| function(downcast::<T>(element))),
            )),
            Self::Filtered(upstream, predicate) => LazySeq::from_collect_view(CollectView::new(
                upstream.erase(),
                Rc::new(move |element: &dyn Any| {
                    let element = downcast::<T>(element);
                    predicate(element).then(|| function(element))
                }),
            )),
            Self::Mapped(upstream, inner) => LazySeq::from_map_view(MapView::new(
                upstream,
                Rc::new(move |element: &dyn Any| function(&inner(element))),
            )),
            Self::Collected(upstream, inner) => LazySeq::from_collect_view(CollectView::new(
                upstream,
                Rc::new(move |element: &dyn Any| inner(element).map(|value| function(&value))),
            )),
        }
    }

    pub(crate) fn then_filter(self, predicate: Predicate<T>) -> LazySeq<T> {
        match self {
            Self::Identity(upstream) => {
                LazySeq::from_filter_view(FilterView::new(upstream, predicate))
            }
            Self::Filtered(upstream, inner) => LazySeq::from_filter_view(FilterView::new(
                upstream,
                Rc::new(move |element: &T| inner(element) && predicate(element)),
            )),
            Self::Mapped(upstream, inner) => LazySeq::from_collect_view(CollectView::new(
                upstream,
                Rc::new(move |element: &dyn Any| {
                    let value = inner(element);
                    predicate(&value).then_some(value)
                }),
            )),
            Self::Collected(upstream, inner) => LazySeq::from_collect_view(CollectView::new(
                upstream,
                Rc::new(move |element: &dyn Any| inner(element).filter(|value| predicate(value))),
            )),
        }
    }

    pub(crate) fn then_collect<U: 'static>(
        self,
        partial: Rc<dyn Fn(&T) -> Option<U>>,
    ) -> LazySeq<U> {
        let (upstream, composed): (Upstream, CollectFn<U>) = match self {
            Self::Identity(upstream) => (
                upstream.erase(),
                Rc::new(move |element: &dyn Any| partial(downcast::<T>(element))),
            ),
            Self::Filtered(upstream, predicate) => (
                upstream.erase(),
                Rc::new(move |element: &dyn Any| {
                    let element = downcast::<T>(element);
                    if predicate(element) { partial(element) } else { None }
                }),
            ),
            Self::Mapped(upstream, inner) => (
                upstream,
                Rc::new(move |element: &dyn Any| partial(&inner(element))),
            ),
            Self::Collected(upstream, inner) => (
                upstream,
                Rc::new(move |element: &dyn Any| inner(element).and_then(|value| partial(&value))),
            ),
        };
        LazySeq::from_collect_view(CollectView::new(upstream, composed))
    }
}
