//! Transform views: the Map, Filter and Collect nodes.
//!
//! Every view sits directly on an untransformed upstream. A `MapView`
//! realizes its head and its tail independently, because mapping never
//! changes where the next element comes from. `FilterView` and
//! `CollectView` realize head and tail together: finding the head consumes
//! exactly the upstream elements that decide where the tail resumes.

use std::any::Any;

use super::LazySeq;
use super::fusion::{CollectFn, MapFn, Predicate, Stage, Upstream, downcast, recollect, remap};
use super::node::Peek;
use crate::control::Memo;

// =============================================================================
// MapView
// =============================================================================

pub(crate) struct MapView<T> {
    pub(crate) upstream: Upstream,
    pub(crate) function: MapFn<T>,
    head: Memo<Option<T>>,
    tail: Memo<Option<LazySeq<T>>>,
}

impl<T: 'static> MapView<T> {
    pub(crate) fn new(upstream: Upstream, function: MapFn<T>) -> Self {
        Self {
            upstream,
            function,
            head: Memo::new(),
            tail: Memo::new(),
        }
    }

    pub(crate) fn head(&self) -> Option<&T> {
        self.head
            .force_with(|| {
                self.upstream
                    .head_any()
                    .ok()
                    .map(|element| (self.function)(element))
            })
            .as_ref()
    }

    pub(crate) fn tail(&self) -> Option<&LazySeq<T>> {
        self.tail
            .force_with(|| {
                self.upstream
                    .tail_erased()
                    .ok()
                    .map(|rest| remap(rest, self.function.clone()))
            })
            .as_ref()
    }

    /// Answered by the upstream, so the mapping function is not invoked.
    pub(crate) fn is_empty(&self) -> bool {
        self.upstream.is_empty_erased()
    }

    pub(crate) fn peek(&self) -> Peek<'_, T> {
        match self.head.get() {
            None => Peek::Pending,
            Some(None) => Peek::Empty,
            Some(Some(head)) => Peek::Element {
                head,
                tail: self.tail.get().and_then(Option::as_ref),
            },
        }
    }
}

impl<T> MapView<T> {
    pub(crate) fn take_tail(&mut self) -> Option<LazySeq<T>> {
        self.tail.take().flatten()
    }
}

// =============================================================================
// FilterView
// =============================================================================

pub(crate) struct FilterView<T> {
    pub(crate) upstream: LazySeq<T>,
    pub(crate) predicate: Predicate<T>,
    /// The matching upstream cell and the filtered remainder after it.
    cell: Memo<Option<(LazySeq<T>, LazySeq<T>)>>,
}

impl<T: 'static> FilterView<T> {
    pub(crate) fn new(upstream: LazySeq<T>, predicate: Predicate<T>) -> Self {
        Self {
            upstream,
            predicate,
            cell: Memo::new(),
        }
    }

    fn realize(&self) -> Option<&(LazySeq<T>, LazySeq<T>)> {
        self.cell
            .force_with(|| {
                let mut current = self.upstream.clone();
                let mut skipped: usize = 0;
                loop {
                    let Ok(element) = current.head() else {
                        tracing::trace!(skipped, "filter view exhausted its upstream");
                        return None;
                    };
                    let matched = (self.predicate)(element);
                    let Ok(rest) = current.tail() else {
                        return None;
                    };
                    if matched {
                        tracing::trace!(skipped, "filter view realized");
                        let tail = Stage::of(&rest).then_filter(self.predicate.clone());
                        return Some((current, tail));
                    }
                    skipped += 1;
                    current = rest;
                }
            })
            .as_ref()
    }

    pub(crate) fn head(&self) -> Option<&T> {
        self.realize()
            .and_then(|(matched, _)| matched.head().ok())
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
            Some(Some((matched, tail))) => matched.head().map_or(Peek::Pending, |head| {
                Peek::Element {
                    head,
                    tail: Some(tail),
                }
            }),
        }
    }

    /// The predicate in erased form, for composing with stages whose input
    /// is the same upstream element.
    pub(crate) fn erased_predicate(&self) -> impl Fn(&dyn Any) -> bool + use<T> {
        let predicate = self.predicate.clone();
        move |element: &dyn Any| predicate(downcast::<T>(element))
    }
}

impl<T> FilterView<T> {
    pub(crate) fn take_cell(&mut self) -> Option<(LazySeq<T>, LazySeq<T>)> {
        self.cell.take().flatten()
    }
}

// =============================================================================
// CollectView
// =============================================================================

pub(crate) struct CollectView<T> {
    pub(crate) upstream: Upstream,
    pub(crate) partial: CollectFn<T>,
    cell: Memo<Option<(T, LazySeq<T>)>>,
}

impl<T: 'static> CollectView<T> {
    pub(crate) fn new(upstream: Upstream, partial: CollectFn<T>) -> Self {
        Self {
            upstream,
            partial,
            cell: Memo::new(),
        }
    }

    fn realize(&self) -> Option<&(T, LazySeq<T>)> {
        self.cell
            .force_with(|| {
                let mut current = self.upstream.clone();
                let mut skipped: usize = 0;
                loop {
                    let Ok(element) = current.head_any() else {
                        tracing::trace!(skipped, "collect view exhausted its upstream");
                        return None;
                    };
                    let produced = (self.partial)(element);
                    let Ok(rest) = current.tail_erased() else {
                        return None;
                    };
                    if let Some(head) = produced {
                        tracing::trace!(skipped, "collect view realized");
                        return Some((head, recollect(rest, self.partial.clone())));
                    }
                    skipped += 1;
                    current = rest;
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

impl<T> CollectView<T> {
    pub(crate) fn take_tail(&mut self) -> Option<LazySeq<T>> {
        self.cell.take().flatten().map(|(_, tail)| tail)
    }
}
