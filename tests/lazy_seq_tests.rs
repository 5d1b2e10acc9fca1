#![cfg(feature = "sequence")]
//! Scenario tests for LazySeq.
//!
//! Tests cover:
//! - Fusion of long transformation chains
//! - Deferred evaluation and memoization of map/filter/collect
//! - Eager equivalence of a mixed chain
//! - Empty and unbounded sources
//! - Non-forcing rendering
//! - Teardown of long realized chains

use lambars_lazy::sequence::{EmptyAccessError, LazySeq, NodeKind, PartialFunction};
use rstest::rstest;
use std::cell::Cell;
use std::rc::Rc;

fn counter() -> (Rc<Cell<usize>>, Rc<Cell<usize>>) {
    let count = Rc::new(Cell::new(0));
    (Rc::clone(&count), count)
}

// =============================================================================
// Fusion
// =============================================================================

#[rstest]
#[case(1)]
#[case(10)]
#[case(200)]
fn chained_maps_stay_one_view(#[case] length: i64) {
    let mut sequence = LazySeq::from_producer(0_i64..);
    for _ in 0..length {
        sequence = sequence.map(|value| value + 1);
    }

    assert_eq!(sequence.node_kind(), NodeKind::Map);
    assert_eq!(sequence.transform_depth(), 1);
    assert_eq!(sequence.head(), Ok(&length));
}

#[rstest]
#[case(3)]
#[case(30)]
#[case(300)]
fn mixed_chain_stays_one_view(#[case] length: usize) {
    let mut sequence = LazySeq::from_producer(0_u64..1_000);
    for step in 0..length {
        sequence = match step % 3 {
            0 => sequence.map(|value| value + 1),
            1 => sequence.filter(|value| value % 7 != 0),
            _ => sequence.filter_map(|value| Some(value.saturating_sub(1))),
        };
        assert!(sequence.transform_depth() <= 1);
    }

    assert_eq!(sequence.node_kind(), NodeKind::Collect);
    assert_eq!(sequence.transform_depth(), 1);
}

#[rstest]
fn tails_of_views_stay_one_view() {
    let sequence = LazySeq::from_producer(1..=100)
        .map(|value| value * 2)
        .filter(|value| value % 3 == 0);

    let mut current = sequence;
    while let Ok(tail) = current.tail() {
        assert!(tail.transform_depth() <= 1);
        current = tail;
    }
}

#[rstest]
fn view_over_cons_of_view_is_fused() {
    let evens = LazySeq::from_producer(1..=6).filter(|value| value % 2 == 0);
    let sequence = LazySeq::cons(100, evens).map(|value| value + 1);

    let tail = sequence.tail().unwrap();
    assert_eq!(tail.transform_depth(), 1);
    assert_eq!(sequence.to_vec(), vec![101, 3, 5, 7]);
}

// =============================================================================
// Laziness
// =============================================================================

#[rstest]
fn construction_evaluates_nothing() {
    let (map_calls, map_counter) = counter();
    let (filter_calls, filter_counter) = counter();
    let (pulls, pull_counter) = counter();

    let source = LazySeq::from_producer((1..=10).inspect(move |_| pull_counter.set(pull_counter.get() + 1)));
    let sequence = source
        .map(move |value| {
            map_counter.set(map_counter.get() + 1);
            value * 2
        })
        .filter(move |value| {
            filter_counter.set(filter_counter.get() + 1);
            value % 4 == 0
        });

    assert_eq!(map_calls.get(), 0);
    assert_eq!(filter_calls.get(), 0);
    assert_eq!(pulls.get(), 0);

    assert_eq!(sequence.head(), Ok(&4));
    assert_eq!(pulls.get(), 2);
    assert_eq!(map_calls.get(), 2);
    assert_eq!(filter_calls.get(), 2);
}

#[rstest]
fn tail_realizes_only_what_it_needs() {
    let (pulls, pull_counter) = counter();
    let source = LazySeq::from_producer((0..).inspect(move |_| pull_counter.set(pull_counter.get() + 1)));
    let sequence = source.filter(|value| value % 10 == 9);

    let tail = sequence.tail().unwrap();
    assert_eq!(pulls.get(), 10);
    assert_eq!(tail.head(), Ok(&19));
    assert_eq!(pulls.get(), 20);
}

// =============================================================================
// Memoization
// =============================================================================

#[rstest]
fn head_is_memoized() {
    let (map_calls, map_counter) = counter();
    let (filter_calls, filter_counter) = counter();

    let mapped = LazySeq::from_producer(vec![1, 2, 3]).map(move |value| {
        map_counter.set(map_counter.get() + 1);
        value + 1
    });
    let filtered = LazySeq::from_producer(vec![1, 2, 3]).filter(move |value| {
        filter_counter.set(filter_counter.get() + 1);
        *value > 1
    });

    let first = mapped.head().unwrap();
    let second = mapped.head().unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(map_calls.get(), 1);

    assert_eq!(filtered.head(), Ok(&2));
    assert_eq!(filtered.head(), Ok(&2));
    assert_eq!(filter_calls.get(), 2);
}

#[rstest]
fn collect_head_is_memoized() {
    let (partial_calls, partial_counter) = counter();
    let sequence = LazySeq::from_producer(vec![1, 3, 4, 5, 6]).filter_map(move |value| {
        partial_counter.set(partial_counter.get() + 1);
        (value % 2 == 0).then_some(value * 10)
    });
    assert_eq!(partial_calls.get(), 0);

    assert_eq!(sequence.head(), Ok(&40));
    assert_eq!(sequence.head(), Ok(&40));
    assert_eq!(partial_calls.get(), 3);

    let tail = sequence.tail().unwrap();
    assert_eq!(partial_calls.get(), 3);
    assert_eq!(tail.head(), Ok(&60));
    assert_eq!(tail.head(), Ok(&60));
    assert_eq!(partial_calls.get(), 5);
}

#[rstest]
fn collect_chain_is_lazy_and_memoized() {
    let (domain_calls, domain_counter) = counter();
    let (apply_calls, apply_counter) = counter();
    let above_two = PartialFunction::new(
        move |value: &i32| {
            domain_counter.set(domain_counter.get() + 1);
            *value > 2
        },
        move |value: &i32| {
            apply_counter.set(apply_counter.get() + 1);
            value - 2
        },
    );

    let sequence = LazySeq::from_producer(1..=5)
        .collect(above_two)
        .map(|value| value * 100);
    assert_eq!(sequence.node_kind(), NodeKind::Collect);
    assert_eq!(domain_calls.get(), 0);
    assert_eq!(apply_calls.get(), 0);

    assert_eq!(sequence.head(), Ok(&100));
    assert_eq!(sequence.head(), Ok(&100));
    assert_eq!(domain_calls.get(), 3);
    assert_eq!(apply_calls.get(), 1);
}

#[rstest]
fn tail_is_memoized() {
    let sequence = LazySeq::from_producer(1..=5).filter_map(|value| (value % 2 == 1).then_some(value * 10));
    let first = sequence.tail().unwrap();
    let second = sequence.tail().unwrap();
    assert!(first.ptr_eq(&second));
}

#[rstest]
fn shared_upstream_is_pulled_once() {
    let (pulls, pull_counter) = counter();
    let source = LazySeq::from_producer((1..=4).inspect(move |_| pull_counter.set(pull_counter.get() + 1)));

    let doubled = source.map(|value| value * 2);
    let odd = source.filter(|value| value % 2 == 1);

    assert_eq!(doubled.to_vec(), vec![2, 4, 6, 8]);
    assert_eq!(odd.to_vec(), vec![1, 3]);
    assert_eq!(pulls.get(), 4);
}

// =============================================================================
// Eager Equivalence
// =============================================================================

#[rstest]
fn chain_matches_eager_reference() {
    let input: Vec<i32> = (1..=10).collect();
    let expected: Vec<i32> = input
        .iter()
        .filter(|value| *value % 2 == 0)
        .map(|value| value * value)
        .filter(|value| *value > 10)
        .collect();

    let realized = LazySeq::from_producer(input)
        .filter(|value| value % 2 == 0)
        .map(|value| value * value)
        .filter(|value| *value > 10);

    assert_eq!(expected, vec![16, 36, 64, 100]);
    assert_eq!(realized.iter().copied().collect::<Vec<_>>(), expected);
}

#[rstest]
fn collect_applies_only_inside_domain() {
    let inverse = PartialFunction::new(|value: &i32| *value != 0, |value: &i32| 100 / value);
    let sequence = LazySeq::from_producer(vec![5, 0, -4, 0, 10]).collect(inverse);
    assert_eq!(sequence.to_vec(), vec![20, -25, 10]);
}

// =============================================================================
// Empty Source
// =============================================================================

#[rstest]
#[case::map(LazySeq::from_producer(Vec::<i32>::new()).map(|value| value + 1))]
#[case::filter(LazySeq::from_producer(Vec::<i32>::new()).filter(|_| true))]
#[case::collect(LazySeq::from_producer(Vec::<i32>::new()).filter_map(|value| Some(*value)))]
#[case::chain(
    LazySeq::from_producer(Vec::<i32>::new())
        .map(|value| value * 2)
        .filter(|value| *value > 0)
        .filter_map(|value| value.checked_sub(1))
)]
fn empty_source_yields_empty(#[case] sequence: LazySeq<i32>) {
    assert!(sequence.is_empty());
    assert_eq!(sequence.head(), Err(EmptyAccessError::new("head")));
    assert!(sequence.tail().is_err());
    assert_eq!(sequence.len(), 0);
    assert_eq!(sequence, LazySeq::empty());
}

#[rstest]
fn empty_access_error_names_operation() {
    let empty: LazySeq<u8> = LazySeq::empty();
    let error = empty.head().unwrap_err();
    assert_eq!(error.to_string(), "head called on an empty lazy sequence");
}

// =============================================================================
// Unbounded Source
// =============================================================================

#[rstest]
fn unbounded_source_is_realized_incrementally() {
    let (pulls, pull_counter) = counter();
    let naturals = LazySeq::from_producer((0_u64..).inspect(move |_| pull_counter.set(pull_counter.get() + 1)));
    let large = naturals.filter(|value| *value > 1_000_000);

    assert_eq!(large.head(), Ok(&1_000_001));
    assert_eq!(pulls.get(), 1_000_002);

    assert_eq!(large.get(2), Some(&1_000_003));
    assert_eq!(pulls.get(), 1_000_004);
}

#[rstest]
fn iterate_and_take_prefix() {
    let powers = LazySeq::iterate(1_u64, |value| value * 3);
    let prefix: Vec<u64> = powers.iter().take(5).copied().collect();
    assert_eq!(prefix, vec![1, 3, 9, 27, 81]);
    assert_eq!(powers.realized_prefix_len(), 5);
}

// =============================================================================
// Rendering
// =============================================================================

#[rstest]
fn partial_rendering_does_not_force() {
    let (pulls, pull_counter) = counter();
    let sequence = LazySeq::from_producer(vec![1, 2, 3].into_iter().inspect(move |_| pull_counter.set(pull_counter.get() + 1)));

    sequence.head().unwrap();
    assert_eq!(sequence.to_string(), "[1, ?]");
    assert_eq!(pulls.get(), 1);
    assert_eq!(sequence.realized_prefix_len(), 1);
}

#[rstest]
fn rendering_after_full_realization() {
    let sequence = LazySeq::from_producer(vec![1, 2, 3]).map(|value| value * 10);
    assert_eq!(sequence.len(), 3);
    assert_eq!(sequence.iter().count(), 3);
    assert_eq!(format!("{sequence}"), "[10, 20, 30]");
}

// =============================================================================
// Teardown
// =============================================================================

#[rstest]
fn long_realized_chain_drops_without_overflow() {
    let sequence = LazySeq::from_producer(0..200_000).map(|value| value + 1);
    assert_eq!(sequence.len(), 200_000);
    drop(sequence);

    let mut list = LazySeq::empty();
    for value in 0..200_000 {
        list = list.prepend(value);
    }
    assert_eq!(list.head(), Ok(&199_999));
    drop(list);
}

#[rstest]
fn mapped_cons_chain_drops_without_overflow() {
    let mut sequence = LazySeq::empty();
    for value in 0..200_000 {
        sequence = sequence.prepend(value).map(|element| element + 1);
    }
    assert_eq!(sequence.node_kind(), NodeKind::Map);
    assert_eq!(sequence.head(), Ok(&200_000));
    drop(sequence);
}

#[rstest]
fn collected_cons_chain_drops_without_overflow() {
    let mut sequence = LazySeq::<i32>::empty();
    for value in 0..200_000 {
        sequence = sequence.prepend(value).filter_map(|element| element.checked_add(1));
    }
    assert_eq!(sequence.head(), Ok(&200_000));
    drop(sequence);
}

#[rstest]
fn cons_over_filtered_chain_drops_without_overflow() {
    let mut sequence = LazySeq::empty();
    for value in 0..200_000 {
        sequence = LazySeq::cons(value, sequence.filter(|element| element % 2 == 0));
    }
    assert_eq!(sequence.head(), Ok(&199_999));
    assert_eq!(sequence.get(4), Some(&199_992));
    drop(sequence);
}
