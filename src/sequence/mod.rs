//! Lazy, fusing, memoizing linear sequences.
//!
//! This module provides [`LazySeq`] and the pieces around it:
//!
//! - [`LazySeq`]: The sequence itself, with deferred `map`, `filter` and
//!   `collect`
//! - [`PartialFunction`]: The argument of [`LazySeq::collect`]
//! - [`Builder`]: Eager collections a sequence can be realized into
//! - [`NodeKind`]: The kind of node a handle points at
//! - [`EmptyAccessError`]: Returned by `head`/`tail` of an empty sequence
//!
//! # Fusion
//!
//! Transformations never stack. However many `map`, `filter` and `collect`
//! calls are chained, the result is a single view reading directly from
//! the untransformed upstream, and each upstream element passes through
//! one composed closure.
//!
//! # Examples
//!
//! ```rust
//! use lambars_lazy::sequence::{LazySeq, NodeKind};
//!
//! let mut chained = LazySeq::from_producer(0..);
//! for step in 0..50 {
//!     chained = chained.map(move |value| value + step);
//! }
//!
//! assert_eq!(chained.node_kind(), NodeKind::Map);
//! assert_eq!(chained.transform_depth(), 1);
//! assert_eq!(chained.head(), Ok(&1225));
//! ```

mod builder;
mod error;
mod fusion;
mod iter;
mod lazy_seq;
mod node;
mod partial;
mod source;
mod view;

pub use builder::Builder;
pub use error::EmptyAccessError;
pub use iter::{LazySeqIntoIterator, LazySeqIterator};
pub use lazy_seq::LazySeq;
pub use node::NodeKind;
pub use partial::PartialFunction;
