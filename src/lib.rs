//! # lambars-lazy
//!
//! A lazy, fusing, memoizing linear sequence for functional programming in
//! Rust.
//!
//! ## Overview
//!
//! [`LazySeq`](sequence::LazySeq) is a cons-style sequence whose
//! transformations are deferred until an element is demanded:
//!
//! - **Laziness**: `map`, `filter` and `collect` evaluate nothing when
//!   called
//! - **Fusion**: any chain of transformations is a single view over the
//!   original upstream, so each element passes through one composed step
//! - **Memoization**: every cell is realized at most once, and repeated
//!   reads return the same value
//! - **Sources**: single-pass producers such as iterators are pulled one
//!   element per realized cell
//!
//! ## Feature Flags
//!
//! - `control`: The memoization cell ([`Memo`](control::Memo))
//! - `sequence`: The lazy sequence engine (implies `control`)
//!
//! ## Example
//!
//! ```rust
//! use lambars_lazy::prelude::*;
//!
//! let sequence = LazySeq::from_producer(1..=10)
//!     .filter(|value| value % 2 == 0)
//!     .map(|value| value * value);
//!
//! assert_eq!(sequence.head(), Ok(&4));
//! assert_eq!(format!("{sequence}"), "[4, ?]");
//! assert_eq!(sequence.to_vec(), vec![4, 16, 36, 64, 100]);
//! ```
//!
//! ## Thread Safety
//!
//! Sequences are built on `Rc` and unsynchronized cells. They are neither
//! `Send` nor `Sync`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use lambars_lazy::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "control")]
    pub use crate::control::*;

    #[cfg(feature = "sequence")]
    pub use crate::sequence::*;
}

#[cfg(feature = "control")]
pub mod control;

#[cfg(feature = "sequence")]
pub mod sequence;
