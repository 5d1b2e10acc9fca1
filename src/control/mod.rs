//! Control structures for lazy evaluation.
//!
//! This module provides the evaluation-control primitive the lazy sequence
//! engine is built on:
//!
//! - [`Memo`]: A compute-or-fetch cell realized at most once
//!
//! # Examples
//!
//! ```rust
//! use lambars_lazy::control::{Memo, MemoState};
//!
//! let memo = Memo::new();
//! assert_eq!(memo.state(), MemoState::Pending);
//!
//! let value = memo.force_with(|| 6 * 7);
//! assert_eq!(*value, 42);
//! assert_eq!(memo.state(), MemoState::Realized);
//! ```

mod memo;

pub use memo::{Memo, MemoState};
