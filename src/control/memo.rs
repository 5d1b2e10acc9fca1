//! Evaluate-once storage for lazily realized values.
//!
//! This module provides [`Memo<T>`], the compute-or-fetch cell every lazy
//! sequence node uses for its head and tail. A `Memo` starts out empty and
//! is filled at most once by the first call to [`Memo::force_with`]; every
//! later call returns a reference to the same stored value.
//!
//! # Examples
//!
//! ```rust
//! use lambars_lazy::control::Memo;
//! use std::cell::Cell;
//!
//! let calls = Cell::new(0);
//! let memo: Memo<i32> = Memo::new();
//!
//! let first = *memo.force_with(|| {
//!     calls.set(calls.get() + 1);
//!     42
//! });
//! let second = *memo.force_with(|| {
//!     calls.set(calls.get() + 1);
//!     0
//! });
//!
//! assert_eq!(first, 42);
//! assert_eq!(second, 42);
//! assert_eq!(calls.get(), 1);
//! ```

use std::cell::{Cell, OnceCell};
use std::fmt;

/// The observable state of a [`Memo`] cell.
///
/// The state only ever moves forward: `Pending` to `Realized`, or
/// `Pending` to `Poisoned` when the realization panicked or re-entered
/// the cell it was filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoState {
    /// No value has been computed yet.
    Pending,
    /// The value has been computed and is stored.
    Realized,
    /// The realization panicked or re-entered the cell.
    /// The cell is now unusable.
    Poisoned,
}

/// A cell that is realized at most once.
///
/// Unlike [`Lazy`](std::cell::LazyCell), the computation is not stored in
/// the cell: it is supplied by the caller of [`force_with`](Self::force_with).
/// Sequence nodes derive the computation from their own immutable state
/// (upstream, composed function), so keeping it out of the cell lets one
/// node own several cells that share that state.
///
/// # Thread Safety
///
/// This type is NOT thread-safe. It is built on [`Cell`] and [`OnceCell`]
/// and is therefore `!Sync`.
pub struct Memo<T> {
    value: OnceCell<T>,
    poisoned: Cell<bool>,
}

impl<T> Memo<T> {
    /// Creates a new, unrealized cell.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::control::{Memo, MemoState};
    ///
    /// let memo: Memo<String> = Memo::new();
    /// assert_eq!(memo.state(), MemoState::Pending);
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: OnceCell::new(),
            poisoned: Cell::new(false),
        }
    }

    /// Creates a cell that is already realized with `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::control::Memo;
    ///
    /// let memo = Memo::realized(7);
    /// assert!(memo.is_realized());
    /// assert_eq!(memo.get(), Some(&7));
    /// ```
    #[inline]
    #[must_use]
    pub fn realized(value: T) -> Self {
        Self {
            value: OnceCell::from(value),
            poisoned: Cell::new(false),
        }
    }

    /// Returns the stored value, computing it with `realize` first if the
    /// cell is still pending.
    ///
    /// `realize` is called at most once over the lifetime of the cell.
    ///
    /// # Panics
    ///
    /// - If the cell is poisoned.
    /// - If `realize` panics; the cell is poisoned afterwards.
    /// - If `realize` forces this same cell again.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::control::Memo;
    ///
    /// let memo = Memo::new();
    /// assert_eq!(memo.force_with(|| "realized"), &"realized");
    /// assert_eq!(memo.force_with(|| "ignored"), &"realized");
    /// ```
    pub fn force_with<F>(&self, realize: F) -> &T
    where
        F: FnOnce() -> T,
    {
        if let Some(value) = self.value.get() {
            return value;
        }
        assert!(!self.poisoned.get(), "Memo cell has been poisoned");

        // Stays set if `realize` unwinds or re-enters this cell.
        self.poisoned.set(true);
        let value = realize();
        self.poisoned.set(false);

        self.value.get_or_init(|| value)
    }

    /// Returns the stored value without forcing it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::control::Memo;
    ///
    /// let memo = Memo::new();
    /// assert_eq!(memo.get(), None);
    /// memo.force_with(|| 1);
    /// assert_eq!(memo.get(), Some(&1));
    /// ```
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    /// Returns `true` once a value has been stored.
    #[inline]
    pub fn is_realized(&self) -> bool {
        self.value.get().is_some()
    }

    /// Returns the current [`MemoState`] of the cell.
    pub fn state(&self) -> MemoState {
        if self.value.get().is_some() {
            MemoState::Realized
        } else if self.poisoned.get() {
            MemoState::Poisoned
        } else {
            MemoState::Pending
        }
    }

    /// Moves the stored value out, leaving the cell pending.
    ///
    /// Requires exclusive access, so no outstanding reference returned by
    /// [`force_with`](Self::force_with) can observe the change. Sequence
    /// nodes use it to unlink long chains iteratively when they are dropped.
    #[inline]
    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }
}

impl<T> Default for Memo<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.value.get(), self.state()) {
            (Some(value), _) => formatter.debug_tuple("Memo").field(value).finish(),
            (None, MemoState::Poisoned) => {
                formatter.debug_tuple("Memo").field(&"<poisoned>").finish()
            }
            (None, _) => formatter.debug_tuple("Memo").field(&"<pending>").finish(),
        }
    }
}
