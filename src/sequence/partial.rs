//! Partial functions for [`LazySeq::collect`](super::LazySeq::collect).
//!
//! A [`PartialFunction<A, B>`] is a function from `A` to `B` that is only
//! defined on part of its domain. Sequences consume it in its *lifted* form,
//! `Fn(&A) -> Option<B>`, so that testing the domain and applying the
//! function happen in a single call. The domain predicate is kept next to
//! it for [`PartialFunction::is_defined_at`].

use std::fmt;
use std::rc::Rc;

/// A function from `&A` to `B` restricted to the inputs it is defined at.
///
/// # Examples
///
/// ```rust
/// use lambars_lazy::sequence::PartialFunction;
///
/// let half = PartialFunction::new(|value: &i32| value % 2 == 0, |value: &i32| value / 2);
///
/// assert!(half.is_defined_at(&4));
/// assert!(!half.is_defined_at(&3));
/// assert_eq!(half.apply(&4), Some(2));
/// assert_eq!(half.apply(&3), None);
/// ```
pub struct PartialFunction<A, B> {
    domain: Rc<dyn Fn(&A) -> bool>,
    lifted: Rc<dyn Fn(&A) -> Option<B>>,
}

impl<A: 'static, B: 'static> PartialFunction<A, B> {
    /// Creates a partial function from a domain predicate and a function
    /// applied to inputs inside that domain.
    ///
    /// `apply` is never called for an input where `is_defined_at` is false.
    pub fn new<D, F>(is_defined_at: D, apply: F) -> Self
    where
        D: Fn(&A) -> bool + 'static,
        F: Fn(&A) -> B + 'static,
    {
        let domain: Rc<dyn Fn(&A) -> bool> = Rc::new(is_defined_at);
        let guard = Rc::clone(&domain);
        Self {
            domain,
            lifted: Rc::new(move |input: &A| guard(input).then(|| apply(input))),
        }
    }

    /// Creates a partial function from its lifted form.
    ///
    /// The function is defined exactly where `lifted` returns `Some`. With
    /// no separate predicate, [`is_defined_at`](Self::is_defined_at) has to
    /// evaluate `lifted` and discard the result.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::PartialFunction;
    ///
    /// let parse = PartialFunction::from_lifted(|text: &String| text.parse::<i32>().ok());
    /// assert_eq!(parse.apply(&"12".to_string()), Some(12));
    /// assert_eq!(parse.apply(&"twelve".to_string()), None);
    /// ```
    pub fn from_lifted<F>(lifted: F) -> Self
    where
        F: Fn(&A) -> Option<B> + 'static,
    {
        let lifted: Rc<dyn Fn(&A) -> Option<B>> = Rc::new(lifted);
        let results = Rc::clone(&lifted);
        Self {
            domain: Rc::new(move |input: &A| results(input).is_some()),
            lifted,
        }
    }

    /// Returns `true` if the function is defined at `input`.
    ///
    /// For a function built with [`new`](Self::new) only the domain predicate
    /// runs; the apply step is not evaluated.
    pub fn is_defined_at(&self, input: &A) -> bool {
        (self.domain)(input)
    }

    /// Applies the function, returning `None` outside its domain.
    pub fn apply(&self, input: &A) -> Option<B> {
        (self.lifted)(input)
    }

    /// Returns the total function `&A -> Option<B>` this partial function
    /// stands for.
    pub fn lift(&self) -> impl Fn(&A) -> Option<B> + use<A, B> {
        let lifted = Rc::clone(&self.lifted);
        move |input: &A| lifted(input)
    }

    /// Returns a partial function that applies `function` to every result
    /// of `self`. The domain is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_lazy::sequence::PartialFunction;
    ///
    /// let positive = PartialFunction::new(|value: &i32| *value > 0, |value: &i32| *value);
    /// let labelled = positive.and_then(|value: &i32| format!("+{value}"));
    ///
    /// assert_eq!(labelled.apply(&5), Some("+5".to_string()));
    /// assert_eq!(labelled.apply(&-5), None);
    /// ```
    #[must_use]
    pub fn and_then<C, G>(self, function: G) -> PartialFunction<A, C>
    where
        C: 'static,
        G: Fn(&B) -> C + 'static,
    {
        let lifted = self.lifted;
        PartialFunction {
            domain: self.domain,
            lifted: Rc::new(move |input: &A| lifted(input).map(|value| function(&value))),
        }
    }

    pub(crate) fn into_lifted(self) -> Rc<dyn Fn(&A) -> Option<B>> {
        self.lifted
    }
}

impl<A, B> Clone for PartialFunction<A, B> {
    fn clone(&self) -> Self {
        Self {
            domain: Rc::clone(&self.domain),
            lifted: Rc::clone(&self.lifted),
        }
    }
}

impl<A, B> fmt::Debug for PartialFunction<A, B> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PartialFunction(<fn>)")
    }
}
