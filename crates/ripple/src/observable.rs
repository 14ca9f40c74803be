#![forbid(unsafe_code)]

//! Lazily-composed stream descriptions and their operators.
//!
//! An [`Observable`] is an immutable recipe for *how to subscribe*: a
//! stored subscribe closure plus the chain's shared root [`Disposable`].
//! Nothing happens until [`subscribe`](Observable::subscribe) is called;
//! each call runs the whole recipe again with fresh per-subscription
//! operator state.
//!
//! Operators ([`map`](Observable::map), [`filter`](Observable::filter),
//! [`skip`](Observable::skip), [`take`](Observable::take),
//! [`every_nth`](Observable::every_nth)) each return a new `Observable`
//! whose subscribe closure captures a clone of its source stage. That
//! capture is what keeps every intermediate stage of a fluent chain
//! alive for as long as the derived stage is — plain reference counting,
//! no back-pointers.
//!
//! # Invariants
//!
//! 1. Every operator preserves delivery order.
//! 2. Every stage of a chain shares the *same* root `Disposable`, so
//!    disposing the handle returned by any stage's `subscribe` tears
//!    down the one underlying source registration.
//! 3. Counting state (skip/take/every_nth) is created per subscription,
//!    never shared between subscriptions.

use std::cell::Cell;
use std::rc::Rc;

use crate::disposable::Disposable;
use crate::observer::Observer;

/// Shared interior for [`Observable<T>`].
struct ObservableInner<T> {
    subscribe: Box<dyn Fn(Observer<T>) -> Disposable>,
    /// Root of the chain: the subscription handle minted by the source.
    root: Disposable,
}

/// An immutable, lazily-evaluated description of how to subscribe to a
/// (possibly transformed) stream of `T`.
///
/// Obtained from [`Subject::observable`](crate::Subject::observable) and
/// refined through operators. Cloning is cheap and shares the recipe.
pub struct Observable<T> {
    inner: Rc<ObservableInner<T>>,
}

// Manual Clone: shares the same Rc.
impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("root", &self.inner.root)
            .finish()
    }
}

impl<T: 'static> Observable<T> {
    /// Assemble a stage from its subscribe closure and the chain root.
    pub(crate) fn from_parts(
        root: Disposable,
        subscribe: impl Fn(Observer<T>) -> Disposable + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(ObservableInner {
                subscribe: Box::new(subscribe),
                root,
            }),
        }
    }

    /// The root `Disposable` shared by every stage of this chain.
    pub(crate) fn root(&self) -> &Disposable {
        &self.inner.root
    }

    /// Subscribe a prebuilt [`Observer`]. Returns the chain's
    /// subscription handle.
    pub fn subscribe_observer(&self, observer: Observer<T>) -> Disposable {
        (self.inner.subscribe)(observer)
    }

    /// Subscribe with a value callback only; completion is a no-op.
    ///
    /// Dropping the returned handle does not unsubscribe — dispose it,
    /// or bind it to a [`DisposeScope`](crate::DisposeScope).
    pub fn subscribe(&self, on_next: impl Fn(&T) + 'static) -> Disposable {
        self.subscribe_observer(Observer::new(on_next))
    }

    /// Subscribe with value and completion callbacks.
    pub fn subscribe_with(
        &self,
        on_next: impl Fn(&T) + 'static,
        on_completed: impl Fn() + 'static,
    ) -> Disposable {
        self.subscribe_observer(Observer::with_completion(on_next, on_completed))
    }

    /// Transform each value with `f`; completion passes through.
    pub fn map<U: 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Observable<U> {
        let source = self.clone();
        let f = Rc::new(f);
        Observable::from_parts(self.root().clone(), move |downstream: Observer<U>| {
            let f = Rc::clone(&f);
            let next = downstream.clone();
            let done = downstream;
            source.subscribe_observer(Observer::with_completion(
                move |v: &T| next.on_next(&f(v)),
                move || done.on_completed(),
            ))
        })
    }

    /// Forward only values for which `predicate` is true; completion
    /// always passes through.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Observable<T> {
        let source = self.clone();
        let predicate = Rc::new(predicate);
        Observable::from_parts(self.root().clone(), move |downstream: Observer<T>| {
            let predicate = Rc::clone(&predicate);
            let next = downstream.clone();
            let done = downstream;
            source.subscribe_observer(Observer::with_completion(
                move |v: &T| {
                    if predicate(v) {
                        next.on_next(v);
                    }
                },
                move || done.on_completed(),
            ))
        })
    }

    /// Discard the first `count` values; forward everything after.
    pub fn skip(&self, count: usize) -> Observable<T> {
        let source = self.clone();
        Observable::from_parts(self.root().clone(), move |downstream: Observer<T>| {
            let seen = Cell::new(0usize);
            let next = downstream.clone();
            let done = downstream;
            source.subscribe_observer(Observer::with_completion(
                move |v: &T| {
                    let n = seen.get();
                    if n < count {
                        seen.set(n + 1);
                        return;
                    }
                    next.on_next(v);
                },
                move || done.on_completed(),
            ))
        })
    }

    /// Forward the first `count` values; on forwarding the last one,
    /// synchronously complete downstream and dispose the chain root, so
    /// nothing further is delivered even while the source keeps
    /// broadcasting.
    ///
    /// `take(0)` forwards nothing.
    pub fn take(&self, count: usize) -> Observable<T> {
        let source = self.clone();
        let root = self.inner.root.clone();
        Observable::from_parts(root.clone(), move |downstream: Observer<T>| {
            let taken = Cell::new(0usize);
            let root = root.clone();
            let next = downstream.clone();
            let done = downstream;
            source.subscribe_observer(Observer::with_completion(
                move |v: &T| {
                    let n = taken.get();
                    if n >= count {
                        return;
                    }
                    next.on_next(v);
                    taken.set(n + 1);
                    if n + 1 == count {
                        next.on_completed();
                        root.dispose();
                    }
                },
                move || done.on_completed(),
            ))
        })
    }

    /// Forward every `period`-th value: with `period = 3`, inputs
    /// indexed 0.. are forwarded at indices 2, 5, 8, … A `period` of 0
    /// or 1 forwards every value. Counts events, not time.
    pub fn every_nth(&self, period: usize) -> Observable<T> {
        let source = self.clone();
        Observable::from_parts(self.root().clone(), move |downstream: Observer<T>| {
            let seen = Cell::new(0usize);
            let next = downstream.clone();
            let done = downstream;
            source.subscribe_observer(Observer::with_completion(
                move |v: &T| {
                    let n = seen.get() + 1;
                    if n < period {
                        seen.set(n);
                        return;
                    }
                    seen.set(0);
                    next.on_next(v);
                },
                move || done.on_completed(),
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
