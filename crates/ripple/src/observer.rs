#![forbid(unsafe_code)]

//! Terminal sinks with a one-way active → stopped lifecycle.
//!
//! An [`Observer`] bundles a value callback, an optional completion
//! callback, and a stop flag. Once completed it is stopped for good:
//! further values and further completions are no-ops, so a terminated
//! sink can never double-complete or observe a value after its end.
//!
//! # Invariants
//!
//! 1. The lifecycle is Active → Stopped, one-way.
//! 2. `on_next` invokes the value callback only while active.
//! 3. `on_completed` runs the completion callback at most once; the
//!    stop flag is set *before* the callback runs, so re-entrant
//!    completion from inside the callback is a no-op.
//! 4. A missing completion callback is tolerated as a silent no-op (the
//!    observer still stops).

use std::cell::Cell;
use std::rc::Rc;

/// Shared interior for [`Observer<T>`].
struct ObserverInner<T> {
    on_next: Box<dyn Fn(&T)>,
    on_completed: Option<Box<dyn Fn()>>,
    stopped: Cell<bool>,
}

/// A terminal sink for a stream of `T`.
///
/// Cloning shares the same state: operator wrappers and registries hold
/// clones of one logical observer, and stopping any clone stops them
/// all.
pub struct Observer<T> {
    inner: Rc<ObserverInner<T>>,
}

// Manual Clone: shares the same Rc.
impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer")
            .field("stopped", &self.inner.stopped.get())
            .field("has_completion", &self.inner.on_completed.is_some())
            .finish()
    }
}

impl<T: 'static> Observer<T> {
    /// Create an observer with a value callback and no completion
    /// callback.
    #[must_use]
    pub fn new(on_next: impl Fn(&T) + 'static) -> Self {
        Self {
            inner: Rc::new(ObserverInner {
                on_next: Box::new(on_next),
                on_completed: None,
                stopped: Cell::new(false),
            }),
        }
    }

    /// Create an observer with both callbacks.
    #[must_use]
    pub fn with_completion(
        on_next: impl Fn(&T) + 'static,
        on_completed: impl Fn() + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(ObserverInner {
                on_next: Box::new(on_next),
                on_completed: Some(Box::new(on_completed)),
                stopped: Cell::new(false),
            }),
        }
    }

    /// Deliver a value. No-op once stopped.
    pub fn on_next(&self, value: &T) {
        if self.inner.stopped.get() {
            return;
        }
        (self.inner.on_next)(value);
    }

    /// Deliver completion and stop. No-op once stopped.
    pub fn on_completed(&self) {
        if self.inner.stopped.replace(true) {
            return;
        }
        if let Some(on_completed) = &self.inner.on_completed {
            on_completed();
        }
    }

    /// Whether this observer has completed.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.get()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
