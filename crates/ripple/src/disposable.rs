#![forbid(unsafe_code)]

//! One-shot release tokens for subscription lifetimes.
//!
//! # Design
//!
//! [`Disposable`] is a cloneable handle over shared, reference-counted
//! state (`Rc<..>`). Every party holding a clone refers to the same
//! logical subscription; nobody owns it exclusively, and the handle
//! self-reports its disposed state.
//!
//! Disposal is a monotonic state flip: once disposed, always disposed.
//! An optional cleanup hook (see [`Disposable::with_cleanup`]) runs on
//! the first `dispose()` only. The flag is flipped *before* the hook
//! runs, so a hook that re-enters `dispose()` on its own handle is a
//! no-op rather than a recursion hazard.
//!
//! # Invariants
//!
//! 1. `is_disposed()` never transitions back to `false`.
//! 2. `dispose()` is idempotent, including re-entrant calls from within
//!    the cleanup hook it triggered.
//! 3. The cleanup hook runs at most once, on the call that performed the
//!    state flip.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::scope::DisposeScope;

/// Shared interior for [`Disposable`].
struct DisposableInner {
    disposed: Cell<bool>,
    /// Optional cleanup run once on first dispose. `FnOnce`, so it is
    /// taken out of the cell before being invoked.
    cleanup: RefCell<Option<Box<dyn FnOnce()>>>,
}

/// Idempotent one-shot release token.
///
/// Cloning produces another handle to the **same** logical subscription:
/// disposing any clone disposes them all.
///
/// Dropping a `Disposable` does *not* dispose it — the registry side
/// holds its own clone. Tie the handle to an owner with
/// [`bind_to`](Self::bind_to) or call [`dispose`](Self::dispose)
/// explicitly.
#[derive(Clone)]
pub struct Disposable {
    inner: Rc<DisposableInner>,
}

impl Disposable {
    /// Create a live (undisposed) token with no cleanup hook.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(DisposableInner {
                disposed: Cell::new(false),
                cleanup: RefCell::new(None),
            }),
        }
    }

    /// Create a token whose first `dispose()` runs `cleanup` once.
    ///
    /// This is the hook point for release work that must precede the
    /// terminal state being observable as "already handled" elsewhere
    /// (the disposed flag itself is flipped first, so the hook sees
    /// `is_disposed() == true` on its own handle).
    #[must_use]
    pub fn with_cleanup(cleanup: impl FnOnce() + 'static) -> Self {
        Self {
            inner: Rc::new(DisposableInner {
                disposed: Cell::new(false),
                cleanup: RefCell::new(Some(Box::new(cleanup))),
            }),
        }
    }

    /// Flip to the disposed state and run the cleanup hook, if any.
    ///
    /// Safe to call any number of times; only the first call does work.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        trace!("subscription disposed");
        // Take the hook out before invoking so the borrow is released
        // and a re-entrant dispose from inside the hook cannot observe
        // it twice.
        let hook = self.inner.cleanup.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }
    }

    /// Whether this token has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Non-owning handle for owner-side lifetime binding.
    #[must_use]
    pub fn downgrade(&self) -> WeakDisposable {
        WeakDisposable {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Bind this token to `scope` so the scope's drop disposes it, and
    /// return a clone for fluent chaining after `subscribe`.
    ///
    /// The scope holds only a weak reference; binding does not extend
    /// the token's lifetime.
    pub fn bind_to(&self, scope: &DisposeScope) -> Disposable {
        scope.register_for_auto_dispose(self);
        self.clone()
    }
}

impl Default for Disposable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Disposable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.inner.disposed.get())
            .finish()
    }
}

/// Weak counterpart of [`Disposable`]: resolves to a live handle or
/// reports expiry, never dangles.
#[derive(Clone)]
pub struct WeakDisposable {
    inner: Weak<DisposableInner>,
}

impl WeakDisposable {
    /// Resolve to a strong handle if any clone of the original token is
    /// still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Disposable> {
        self.inner.upgrade().map(|inner| Disposable { inner })
    }
}

impl std::fmt::Debug for WeakDisposable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakDisposable")
            .field("expired", &(self.inner.strong_count() == 0))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
