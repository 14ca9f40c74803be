#![forbid(unsafe_code)]

//! Owner-side lifetime binding for subscriptions.
//!
//! A [`DisposeScope`] ties one subscription to the lifetime of an owner
//! object: embed the scope as a field, bind a [`Disposable`] to it, and
//! the subscription is disposed when the owner (and with it the scope)
//! is dropped. This removes the need for a manual `dispose()` at every
//! teardown site.
//!
//! The scope holds only a *weak* reference. If every strong handle to
//! the bound token has already been dropped by the time the scope goes
//! away, the drop is a silent no-op — a resolved/expired check, never a
//! dangling dereference.
//!
//! # Invariants
//!
//! 1. At most one token is bound at a time; a later
//!    [`register_for_auto_dispose`](DisposeScope::register_for_auto_dispose)
//!    overwrites the earlier binding (last bind wins).
//! 2. On drop, a still-live binding is disposed exactly once.
//! 3. Binding never extends the token's lifetime.

use std::cell::RefCell;

use tracing::debug;

use crate::disposable::{Disposable, WeakDisposable};

/// Drop-triggered disposer for a single weakly-bound [`Disposable`].
///
/// ```
/// use ripple::{DisposeScope, Subject};
///
/// struct Owner {
///     scope: DisposeScope,
/// }
///
/// let subject = Subject::new();
/// let owner = Owner { scope: DisposeScope::new() };
///
/// let handle = subject.observable().subscribe(|v: &i32| println!("{v}"));
/// handle.bind_to(&owner.scope);
///
/// subject.on_next(1); // delivered
/// drop(owner);
/// subject.on_next(2); // not delivered
/// ```
pub struct DisposeScope {
    bound: RefCell<Option<WeakDisposable>>,
}

impl DisposeScope {
    /// Create a scope with nothing bound.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bound: RefCell::new(None),
        }
    }

    /// Bind `handle` (weakly) so this scope's drop disposes it.
    ///
    /// Replaces any previous binding; the replaced token is left
    /// untouched.
    pub fn register_for_auto_dispose(&self, handle: &Disposable) {
        *self.bound.borrow_mut() = Some(handle.downgrade());
    }

    /// Whether a binding exists and still resolves to a live token.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound
            .borrow()
            .as_ref()
            .and_then(WeakDisposable::upgrade)
            .is_some()
    }
}

impl Drop for DisposeScope {
    fn drop(&mut self) {
        if let Some(handle) = self.bound.get_mut().take().and_then(|w| w.upgrade()) {
            debug!("scope dropped, disposing bound subscription");
            handle.dispose();
        }
    }
}

impl Default for DisposeScope {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DisposeScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisposeScope")
            .field("bound", &self.is_bound())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_scope_drop_is_noop() {
        let scope = DisposeScope::new();
        assert!(!scope.is_bound());
        drop(scope);
    }

    #[test]
    fn drop_disposes_bound_handle() {
        let handle = Disposable::new();
        {
            let scope = DisposeScope::new();
            scope.register_for_auto_dispose(&handle);
            assert!(scope.is_bound());
        }
        assert!(handle.is_disposed());
    }

    #[test]
    fn last_bind_wins() {
        let first = Disposable::new();
        let second = Disposable::new();
        {
            let scope = DisposeScope::new();
            scope.register_for_auto_dispose(&first);
            scope.register_for_auto_dispose(&second);
        }
        assert!(!first.is_disposed(), "overwritten binding is released");
        assert!(second.is_disposed());
    }

    #[test]
    fn expired_binding_is_skipped() {
        let scope = DisposeScope::new();
        {
            let handle = Disposable::new();
            scope.register_for_auto_dispose(&handle);
        }
        // Token is gone; drop must not panic and must report unbound.
        assert!(!scope.is_bound());
        drop(scope);
    }

    #[test]
    fn already_disposed_binding_is_harmless() {
        let handle = Disposable::new();
        handle.dispose();
        {
            let scope = DisposeScope::new();
            scope.register_for_auto_dispose(&handle);
        }
        assert!(handle.is_disposed());
    }

    #[test]
    fn bind_to_returns_fluent_clone() {
        let scope = DisposeScope::new();
        let handle = Disposable::new();
        let chained = handle.bind_to(&scope);

        assert!(scope.is_bound());
        chained.dispose();
        assert!(handle.is_disposed(), "bind_to returns a clone of the handle");
    }

    #[test]
    fn debug_format() {
        let scope = DisposeScope::new();
        assert!(format!("{scope:?}").contains("bound: false"));
        let handle = Disposable::new();
        scope.register_for_auto_dispose(&handle);
        assert!(format!("{scope:?}").contains("bound: true"));
    }
}
