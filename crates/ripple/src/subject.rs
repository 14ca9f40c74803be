#![forbid(unsafe_code)]

//! Multicast event source with a re-entrancy-safe subscriber registry.
//!
//! # Design
//!
//! [`Subject<T>`] owns an ordered registry of `(observer, handle)`
//! pairs. Disposing a subscription handle only *marks* its entry (the
//! handle's own disposed flag is the mark); the entry is physically
//! removed at the next compaction point. Broadcast iterates a snapshot
//! collected under a registry borrow that is released before any
//! callback runs.
//!
//! Together these two rules make every public operation safe to call
//! from inside a broadcast callback: a subscriber may dispose itself,
//! dispose a sibling, subscribe anew, or push another value into the
//! same subject, all without invalidating the iteration in progress.
//!
//! # Invariants
//!
//! 1. Values are delivered in registration order.
//! 2. Entries are removed only by compaction at safe points (before and
//!    after each value broadcast), never mid-iteration.
//! 3. A subscription disposed *before* a broadcast receives nothing
//!    from it; one disposed *during* a broadcast still receives that
//!    in-flight value (removal is deferred), and nothing afterwards.
//! 4. A subscriber added during a broadcast does not receive the
//!    in-flight value; it receives the next one (snapshot semantics).

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::disposable::Disposable;
use crate::observable::Observable;
use crate::observer::Observer;

/// One live subscription: the sink and the handle whose disposed flag
/// marks the entry for removal.
struct SubscriptionEntry<T> {
    observer: Observer<T>,
    handle: Disposable,
}

/// Shared interior for [`Subject<T>`].
struct SubjectInner<T> {
    registry: RefCell<Vec<SubscriptionEntry<T>>>,
}

/// A multicast source: push values in with [`on_next`](Self::on_next),
/// hand out subscription points with [`observable`](Self::observable).
///
/// Cloning shares the same registry.
pub struct Subject<T> {
    inner: Rc<SubjectInner<T>>,
}

// Manual Clone: shares the same Rc.
impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<T> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Subject<T> {
    /// Create a subject with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(SubjectInner {
                registry: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Number of live (not yet disposed) subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .registry
            .borrow()
            .iter()
            .filter(|entry| !entry.handle.is_disposed())
            .count()
    }

    /// Drop every entry whose handle has been disposed.
    fn compact(&self) {
        self.inner
            .registry
            .borrow_mut()
            .retain(|entry| !entry.handle.is_disposed());
    }

    /// Snapshot the registered observers so callbacks run with no
    /// registry borrow outstanding.
    fn snapshot(&self) -> Vec<Observer<T>> {
        self.inner
            .registry
            .borrow()
            .iter()
            .map(|entry| entry.observer.clone())
            .collect()
    }
}

impl<T: 'static> Subject<T> {
    /// Create a subscription point for this subject.
    ///
    /// Each call mints exactly one fresh subscription handle: the
    /// returned [`Observable`]'s subscribe step appends an entry to the
    /// registry and hands that handle back, and every operator stage
    /// derived from this observable shares it. Observables from
    /// separate `observable()` calls are independently disposable.
    #[must_use]
    pub fn observable(&self) -> Observable<T> {
        let handle = Disposable::new();
        let subject = self.clone();
        let entry_handle = handle.clone();
        Observable::from_parts(handle, move |observer| {
            let registered = {
                let mut registry = subject.inner.registry.borrow_mut();
                registry.push(SubscriptionEntry {
                    observer,
                    handle: entry_handle.clone(),
                });
                registry.len()
            };
            trace!(subscribers = registered, "subscriber registered");
            entry_handle.clone()
        })
    }

    /// Broadcast a value to every live subscription in registration
    /// order.
    ///
    /// Pending removals are compacted before the broadcast (disposals
    /// that happened while idle) and again after it (disposals requested
    /// synchronously from inside a callback). The iteration itself runs
    /// over a snapshot, so callbacks are free to mutate the registry.
    /// A subscriber registered from inside a callback joins the registry
    /// immediately but first hears the *next* broadcast.
    pub fn on_next(&self, value: T) {
        self.compact();
        let snapshot = self.snapshot();
        trace!(subscribers = snapshot.len(), "broadcast value");
        for observer in &snapshot {
            observer.on_next(&value);
        }
        self.compact();
    }

    /// Broadcast completion to every live subscription in registration
    /// order.
    ///
    /// Entries are not removed by completion itself — each observer's
    /// own stopped state blocks further delivery, and registry cleanup
    /// still flows through disposal.
    pub fn on_completed(&self) {
        self.compact();
        let snapshot = self.snapshot();
        debug!(subscribers = snapshot.len(), "broadcast completion");
        for observer in &snapshot {
            observer.on_completed();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
