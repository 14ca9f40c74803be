//! End-to-end subscription lifecycle scenarios.
//!
//! These exercise the crate through its public surface only: registering
//! through operator chains, disposing from inside and outside broadcast
//! callbacks, and tying subscriptions to owner lifetimes the way a
//! per-frame driver would.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ripple::{Disposable, DisposeScope, Subject};

/// A stand-in for a game object or widget that owns subscriptions.
struct Owner {
    scope: DisposeScope,
    hits: Rc<Cell<u32>>,
}

impl Owner {
    fn new(ticks: &Subject<u32>) -> Self {
        let scope = DisposeScope::new();
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&hits);
        ticks
            .observable()
            .subscribe(move |_| h.set(h.get() + 1))
            .bind_to(&scope);

        Self { scope, hits }
    }
}

#[test]
fn owner_drop_tears_down_subscription() {
    let ticks: Subject<u32> = Subject::new();
    let owner = Owner::new(&ticks);
    let hits = Rc::clone(&owner.hits);

    ticks.on_next(0);
    ticks.on_next(1);
    assert_eq!(hits.get(), 2);
    assert!(owner.scope.is_bound());

    drop(owner);

    // Subject is alive and broadcasting; the owner's subscription is not.
    ticks.on_next(2);
    assert_eq!(hits.get(), 2);
    assert_eq!(ticks.subscriber_count(), 0);
}

#[test]
fn two_owners_tear_down_independently() {
    let ticks: Subject<u32> = Subject::new();
    let first = Owner::new(&ticks);
    let second = Owner::new(&ticks);
    let second_hits = Rc::clone(&second.hits);

    ticks.on_next(0);
    drop(first);
    ticks.on_next(1);

    assert_eq!(second_hits.get(), 2);
    assert_eq!(ticks.subscriber_count(), 1);
}

#[test]
fn independent_chains_from_one_subject() {
    let ticks: Subject<u32> = Subject::new();
    let evens = Rc::new(RefCell::new(Vec::new()));
    let tens = Rc::new(RefCell::new(Vec::new()));

    let e = Rc::clone(&evens);
    let even_sub = ticks
        .observable()
        .filter(|t| t % 2 == 0)
        .subscribe(move |t| e.borrow_mut().push(*t));

    let x = Rc::clone(&tens);
    let _tens_sub = ticks
        .observable()
        .map(|t| t * 10)
        .subscribe(move |t: &u32| x.borrow_mut().push(*t));

    ticks.on_next(1);
    ticks.on_next(2);
    even_sub.dispose();
    ticks.on_next(3);
    ticks.on_next(4);

    assert_eq!(*evens.borrow(), vec![2], "disposed chain stops alone");
    assert_eq!(*tens.borrow(), vec![10, 20, 30, 40]);
}

#[test]
fn take_through_chain_unregisters_at_source() {
    let ticks: Subject<u32> = Subject::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let completed = Rc::new(Cell::new(false));

    let s = Rc::clone(&seen);
    let c = Rc::clone(&completed);
    let _sub = ticks
        .observable()
        .filter(|t| t % 2 == 1)
        .take(2)
        .subscribe_with(move |t| s.borrow_mut().push(*t), move || c.set(true));

    for t in 0..10 {
        ticks.on_next(t);
    }

    assert_eq!(*seen.borrow(), vec![1, 3]);
    assert!(completed.get());
    assert_eq!(ticks.subscriber_count(), 0, "take disposed the chain root");
}

#[test]
fn self_dispose_mid_broadcast_with_sibling() {
    let ticks: Subject<u32> = Subject::new();

    let a_hits = Rc::new(Cell::new(0u32));
    let a = Rc::clone(&a_hits);
    let _a_sub = ticks.observable().subscribe(move |_| a.set(a.get() + 1));

    let b_hits = Rc::new(Cell::new(0u32));
    let b_slot: Rc<RefCell<Option<Disposable>>> = Rc::new(RefCell::new(None));
    let b = Rc::clone(&b_hits);
    let slot = Rc::clone(&b_slot);
    let b_sub = ticks.observable().subscribe(move |_| {
        b.set(b.get() + 1);
        if let Some(handle) = slot.borrow().as_ref() {
            handle.dispose();
        }
    });
    *b_slot.borrow_mut() = Some(b_sub);

    ticks.on_next(0);
    ticks.on_next(1);

    assert_eq!(a_hits.get(), 2);
    assert_eq!(b_hits.get(), 1);
}

#[test]
fn rebinding_scope_releases_previous_subscription_from_auto_teardown() {
    let ticks: Subject<u32> = Subject::new();
    let scope = DisposeScope::new();

    let first = ticks.observable().subscribe(|_| {}).bind_to(&scope);
    let second = ticks.observable().subscribe(|_| {}).bind_to(&scope);

    drop(scope);

    assert!(!first.is_disposed(), "only the last binding is auto-disposed");
    assert!(second.is_disposed());
    assert_eq!(ticks.subscriber_count(), 1);
}

#[test]
fn scope_outliving_subject_is_harmless() {
    let scope = DisposeScope::new();
    {
        let ticks: Subject<u32> = Subject::new();
        let _handle = ticks.observable().subscribe(|_| {}).bind_to(&scope);
        ticks.on_next(0);
    }
    // Subject and all handles are gone; the weak binding has expired.
    assert!(!scope.is_bound());
    drop(scope);
}

#[test]
fn manual_dispose_then_owner_drop_is_single_teardown() {
    let ticks: Subject<u32> = Subject::new();
    let scope = DisposeScope::new();
    let handle = ticks.observable().subscribe(|_| {}).bind_to(&scope);

    handle.dispose();
    drop(scope);

    assert!(handle.is_disposed());
    ticks.on_next(0);
    assert_eq!(ticks.subscriber_count(), 0);
}

#[test]
fn per_frame_driver_shape() {
    // The way a frame loop is expected to use the engine: one well-known
    // subject, one on_next per tick, subscribers reacting to event counts.
    let frame: Subject<()> = Subject::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let l = Rc::clone(&log);
    let _every_third = frame
        .observable()
        .every_nth(3)
        .subscribe(move |_| l.borrow_mut().push("third"));

    let l = Rc::clone(&log);
    let _after_warmup = frame
        .observable()
        .skip(4)
        .take(1)
        .subscribe(move |_| l.borrow_mut().push("fifth"));

    for _ in 0..6 {
        frame.on_next(());
    }

    assert_eq!(*log.borrow(), vec!["third", "fifth", "third"]);
}
