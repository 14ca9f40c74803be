#![forbid(unsafe_code)]

//! Synchronous push-based reactive streams.
//!
//! # Role
//! `ripple` is an in-process multicast engine: a [`Subject`] broadcasts
//! pushed values to every live subscription, [`Observable`] chains
//! describe lazily-composed transformations over those values, and
//! [`Disposable`] / [`DisposeScope`] tie each subscription to a
//! deterministic teardown point.
//!
//! # Primary responsibilities
//! - **Subject**: ordered subscriber registry with mark-then-compact
//!   removal, safe under re-entrant disposal and cascaded broadcasts.
//! - **Observable**: operator composition (`map`, `filter`, `skip`,
//!   `take`, `every_nth`) sharing one root [`Disposable`] per chain.
//! - **Observer**: terminal sink with a one-way active → stopped
//!   lifecycle.
//! - **Disposable / DisposeScope**: idempotent release tokens and
//!   owner-drop lifetime binding.
//!
//! # Execution model
//! Single-threaded and call-stack-driven: every operation runs to
//! completion on the caller's thread. The handle types are built on
//! `Rc`/`Cell`/`RefCell` and are deliberately `!Send`/`!Sync`.
//! Callbacks invoked during a broadcast may freely subscribe, dispose
//! (themselves or siblings), or push more values into the same subject;
//! the registry's snapshot-and-compact discipline keeps the broadcast
//! in progress coherent. Operators count events, not time — there is no
//! scheduler, no timer, and no error channel.
//!
//! # Example
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use ripple::Subject;
//!
//! let ticks = Subject::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = Rc::clone(&seen);
//! let sub = ticks
//!     .observable()
//!     .map(|t: &u32| t * 10)
//!     .filter(|t| t % 20 == 0)
//!     .subscribe(move |t| sink.borrow_mut().push(*t));
//!
//! for t in 0..4 {
//!     ticks.on_next(t);
//! }
//! sub.dispose();
//! ticks.on_next(99);
//!
//! assert_eq!(*seen.borrow(), vec![0, 20]);
//! ```

pub mod disposable;
pub mod observable;
pub mod observer;
pub mod scope;
pub mod subject;

pub use disposable::{Disposable, WeakDisposable};
pub use observable::Observable;
pub use observer::Observer;
pub use scope::DisposeScope;
pub use subject::Subject;
