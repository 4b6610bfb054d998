#![forbid(unsafe_code)]

//! Change-tracking primitives used by the store.
//!
//! - [`Observable`]: shared, version-tracked value that notifies subscribers
//!   when it changes.
//! - [`Subscription`]: RAII guard; dropping it unsubscribes.
//! - [`BatchScope`]: RAII guard deferring notifications until the outermost
//!   scope exits.
//!
//! # Architecture
//!
//! Everything here is single-threaded (`Rc<RefCell<..>>`). Subscribers are
//! kept as `Weak` callbacks and pruned lazily on the next notification, so a
//! dropped [`Subscription`] is never invoked again even before it is pruned.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per value-changing mutation.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current one is a no-op.
//! 4. Within a `BatchScope` values update immediately; notifications fire
//!    once per subscriber, with the final value, when the outermost scope
//!    exits.

pub mod batch;
pub mod observable;

pub use batch::BatchScope;
pub use observable::{Observable, Subscription};
