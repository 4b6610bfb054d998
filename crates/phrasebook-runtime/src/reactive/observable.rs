#![forbid(unsafe_code)]

//! Observable value with change notification and version tracking.
//!
//! # Failure Modes
//!
//! - **Write from inside a subscriber**: allowed. The nested `set()`
//!   notifies every live subscriber with the newer value right away, and
//!   the interrupted delivery stops there, so no subscriber is handed the
//!   older value after the newer one. Subscribers that ran before the write
//!   observe both values, in commit order.
//! - **Re-entrant borrow in a subscriber**: a subscriber that re-enters *its
//!   own* `RefCell` state through that nested notification will panic.
//!   Rendering code must not dispatch synchronously from inside a
//!   notification it is handling.
//! - **Subscriber leak**: guards stored forever keep their callbacks alive.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{info, info_span};
use web_time::Instant;

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

struct ObservableInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<CallbackWeak<T>>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning an `Observable` yields another handle to the same value and the
/// same subscriber list.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create an observable at version 0 with no subscribers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value. Equal values are ignored; otherwise the version is
    /// bumped and live subscribers are notified.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Register a callback invoked with each new value.
    ///
    /// The callback stays registered for as long as the returned
    /// [`Subscription`] is alive.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of value-changing mutations so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Registered subscribers, including dropped ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self) {
        let callbacks: Vec<CallbackRc<T>> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|weak| weak.strong_count() > 0);
            inner
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect()
        };

        if callbacks.is_empty() {
            return;
        }

        if super::batch::is_batching() {
            super::batch::record_deferred_change();
            for callback in callbacks {
                // Keyed by callback address so a subscriber fires once per batch.
                let key = Rc::as_ptr(&callback) as *const () as usize;
                let source = self.clone();
                super::batch::defer_or_run_keyed(key, move || {
                    let latest = source.get();
                    callback(&latest);
                });
            }
            return;
        }

        let (value, version) = {
            let inner = self.inner.borrow();
            (inner.value.clone(), inner.version)
        };
        let subscribers = callbacks.len() as u64;
        let started = Instant::now();
        let _span = info_span!(
            "store.notify",
            changes = 1_u64,
            subscribers,
            duration_us = tracing::field::Empty
        )
        .entered();

        for callback in &callbacks {
            if self.inner.borrow().version != version {
                // A nested write already delivered a newer value to everyone.
                break;
            }
            callback(&value);
        }

        let duration_us = started.elapsed().as_micros() as u64;
        tracing::Span::current().record("duration_us", duration_us);
        info!(
            notify_duration_us = duration_us,
            subscribers, "store notification delivered"
        );
    }
}

/// RAII guard for a subscriber callback.
///
/// Holds the only strong reference to the callback; once dropped, the weak
/// entry in the observable can no longer be upgraded.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
