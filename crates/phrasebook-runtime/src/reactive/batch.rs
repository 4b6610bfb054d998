#![forbid(unsafe_code)]

//! Coalescing of [`Observable`](super::Observable) notifications.
//!
//! Several dispatches in a row would otherwise wake every binding once per
//! dispatch. Inside a [`BatchScope`] the values still change immediately,
//! but each subscriber is queued at most once and called with the latest
//! value when the outermost scope exits.
//!
//! ```ignore
//! let _batch = BatchScope::new();
//! store.dispatch(Action::SetLocale("fr".into()));
//! store.dispatch(Action::Bump);
//! // bindings recompute once, here, against the final state
//! ```
//!
//! # Failure Modes
//!
//! - **Callback panics during flush**: the remaining callbacks still run;
//!   the first panic is resumed afterwards.
//! - **Panic inside the batch**: when the outermost scope drops during
//!   unwinding, queued notifications are discarded, not run. Values keep
//!   their latest writes; subscribers catch up on the next change.

use std::cell::RefCell;
use tracing::{info, info_span, warn};
use web_time::Instant;

type DeferredNotify = Box<dyn FnOnce()>;

struct DeferredEntry {
    key: usize,
    notify: DeferredNotify,
}

struct BatchContext {
    depth: u32,
    deferred: Vec<DeferredEntry>,
    /// Value changes folded into this batch.
    changes: u64,
}

thread_local! {
    static BATCH_CTX: RefCell<Option<BatchContext>> = const { RefCell::new(None) };
}

/// Returns true if a batch is open on this thread.
pub fn is_batching() -> bool {
    BATCH_CTX.with(|ctx| ctx.borrow().is_some())
}

/// Queue `f` for the end of the current batch, or run it now if none is
/// open. A later entry with the same `key` replaces the earlier one while
/// keeping its queue position.
///
/// Returns `true` when deferred.
pub fn defer_or_run_keyed(key: usize, f: impl FnOnce() + 'static) -> bool {
    let notify: DeferredNotify = Box::new(f);
    let immediate = BATCH_CTX.with(|ctx| {
        let mut guard = ctx.borrow_mut();
        let Some(batch) = guard.as_mut() else {
            return Some(notify);
        };
        match batch.deferred.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.notify = notify,
            None => batch.deferred.push(DeferredEntry { key, notify }),
        }
        None
    });
    match immediate {
        Some(notify) => {
            notify();
            false
        }
        None => true,
    }
}

pub(crate) fn record_deferred_change() {
    BATCH_CTX.with(|ctx| {
        if let Some(batch) = ctx.borrow_mut().as_mut() {
            batch.changes = batch.changes.saturating_add(1);
        }
    });
}

fn flush() {
    // Closed before any callback runs, so their own writes notify directly.
    let Some(batch) = BATCH_CTX.with(|ctx| ctx.borrow_mut().take()) else {
        return;
    };
    let changes = batch.changes;
    let deferred: Vec<DeferredNotify> = batch.deferred.into_iter().map(|e| e.notify).collect();

    if deferred.is_empty() {
        return;
    }

    let subscribers = deferred.len() as u64;
    let started = Instant::now();
    let _span = info_span!(
        "store.notify",
        changes,
        subscribers,
        duration_us = tracing::field::Empty
    )
    .entered();

    let mut first_panic: Option<Box<dyn std::any::Any + Send>> = None;
    for notify in deferred {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(notify));
        if let Err(payload) = result
            && first_panic.is_none()
        {
            first_panic = Some(payload);
        }
    }

    let duration_us = started.elapsed().as_micros() as u64;
    tracing::Span::current().record("duration_us", duration_us);
    info!(
        notify_duration_us = duration_us,
        changes, subscribers, "batched store notification delivered"
    );

    if let Some(payload) = first_panic {
        std::panic::resume_unwind(payload);
    }
}

/// RAII guard opening a batch. Nested scopes are allowed; only the
/// outermost one flushes.
pub struct BatchScope {
    is_root: bool,
}

impl BatchScope {
    #[must_use]
    pub fn new() -> Self {
        let is_root = BATCH_CTX.with(|ctx| {
            let mut guard = ctx.borrow_mut();
            match guard.as_mut() {
                Some(batch) => {
                    batch.depth += 1;
                    false
                }
                None => {
                    *guard = Some(BatchContext {
                        depth: 1,
                        deferred: Vec::new(),
                        changes: 0,
                    });
                    true
                }
            }
        });
        Self { is_root }
    }

    /// Notifications queued so far.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        BATCH_CTX.with(|ctx| ctx.borrow().as_ref().map_or(0, |b| b.deferred.len()))
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let should_flush = BATCH_CTX.with(|ctx| match ctx.borrow_mut().as_mut() {
            Some(batch) => {
                batch.depth -= 1;
                batch.depth == 0
            }
            None => false,
        });

        if !should_flush {
            return;
        }
        if std::thread::panicking() {
            // Subscribers must not run while unwinding; the queue is dropped.
            let dropped = BATCH_CTX
                .with(|ctx| ctx.borrow_mut().take())
                .map_or(0, |batch| batch.deferred.len());
            warn!(dropped, "batch abandoned during unwind; notifications discarded");
            return;
        }
        flush();
    }
}

impl std::fmt::Debug for BatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScope")
            .field("is_root", &self.is_root)
            .field("pending", &self.pending_count())
            .finish()
    }
}
