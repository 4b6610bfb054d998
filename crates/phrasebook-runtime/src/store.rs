#![forbid(unsafe_code)]

//! Reducer-driven state container.
//!
//! [`Store`] holds an `Rc` snapshot of the application state. Each
//! [`dispatch`](Store::dispatch) hands the current snapshot and the action to
//! the reducer and commits whatever `Rc` it returns. Change detection is by
//! pointer: a reducer that returns the snapshot it was given commits nothing
//! and wakes nobody.
//!
//! # Precondition: structural sharing
//!
//! Reducers must never mutate a committed snapshot (the `Rc` makes that hard
//! but `RefCell` fields inside `S` would not be caught). When a slice is
//! unaffected by an action, the new snapshot must carry the *same* `Rc` for
//! that slice. Translator memoization compares slices by pointer and will
//! silently reuse stale values if this discipline is broken.

use std::rc::Rc;

use tracing::debug;

use crate::reactive::{BatchScope, Observable, Subscription};

/// The collaborator a binding subscribes to.
pub trait StateSource {
    type State: 'static;

    /// The current committed snapshot.
    fn get_state(&self) -> Rc<Self::State>;

    /// Register `listener` for every future commit, in commit order.
    fn subscribe(&self, listener: impl Fn(&Rc<Self::State>) + 'static) -> Subscription;
}

/// A committed state revision, compared by identity.
struct Snapshot<S>(Rc<S>);

impl<S> Clone for Snapshot<S> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<S> PartialEq for Snapshot<S> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<S> std::fmt::Debug for Snapshot<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Snapshot").field(&Rc::as_ptr(&self.0)).finish()
    }
}

type Reducer<S, A> = dyn Fn(&Rc<S>, &A) -> Rc<S>;

/// Shared application store. Clones are handles to the same state.
pub struct Store<S, A> {
    state: Observable<Snapshot<S>>,
    reducer: Rc<Reducer<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            reducer: Rc::clone(&self.reducer),
        }
    }
}

impl<S, A> std::fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<S: 'static, A> Store<S, A> {
    /// Create a store at revision 0.
    pub fn new(initial: S, reducer: impl Fn(&Rc<S>, &A) -> Rc<S> + 'static) -> Self {
        Self {
            state: Observable::new(Snapshot(Rc::new(initial))),
            reducer: Rc::new(reducer),
        }
    }

    /// Run the reducer and commit its result.
    pub fn dispatch(&self, action: A) {
        let current = self.get_state();
        let next = (self.reducer)(&current, &action);
        if Rc::ptr_eq(&current, &next) {
            debug!(revision = self.revision(), "dispatch left state unchanged");
            return;
        }
        self.state.set(Snapshot(next));
        debug!(revision = self.revision(), "dispatch committed");
    }

    /// Run `f` with notifications coalesced until it returns.
    pub fn batch<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
        let _batch = BatchScope::new();
        f(self)
    }

    /// Number of committed state changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.state.version()
    }

    /// Current snapshot.
    #[must_use]
    pub fn get_state(&self) -> Rc<S> {
        self.state.with(|snapshot| Rc::clone(&snapshot.0))
    }

    /// See [`StateSource::subscribe`].
    pub fn subscribe(&self, listener: impl Fn(&Rc<S>) + 'static) -> Subscription {
        self.state.subscribe(move |snapshot| listener(&snapshot.0))
    }
}

impl<S: 'static, A> StateSource for Store<S, A> {
    type State = S;

    fn get_state(&self) -> Rc<S> {
        Store::get_state(self)
    }

    fn subscribe(&self, listener: impl Fn(&Rc<S>) + 'static) -> Subscription {
        Store::subscribe(self, listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Debug, Clone, PartialEq)]
    struct Counter {
        count: i32,
    }

    enum Op {
        Add(i32),
        Noop,
    }

    fn counter_store() -> Store<Counter, Op> {
        Store::new(Counter { count: 0 }, |state: &Rc<Counter>, op: &Op| match op {
            Op::Add(n) => Rc::new(Counter {
                count: state.count + n,
            }),
            Op::Noop => Rc::clone(state),
        })
    }

    #[test]
    fn dispatch_commits_new_snapshot() {
        let store = counter_store();
        let before = store.get_state();
        store.dispatch(Op::Add(2));
        assert_eq!(store.get_state().count, 2);
        assert!(!Rc::ptr_eq(&before, &store.get_state()));
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn unchanged_snapshot_notifies_nobody() {
        let store = counter_store();
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let _sub = store.subscribe(move |_| hits_clone.set(hits_clone.get() + 1));

        store.dispatch(Op::Noop);
        assert_eq!(hits.get(), 0);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn equal_but_distinct_snapshots_still_notify() {
        let store = counter_store();
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let _sub = store.subscribe(move |_| hits_clone.set(hits_clone.get() + 1));

        store.dispatch(Op::Add(0));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn listeners_observe_commits_in_order() {
        let store = counter_store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = store.subscribe(move |state| seen_clone.borrow_mut().push(state.count));

        store.dispatch(Op::Add(1));
        store.dispatch(Op::Add(10));
        store.dispatch(Op::Add(100));
        assert_eq!(*seen.borrow(), vec![1, 11, 111]);
    }

    #[test]
    fn batch_delivers_final_state_once() {
        let store = counter_store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = store.subscribe(move |state| seen_clone.borrow_mut().push(state.count));

        let revision = store.batch(|s| {
            s.dispatch(Op::Add(1));
            s.dispatch(Op::Add(2));
            s.revision()
        });
        assert_eq!(revision, 2);
        assert_eq!(*seen.borrow(), vec![3]);
    }

    #[test]
    fn clones_share_state() {
        let store = counter_store();
        let other = store.clone();
        other.dispatch(Op::Add(5));
        assert_eq!(store.get_state().count, 5);
    }
}
