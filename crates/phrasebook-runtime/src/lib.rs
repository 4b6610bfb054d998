#![forbid(unsafe_code)]

//! phrasebook runtime
//!
//! Binds rendering logic to the translation slice of a shared store and
//! hands it a memoized [`Translator`].
//!
//! # Key Components
//!
//! - [`Store`] - Reducer-driven state container with synchronous notification
//! - [`Observable`] - Version-tracked value underneath the store
//! - [`BatchScope`] - Coalesces notifications across several dispatches
//! - [`translate`](translate::translate) - Enhancer wrapping a [`Component`]
//! - [`Binding`] - One mounted component with its own translator cache
//! - [`MemoizationGate`] - Reuse-or-rebuild decision for a binding
//!
//! # How it fits in the system
//! The store owns state, bindings subscribe to it, and `phrasebook-i18n`
//! resolves keys once a translator exists. The runtime never loads phrase
//! files; it only decides when a new translator is needed and keeps the old
//! one otherwise.

pub mod reactive;
pub mod store;
pub mod translate;

pub use reactive::{BatchScope, Observable, Subscription};
pub use store::{StateSource, Store};
pub use translate::{
    Binding, BindingConfiguration, CacheEntry, Component, ConfigError, FnComponent, Lookup,
    MemoizationGate, PolyglotLookup, Translate, TranslateOptions, Translated, TranslatedProps,
    TranslationAction, TranslationSource, TranslationState, Translator,
};
