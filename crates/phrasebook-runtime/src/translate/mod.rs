#![forbid(unsafe_code)]

//! Memoized translators bound to a store.
//!
//! Data flow for one binding:
//!
//! ```text
//! store commit ─▶ subscription ─▶ MemoizationGate ─┬─ hit ─▶ same Rc<Translator>
//!                                                   └─ miss ─▶ scope::merge_own_phrases
//!                                                              ─▶ Translator::build
//! ```
//!
//! - [`config`]: the accepted enhancer call shapes and their canonical form.
//! - [`scope`]: selecting a binding's subtree and merging its overrides.
//! - [`translator`]: the translator value object and pluggable lookup.
//! - [`memo`]: the per-binding reuse-or-rebuild gate.
//! - [`enhancer`]: wrapping components and mounting bindings.
//! - [`state`]: the translation slice of application state.

pub mod config;
pub mod enhancer;
pub mod memo;
pub mod scope;
pub mod state;
pub mod translator;

pub use config::{BindingConfiguration, ConfigError, TranslateOptions};
pub use enhancer::{
    ANONYMOUS_COMPONENT, Binding, Component, FnComponent, Translate, Translated, TranslatedProps,
    component, translate, translate_with, translated, translated_display_name,
};
pub use memo::{CacheEntry, MemoizationGate};
pub use state::{TranslationAction, TranslationSource, TranslationState};
pub use translator::{Lookup, PolyglotLookup, Translator};
