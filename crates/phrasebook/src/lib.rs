#![forbid(unsafe_code)]

//! phrasebook public facade crate.
//!
//! Re-exports the phrase model from `phrasebook-i18n` and the store and
//! enhancer from `phrasebook-runtime`, plus a prelude for day-to-day use.
//!
//! ```ignore
//! use phrasebook::prelude::*;
//!
//! let store = Store::new(
//!     TranslationState::new("en", PhraseTree::new().with("hello", "hello")),
//!     TranslationState::reduce,
//! );
//! let hello = component(|props: &TranslatedProps<()>| props.p.tc("hello"));
//! let binding = translated(hello).mount(&store, ());
//! assert_eq!(binding.output(), "Hello");
//! ```

// --- Phrase model ----------------------------------------------------------

pub use phrasebook_i18n::{
    LookupOptions, PLURAL_DELIMITER, PhraseNode, PhraseTree, PluralCategory, PluralRule,
    interpolate, lookup,
};

// --- Runtime ---------------------------------------------------------------

#[cfg(feature = "runtime")]
pub use phrasebook_runtime::translate::{
    ANONYMOUS_COMPONENT, component, translate, translate_with, translated, translated_display_name,
};
#[cfg(feature = "runtime")]
pub use phrasebook_runtime::{
    BatchScope, Binding, BindingConfiguration, CacheEntry, Component, ConfigError, FnComponent,
    Lookup, MemoizationGate, Observable, PolyglotLookup, StateSource, Store, Subscription,
    Translate, TranslateOptions, Translated, TranslatedProps, TranslationAction,
    TranslationSource, TranslationState, Translator,
};

/// Crate version, for diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// --- Prelude ---------------------------------------------------------------

pub mod prelude {
    //! Common imports for applications.

    pub use phrasebook_i18n::{LookupOptions, PhraseTree};

    #[cfg(feature = "runtime")]
    pub use phrasebook_runtime::translate::{component, translate, translate_with, translated};
    #[cfg(feature = "runtime")]
    pub use phrasebook_runtime::{
        Binding, BindingConfiguration, Component, StateSource, Store, TranslateOptions,
        TranslatedProps, TranslationAction, TranslationSource, TranslationState, Translator,
    };
}
