#![forbid(unsafe_code)]

//! Phrase storage and lookup for phrasebook.
//!
//! Provides nested phrase trees with reference-stable children, ICU-style
//! plural rules keyed by locale, and a polyglot-compatible lookup function
//! with `%{var}` interpolation and `||||`-separated plural forms.
//!
//! # Role in phrasebook
//! `phrasebook-i18n` is the pure half of the system: it never observes
//! state and never caches. `phrasebook-runtime` decides *when* to build a
//! translator; this crate decides *what a key resolves to*.

pub mod lookup;
pub mod plural;
pub mod tree;

pub use lookup::{LookupOptions, PLURAL_DELIMITER, interpolate, lookup};
pub use plural::{PluralCategory, PluralRule};
pub use tree::{PhraseNode, PhraseTree};
