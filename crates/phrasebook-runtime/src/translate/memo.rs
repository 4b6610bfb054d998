#![forbid(unsafe_code)]

//! Per-binding translator cache.
//!
//! The gate rebuilds a [`Translator`] only when one of its inputs changed:
//!
//! | Input          | Compared by             |
//! |----------------|-------------------------|
//! | locale         | value                   |
//! | scoped phrases | `Rc` identity (pre-merge) |
//! | own phrases    | `Rc` identity           |
//!
//! The scoped phrases are compared *before* overrides are merged in, because
//! merging allocates a fresh table on every call. Holding the last-seen
//! `Rc`s (rather than raw addresses) keeps them alive, so a freed table can
//! never be mistaken for a new one allocated at the same address.
//!
//! A gate belongs to exactly one binding and is never shared.

use std::rc::Rc;

use phrasebook_i18n::PhraseTree;
use tracing::{debug_span, trace};

use super::config::BindingConfiguration;
use super::scope;
use super::state::TranslationState;
use super::translator::{Lookup, Translator};

/// Inputs of the cached translator plus the translator itself.
#[derive(Debug, Default)]
pub struct CacheEntry {
    last_locale: String,
    /// `None` when the scope was missing.
    last_phrases: Option<Rc<PhraseTree>>,
    last_own_phrases: Option<Rc<PhraseTree>>,
    cached: Option<Rc<Translator>>,
    hits: u64,
    rebuilds: u64,
}

impl CacheEntry {
    /// The cached translator, if any has been built.
    #[must_use]
    pub fn cached(&self) -> Option<&Rc<Translator>> {
        self.cached.as_ref()
    }

    /// Calls answered from the cache.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Calls that built a new translator.
    #[must_use]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    fn matches(
        &self,
        locale: &str,
        phrases: Option<&Rc<PhraseTree>>,
        own_phrases: &Rc<PhraseTree>,
    ) -> bool {
        let phrases_match = match (&self.last_phrases, phrases) {
            (Some(last), Some(current)) => Rc::ptr_eq(last, current),
            (None, None) => true,
            _ => false,
        };
        self.cached.is_some()
            && self.last_locale == locale
            && phrases_match
            && self
                .last_own_phrases
                .as_ref()
                .is_some_and(|last| Rc::ptr_eq(last, own_phrases))
    }
}

/// Decides between reusing and rebuilding one binding's translator.
pub struct MemoizationGate {
    config: BindingConfiguration,
    lookup: Rc<dyn Lookup>,
    entry: CacheEntry,
}

impl MemoizationGate {
    /// A gate with an empty cache entry.
    #[must_use]
    pub fn new(config: BindingConfiguration, lookup: Rc<dyn Lookup>) -> Self {
        Self {
            config,
            lookup,
            entry: CacheEntry::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &BindingConfiguration {
        &self.config
    }

    #[must_use]
    pub fn entry(&self) -> &CacheEntry {
        &self.entry
    }

    /// Return the cached translator if `state` agrees with the last inputs,
    /// otherwise build, cache and return a new one.
    pub fn get_or_build(&mut self, state: &TranslationState) -> Rc<Translator> {
        let selected = scope::select_scope(&state.phrases, &self.config.scope);
        if self.entry.matches(&state.locale, selected.as_ref(), &self.config.own_phrases)
            && let Some(cached) = &self.entry.cached
        {
            self.entry.hits += 1;
            trace!(scope = %self.config.scope, hits = self.entry.hits, "translator reused");
            return Rc::clone(cached);
        }

        let _span = debug_span!(
            "translate.rebuild",
            scope = %self.config.scope,
            locale = %state.locale,
        )
        .entered();

        let effective =
            scope::merge_own_phrases(selected.as_ref(), &self.config.scope, &self.config.own_phrases);
        let translator = Rc::new(Translator::build(
            effective,
            state.locale.as_str(),
            Rc::clone(&self.lookup),
        ));

        self.entry.last_locale.clone_from(&state.locale);
        self.entry.last_phrases = selected;
        self.entry.last_own_phrases = Some(Rc::clone(&self.config.own_phrases));
        self.entry.cached = Some(Rc::clone(&translator));
        self.entry.rebuilds += 1;
        translator
    }
}

impl std::fmt::Debug for MemoizationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoizationGate")
            .field("config", &self.config)
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::translator::PolyglotLookup;
    use phrasebook_i18n::LookupOptions;
    use std::cell::Cell;

    fn table() -> Rc<PhraseTree> {
        Rc::new(
            PhraseTree::new()
                .with("hello", "hello")
                .with("scope1", PhraseTree::new().with("hello", "hello2"))
                .with("scope2", PhraseTree::new().with("hello", "hello3")),
        )
    }

    fn gate(config: BindingConfiguration) -> MemoizationGate {
        MemoizationGate::new(config, Rc::new(PolyglotLookup))
    }

    #[test]
    fn first_call_builds() {
        let mut gate = gate(BindingConfiguration::default());
        assert!(gate.entry().cached().is_none());
        let p = gate.get_or_build(&TranslationState::new("en", table()));
        assert_eq!(p.t("hello"), "hello");
        assert_eq!(gate.entry().rebuilds(), 1);
    }

    #[test]
    fn identical_inputs_reuse() {
        let mut gate = gate(BindingConfiguration::default());
        let state = TranslationState::new("en", table());
        let a = gate.get_or_build(&state);
        let b = gate.get_or_build(&state.clone());
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(gate.entry().hits(), 1);
    }

    #[test]
    fn locale_compared_by_value() {
        let mut gate = gate(BindingConfiguration::default());
        let phrases = table();
        let a = gate.get_or_build(&TranslationState::new(String::from("en"), Rc::clone(&phrases)));
        let b = gate.get_or_build(&TranslationState::new("en".to_owned(), Rc::clone(&phrases)));
        let c = gate.get_or_build(&TranslationState::new("fr", Rc::clone(&phrases)));
        assert!(Rc::ptr_eq(&a, &b));
        assert!(!Rc::ptr_eq(&b, &c));
        assert_eq!(c.locale(), "fr");
    }

    #[test]
    fn equal_but_new_table_rebuilds() {
        let mut gate = gate(BindingConfiguration::default());
        let a = gate.get_or_build(&TranslationState::new("en", table()));
        let b = gate.get_or_build(&TranslationState::new("en", table()));
        assert!(!Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn scoped_binding_ignores_sibling_changes() {
        let mut gate = gate(BindingConfiguration::scoped("scope1"));
        let before = table();
        let a = gate.get_or_build(&TranslationState::new("en", Rc::clone(&before)));

        // New root, scope1 shared, scope2 replaced.
        let mut next = (*before).clone();
        next.insert("scope2", PhraseTree::new().with("hello", "changed"));
        let b = gate.get_or_build(&TranslationState::new("en", Rc::new(next)));

        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(b.t("hello"), "hello2");
    }

    #[test]
    fn scoped_binding_rebuilds_on_own_scope_change() {
        let mut gate = gate(BindingConfiguration::scoped("scope1"));
        let before = table();
        let a = gate.get_or_build(&TranslationState::new("en", Rc::clone(&before)));

        let mut next = (*before).clone();
        next.insert("scope1", PhraseTree::new().with("hello", "updated"));
        let b = gate.get_or_build(&TranslationState::new("en", Rc::new(next)));

        assert!(!Rc::ptr_eq(&a, &b));
        assert_eq!(b.t("hello"), "updated");
    }

    #[test]
    fn own_phrases_do_not_defeat_cache() {
        let config = BindingConfiguration::default().with_own_phrase("hello", "Hi !");
        let mut gate = gate(config);
        let state = TranslationState::new("en", table());
        let a = gate.get_or_build(&state);
        let b = gate.get_or_build(&state);
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(a.t("hello"), "Hi !");
        assert_eq!(gate.entry().rebuilds(), 1);
    }

    #[test]
    fn missing_scope_is_cached_as_missing() {
        let mut gate = gate(BindingConfiguration::scoped("absent"));
        let a = gate.get_or_build(&TranslationState::new("en", table()));
        let b = gate.get_or_build(&TranslationState::new("en", table()));
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(a.t("hello"), "hello");
        assert!(a.phrases().is_empty());
    }

    #[test]
    fn hits_never_call_lookup_or_factory() {
        let calls = Rc::new(Cell::new(0u32));
        let calls_clone = Rc::clone(&calls);
        let lookup = move |p: &PhraseTree, k: &str, o: &LookupOptions, l: &str| {
            calls_clone.set(calls_clone.get() + 1);
            phrasebook_i18n::lookup(p, k, o, l)
        };
        let mut gate = MemoizationGate::new(BindingConfiguration::default(), Rc::new(lookup));
        let state = TranslationState::new("en", table());
        for _ in 0..10 {
            let _ = gate.get_or_build(&state);
        }
        assert_eq!(calls.get(), 0);
        assert_eq!(gate.entry().rebuilds(), 1);
        assert_eq!(gate.entry().hits(), 9);
    }
}
