#![forbid(unsafe_code)]

//! Translator value objects.
//!
//! A [`Translator`] is built from one effective phrase table and one locale
//! and never looks at live state afterwards. Two translators built from the
//! same inputs behave identically, but consumers compare them by `Rc`
//! identity, so one is only built when the inputs actually change.

use std::fmt;
use std::rc::Rc;

use phrasebook_i18n::{LookupOptions, PhraseTree};

/// Resolves a key in a phrase table.
///
/// Implemented for any `Fn(&PhraseTree, &str, &LookupOptions, &str) -> String`.
/// Missing-key behavior belongs entirely to the implementation.
pub trait Lookup {
    fn lookup(
        &self,
        phrases: &PhraseTree,
        key: &str,
        options: &LookupOptions,
        locale: &str,
    ) -> String;
}

impl<F> Lookup for F
where
    F: Fn(&PhraseTree, &str, &LookupOptions, &str) -> String,
{
    fn lookup(
        &self,
        phrases: &PhraseTree,
        key: &str,
        options: &LookupOptions,
        locale: &str,
    ) -> String {
        self(phrases, key, options, locale)
    }
}

/// Default lookup: dotted keys, `%{var}` interpolation, `||||` plurals.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolyglotLookup;

impl Lookup for PolyglotLookup {
    fn lookup(
        &self,
        phrases: &PhraseTree,
        key: &str,
        options: &LookupOptions,
        locale: &str,
    ) -> String {
        phrasebook_i18n::lookup(phrases, key, options, locale)
    }
}

/// Translation functions bound to a fixed phrase table and locale.
pub struct Translator {
    phrases: Rc<PhraseTree>,
    locale: String,
    lookup: Rc<dyn Lookup>,
}

impl Translator {
    /// Build a translator. Prefer going through a binding, which caches.
    #[must_use]
    pub fn build(phrases: Rc<PhraseTree>, locale: impl Into<String>, lookup: Rc<dyn Lookup>) -> Self {
        Self {
            phrases,
            locale: locale.into(),
            lookup,
        }
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The effective phrase table captured at build time.
    #[must_use]
    pub fn phrases(&self) -> &Rc<PhraseTree> {
        &self.phrases
    }

    /// Translate verbatim.
    #[must_use]
    pub fn t(&self, key: &str) -> String {
        self.t_with(key, &LookupOptions::default())
    }

    #[must_use]
    pub fn t_with(&self, key: &str, options: &LookupOptions) -> String {
        self.lookup.lookup(&self.phrases, key, options, &self.locale)
    }

    /// Translate with the first character upper-cased.
    #[must_use]
    pub fn tc(&self, key: &str) -> String {
        self.tc_with(key, &LookupOptions::default())
    }

    #[must_use]
    pub fn tc_with(&self, key: &str, options: &LookupOptions) -> String {
        capitalize(&self.t_with(key, options))
    }

    /// Translate fully upper-cased.
    #[must_use]
    pub fn tu(&self, key: &str) -> String {
        self.tu_with(key, &LookupOptions::default())
    }

    #[must_use]
    pub fn tu_with(&self, key: &str, options: &LookupOptions) -> String {
        self.t_with(key, options).to_uppercase()
    }

    /// Translate with every word capitalized.
    #[must_use]
    pub fn tt(&self, key: &str) -> String {
        self.tt_with(key, &LookupOptions::default())
    }

    #[must_use]
    pub fn tt_with(&self, key: &str, options: &LookupOptions) -> String {
        titleize(&self.t_with(key, options))
    }

    /// Translate, then apply `morphism` to the result.
    pub fn tm<R>(&self, key: &str, options: &LookupOptions, morphism: impl FnOnce(String) -> R) -> R {
        morphism(self.t_with(key, options))
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("locale", &self.locale)
            .field("phrases", &self.phrases.len())
            .finish_non_exhaustive()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn titleize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = ch.is_whitespace() || ch == '-';
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn translator(phrases: PhraseTree) -> Translator {
        Translator::build(Rc::new(phrases), "en", Rc::new(PolyglotLookup))
    }

    #[test]
    fn transforms() {
        let p = translator(PhraseTree::new().with("hello", "hello"));
        assert_eq!(p.t("hello"), "hello");
        assert_eq!(p.tc("hello"), "Hello");
        assert_eq!(p.tu("hello"), "HELLO");
    }

    #[test]
    fn capitalize_touches_only_first_char() {
        assert_eq!(capitalize("hELLO wORLD"), "HELLO wORLD");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("élan"), "Élan");
        assert_eq!(capitalize("ß"), "SS");
    }

    #[test]
    fn titleize_words() {
        assert_eq!(titleize("good morning, sun-shine"), "Good Morning, Sun-Shine");
        assert_eq!(titleize("  two  spaces"), "  Two  Spaces");
    }

    #[test]
    fn tm_applies_morphism() {
        let p = translator(PhraseTree::new().with("hello", "hello"));
        let reversed: String = p.tm("hello", &LookupOptions::new(), |s| s.chars().rev().collect());
        assert_eq!(reversed, "olleh");
        assert_eq!(p.tm("hello", &LookupOptions::new(), |s| s.len()), 5);
    }

    #[test]
    fn options_reach_lookup() {
        let p = translator(PhraseTree::new().with("n", "%{smart_count} item |||| %{smart_count} items"));
        assert_eq!(p.tc_with("n", &LookupOptions::new().count(2)), "2 items");
        assert_eq!(p.tu_with("n", &LookupOptions::new().count(1)), "1 ITEM");
    }

    #[test]
    fn closures_are_lookups() {
        let calls = Rc::new(Cell::new(0u32));
        let calls_clone = Rc::clone(&calls);
        let lookup = move |_: &PhraseTree, key: &str, _: &LookupOptions, locale: &str| {
            calls_clone.set(calls_clone.get() + 1);
            format!("{locale}:{key}")
        };
        let p = Translator::build(Rc::new(PhraseTree::new()), "fr", Rc::new(lookup));
        assert_eq!(p.t("k"), "fr:k");
        assert_eq!(p.tu("k"), "FR:K");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn captured_inputs_are_fixed() {
        let mut table = PhraseTree::new().with("hello", "hello");
        let p = translator(table.clone());
        table.insert("hello", "changed");
        assert_eq!(p.t("hello"), "hello");
        assert_eq!(p.locale(), "en");
    }
}
