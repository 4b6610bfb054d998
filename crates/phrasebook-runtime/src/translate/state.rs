#![forbid(unsafe_code)]

//! The translation slice of application state.

use std::rc::Rc;

use phrasebook_i18n::PhraseTree;

/// Active locale and its phrase table.
///
/// `phrases` is shared: a new revision that does not touch the table must
/// keep the same `Rc`.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationState {
    pub locale: String,
    pub phrases: Rc<PhraseTree>,
}

impl TranslationState {
    #[must_use]
    pub fn new(locale: impl Into<String>, phrases: impl Into<Rc<PhraseTree>>) -> Self {
        Self {
            locale: locale.into(),
            phrases: phrases.into(),
        }
    }

    /// Apply a [`TranslationAction`], reusing `state` when nothing changes.
    #[must_use]
    pub fn reduce(state: &Rc<Self>, action: &TranslationAction) -> Rc<Self> {
        match action {
            TranslationAction::SetLanguage { locale, phrases } => Rc::new(Self {
                locale: locale.clone(),
                phrases: Rc::clone(phrases),
            }),
            TranslationAction::SetLocale(locale) if *locale == state.locale => Rc::clone(state),
            TranslationAction::SetLocale(locale) => Rc::new(Self {
                locale: locale.clone(),
                phrases: Rc::clone(&state.phrases),
            }),
        }
    }
}

impl Default for TranslationState {
    fn default() -> Self {
        Self::new("en", PhraseTree::new())
    }
}

/// Actions understood by [`TranslationState::reduce`].
#[derive(Debug, Clone)]
pub enum TranslationAction {
    /// Switch locale and phrase table together.
    SetLanguage {
        locale: String,
        phrases: Rc<PhraseTree>,
    },
    /// Switch locale, keeping the current phrase table.
    SetLocale(String),
}

impl TranslationAction {
    #[must_use]
    pub fn set_language(locale: impl Into<String>, phrases: impl Into<Rc<PhraseTree>>) -> Self {
        Self::SetLanguage {
            locale: locale.into(),
            phrases: phrases.into(),
        }
    }
}

/// Application state that carries a translation slice.
pub trait TranslationSource {
    fn translation(&self) -> &TranslationState;
}

impl TranslationSource for TranslationState {
    fn translation(&self) -> &TranslationState {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> Rc<TranslationState> {
        Rc::new(TranslationState::new(
            "en",
            PhraseTree::new().with("hello", "hello"),
        ))
    }

    #[test]
    fn set_locale_keeps_phrase_reference() {
        let before = state();
        let after = TranslationState::reduce(&before, &TranslationAction::SetLocale("fr".into()));
        assert_eq!(after.locale, "fr");
        assert!(Rc::ptr_eq(&before.phrases, &after.phrases));
    }

    #[test]
    fn same_locale_is_a_no_op() {
        let before = state();
        let after = TranslationState::reduce(&before, &TranslationAction::SetLocale("en".into()));
        assert!(Rc::ptr_eq(&before, &after));
    }

    #[test]
    fn set_language_replaces_table() {
        let before = state();
        let table = Rc::new(PhraseTree::new().with("hello", "bonjour"));
        let after = TranslationState::reduce(
            &before,
            &TranslationAction::set_language("fr", Rc::clone(&table)),
        );
        assert!(Rc::ptr_eq(&after.phrases, &table));
        assert_eq!(after.phrases.resolve("hello"), Some("bonjour"));
    }
}
