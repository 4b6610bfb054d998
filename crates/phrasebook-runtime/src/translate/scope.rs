#![forbid(unsafe_code)]

//! Effective phrase table for a binding.
//!
//! A scope is a single top-level key, never a dotted path. A scope that is
//! absent, or that names a text entry rather than a table, selects nothing
//! and the binding translates against an empty table (plus its overrides).

use std::rc::Rc;

use phrasebook_i18n::PhraseTree;
use tracing::warn;

/// The raw subtree a binding reads, before overrides.
///
/// An empty scope selects the root itself (same `Rc`).
#[must_use]
pub fn select_scope(phrases: &Rc<PhraseTree>, scope: &str) -> Option<Rc<PhraseTree>> {
    if scope.is_empty() {
        return Some(Rc::clone(phrases));
    }
    phrases.subtree(scope).cloned()
}

/// Merge `own_phrases` over an already selected subtree.
///
/// Without overrides the selected `Rc` is returned as is; with overrides a
/// new table is allocated on every call.
#[must_use]
pub fn merge_own_phrases(
    selected: Option<&Rc<PhraseTree>>,
    scope: &str,
    own_phrases: &PhraseTree,
) -> Rc<PhraseTree> {
    if selected.is_none() {
        warn!(scope, "translation scope missing from phrase table; using empty phrases");
    }
    match (selected, own_phrases.is_empty()) {
        (Some(base), true) => Rc::clone(base),
        (Some(base), false) => Rc::new(base.overlay(own_phrases)),
        (None, true) => Rc::new(PhraseTree::new()),
        (None, false) => Rc::new(own_phrases.clone()),
    }
}

/// Select `scope` in `phrases` and merge `own_phrases` over it.
#[must_use]
pub fn resolve(phrases: &Rc<PhraseTree>, scope: &str, own_phrases: &PhraseTree) -> Rc<PhraseTree> {
    merge_own_phrases(select_scope(phrases, scope).as_ref(), scope, own_phrases)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases() -> Rc<PhraseTree> {
        Rc::new(
            PhraseTree::new()
                .with("hello", "hello")
                .with("scope1", PhraseTree::new().with("hello", "hello2"))
                .with("scope2", PhraseTree::new().with("hello", "hello3")),
        )
    }

    #[test]
    fn empty_scope_is_root_identity() {
        let root = phrases();
        let effective = resolve(&root, "", &PhraseTree::new());
        assert!(Rc::ptr_eq(&root, &effective));
    }

    #[test]
    fn scope_selects_subtree_identity() {
        let root = phrases();
        let effective = resolve(&root, "scope1", &PhraseTree::new());
        assert!(Rc::ptr_eq(root.subtree("scope1").expect("scope1"), &effective));
        assert_eq!(effective.resolve("hello"), Some("hello2"));
    }

    #[test]
    fn missing_scope_is_empty() {
        let effective = resolve(&phrases(), "nope", &PhraseTree::new());
        assert!(effective.is_empty());
    }

    #[test]
    fn text_scope_counts_as_missing() {
        assert!(select_scope(&phrases(), "hello").is_none());
        assert!(resolve(&phrases(), "hello", &PhraseTree::new()).is_empty());
    }

    #[test]
    fn scope_is_not_a_path() {
        assert!(select_scope(&phrases(), "scope1.hello").is_none());
    }

    #[test]
    fn own_phrases_override_and_allocate() {
        let root = phrases();
        let own = PhraseTree::new().with("hello", "Hi !").with("extra", "x");
        let first = resolve(&root, "scope2", &own);
        let second = resolve(&root, "scope2", &own);

        assert_eq!(first.resolve("hello"), Some("Hi !"));
        assert_eq!(first.resolve("extra"), Some("x"));
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }

    #[test]
    fn own_phrases_over_missing_scope() {
        let own = PhraseTree::new().with("hello", "Hi !");
        let effective = resolve(&phrases(), "nope", &own);
        assert_eq!(effective.resolve("hello"), Some("Hi !"));
        assert_eq!(effective.len(), 1);
    }

    #[test]
    fn root_overlay_keeps_scope_handles() {
        let root = phrases();
        let own = PhraseTree::new().with("hello", "Hi !");
        let effective = resolve(&root, "", &own);
        assert!(
            effective
                .get("scope1")
                .expect("scope1")
                .ptr_eq(root.get("scope1").expect("scope1"))
        );
    }
}
