#![forbid(unsafe_code)]

//! Nested phrase tables.
//!
//! A [`PhraseTree`] maps string keys to either translatable text or a nested
//! tree. Children are held behind `Rc`, so cloning a tree (or building a new
//! revision of it) keeps every untouched child at the same address. Callers
//! that cache derived values rely on that: two revisions that share a child
//! `Rc` are known to agree on that child without comparing its contents.
//!
//! # Invariants
//!
//! 1. Keys are unique per level and iterate in sorted order.
//! 2. [`PhraseTree::overlay`] replaces whole branches; it never deep-merges.
//! 3. Nodes not named by an overlay keep their original `Rc`.

use std::collections::BTreeMap;
use std::rc::Rc;

/// One entry of a phrase tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhraseNode {
    /// Translatable text, possibly containing `%{var}` tokens and `||||`
    /// plural forms.
    Text(Rc<str>),
    /// A nested table.
    Tree(Rc<PhraseTree>),
}

impl PhraseNode {
    /// The text of a leaf node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_ref()),
            Self::Tree(_) => None,
        }
    }

    /// The nested table of a branch node.
    #[must_use]
    pub fn as_tree(&self) -> Option<&Rc<PhraseTree>> {
        match self {
            Self::Tree(tree) => Some(tree),
            Self::Text(_) => None,
        }
    }

    /// Returns true when both nodes share the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Rc::ptr_eq(a, b),
            (Self::Tree(a), Self::Tree(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for PhraseNode {
    fn from(text: &str) -> Self {
        Self::Text(Rc::from(text))
    }
}

impl From<String> for PhraseNode {
    fn from(text: String) -> Self {
        Self::Text(Rc::from(text))
    }
}

impl From<Rc<str>> for PhraseNode {
    fn from(text: Rc<str>) -> Self {
        Self::Text(text)
    }
}

impl From<PhraseTree> for PhraseNode {
    fn from(tree: PhraseTree) -> Self {
        Self::Tree(Rc::new(tree))
    }
}

impl From<Rc<PhraseTree>> for PhraseNode {
    fn from(tree: Rc<PhraseTree>) -> Self {
        Self::Tree(tree)
    }
}

/// A mapping from keys to phrases or nested phrase tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseTree {
    entries: BTreeMap<String, PhraseNode>,
}

impl PhraseTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, node: impl Into<PhraseNode>) -> Self {
        self.insert(key, node);
        self
    }

    /// Insert or replace an entry, returning the previous node.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        node: impl Into<PhraseNode>,
    ) -> Option<PhraseNode> {
        self.entries.insert(key.into(), node.into())
    }

    /// Remove an entry.
    pub fn remove(&mut self, key: &str) -> Option<PhraseNode> {
        self.entries.remove(key)
    }

    /// Direct, single-level access.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PhraseNode> {
        self.entries.get(key)
    }

    /// The nested table stored under `key`, if that entry is a table.
    ///
    /// Text entries yield `None`, the same as absent keys.
    #[must_use]
    pub fn subtree(&self, key: &str) -> Option<&Rc<PhraseTree>> {
        self.entries.get(key).and_then(PhraseNode::as_tree)
    }

    /// Resolve a possibly dotted key to its text.
    ///
    /// An exact key at the current level wins; otherwise the key is split at
    /// its first `.` and the remainder is resolved inside that subtree.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&str> {
        if let Some(PhraseNode::Text(text)) = self.entries.get(path) {
            return Some(text.as_ref());
        }
        let (head, rest) = path.split_once('.')?;
        self.subtree(head)?.resolve(rest)
    }

    /// One-level merge: every key of `overrides` replaces the same key here.
    ///
    /// Entries not named by `overrides` are carried over by handle, so their
    /// reference identity survives the merge.
    #[must_use]
    pub fn overlay(&self, overrides: &PhraseTree) -> PhraseTree {
        let mut merged = self.clone();
        for (key, node) in &overrides.entries {
            merged.entries.insert(key.clone(), node.clone());
        }
        merged
    }

    /// Number of entries at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if this level has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PhraseNode)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Parse a tree from a JSON object of strings and nested objects.
    #[cfg(feature = "serde")]
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl<K, V> FromIterator<(K, V)> for PhraseTree
where
    K: Into<String>,
    V: Into<PhraseNode>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, node)| (key.into(), node.into()))
                .collect(),
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{PhraseNode, PhraseTree};
    use serde::{Deserialize, Deserializer};
    use std::collections::BTreeMap;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawNode {
        Text(String),
        Tree(BTreeMap<String, RawNode>),
    }

    fn tree_from_raw(raw: BTreeMap<String, RawNode>) -> PhraseTree {
        raw.into_iter()
            .map(|(key, node)| (key, node_from_raw(node)))
            .collect()
    }

    fn node_from_raw(raw: RawNode) -> PhraseNode {
        match raw {
            RawNode::Text(text) => PhraseNode::from(text),
            RawNode::Tree(map) => PhraseNode::from(tree_from_raw(map)),
        }
    }

    impl<'de> Deserialize<'de> for PhraseTree {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            BTreeMap::<String, RawNode>::deserialize(deserializer).map(tree_from_raw)
        }
    }

    impl<'de> Deserialize<'de> for PhraseNode {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            RawNode::deserialize(deserializer).map(node_from_raw)
        }
    }
}
