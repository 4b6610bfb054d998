#![forbid(unsafe_code)]

//! Polyglot-style phrase lookup.
//!
//! [`lookup`] resolves a key against a [`PhraseTree`], picks a plural form
//! when a `smart_count` is given, and substitutes `%{name}` tokens.
//!
//! # Missing keys
//!
//! A key that does not resolve falls back to [`LookupOptions::default`]; if
//! no default is set the key itself is returned, uninterpolated.

use std::collections::BTreeMap;

use crate::plural::PluralRule;
use crate::tree::PhraseTree;

/// Separator between plural forms inside one phrase.
pub const PLURAL_DELIMITER: &str = "||||";

const TOKEN_OPEN: &str = "%{";
const TOKEN_CLOSE: char = '}';
const SMART_COUNT: &str = "smart_count";

/// Per-call lookup options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupOptions {
    /// Count used to select a plural form; also available as `%{smart_count}`.
    pub smart_count: Option<i64>,
    /// Phrase used when the key is missing.
    pub default: Option<String>,
    /// Interpolation variables.
    pub vars: BTreeMap<String, String>,
}

impl LookupOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the plural count.
    #[must_use]
    pub fn count(mut self, count: i64) -> Self {
        self.smart_count = Some(count);
        self
    }

    /// Add an interpolation variable.
    #[must_use]
    pub fn var(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.vars.insert(name.into(), value.to_string());
        self
    }

    /// Set the fallback phrase for missing keys.
    #[must_use]
    pub fn or_default(mut self, phrase: impl Into<String>) -> Self {
        self.default = Some(phrase.into());
        self
    }

    fn value_of(&self, name: &str) -> Option<String> {
        if let Some(value) = self.vars.get(name) {
            return Some(value.clone());
        }
        if name == SMART_COUNT {
            return self.smart_count.map(|count| count.to_string());
        }
        None
    }
}

/// Resolve `key` in `phrases` for `locale`.
#[must_use]
pub fn lookup(phrases: &PhraseTree, key: &str, options: &LookupOptions, locale: &str) -> String {
    let Some(phrase) = phrases.resolve(key).or(options.default.as_deref()) else {
        return key.to_string();
    };
    match options.smart_count {
        Some(count) => interpolate(choose_plural_form(phrase, count, locale), options),
        None => interpolate(phrase, options),
    }
}

/// Pick the `||||`-separated form for `count`, falling back to the first.
fn choose_plural_form<'a>(phrase: &'a str, count: i64, locale: &str) -> &'a str {
    if !phrase.contains(PLURAL_DELIMITER) {
        return phrase;
    }
    let index = PluralRule::for_locale(locale).form_index(count);
    let mut forms = phrase.split(PLURAL_DELIMITER);
    let first = forms.clone().next().unwrap_or(phrase);
    forms.nth(index).unwrap_or(first).trim()
}

/// Substitute `%{name}` tokens in a single pass.
///
/// Substituted values are never rescanned, and tokens without a value
/// (or without a closing brace) are copied through unchanged.
#[must_use]
pub fn interpolate(template: &str, options: &LookupOptions) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find(TOKEN_OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + TOKEN_OPEN.len()..];
        let Some(end) = after_open.find(TOKEN_CLOSE) else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after_open[..end];
        match options.value_of(name) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[start..start + TOKEN_OPEN.len() + end + 1]),
        }
        rest = &after_open[end + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases() -> PhraseTree {
        PhraseTree::new()
            .with("hello", "hello")
            .with("greet", "Hello, %{name}!")
            .with("cars", "%{smart_count} car |||| %{smart_count} cars")
            .with(
                "nested",
                PhraseTree::new().with("deep", "deep %{what}"),
            )
    }

    #[test]
    fn plain_key() {
        assert_eq!(lookup(&phrases(), "hello", &LookupOptions::new(), "en"), "hello");
    }

    #[test]
    fn missing_key_returns_key() {
        let options = LookupOptions::new().var("name", "x");
        assert_eq!(lookup(&phrases(), "nope.%{name}", &options, "en"), "nope.%{name}");
    }

    #[test]
    fn missing_key_uses_default() {
        let options = LookupOptions::new().or_default("fallback %{n}").var("n", 3);
        assert_eq!(lookup(&phrases(), "nope", &options, "en"), "fallback 3");
    }

    #[test]
    fn interpolates_vars() {
        let options = LookupOptions::new().var("name", "Ada");
        assert_eq!(lookup(&phrases(), "greet", &options, "en"), "Hello, Ada!");
    }

    #[test]
    fn dotted_keys_reach_nested_phrases() {
        let options = LookupOptions::new().var("what", "value");
        assert_eq!(lookup(&phrases(), "nested.deep", &options, "en"), "deep value");
    }

    #[test]
    fn plural_forms_follow_locale() {
        let tree = phrases();
        let one = LookupOptions::new().count(1);
        let zero = LookupOptions::new().count(0);
        assert_eq!(lookup(&tree, "cars", &one, "en"), "1 car");
        assert_eq!(lookup(&tree, "cars", &zero, "en"), "0 cars");
        assert_eq!(lookup(&tree, "cars", &zero, "fr"), "0 car");
    }

    #[test]
    fn plural_out_of_range_uses_first_form() {
        let tree = PhraseTree::new().with("items", "item |||| items");
        // Russian wants three forms; index 2 is absent.
        let options = LookupOptions::new().count(5);
        assert_eq!(lookup(&tree, "items", &options, "ru"), "item");
    }

    #[test]
    fn chosen_form_borrows_from_phrase() {
        let phrase = String::from("%{smart_count} day |||| %{smart_count} days");
        let form = choose_plural_form(&phrase, 3, "en");
        assert_eq!(form, "%{smart_count} days");
        let start = form.as_ptr() as usize - phrase.as_ptr() as usize;
        assert_eq!(&phrase[start..start + form.len()], form);
        assert_eq!(choose_plural_form(&phrase, 1, "pt-BR"), "%{smart_count} day");
    }

    #[test]
    fn phrase_without_delimiter_ignores_count() {
        let options = LookupOptions::new().count(7);
        assert_eq!(lookup(&phrases(), "hello", &options, "en"), "hello");
    }

    #[test]
    fn unknown_and_unterminated_tokens_stay() {
        let options = LookupOptions::new().var("a", "A");
        assert_eq!(interpolate("%{a} %{b} %{a", &options), "A %{b} %{a");
    }

    #[test]
    fn substitution_is_not_recursive() {
        let options = LookupOptions::new().var("a", "%{b}").var("b", "B");
        assert_eq!(interpolate("%{a}", &options), "%{b}");
    }
}
