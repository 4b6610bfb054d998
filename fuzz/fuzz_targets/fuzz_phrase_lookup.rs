#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use phrasebook_i18n::{LookupOptions, PhraseTree, PluralRule, interpolate, lookup};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    template: &'a str,
    key: &'a str,
    locale: &'a str,
    count: Option<i64>,
    var_name: &'a str,
    var_value: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    // Cap length to keep fuzzing fast.
    if input.template.len() > 2048 || input.key.len() > 256 {
        return;
    }

    let mut options = LookupOptions::new().var(input.var_name, input.var_value);
    if let Some(count) = input.count {
        options = options.count(count);
    }

    // Interpolation is single-pass and must never panic.
    let _ = interpolate(input.template, &options);

    // Plural selection must stay within the rule's forms for any count.
    let rule = PluralRule::for_locale(input.locale);
    if let Some(count) = input.count {
        assert!(rule.form_index(count) < rule.forms().len());
    }

    let phrases = PhraseTree::new()
        .with(input.key, input.template)
        .with("nested", PhraseTree::new().with(input.key, input.template));

    let _direct = lookup(&phrases, input.key, &options, input.locale);
    let _nested = lookup(&phrases, &format!("nested.{}", input.key), &options, input.locale);

    // A missing key comes back verbatim.
    let missing = format!("{}\u{0}missing", input.key);
    assert_eq!(lookup(&phrases, &missing, &options, input.locale), missing);
});
