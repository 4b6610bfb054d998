#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use phrasebook_i18n::PhraseTree;
use phrasebook_runtime::Store;
use phrasebook_runtime::translate::{
    TranslatedProps, TranslationAction, TranslationState, component, translate,
};

#[derive(Arbitrary, Debug)]
enum Op {
    SetLocale(u8),
    ReplaceScope(u8, String),
    DropScope(u8),
    Batch(Vec<u8>),
}

const LOCALES: &[&str] = &["en", "fr", "ru", "ar", "ja", "pt-br"];
const SCOPES: &[&str] = &["", "a", "b", "c"];

fn locale(i: u8) -> String {
    LOCALES[usize::from(i) % LOCALES.len()].to_string()
}

fuzz_target!(|ops: Vec<Op>| {
    if ops.len() > 256 {
        return;
    }

    let phrases = PhraseTree::new()
        .with("hello", "hello")
        .with("a", PhraseTree::new().with("hello", "a"))
        .with("b", PhraseTree::new().with("hello", "b"));
    let store = Store::new(TranslationState::new("en", phrases), TranslationState::reduce);

    let bindings: Vec<_> = SCOPES
        .iter()
        .map(|scope| {
            translate(*scope)
                .wrap(component(|props: &TranslatedProps<()>| props.p.t("hello")))
                .mount(&store, ())
        })
        .collect();

    for op in ops {
        match op {
            Op::SetLocale(i) => store.dispatch(TranslationAction::SetLocale(locale(i))),
            Op::ReplaceScope(i, value) => {
                let state = store.get_state();
                let mut next = (*state.phrases).clone();
                let scope = ["a", "b", "c"][usize::from(i) % 3];
                next.insert(scope, PhraseTree::new().with("hello", value.as_str()));
                store.dispatch(TranslationAction::set_language(state.locale.clone(), next));
            }
            Op::DropScope(i) => {
                let state = store.get_state();
                let mut next = (*state.phrases).clone();
                next.remove(["a", "b", "c"][usize::from(i) % 3]);
                store.dispatch(TranslationAction::set_language(state.locale.clone(), next));
            }
            Op::Batch(locales) => store.batch(|s| {
                for i in locales.into_iter().take(16) {
                    s.dispatch(TranslationAction::SetLocale(locale(i)));
                }
            }),
        }
    }

    let state = store.get_state();
    for binding in &bindings {
        // Every render corresponds to exactly one new translator.
        assert_eq!(binding.render_count(), binding.rebuild_count());
        assert_eq!(binding.translator().locale(), state.locale);
    }
});
