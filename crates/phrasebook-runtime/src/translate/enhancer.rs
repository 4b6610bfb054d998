#![forbid(unsafe_code)]

//! Binding rendering logic to the translation slice of a store.
//!
//! ```ignore
//! let greeting = component(|props: &TranslatedProps<()>| props.p.tc("hello"))
//!     .with_display_name("Greeting");
//!
//! let enhanced = translate("checkout").wrap(greeting);
//! assert_eq!(enhanced.display_name(), "Translated(Greeting)");
//!
//! let binding = enhanced.mount(&store, ());
//! binding.with_output(|text| println!("{text}"));
//! ```
//!
//! A [`Translated`] value is a definition; every [`mount`](Translated::mount)
//! creates an independent [`Binding`] with its own cache entry, so the same
//! enhanced component can be mounted many times without interference.
//!
//! # Re-rendering
//!
//! A binding re-renders its component only when the translator it would
//! pass differs by identity from the previous one, or when the parent sets
//! new props. Store notifications that do not touch the binding's locale or
//! scoped phrases are absorbed by the [`MemoizationGate`].

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::rc::Rc;

use tracing::{debug, trace};

use super::config::{BindingConfiguration, TranslateOptions};
use super::memo::MemoizationGate;
use super::state::{TranslationSource, TranslationState};
use super::translator::{Lookup, PolyglotLookup, Translator};
use crate::reactive::Subscription;
use crate::store::StateSource;

/// Name used for components that have neither a display name nor a name.
pub const ANONYMOUS_COMPONENT: &str = "Component";

/// Rendering logic that can be wrapped by [`translate`].
pub trait Component {
    /// Inputs supplied by the parent, passed through untouched.
    type Props;
    type Output;

    fn render(&mut self, props: &TranslatedProps<Self::Props>) -> Self::Output;

    /// Explicit diagnostic name. Takes precedence over [`name`](Self::name).
    fn display_name(&self) -> Option<&str> {
        None
    }

    /// Declared name of the component.
    fn name(&self) -> Option<&str> {
        None
    }
}

/// What a wrapped component receives: the translator `p` plus its own props.
#[derive(Debug, Clone)]
pub struct TranslatedProps<P> {
    pub p: Rc<Translator>,
    pub props: P,
}

impl<P> Deref for TranslatedProps<P> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.props
    }
}

/// `Translated(<name>)` for a component.
#[must_use]
pub fn translated_display_name<C: Component + ?Sized>(component: &C) -> String {
    let inner = component
        .display_name()
        .filter(|name| !name.is_empty())
        .or_else(|| component.name().filter(|name| !name.is_empty()))
        .unwrap_or(ANONYMOUS_COMPONENT);
    format!("Translated({inner})")
}

// ---------------------------------------------------------------------------
// Closure components
// ---------------------------------------------------------------------------

/// A [`Component`] backed by a closure. Anonymous unless named.
pub struct FnComponent<P, O, F> {
    render: F,
    name: Option<String>,
    display_name: Option<String>,
    _marker: PhantomData<fn(P) -> O>,
}

/// Wrap a render closure as a component.
pub fn component<P, O, F>(render: F) -> FnComponent<P, O, F>
where
    F: FnMut(&TranslatedProps<P>) -> O,
{
    FnComponent {
        render,
        name: None,
        display_name: None,
        _marker: PhantomData,
    }
}

impl<P, O, F> FnComponent<P, O, F> {
    /// Set the declared name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the explicit display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

impl<P, O, F: Clone> Clone for FnComponent<P, O, F> {
    fn clone(&self) -> Self {
        Self {
            render: self.render.clone(),
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<P, O, F> fmt::Debug for FnComponent<P, O, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnComponent")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

impl<P, O, F> Component for FnComponent<P, O, F>
where
    F: FnMut(&TranslatedProps<P>) -> O,
{
    type Props = P;
    type Output = O;

    fn render(&mut self, props: &TranslatedProps<P>) -> O {
        (self.render)(props)
    }

    fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Enhancer
// ---------------------------------------------------------------------------

/// A configured enhancer, waiting for the component to wrap.
#[derive(Clone)]
pub struct Translate {
    config: BindingConfiguration,
    lookup: Rc<dyn Lookup>,
}

/// Curried form: configure now, [`wrap`](Translate::wrap) later.
pub fn translate(options: impl Into<TranslateOptions>) -> Translate {
    Translate::new(options)
}

/// Direct form: configure and wrap in one call.
pub fn translate_with<C: Component>(
    options: impl Into<TranslateOptions>,
    component: C,
) -> Translated<C> {
    Translate::new(options).wrap(component)
}

/// Direct form without configuration.
pub fn translated<C: Component>(component: C) -> Translated<C> {
    Translate::default().wrap(component)
}

impl Translate {
    #[must_use]
    pub fn new(options: impl Into<TranslateOptions>) -> Self {
        Self {
            config: options.into().normalize(),
            lookup: Rc::new(PolyglotLookup),
        }
    }

    /// Replace the lookup used by every binding this enhancer produces.
    #[must_use]
    pub fn with_lookup(mut self, lookup: impl Lookup + 'static) -> Self {
        self.lookup = Rc::new(lookup);
        self
    }

    #[must_use]
    pub fn config(&self) -> &BindingConfiguration {
        &self.config
    }

    /// Apply the enhancer to a component.
    pub fn wrap<C: Component>(&self, component: C) -> Translated<C> {
        Translated {
            display_name: translated_display_name(&component),
            component,
            config: self.config.clone(),
            lookup: Rc::clone(&self.lookup),
        }
    }
}

impl Default for Translate {
    fn default() -> Self {
        Self::new(TranslateOptions::NoConfig)
    }
}

impl fmt::Debug for Translate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translate")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// An enhanced component definition.
pub struct Translated<C> {
    component: C,
    config: BindingConfiguration,
    lookup: Rc<dyn Lookup>,
    display_name: String,
}

impl<C: Component> Translated<C> {
    /// Diagnostic identifier, `Translated(<inner name>)`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn config(&self) -> &BindingConfiguration {
        &self.config
    }

    /// The wrapped component definition.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.component
    }

    /// Create a live binding: render once against the current state, then
    /// follow the store until the binding is dropped.
    pub fn mount<St>(&self, store: &St, props: C::Props) -> Binding<C>
    where
        C: Clone + 'static,
        C::Props: 'static,
        C::Output: 'static,
        St: StateSource,
        St::State: TranslationSource,
    {
        let mut gate = MemoizationGate::new(self.config.clone(), Rc::clone(&self.lookup));
        let p = gate.get_or_build(store.get_state().translation());
        let mut component = self.component.clone();
        let props = TranslatedProps { p, props };
        let output = component.render(&props);

        let shared = Rc::new(RefCell::new(BindingState {
            component,
            props,
            output,
            gate,
            renders: 1,
            notifications: 0,
        }));

        let weak = Rc::downgrade(&shared);
        let subscription = store.subscribe(move |state: &Rc<St::State>| {
            if let Some(shared) = weak.upgrade() {
                shared.borrow_mut().on_state(state.translation());
            }
        });

        debug!(
            display_name = %self.display_name,
            scope = %self.config.scope,
            "translated binding mounted"
        );

        Binding {
            shared,
            display_name: Rc::from(self.display_name.as_str()),
            subscription: Some(subscription),
        }
    }
}

impl<C: Clone> Clone for Translated<C> {
    fn clone(&self) -> Self {
        Self {
            component: self.component.clone(),
            config: self.config.clone(),
            lookup: Rc::clone(&self.lookup),
            display_name: self.display_name.clone(),
        }
    }
}

impl<C> fmt::Debug for Translated<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translated")
            .field("display_name", &self.display_name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Binding instance
// ---------------------------------------------------------------------------

struct BindingState<C: Component> {
    component: C,
    props: TranslatedProps<C::Props>,
    output: C::Output,
    gate: MemoizationGate,
    renders: u64,
    notifications: u64,
}

impl<C: Component> BindingState<C> {
    fn on_state(&mut self, translation: &TranslationState) {
        self.notifications += 1;
        let next = self.gate.get_or_build(translation);
        if Rc::ptr_eq(&next, &self.props.p) {
            trace!(notifications = self.notifications, "translator unchanged; render skipped");
            return;
        }
        self.props.p = next;
        self.render();
    }

    fn render(&mut self) {
        self.output = self.component.render(&self.props);
        self.renders += 1;
    }
}

/// One mounted enhanced component.
///
/// Owns its cache entry and its store subscription. Dropping the binding
/// (or calling [`close`](Binding::close)) unsubscribes, on every exit path
/// including unwinding.
pub struct Binding<C: Component> {
    shared: Rc<RefCell<BindingState<C>>>,
    display_name: Rc<str>,
    subscription: Option<Subscription>,
}

impl<C: Component> Binding<C> {
    /// The translator most recently passed to the component.
    #[must_use]
    pub fn translator(&self) -> Rc<Translator> {
        Rc::clone(&self.shared.borrow().props.p)
    }

    /// Borrow the latest render output.
    pub fn with_output<R>(&self, f: impl FnOnce(&C::Output) -> R) -> R {
        f(&self.shared.borrow().output)
    }

    /// Clone of the latest render output.
    #[must_use]
    pub fn output(&self) -> C::Output
    where
        C::Output: Clone,
    {
        self.shared.borrow().output.clone()
    }

    /// Replace the passthrough props and re-render with the current translator.
    pub fn set_props(&self, props: C::Props) {
        let mut state = self.shared.borrow_mut();
        state.props.props = props;
        state.render();
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn config(&self) -> BindingConfiguration {
        self.shared.borrow().gate.config().clone()
    }

    /// Times the component has rendered, including the mount render.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.shared.borrow().renders
    }

    /// Store notifications received since mount.
    #[must_use]
    pub fn notification_count(&self) -> u64 {
        self.shared.borrow().notifications
    }

    /// Translators built, including the one built at mount.
    #[must_use]
    pub fn rebuild_count(&self) -> u64 {
        self.shared.borrow().gate.entry().rebuilds()
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Unsubscribe and tear the binding down.
    pub fn close(self) {
        drop(self);
    }
}

impl<C: Component> Drop for Binding<C> {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            drop(subscription);
            debug!(display_name = %self.display_name, "translated binding unmounted");
        }
    }
}

impl<C: Component> fmt::Debug for Binding<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("display_name", &self.display_name)
            .field("subscribed", &self.subscription.is_some())
            .finish_non_exhaustive()
    }
}
