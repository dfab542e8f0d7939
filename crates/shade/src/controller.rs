//! The theme controller and its host-signal wiring.
//!
//! [`ThemeController`] owns the current [`ThemeChoice`], the last host
//! signal, a [`PreferenceStore`] and a [`ThemeView`]. Its operations never
//! fail: storage problems are logged and the visual theme is applied
//! regardless.
//!
//! [`ThemeWidget`] mounts a controller on a [`SchemeQuery`] so host changes
//! reach [`ThemeController::on_scheme_change`] without the caller routing
//! them by hand.
//!
//! ```rust
//! use shade::{EffectiveTheme, MemoryStore, SchemeQuery, ShadeConfig, Surface, ThemeChoice, ThemeWidget};
//!
//! let query = SchemeQuery::new(false);
//! let widget = ThemeWidget::mount(&ShadeConfig::default(), MemoryStore::new(), Surface::default(), &query);
//! assert_eq!(widget.effective(), EffectiveTheme::Light);
//!
//! query.set_matches(true);
//! assert_eq!(widget.effective(), EffectiveTheme::Dark);
//!
//! widget.select_theme(ThemeChoice::Light);
//! query.set_matches(false);
//! query.set_matches(true);
//! assert_eq!(widget.effective(), EffectiveTheme::Light);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::choice::{resolve, EffectiveTheme, ThemeChoice};
use crate::config::ShadeConfig;
use crate::scheme::{SchemeQuery, Subscription};
use crate::storage::{load_choice, persist_choice, PreferenceStore};
use crate::view::{sync_icons, sync_view, ThemeView};

/// Resolves, applies and persists the theme.
pub struct ThemeController<S, V> {
    storage_key: String,
    choice: ThemeChoice,
    prefers_dark: bool,
    store: S,
    view: V,
}

impl<S: PreferenceStore, V: ThemeView> ThemeController<S, V> {
    /// Loads the persisted choice and brings the view in line with it.
    ///
    /// Absent, unrecognised or unreadable stored values all mean `System`.
    pub fn initialize(config: &ShadeConfig, store: S, view: V, prefers_dark: bool) -> Self {
        let choice = load_choice(&store, &config.storage_key);
        let mut controller = Self {
            storage_key: config.storage_key.clone(),
            choice,
            prefers_dark,
            store,
            view,
        };
        controller.render();
        tracing::debug!(
            choice = %controller.choice,
            effective = %controller.effective(),
            prefers_dark,
            "theme initialized"
        );
        controller
    }

    /// Makes `choice` the active theme.
    ///
    /// The choice is persisted (or removed, for `System`), the view is
    /// resynced and the menu closed. A storage failure does not stop the
    /// visual update. Repeating a call with the same choice changes nothing.
    pub fn select_theme(&mut self, choice: ThemeChoice) {
        self.choice = choice;
        if let Err(err) = persist_choice(&mut self.store, &self.storage_key, choice) {
            tracing::warn!(
                key = %self.storage_key,
                choice = %choice,
                error = %err,
                "could not persist theme choice"
            );
        }
        self.render();
        self.view.close_menu();
        tracing::debug!(choice = %choice, effective = %self.effective(), "theme selected");
    }

    /// Selects the choice named by an option control's value.
    ///
    /// Unknown values select `System`.
    pub fn select_value(&mut self, value: &str) -> ThemeChoice {
        let choice = ThemeChoice::from_value_or_system(value);
        if ThemeChoice::from_value(value).is_none() {
            tracing::warn!(value, "unknown theme value, falling back to system");
        }
        self.select_theme(choice);
        choice
    }

    /// Records a new host signal.
    ///
    /// Only a `System` choice reacts; explicit choices keep their look.
    pub fn on_scheme_change(&mut self, prefers_dark: bool) {
        self.prefers_dark = prefers_dark;
        if !self.choice.is_system() {
            return;
        }
        let effective = self.effective();
        self.view.apply_scheme(effective);
        sync_icons(&mut self.view, effective);
        tracing::debug!(prefers_dark, effective = %effective, "followed host color scheme");
    }

    fn render(&mut self) {
        let effective = self.effective();
        sync_view(&mut self.view, effective, self.choice);
    }
}

impl<S, V> ThemeController<S, V> {
    pub fn choice(&self) -> ThemeChoice {
        self.choice
    }

    pub fn effective(&self) -> EffectiveTheme {
        resolve(self.choice, self.prefers_dark)
    }

    pub fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable access to the view, e.g. to drive the menu toggle.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_parts(self) -> (S, V) {
        (self.store, self.view)
    }
}

impl<S, V> fmt::Debug for ThemeController<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeController")
            .field("storage_key", &self.storage_key)
            .field("choice", &self.choice)
            .field("prefers_dark", &self.prefers_dark)
            .finish_non_exhaustive()
    }
}

/// A controller subscribed to a [`SchemeQuery`].
///
/// The subscription lives as long as the widget. Call [`dispose`](Self::dispose)
/// to detach from the query when the host outlives the widget.
///
/// A host change that arrives while the controller is borrowed (for instance
/// from inside [`with_controller`](Self::with_controller)) is applied as soon
/// as that borrow ends.
pub struct ThemeWidget<S, V> {
    controller: Rc<RefCell<ThemeController<S, V>>>,
    query: SchemeQuery,
    subscription: Subscription,
}

impl<S, V> ThemeWidget<S, V>
where
    S: PreferenceStore + 'static,
    V: ThemeView + 'static,
{
    /// Initializes a controller from the query's current value and subscribes it.
    pub fn mount(config: &ShadeConfig, store: S, view: V, query: &SchemeQuery) -> Self {
        let controller = ThemeController::initialize(config, store, view, query.matches());
        let controller = Rc::new(RefCell::new(controller));
        let weak = Rc::downgrade(&controller);
        let subscription = query.subscribe(move |prefers_dark| {
            let Some(controller) = weak.upgrade() else {
                return;
            };
            match controller.try_borrow_mut() {
                Ok(mut controller) => controller.on_scheme_change(prefers_dark),
                Err(_) => tracing::debug!(prefers_dark, "controller busy, deferring host change"),
            };
        });
        Self {
            controller,
            query: query.clone(),
            subscription,
        }
    }

    pub fn select_theme(&self, choice: ThemeChoice) {
        self.with_controller(|c| c.select_theme(choice));
    }

    pub fn select_value(&self, value: &str) -> ThemeChoice {
        self.with_controller(|c| c.select_value(value))
    }

    pub fn choice(&self) -> ThemeChoice {
        self.controller.borrow().choice()
    }

    pub fn effective(&self) -> EffectiveTheme {
        self.controller.borrow().effective()
    }

    /// Runs `f` with the controller borrowed mutably.
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut ThemeController<S, V>) -> R) -> R {
        let result = f(&mut self.controller.borrow_mut());
        self.catch_up();
        result
    }

    /// Applies a host change that was deferred while the controller was borrowed.
    fn catch_up(&self) {
        let prefers_dark = self.query.matches();
        let mut controller = self.controller.borrow_mut();
        if controller.prefers_dark() != prefers_dark {
            controller.on_scheme_change(prefers_dark);
        }
    }

    /// Unsubscribes from the query and hands back the controller.
    ///
    /// Returns `None` only if the controller is still shared, which cannot
    /// happen once the listener is gone: it holds a weak reference.
    pub fn dispose(self) -> Option<ThemeController<S, V>> {
        let Self {
            controller,
            query: _,
            subscription,
        } = self;
        subscription.unsubscribe();
        Rc::into_inner(controller).map(RefCell::into_inner)
    }
}

impl<S, V> fmt::Debug for ThemeWidget<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeWidget")
            .field("controller", &*self.controller.borrow())
            .field("subscription", &self.subscription)
            .finish()
    }
}
