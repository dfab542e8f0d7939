//! Host color-scheme signal.
//!
//! Two pieces live here:
//!
//! - [`detect_prefers_dark`] asks the OS for its current preference, through a
//!   replaceable detector (see [`set_scheme_detector`]).
//! - [`SchemeQuery`] models the `(prefers-color-scheme: dark)` media query: a
//!   boolean owned by the host that can change at any time, plus a list of
//!   listeners notified on change.
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use shade::SchemeQuery;
//!
//! let query = SchemeQuery::new(false);
//! let seen = Rc::new(Cell::new(false));
//! let sink = Rc::clone(&seen);
//! let _subscription = query.subscribe(move |dark| sink.set(dark));
//!
//! query.set_matches(true);
//! assert!(seen.get());
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Mutex;

use dark_light::{detect as detect_os_mode, Mode as OsMode};
use once_cell::sync::Lazy;

type SchemeDetector = fn() -> bool;

static SCHEME_DETECTOR: Lazy<Mutex<SchemeDetector>> = Lazy::new(|| Mutex::new(os_scheme_detector));

/// Overrides the detector used by [`detect_prefers_dark`].
///
/// Useful for tests, or to force a mode regardless of the OS.
///
/// ```rust
/// shade::set_scheme_detector(|| true);
/// assert!(shade::detect_prefers_dark());
/// shade::reset_scheme_detector();
/// ```
pub fn set_scheme_detector(detector: SchemeDetector) {
    let mut guard = SCHEME_DETECTOR.lock().unwrap_or_else(|e| e.into_inner());
    *guard = detector;
}

/// Restores OS detection.
pub fn reset_scheme_detector() {
    set_scheme_detector(os_scheme_detector);
}

/// Returns `true` when the host prefers a dark color scheme.
pub fn detect_prefers_dark() -> bool {
    let detector = SCHEME_DETECTOR.lock().unwrap_or_else(|e| e.into_inner());
    (*detector)()
}

fn os_scheme_detector() -> bool {
    match detect_os_mode() {
        Ok(OsMode::Dark) => true,
        Ok(OsMode::Light | OsMode::Unspecified) => false,
        Err(err) => {
            tracing::debug!(error = ?err, "color scheme detection failed, assuming light");
            false
        }
    }
}

type Listener = Rc<dyn Fn(bool)>;

struct QueryState {
    matches: bool,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// A subscribable "prefers dark" signal.
///
/// Cloning yields another handle to the same signal. The query is
/// single-threaded: listeners run synchronously inside [`set_matches`](Self::set_matches),
/// one after another, each to completion.
#[derive(Clone)]
pub struct SchemeQuery {
    state: Rc<RefCell<QueryState>>,
}

impl SchemeQuery {
    pub fn new(matches: bool) -> Self {
        Self {
            state: Rc::new(RefCell::new(QueryState {
                matches,
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Creates a query seeded from [`detect_prefers_dark`].
    pub fn from_os() -> Self {
        Self::new(detect_prefers_dark())
    }

    /// Current value of the signal.
    pub fn matches(&self) -> bool {
        self.state.borrow().matches
    }

    /// Updates the signal, notifying listeners if the value changed.
    pub fn set_matches(&self, matches: bool) {
        let listeners: Vec<Listener> = {
            let mut state = self.state.borrow_mut();
            if state.matches == matches {
                return;
            }
            state.matches = matches;
            state.listeners.iter().map(|(_, l)| Rc::clone(l)).collect()
        };

        tracing::debug!(prefers_dark = matches, listeners = listeners.len(), "color scheme changed");
        for listener in listeners {
            listener(matches);
        }
    }

    /// Registers a change listener.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// dropped or explicitly unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(bool) + 'static,
    {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.push((id, Rc::new(listener)));
        Subscription {
            state: Rc::downgrade(&self.state),
            id,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }
}

impl fmt::Debug for SchemeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SchemeQuery")
            .field("matches", &state.matches)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

/// Handle to a registered listener. Unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    state: Weak<RefCell<QueryState>>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        // The listener is dropped after the borrow ends; it may own other subscriptions.
        let removed = {
            let mut state = state.borrow_mut();
            let position = state.listeners.iter().position(|(id, _)| *id == self.id);
            position.map(|pos| state.listeners.remove(pos))
        };
        drop(removed);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("live", &(self.state.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::cell::Cell;

    #[test]
    #[serial]
    fn test_set_scheme_detector_override() {
        set_scheme_detector(|| true);
        assert!(detect_prefers_dark());

        set_scheme_detector(|| false);
        assert!(!detect_prefers_dark());

        reset_scheme_detector();
    }

    #[test]
    #[serial]
    fn test_from_os_uses_detector() {
        set_scheme_detector(|| true);
        assert!(SchemeQuery::from_os().matches());
        reset_scheme_detector();
    }

    #[test]
    fn test_listener_sees_change() {
        let query = SchemeQuery::new(false);
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let _sub = query.subscribe(move |_| counter.set(counter.get() + 1));

        query.set_matches(true);
        query.set_matches(false);
        assert_eq!(calls.get(), 2);
        assert!(!query.matches());
    }

    #[test]
    fn test_same_value_is_not_a_change() {
        let query = SchemeQuery::new(true);
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let _sub = query.subscribe(move |_| counter.set(counter.get() + 1));

        query.set_matches(true);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_listeners_run_in_subscription_order() {
        let query = SchemeQuery::new(false);
        let order = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&order);
        let second = Rc::clone(&order);
        let _a = query.subscribe(move |_| first.borrow_mut().push("a"));
        let _b = query.subscribe(move |_| second.borrow_mut().push("b"));

        query.set_matches(true);
        assert_eq!(*order.borrow(), ["a", "b"]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let query = SchemeQuery::new(false);
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let sub = query.subscribe(move |_| counter.set(counter.get() + 1));
        assert_eq!(query.listener_count(), 1);

        sub.unsubscribe();
        assert_eq!(query.listener_count(), 0);

        query.set_matches(true);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_subscription_outliving_query() {
        let query = SchemeQuery::new(false);
        let sub = query.subscribe(|_| {});
        drop(query);
        drop(sub);
    }

    #[test]
    fn test_listener_may_subscribe_during_notification() {
        let query = SchemeQuery::new(false);
        let inner_query = query.clone();
        let extra = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&extra);
        let _sub = query.subscribe(move |_| {
            sink.borrow_mut().push(inner_query.subscribe(|_| {}));
        });

        query.set_matches(true);
        assert_eq!(query.listener_count(), 2);
    }
}
