//! Integration tests for the theme controller.
//!
//! These drive the controller through the public API only, using the
//! in-memory store and surface so that no OS state is involved.

use shade::{
    resolve, EffectiveTheme, FileStore, Icon, MemoryStore, PreferenceStore, SchemeQuery,
    ShadeConfig, Surface, ThemeChoice, ThemeController, ThemeWidget,
};

fn init(store: MemoryStore, prefers_dark: bool) -> ThemeController<MemoryStore, Surface> {
    ThemeController::initialize(&ShadeConfig::default(), store, Surface::default(), prefers_dark)
}

fn reload(
    controller: ThemeController<MemoryStore, Surface>,
    prefers_dark: bool,
) -> ThemeController<MemoryStore, Surface> {
    let (store, _old_view) = controller.into_parts();
    init(store, prefers_dark)
}

// ============================================================================
// Initialization scenarios
// ============================================================================

#[test]
fn empty_storage_light_host_shows_light_with_system_selected() {
    let c = init(MemoryStore::new(), false);

    assert_eq!(c.effective(), EffectiveTheme::Light);
    assert!(c.view().is_icon_visible(Icon::Sun));
    assert!(!c.view().is_icon_visible(Icon::Moon));
    assert_eq!(c.view().selected_options(), vec![ThemeChoice::System]);
}

#[test]
fn stored_dark_light_host_shows_dark_with_dark_selected() {
    let c = init(MemoryStore::new().with_entry("theme", "dark"), false);

    assert_eq!(c.effective(), EffectiveTheme::Dark);
    assert!(c.view().is_icon_visible(Icon::Moon));
    assert!(!c.view().is_icon_visible(Icon::Sun));
    assert_eq!(c.view().selected_options(), vec![ThemeChoice::Dark]);
}

#[test]
fn malformed_stored_value_falls_back_to_system() {
    for junk in ["", "DARK", "system", "{\"mode\":1}", "light dark", " dark", "dark\n", " light "] {
        let c = init(MemoryStore::new().with_entry("theme", junk), true);
        assert_eq!(c.choice(), ThemeChoice::System, "stored {junk:?}");
        assert_eq!(c.effective(), EffectiveTheme::Dark);
    }
}

#[test]
fn unreadable_storage_initializes_as_system() {
    let c = init(MemoryStore::unavailable(), false);
    assert_eq!(c.choice(), ThemeChoice::System);
    assert_eq!(c.view().scheme(), Some(EffectiveTheme::Light));
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn select_is_idempotent() {
    let mut once = init(MemoryStore::new(), false);
    once.select_theme(ThemeChoice::Dark);

    let mut twice = init(MemoryStore::new(), false);
    twice.select_theme(ThemeChoice::Dark);
    twice.select_theme(ThemeChoice::Dark);

    assert_eq!(once.store().entry("theme"), twice.store().entry("theme"));
    assert_eq!(once.view(), twice.view());
}

#[test]
fn dark_survives_reload_regardless_of_host() {
    for host in [false, true] {
        let mut c = init(MemoryStore::new(), host);
        c.select_theme(ThemeChoice::Dark);

        for reload_host in [false, true] {
            let reloaded = reload(c, reload_host);
            assert_eq!(reloaded.effective(), EffectiveTheme::Dark);
            c = reloaded;
        }
    }
}

#[test]
fn selecting_system_removes_entry_and_reload_defaults_to_system() {
    let mut c = init(MemoryStore::new().with_entry("theme", "light"), false);
    c.select_theme(ThemeChoice::System);
    assert_eq!(c.store().entry("theme"), None);
    assert!(c.store().is_empty());

    let reloaded = reload(c, true);
    assert_eq!(reloaded.choice(), ThemeChoice::System);
    assert_eq!(reloaded.effective(), EffectiveTheme::Dark);
}

#[test]
fn full_storage_does_not_block_selection() {
    let mut c = init(MemoryStore::read_only().with_entry("theme", "light"), false);
    c.select_theme(ThemeChoice::Dark);

    assert_eq!(c.choice(), ThemeChoice::Dark);
    assert_eq!(c.view().scheme(), Some(EffectiveTheme::Dark));
    assert_eq!(c.view().selected_options(), vec![ThemeChoice::Dark]);
    assert_eq!(c.store().entry("theme"), Some("light"));
}

// ============================================================================
// Host signal
// ============================================================================

#[test]
fn explicit_choice_ignores_host_changes() {
    let mut c = init(MemoryStore::new(), false);
    c.select_theme(ThemeChoice::Light);
    let before = c.view().clone();

    c.on_scheme_change(true);
    assert_eq!(c.effective(), EffectiveTheme::Light);
    assert_eq!(c.view(), &before);

    c.on_scheme_change(false);
    assert_eq!(c.view(), &before);
}

#[test]
fn system_choice_follows_host_changes() {
    let mut c = init(MemoryStore::new(), false);
    assert_eq!(c.effective(), EffectiveTheme::Light);
    assert_eq!(c.view().visible_icons(), vec![Icon::Sun]);

    c.on_scheme_change(true);
    assert_eq!(c.effective(), EffectiveTheme::Dark);
    assert_eq!(c.view().scheme(), Some(EffectiveTheme::Dark));
    assert_eq!(c.view().visible_icons(), vec![Icon::Moon]);
    assert_eq!(c.view().selected_options(), vec![ThemeChoice::System]);
}

#[test]
fn widget_routes_query_changes() {
    let query = SchemeQuery::new(false);
    let widget = ThemeWidget::mount(
        &ShadeConfig::default(),
        MemoryStore::new(),
        Surface::default(),
        &query,
    );

    query.set_matches(true);
    assert_eq!(widget.effective(), EffectiveTheme::Dark);
    widget.with_controller(|c| assert_eq!(c.view().visible_icons(), vec![Icon::Moon]));

    widget.select_value("light");
    query.set_matches(false);
    query.set_matches(true);
    assert_eq!(widget.effective(), EffectiveTheme::Light);
}

#[test]
fn widgets_on_one_query_update_independently() {
    let query = SchemeQuery::new(false);
    let config = ShadeConfig::default();
    let follows = ThemeWidget::mount(&config, MemoryStore::new(), Surface::default(), &query);
    let pinned = ThemeWidget::mount(
        &config,
        MemoryStore::new().with_entry("theme", "light"),
        Surface::default(),
        &query,
    );

    query.set_matches(true);
    assert_eq!(follows.effective(), EffectiveTheme::Dark);
    assert_eq!(pinned.effective(), EffectiveTheme::Light);

    drop(follows);
    assert_eq!(query.listener_count(), 1);
}

// ============================================================================
// File-backed round trip
// ============================================================================

#[test]
fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    let config = ShadeConfig::default();

    let mut c = ThemeController::initialize(&config, FileStore::new(&path), Surface::default(), false);
    c.select_theme(ThemeChoice::Dark);
    drop(c);

    let c = ThemeController::initialize(&config, FileStore::new(&path), Surface::default(), false);
    assert_eq!(c.choice(), ThemeChoice::Dark);

    let mut c = c;
    c.select_theme(ThemeChoice::System);
    assert_eq!(FileStore::new(&path).get("theme").unwrap(), None);
}

#[test]
fn selection_on_corrupt_file_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, "garbage").unwrap();
    let config = ShadeConfig::default();

    let mut c = ThemeController::initialize(&config, FileStore::new(&path), Surface::default(), false);
    assert_eq!(c.choice(), ThemeChoice::System);
    c.select_theme(ThemeChoice::Dark);
    drop(c);

    let c = ThemeController::initialize(&config, FileStore::new(&path), Surface::default(), false);
    assert_eq!(c.choice(), ThemeChoice::Dark);
    assert_eq!(c.view().visible_icons(), vec![Icon::Moon]);
}

#[test]
fn padded_click_value_selects_system() {
    let mut c = init(MemoryStore::new().with_entry("theme", "dark"), false);
    assert_eq!(c.select_value(" light "), ThemeChoice::System);
    assert_eq!(c.store().entry("theme"), None);
    assert_eq!(c.view().selected_options(), vec![ThemeChoice::System]);
}

// ============================================================================
// Invariants over arbitrary event sequences
// ============================================================================

mod invariants {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Event {
        Select(ThemeChoice),
        Click(String),
        Host(bool),
        Toggle,
    }

    fn choice() -> impl Strategy<Value = ThemeChoice> {
        prop::sample::select(ThemeChoice::ALL.to_vec())
    }

    fn event() -> impl Strategy<Value = Event> {
        prop_oneof![
            choice().prop_map(Event::Select),
            "[a-z]{0,7}".prop_map(Event::Click),
            any::<bool>().prop_map(Event::Host),
            Just(Event::Toggle),
        ]
    }

    proptest! {
        #[test]
        fn view_always_matches_state(
            stored in prop::option::of("[a-z]{0,6}"),
            host in any::<bool>(),
            events in prop::collection::vec(event(), 0..40),
        ) {
            let store = match stored {
                Some(value) => MemoryStore::new().with_entry("theme", value),
                None => MemoryStore::new(),
            };
            let mut c = init(store, host);
            let mut host = host;
            let mut selected = false;

            for event in events {
                match event {
                    Event::Select(choice) => {
                        selected = true;
                        c.select_theme(choice);
                    }
                    Event::Click(value) => {
                        selected = true;
                        let picked = c.select_value(&value);
                        prop_assert_eq!(picked, ThemeChoice::from_value_or_system(&value));
                    }
                    Event::Host(dark) => {
                        host = dark;
                        c.on_scheme_change(dark);
                    }
                    Event::Toggle => c.view_mut().toggle_menu(),
                }

                let effective = resolve(c.choice(), host);
                prop_assert_eq!(c.effective(), effective);
                prop_assert_eq!(c.view().scheme(), Some(effective));
                prop_assert_eq!(c.view().visible_icons(), vec![Icon::for_theme(effective)]);
                prop_assert_eq!(c.view().selected_options(), vec![c.choice()]);
                if selected {
                    prop_assert_eq!(c.store().entry("theme"), c.choice().stored_value());
                }
            }
        }
    }
}
