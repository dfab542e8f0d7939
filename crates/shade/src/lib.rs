//! # Shade - Light, Dark and System Themes
//!
//! `shade` resolves which theme to display from two inputs, the user's
//! explicit choice and the host's color-scheme preference, applies it to a
//! rendering surface, and persists the choice under a single storage key.
//!
//! ## Core Concepts
//!
//! - [`ThemeChoice`]: `Light`, `Dark` or `System` (the default when nothing is stored)
//! - [`EffectiveTheme`]: what is displayed, `Light` or `Dark`
//! - [`resolve`]: the pure function from (choice, host signal) to effective theme
//! - [`ThemeController`]: owns the state; `initialize`, `select_theme`, `on_scheme_change`
//! - [`PreferenceStore`]: where the choice is persisted ([`FileStore`], [`MemoryStore`])
//! - [`ThemeView`]: the affordances kept in sync (scheme hint, sun/moon icons, options)
//! - [`SchemeQuery`]: a subscribable "prefers dark" signal
//!
//! ## Quick Start
//!
//! ```rust
//! use shade::{EffectiveTheme, Icon, MemoryStore, ShadeConfig, Surface, ThemeChoice, ThemeController};
//!
//! let config = ShadeConfig::default();
//! let mut controller = ThemeController::initialize(&config, MemoryStore::new(), Surface::default(), false);
//! assert_eq!(controller.choice(), ThemeChoice::System);
//! assert_eq!(controller.effective(), EffectiveTheme::Light);
//!
//! controller.select_theme(ThemeChoice::Dark);
//! assert_eq!(controller.store().entry("theme"), Some("dark"));
//! assert_eq!(controller.view().visible_icons(), vec![Icon::Moon]);
//!
//! // An explicit choice ignores the host signal.
//! controller.on_scheme_change(false);
//! assert_eq!(controller.effective(), EffectiveTheme::Dark);
//! ```
//!
//! ## Persistence
//!
//! Only `"light"` and `"dark"` are ever written. Selecting `System` removes
//! the key. Anything else found in storage, or a store that cannot be read,
//! is treated as `System`. Write failures are logged through `tracing` and
//! never prevent the theme from being applied.
//!
//! ## Host Signal
//!
//! [`detect_prefers_dark`] asks the OS; override it for tests with
//! [`set_scheme_detector`]. A [`ThemeWidget`] subscribes a controller to a
//! [`SchemeQuery`] so that `System` follows host changes as they happen.

mod choice;
mod config;
mod controller;
mod error;
mod scheme;
mod storage;
mod view;

pub use choice::{resolve, EffectiveTheme, ThemeChoice};
pub use config::{ShadeConfig, ENV_SCHEME_ATTRIBUTE, ENV_STORAGE_KEY, ENV_STORE};
pub use controller::{ThemeController, ThemeWidget};
pub use error::{ConfigError, ParseChoiceError, StorageError};
pub use scheme::{
    detect_prefers_dark, reset_scheme_detector, set_scheme_detector, SchemeQuery, Subscription,
};
pub use storage::{
    load_choice, persist_choice, FileStore, MemoryStore, PreferenceStore, DEFAULT_STORAGE_KEY,
};
pub use view::{
    sync_icons, sync_options, sync_view, Icon, Surface, ThemeView, DEFAULT_SCHEME_ATTRIBUTE,
};
