//! Theme choice and effective theme resolution.
//!
//! A [`ThemeChoice`] is what the user picked (or the `System` default). An
//! [`EffectiveTheme`] is what actually gets displayed. The two are linked by
//! [`resolve`], which consults the host color-scheme signal only when the
//! choice is `System`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseChoiceError;

/// The user's theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    Light,
    Dark,
    /// Follow the host color scheme. This is the default when nothing is stored.
    #[default]
    System,
}

impl ThemeChoice {
    /// All choices, in the order the option controls are presented.
    pub const ALL: [ThemeChoice; 3] = [ThemeChoice::Light, ThemeChoice::Dark, ThemeChoice::System];

    /// The literal used in markup tags and storage.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeChoice::Light => "light",
            ThemeChoice::Dark => "dark",
            ThemeChoice::System => "system",
        }
    }

    /// Strict parse: only the three exact literals are accepted.
    ///
    /// No case folding and no trimming; `" dark"` is not `Dark`.
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "light" => Some(ThemeChoice::Light),
            "dark" => Some(ThemeChoice::Dark),
            "system" => Some(ThemeChoice::System),
            _ => None,
        }
    }

    /// Lenient parse used at every entry point. Anything unrecognised is `System`.
    pub fn from_value_or_system(value: &str) -> Self {
        Self::from_value(value).unwrap_or_default()
    }

    /// The value written to storage, or `None` when the key should be removed.
    pub fn stored_value(self) -> Option<&'static str> {
        match self {
            ThemeChoice::System => None,
            explicit => Some(explicit.as_str()),
        }
    }

    pub fn is_system(self) -> bool {
        self == ThemeChoice::System
    }
}

impl fmt::Display for ThemeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeChoice {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_value(s).ok_or_else(|| ParseChoiceError(s.to_string()))
    }
}

/// The theme that is actually displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveTheme {
    Light,
    Dark,
}

impl EffectiveTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            EffectiveTheme::Light => "light",
            EffectiveTheme::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == EffectiveTheme::Dark
    }
}

impl fmt::Display for EffectiveTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves the displayed theme from the user's choice and the host signal.
///
/// ```rust
/// use shade::{resolve, EffectiveTheme, ThemeChoice};
///
/// assert_eq!(resolve(ThemeChoice::System, true), EffectiveTheme::Dark);
/// assert_eq!(resolve(ThemeChoice::Light, true), EffectiveTheme::Light);
/// ```
pub fn resolve(choice: ThemeChoice, prefers_dark: bool) -> EffectiveTheme {
    match choice {
        ThemeChoice::Light => EffectiveTheme::Light,
        ThemeChoice::Dark => EffectiveTheme::Dark,
        ThemeChoice::System if prefers_dark => EffectiveTheme::Dark,
        ThemeChoice::System => EffectiveTheme::Light,
    }
}
