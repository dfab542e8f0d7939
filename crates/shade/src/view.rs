//! Rendering surface and view synchronisation.
//!
//! The controller never touches markup directly. It talks to a [`ThemeView`],
//! and the sync functions here set every dependent affordance from two
//! values: the [`EffectiveTheme`] (drives the scheme hint and the icons) and
//! the [`ThemeChoice`] (drives option highlighting).
//!
//! [`Surface`] is an in-memory view modelling the elements the page template
//! provides: a root color-scheme attribute, a sun and a moon icon, a
//! disclosure menu holding one option control per choice.

use std::collections::BTreeMap;

use crate::choice::{EffectiveTheme, ThemeChoice};

/// The two theme indicator icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Sun,
    Moon,
}

impl Icon {
    pub const ALL: [Icon; 2] = [Icon::Sun, Icon::Moon];

    /// The icon shown for a theme: moon when dark, sun otherwise.
    pub fn for_theme(theme: EffectiveTheme) -> Self {
        if theme.is_dark() {
            Icon::Moon
        } else {
            Icon::Sun
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Icon::Sun => "sun",
            Icon::Moon => "moon",
        }
    }
}

/// The affordances a controller drives.
pub trait ThemeView {
    /// Sets the document-level color-scheme hint.
    fn apply_scheme(&mut self, theme: EffectiveTheme);

    fn set_icon_visible(&mut self, icon: Icon, visible: bool);

    /// Marks or unmarks the option control tagged with `option`.
    fn set_option_selected(&mut self, option: ThemeChoice, selected: bool);

    /// Closes the disclosure surface if it is open.
    fn close_menu(&mut self);
}

impl<V: ThemeView + ?Sized> ThemeView for &mut V {
    fn apply_scheme(&mut self, theme: EffectiveTheme) {
        (**self).apply_scheme(theme);
    }

    fn set_icon_visible(&mut self, icon: Icon, visible: bool) {
        (**self).set_icon_visible(icon, visible);
    }

    fn set_option_selected(&mut self, option: ThemeChoice, selected: bool) {
        (**self).set_option_selected(option, selected);
    }

    fn close_menu(&mut self) {
        (**self).close_menu();
    }
}

/// Shows exactly one icon: the moon when dark, the sun otherwise.
pub fn sync_icons<V: ThemeView + ?Sized>(view: &mut V, effective: EffectiveTheme) {
    let shown = Icon::for_theme(effective);
    for icon in Icon::ALL {
        view.set_icon_visible(icon, icon == shown);
    }
}

/// Selects exactly the option matching `choice`.
pub fn sync_options<V: ThemeView + ?Sized>(view: &mut V, choice: ThemeChoice) {
    for option in ThemeChoice::ALL {
        view.set_option_selected(option, option == choice);
    }
}

/// Applies the scheme hint, icons and option highlight.
pub fn sync_view<V: ThemeView + ?Sized>(view: &mut V, effective: EffectiveTheme, choice: ThemeChoice) {
    view.apply_scheme(effective);
    sync_icons(view, effective);
    sync_options(view, choice);
}

/// Root attribute carrying the color-scheme hint unless configured otherwise.
pub const DEFAULT_SCHEME_ATTRIBUTE: &str = "data-theme";

/// In-memory model of the theme switcher markup.
///
/// Before the first sync both icons are visible, no option is selected and
/// the menu is closed, matching freshly rendered markup.
///
/// ```rust
/// use shade::{sync_view, EffectiveTheme, Icon, Surface, ThemeChoice};
///
/// let mut surface = Surface::default();
/// sync_view(&mut surface, EffectiveTheme::Dark, ThemeChoice::System);
///
/// assert_eq!(surface.root_attribute("data-theme"), Some("dark"));
/// assert_eq!(surface.visible_icons(), vec![Icon::Moon]);
/// assert_eq!(surface.selected_options(), vec![ThemeChoice::System]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    scheme_attribute: String,
    root: BTreeMap<String, String>,
    sun_visible: bool,
    moon_visible: bool,
    options: [(ThemeChoice, bool); 3],
    menu_open: bool,
}

impl Surface {
    pub fn new(scheme_attribute: impl Into<String>) -> Self {
        Self {
            scheme_attribute: scheme_attribute.into(),
            root: BTreeMap::new(),
            sun_visible: true,
            moon_visible: true,
            options: ThemeChoice::ALL.map(|choice| (choice, false)),
            menu_open: false,
        }
    }

    pub fn scheme_attribute(&self) -> &str {
        &self.scheme_attribute
    }

    /// The applied scheme hint, if any has been applied.
    pub fn scheme(&self) -> Option<EffectiveTheme> {
        match self.root.get(&self.scheme_attribute).map(String::as_str) {
            Some("dark") => Some(EffectiveTheme::Dark),
            Some("light") => Some(EffectiveTheme::Light),
            _ => None,
        }
    }

    pub fn root_attribute(&self, name: &str) -> Option<&str> {
        self.root.get(name).map(String::as_str)
    }

    pub fn is_icon_visible(&self, icon: Icon) -> bool {
        match icon {
            Icon::Sun => self.sun_visible,
            Icon::Moon => self.moon_visible,
        }
    }

    pub fn visible_icons(&self) -> Vec<Icon> {
        Icon::ALL
            .into_iter()
            .filter(|icon| self.is_icon_visible(*icon))
            .collect()
    }

    pub fn is_selected(&self, choice: ThemeChoice) -> bool {
        self.options
            .iter()
            .any(|(option, selected)| *option == choice && *selected)
    }

    pub fn selected_options(&self) -> Vec<ThemeChoice> {
        self.options
            .iter()
            .filter(|(_, selected)| *selected)
            .map(|(option, _)| *option)
            .collect()
    }

    /// The toggle control: opens the menu when closed, closes it when open.
    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn open_menu(&mut self) {
        self.menu_open = true;
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEME_ATTRIBUTE)
    }
}

impl ThemeView for Surface {
    fn apply_scheme(&mut self, theme: EffectiveTheme) {
        self.root
            .insert(self.scheme_attribute.clone(), theme.as_str().to_string());
    }

    fn set_icon_visible(&mut self, icon: Icon, visible: bool) {
        match icon {
            Icon::Sun => self.sun_visible = visible,
            Icon::Moon => self.moon_visible = visible,
        }
    }

    fn set_option_selected(&mut self, option: ThemeChoice, selected: bool) {
        for (candidate, flag) in self.options.iter_mut() {
            if *candidate == option {
                *flag = selected;
            }
        }
    }

    fn close_menu(&mut self) {
        self.menu_open = false;
    }
}
