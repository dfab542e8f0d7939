//! Text rendering of the switcher state.

use console::style;
use minijinja::Environment;
use serde::Serialize;

use shade::{EffectiveTheme, Icon, PreferenceStore, Surface, ThemeChoice, ThemeController};

const STATUS_TEMPLATE: &str = r#"{{ icon }} {{ effective }} (choice: {{ choice }}, host: {{ host }})
{% for option in options %}
{{ "*" if option.selected else " " }} {{ option.value }}
{% endfor %}
store: {{ store }}"#;

#[derive(Debug, Serialize)]
struct OptionRow {
    value: &'static str,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct StatusContext {
    icon: String,
    effective: EffectiveTheme,
    choice: ThemeChoice,
    host: &'static str,
    options: Vec<OptionRow>,
    store: String,
}

/// Glyph for an icon, styled when colors are enabled.
pub fn icon_glyph(icon: Icon) -> String {
    match icon {
        Icon::Sun => style("\u{2600}").yellow().to_string(),
        Icon::Moon => style("\u{263E}").cyan().to_string(),
    }
}

/// Renders the controller's surface as a short status block.
pub fn render_status<S: PreferenceStore>(
    controller: &ThemeController<S, Surface>,
    store_label: &str,
) -> Result<String, minijinja::Error> {
    let surface = controller.view();
    let icon = surface
        .visible_icons()
        .first()
        .copied()
        .unwrap_or_else(|| Icon::for_theme(controller.effective()));

    let context = StatusContext {
        icon: icon_glyph(icon),
        effective: controller.effective(),
        choice: controller.choice(),
        host: if controller.prefers_dark() { "dark" } else { "light" },
        options: ThemeChoice::ALL
            .into_iter()
            .map(|choice| OptionRow {
                value: choice.as_str(),
                selected: surface.is_selected(choice),
            })
            .collect(),
        store: store_label.to_string(),
    };

    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_template("status", STATUS_TEMPLATE)?;
    env.get_template("status")?.render(&context)
}
