use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use ratatui::style::{Color, Modifier, Style};

// Centralized theme colors. Widgets never name colors directly; they ask
// their `ComponentContext` for the definition resolved for their class.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);

pub fn accent() -> Color {
    Color::Rgb(ACCENT_RGB.0, ACCENT_RGB.1, ACCENT_RGB.2)
}

// Panel / window body
pub fn panel_bg() -> Color {
    Color::Gray
}
pub fn panel_fg() -> Color {
    Color::Black
}
pub fn panel_inactive_fg() -> Color {
    Color::DarkGray
}

// Interactables
pub fn active_bg() -> Color {
    Color::Blue
}
pub fn active_fg() -> Color {
    Color::White
}

// Menu
pub fn menu_bg() -> Color {
    Color::DarkGray
}
pub fn menu_fg() -> Color {
    Color::White
}

// Decorator
pub fn decorator_header_bg() -> Color {
    Color::Blue
}
pub fn decorator_header_fg() -> Color {
    Color::White
}
pub fn decorator_border() -> Color {
    Color::DarkGray
}

// Background pane
pub fn desktop_bg() -> Color {
    Color::Cyan
}

pub fn shadow_bg() -> Color {
    Color::Black
}

/// Styles for one widget class in each of its visual states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeDefinition {
    pub normal: Style,
    /// Hovered or otherwise highlighted without focus.
    pub prelight: Style,
    pub selected: Style,
    /// Focused.
    pub active: Style,
    /// Disabled.
    pub insensitive: Style,
}

impl ThemeDefinition {
    pub const fn uniform(style: Style) -> Self {
        Self {
            normal: style,
            prelight: style,
            selected: style,
            active: style,
            insensitive: style,
        }
    }

    pub fn style_for(&self, focused: bool, enabled: bool) -> Style {
        match (enabled, focused) {
            (false, _) => self.insensitive,
            (true, true) => self.active,
            (true, false) => self.normal,
        }
    }
}

impl Default for ThemeDefinition {
    fn default() -> Self {
        let normal = Style::default().bg(panel_bg()).fg(panel_fg());
        Self {
            normal,
            prelight: normal.add_modifier(Modifier::BOLD),
            selected: normal.fg(accent()),
            active: Style::default().bg(active_bg()).fg(active_fg()),
            insensitive: normal.fg(panel_inactive_fg()),
        }
    }
}

/// A default definition plus per-class overrides keyed by the widget's
/// `theme_class`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    default: ThemeDefinition,
    classes: BTreeMap<&'static str, ThemeDefinition>,
}

impl Theme {
    pub fn new(default: ThemeDefinition) -> Self {
        Self {
            default,
            classes: BTreeMap::new(),
        }
    }

    pub fn with_class(mut self, class: &'static str, definition: ThemeDefinition) -> Self {
        self.classes.insert(class, definition);
        self
    }

    pub fn set_class(&mut self, class: &'static str, definition: ThemeDefinition) {
        self.classes.insert(class, definition);
    }

    /// Definition for `class`, falling back to the theme default.
    pub fn definition(&self, class: &str) -> ThemeDefinition {
        self.classes.get(class).copied().unwrap_or(self.default)
    }
}

impl Default for Theme {
    fn default() -> Self {
        let base = ThemeDefinition::default();
        let menu = Style::default().bg(menu_bg()).fg(menu_fg());
        let title = Style::default()
            .bg(decorator_header_bg())
            .fg(decorator_header_fg())
            .add_modifier(Modifier::BOLD);
        let frame = Style::default().bg(panel_bg()).fg(decorator_border());
        Self::new(base)
            .with_class(
                "menu",
                ThemeDefinition {
                    normal: menu,
                    prelight: menu.add_modifier(Modifier::BOLD),
                    selected: menu.fg(accent()),
                    active: base.active,
                    insensitive: menu.fg(panel_inactive_fg()),
                },
            )
            .with_class(
                "label",
                ThemeDefinition {
                    active: base.normal,
                    ..base
                },
            )
            .with_class(
                "window",
                ThemeDefinition {
                    normal: frame,
                    prelight: frame,
                    selected: title,
                    active: title,
                    insensitive: frame.fg(panel_inactive_fg()),
                },
            )
            .with_class(
                "desktop",
                ThemeDefinition::uniform(Style::default().bg(desktop_bg()).fg(Color::Black)),
            )
            .with_class(
                "shadow",
                ThemeDefinition::uniform(Style::default().bg(shadow_bg()).fg(Color::DarkGray)),
            )
    }
}

/// Process-wide fallback used when neither a node, its ancestors, nor its
/// pane carry a theme.
pub fn default_theme() -> Arc<Theme> {
    static DEFAULT: OnceLock<Arc<Theme>> = OnceLock::new();
    Arc::clone(DEFAULT.get_or_init(|| Arc::new(Theme::default())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_returns_an_rgb_color() {
        match accent() {
            Color::Rgb(_, _, _) => {}
            other => panic!("unexpected color variant {other:?}"),
        }
    }

    #[test]
    fn unknown_classes_fall_back_to_default() {
        let theme = Theme::default();
        assert_eq!(theme.definition("no-such-class"), ThemeDefinition::default());
        assert_ne!(theme.definition("menu"), ThemeDefinition::default());
    }

    #[test]
    fn default_theme_is_shared() {
        assert!(Arc::ptr_eq(&default_theme(), &default_theme()));
    }
}
