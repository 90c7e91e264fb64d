//! Shared component rendering context
//!
//! `ComponentContext` carries UI metadata that widgets need during rendering
//! and event handling: whether they hold focus, whether they are enabled, and
//! the theme definition resolved for their position in the tree. Centralizing
//! it keeps the widget trait stable and spares widgets from looking anything
//! up themselves.

use ratatui::style::Style;

use crate::theme::ThemeDefinition;

/// Context passed to `Widget` trait methods describing UI state.
///
/// - `focused`: whether the widget is the focused interactable of its pane.
/// - `enabled`: whether the widget accepts focus and input.
/// - `theme`: the definition resolved for the widget's theme class.
#[derive(Debug, Clone, Copy)]
pub struct ComponentContext {
    focused: bool,
    enabled: bool,
    theme: ThemeDefinition,
}

impl ComponentContext {
    /// Create a new `ComponentContext` with the given focus state.
    pub fn new(focused: bool) -> Self {
        Self {
            focused,
            enabled: true,
            theme: ThemeDefinition::default(),
        }
    }

    /// Returns whether the widget is focused.
    pub const fn focused(&self) -> bool {
        self.focused
    }

    /// Returns whether the widget is enabled.
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    pub const fn theme(&self) -> &ThemeDefinition {
        &self.theme
    }

    /// The style a widget in this state should draw its body with.
    pub fn style(&self) -> Style {
        self.theme.style_for(self.focused, self.enabled)
    }

    /// Return a new `ComponentContext` with a modified `focused` flag.
    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Return a new `ComponentContext` with a modified `enabled` flag.
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub const fn with_theme(mut self, theme: ThemeDefinition) -> Self {
        self.theme = theme;
        self
    }
}

impl Default for ComponentContext {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_tracks_focus_and_enabled_state() {
        let theme = ThemeDefinition::default();
        let ctx = ComponentContext::new(false).with_theme(theme);
        assert_eq!(ctx.style(), theme.normal);
        assert_eq!(ctx.with_focus(true).style(), theme.active);
        assert_eq!(
            ctx.with_focus(true).with_enabled(false).style(),
            theme.insensitive
        );
    }
}
