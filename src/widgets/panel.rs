use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::component::{ComponentContext, Widget};
use crate::event::InputEvent;
use crate::keybindings::KeyCombo;
use crate::ui::UiFrame;

type Shortcut = (KeyCombo, Box<dyn FnMut()>);

/// Background for a container. Paints its area and owns the container's
/// keyboard shortcuts, which fire when a focused descendant leaves a key
/// unhandled.
#[derive(Default)]
pub struct Panel {
    style: Option<Style>,
    theme_class: Option<&'static str>,
    shortcuts: Vec<Shortcut>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_theme_class(mut self, class: &'static str) -> Self {
        self.theme_class = Some(class);
        self
    }

    pub fn with_shortcut(mut self, combo: KeyCombo, action: impl FnMut() + 'static) -> Self {
        self.add_shortcut(combo, action);
        self
    }

    pub fn add_shortcut(&mut self, combo: KeyCombo, action: impl FnMut() + 'static) {
        self.shortcuts.push((combo, Box::new(action)));
    }
}

impl Widget for Panel {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let style = self.style.unwrap_or(ctx.theme().normal);
        frame.fill(area, style);
    }

    fn handle_shortcut(&mut self, event: &InputEvent) -> bool {
        let InputEvent::Key(key) = event else {
            return false;
        };
        for (combo, action) in &mut self.shortcuts {
            if combo.matches(key) {
                tracing::debug!(shortcut = %combo, "panel shortcut fired");
                action();
                return true;
            }
        }
        false
    }

    fn theme_class(&self) -> &'static str {
        self.theme_class.unwrap_or("panel")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn shortcut_matches_exact_combo() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let mut panel = Panel::new().with_shortcut(
            KeyCombo::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
            move || counter.set(counter.get() + 1),
        );
        assert!(panel.handle_shortcut(&InputEvent::key_with(
            KeyCode::Char('s'),
            KeyModifiers::CONTROL
        )));
        assert!(!panel.handle_shortcut(&InputEvent::key(KeyCode::Char('s'))));
        assert!(!panel.handle_shortcut(&InputEvent::mouse_down(0, 0)));
        assert_eq!(hits.get(), 1);
    }
}
