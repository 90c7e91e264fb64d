use ratatui::layout::{Rect, Size};

use crate::component::{ComponentContext, Widget, default_navigation};
use crate::event::InputEvent;
use crate::focus::InputResult;
use crate::keybindings::{Action, KeyBindings};
use crate::ui::UiFrame;
use crate::widgets::{is_left_click, text_width};

type ButtonAction = Box<dyn FnMut()>;

/// A single-line push button drawn as `< label >`.
pub struct Button {
    label: String,
    action: Option<ButtonAction>,
    activations: usize,
    theme_class: &'static str,
}

impl Button {
    pub fn new<T: Into<String>>(label: T) -> Self {
        Self {
            label: label.into(),
            action: None,
            activations: 0,
            theme_class: "button",
        }
    }

    /// Run `action` every time the button is activated.
    pub fn with_action(mut self, action: impl FnMut() + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    pub fn with_theme_class(mut self, class: &'static str) -> Self {
        self.theme_class = class;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label<T: Into<String>>(&mut self, label: T) {
        self.label = label.into();
    }

    /// How many times the button has fired.
    pub fn activations(&self) -> usize {
        self.activations
    }

    pub fn activate(&mut self) {
        self.activations += 1;
        tracing::trace!(label = %self.label, "button activated");
        if let Some(action) = self.action.as_mut() {
            action();
        }
    }
}

impl Widget for Button {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let style = ctx.style();
        frame.fill(area, style);
        let text = format!("< {} >", self.label);
        frame.set_string(area.x, area.y, &text, style);
    }

    fn preferred_size(&self) -> Size {
        Size::new(text_width(&self.label).saturating_add(4), 1)
    }

    fn handle_input(&mut self, event: &InputEvent, _ctx: &ComponentContext) -> InputResult {
        let kb = KeyBindings::default();
        match event {
            InputEvent::Key(key)
                if kb.matches(Action::Activate, key) || kb.matches(Action::Toggle, key) =>
            {
                self.activate();
                InputResult::Handled
            }
            event if is_left_click(event) => {
                self.activate();
                InputResult::Handled
            }
            event => default_navigation(event),
        }
    }

    fn theme_class(&self) -> &'static str {
        self.theme_class
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::FocusChangeDirection;
    use crossterm::event::KeyCode;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn enter_space_and_click_activate() {
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let mut button = Button::new("OK").with_action(move || counter.set(counter.get() + 1));
        let ctx = ComponentContext::new(true);
        for event in [
            InputEvent::key(KeyCode::Enter),
            InputEvent::key(KeyCode::Char(' ')),
            InputEvent::mouse_down(0, 0),
        ] {
            assert_eq!(button.handle_input(&event, &ctx), InputResult::Handled);
        }
        assert_eq!(fired.get(), 3);
        assert_eq!(button.activations(), 3);
    }

    #[test]
    fn arrows_request_focus_moves() {
        let mut button = Button::new("OK");
        let ctx = ComponentContext::new(true);
        assert_eq!(
            button.handle_input(&InputEvent::key(KeyCode::Down), &ctx),
            InputResult::MoveFocus(FocusChangeDirection::Down)
        );
        assert_eq!(
            button.handle_input(&InputEvent::key(KeyCode::Char('x')), &ctx),
            InputResult::Unhandled
        );
    }

    #[test]
    fn preferred_size_includes_brackets() {
        assert_eq!(Button::new("OK").preferred_size(), Size::new(6, 1));
    }
}
