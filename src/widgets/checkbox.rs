use ratatui::layout::{Position, Rect, Size};

use crate::component::{ComponentContext, Widget, default_navigation};
use crate::event::InputEvent;
use crate::focus::InputResult;
use crate::keybindings::{Action, KeyBindings};
use crate::ui::UiFrame;
use crate::widgets::{is_left_click, text_width};

type ToggleListener = Box<dyn FnMut(bool)>;

/// `[x] label` toggle. The cursor sits inside the brackets.
pub struct CheckBox {
    label: String,
    checked: bool,
    listeners: Vec<ToggleListener>,
}

impl CheckBox {
    pub fn new<T: Into<String>>(label: T) -> Self {
        Self {
            label: label.into(),
            checked: false,
            listeners: Vec::new(),
        }
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn on_toggle(mut self, listener: impl FnMut(bool) + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        if self.checked == checked {
            return;
        }
        self.checked = checked;
        for listener in &mut self.listeners {
            listener(checked);
        }
    }

    pub fn toggle(&mut self) {
        self.set_checked(!self.checked);
    }
}

impl Widget for CheckBox {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let style = ctx.style();
        frame.fill(area, style);
        let mark = if self.checked { 'x' } else { ' ' };
        let text = format!("[{mark}] {}", self.label);
        frame.set_string(area.x, area.y, &text, style);
    }

    fn preferred_size(&self) -> Size {
        Size::new(text_width(&self.label).saturating_add(4), 1)
    }

    fn cursor_location(&self) -> Option<Position> {
        Some(Position::new(1, 0))
    }

    fn handle_input(&mut self, event: &InputEvent, _ctx: &ComponentContext) -> InputResult {
        let kb = KeyBindings::default();
        match event {
            InputEvent::Key(key) if kb.matches(Action::Toggle, key) => {
                self.toggle();
                InputResult::Handled
            }
            event if is_left_click(event) => {
                self.toggle();
                InputResult::Handled
            }
            event => default_navigation(event),
        }
    }

    fn theme_class(&self) -> &'static str {
        "checkbox"
    }
}
