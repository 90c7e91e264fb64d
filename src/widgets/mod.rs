//! Stock widgets. Painting here is deliberately plain; the focus and window
//! machinery only relies on sizes, cursor locations and input results.

pub mod border;
pub mod button;
pub mod checkbox;
pub mod label;
pub mod menu;
pub mod panel;

pub use border::Border;
pub use button::Button;
pub use checkbox::CheckBox;
pub use label::Label;
pub use menu::{MenuBar, create_menu_bar};
pub use panel::Panel;

use crossterm::event::{MouseButton, MouseEventKind};

use crate::event::InputEvent;

/// Left button press, the only pointer event widgets activate on.
pub(crate) fn is_left_click(event: &InputEvent) -> bool {
    matches!(
        event,
        InputEvent::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left)
    )
}

pub(crate) fn text_width(text: &str) -> u16 {
    text.chars().count().min(u16::MAX as usize) as u16
}
