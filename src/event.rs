//! The input event shape consumed by panes and the compositor.
//!
//! Key and mouse payloads are crossterm's own types; `Eof` is the terminal
//! signal a screen (or the compositor) produces when no more input can ever
//! arrive.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Eof,
}

impl InputEvent {
    /// Convert a raw crossterm event. Events the toolkit does not route
    /// (focus reports, bracketed paste) map to `None`.
    pub fn from_crossterm(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) => Some(Self::Key(key)),
            Event::Mouse(mouse) => Some(Self::Mouse(mouse)),
            Event::Resize(cols, rows) => Some(Self::Resize(cols, rows)),
            _ => None,
        }
    }

    pub fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    pub fn key_with(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self::Key(KeyEvent::new(code, modifiers))
    }

    pub fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Self {
        Self::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    pub fn mouse_down(column: u16, row: u16) -> Self {
        Self::mouse(MouseEventKind::Down(MouseButton::Left), column, row)
    }

    pub fn mouse_drag(column: u16, row: u16) -> Self {
        Self::mouse(MouseEventKind::Drag(MouseButton::Left), column, row)
    }

    pub fn mouse_up(column: u16, row: u16) -> Self {
        Self::mouse(MouseEventKind::Up(MouseButton::Left), column, row)
    }

    pub fn is_mouse(&self) -> bool {
        matches!(self, Self::Mouse(_))
    }

    pub fn is_mouse_down(&self) -> bool {
        matches!(
            self,
            Self::Mouse(MouseEvent {
                kind: MouseEventKind::Down(_),
                ..
            })
        )
    }

    pub fn mouse_position(&self) -> Option<Position> {
        match self {
            Self::Mouse(mouse) => Some(Position::new(mouse.column, mouse.row)),
            _ => None,
        }
    }

    /// Same event with its pointer coordinates replaced. Non-mouse events are
    /// returned unchanged.
    pub fn with_mouse_position(&self, position: Position) -> Self {
        match *self {
            Self::Mouse(mouse) => Self::Mouse(MouseEvent {
                column: position.x,
                row: position.y,
                ..mouse
            }),
            other => other,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}
