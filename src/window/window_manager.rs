//! Window placement and sizing policy.
//!
//! The compositor asks its `WindowManager` to place a window once when it is
//! added and to size it again before every draw and after every terminal
//! resize. Hints on the window pick the policy; the decoration renderer in
//! effect decides how much room the frame takes.
use std::fmt::Debug;

use ratatui::layout::{Offset, Size};

use super::{Hints, Window};
use crate::constants::{
    CASCADE_OFFSET, EXPANDED_MARGIN_COLUMNS, EXPANDED_MARGIN_ROWS, EXPANDED_POSITION,
    FIRST_WINDOW_POSITION,
};

pub trait WindowManager: Debug {
    /// Assign an initial position. `newest` is the most recently added window
    /// still open, if any.
    fn on_added(&self, screen: Size, window: &mut Window, newest: Option<&Window>);

    /// Recompute decorated size (and, for hinted windows, position).
    fn prepare_window(&self, screen: Size, window: &mut Window);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultWindowManager;

impl DefaultWindowManager {
    pub fn new() -> Self {
        Self
    }
}

fn offset((x, y): (i32, i32)) -> Offset {
    Offset { x, y }
}

fn centered(screen: Size, size: Size) -> Offset {
    Offset {
        x: (screen.width as i32 - size.width as i32) / 2,
        y: (screen.height as i32 - size.height as i32) / 2,
    }
}

/// Slide `position` toward zero until `length` fits, then shrink `length`.
fn fit_axis(position: &mut i32, length: &mut u16, screen: u16) {
    let screen = screen as i32;
    while *position > 0 && *position + *length as i32 > screen {
        *position -= 1;
    }
    let room = (screen - (*position).max(0)).max(0);
    if *length as i32 > room {
        *length = room as u16;
    }
}

impl WindowManager for DefaultWindowManager {
    fn on_added(&self, screen: Size, window: &mut Window, newest: Option<&Window>) {
        let hints = window.hints();
        if hints.contains(Hints::FIXED_POSITION) {
            return;
        }
        let size = window.decoration().decorated_size(window.content_size());
        let position = match newest {
            None => offset(FIRST_WINDOW_POSITION),
            Some(_) if hints.contains(Hints::CENTERED) => centered(screen, size),
            Some(previous) => {
                let (dx, dy) = CASCADE_OFFSET;
                let cascade = Offset {
                    x: previous.position().x + dx,
                    y: previous.position().y + dy,
                };
                let overflows = cascade.x + size.width as i32 > screen.width as i32
                    || cascade.y + size.height as i32 > screen.height as i32;
                if overflows {
                    offset(FIRST_WINDOW_POSITION)
                } else {
                    cascade
                }
            }
        };
        tracing::trace!(window = %window.id(), ?position, "placed window");
        window.set_position(position);
    }

    fn prepare_window(&self, screen: Size, window: &mut Window) {
        let hints = window.hints();
        let mut position = window.position();
        let size = if hints.contains(Hints::FULL_SCREEN) {
            position = Offset { x: 0, y: 0 };
            screen
        } else if hints.contains(Hints::EXPANDED) {
            position = offset(EXPANDED_POSITION);
            Size::new(
                screen.width - EXPANDED_MARGIN_COLUMNS.min(screen.width),
                screen.height - EXPANDED_MARGIN_ROWS.min(screen.height),
            )
        } else if hints.intersects(Hints::FIT_TERMINAL_WINDOW | Hints::CENTERED) {
            let mut size = window.decoration().decorated_size(window.content_size());
            fit_axis(&mut position.x, &mut size.width, screen.width);
            fit_axis(&mut position.y, &mut size.height, screen.height);
            if hints.contains(Hints::CENTERED) {
                position = centered(screen, size);
            }
            size
        } else {
            window.decoration().decorated_size(window.content_size())
        };
        window.set_position(position);
        window.set_decorated_size(size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Label;

    const SCREEN: Size = Size {
        width: 80,
        height: 24,
    };

    fn window_with_content(hints: Hints, width: u16, height: u16) -> Window {
        let mut window = Window::new("t").with_hints(hints | Hints::FIXED_SIZE);
        window.set_size(Size::new(width, height));
        window
    }

    #[test]
    fn first_window_goes_to_one_one() {
        let mut window = window_with_content(Hints::empty(), 10, 5);
        DefaultWindowManager.on_added(SCREEN, &mut window, None);
        assert_eq!(window.position(), Offset { x: 1, y: 1 });
    }

    #[test]
    fn later_windows_cascade_and_wrap() {
        let mut first = window_with_content(Hints::empty(), 10, 5);
        first.set_position(Offset { x: 5, y: 3 });
        let mut second = window_with_content(Hints::empty(), 10, 5);
        DefaultWindowManager.on_added(SCREEN, &mut second, Some(&first));
        assert_eq!(second.position(), Offset { x: 7, y: 4 });

        first.set_position(Offset { x: 70, y: 3 });
        DefaultWindowManager.on_added(SCREEN, &mut second, Some(&first));
        assert_eq!(second.position(), Offset { x: 1, y: 1 });
    }

    #[test]
    fn fixed_position_is_left_alone() {
        let first = window_with_content(Hints::empty(), 10, 5);
        let mut window = window_with_content(Hints::FIXED_POSITION, 10, 5);
        window.set_position(Offset { x: 40, y: 12 });
        DefaultWindowManager.on_added(SCREEN, &mut window, Some(&first));
        assert_eq!(window.position(), Offset { x: 40, y: 12 });
    }

    #[test]
    fn centered_window_without_decorations() {
        let mut window = window_with_content(Hints::CENTERED | Hints::NO_DECORATIONS, 20, 10);
        DefaultWindowManager.prepare_window(SCREEN, &mut window);
        assert_eq!(window.position(), Offset { x: 30, y: 7 });
        assert_eq!(window.decorated_size(), Size::new(20, 10));
    }

    #[test]
    fn centered_window_accounts_for_frame() {
        let mut window = window_with_content(Hints::CENTERED, 20, 10);
        DefaultWindowManager.prepare_window(SCREEN, &mut window);
        assert_eq!(window.decorated_size(), Size::new(22, 12));
        assert_eq!(window.position(), Offset { x: 29, y: 6 });
    }

    #[test]
    fn full_screen_and_expanded() {
        let mut window = window_with_content(Hints::FULL_SCREEN, 5, 5);
        DefaultWindowManager.prepare_window(SCREEN, &mut window);
        assert_eq!(window.position(), Offset { x: 0, y: 0 });
        assert_eq!(window.decorated_size(), SCREEN);

        window.set_hints(Hints::EXPANDED);
        DefaultWindowManager.prepare_window(SCREEN, &mut window);
        assert_eq!(window.position(), Offset { x: 1, y: 1 });
        assert_eq!(window.decorated_size(), Size::new(76, 21));

        DefaultWindowManager.prepare_window(Size::new(2, 2), &mut window);
        assert_eq!(window.decorated_size(), Size::ZERO);
    }

    #[test]
    fn fit_terminal_slides_then_shrinks() {
        let mut window = window_with_content(Hints::FIT_TERMINAL_WINDOW | Hints::NO_DECORATIONS, 30, 10);
        window.set_position(Offset { x: 60, y: 20 });
        DefaultWindowManager.prepare_window(SCREEN, &mut window);
        assert_eq!(window.position(), Offset { x: 50, y: 14 });
        assert_eq!(window.decorated_size(), Size::new(30, 10));

        window.set_size(Size::new(100, 40));
        DefaultWindowManager.prepare_window(SCREEN, &mut window);
        assert_eq!(window.position(), Offset { x: 0, y: 0 });
        assert_eq!(window.decorated_size(), SCREEN);
    }

    #[test]
    fn plain_window_uses_pane_preference() {
        let mut window = Window::new("t");
        let pane = window.pane_mut();
        let content = pane.content();
        let label = pane.tree_mut().create_leaf(Label::new("hello"));
        pane.tree_mut().add_child(content, label).unwrap();
        window.set_position(Offset { x: 3, y: 2 });
        DefaultWindowManager.prepare_window(SCREEN, &mut window);
        assert_eq!(window.position(), Offset { x: 3, y: 2 });
        assert_eq!(window.decorated_size(), Size::new(7, 3));
    }
}
