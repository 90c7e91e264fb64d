use std::any::Any;

use ratatui::layout::{Position, Rect, Size};

use crate::event::InputEvent;
use crate::focus::InputResult;
use crate::keybindings::KeyBindings;
use crate::ui::UiFrame;

pub mod context;
pub mod tree;

pub use context::ComponentContext;
pub use tree::{ComponentTree, Interactable, NodeId, NodeKind};

/// Behavior of a node in the component tree: how it paints itself, how big
/// it wants to be, and (for interactables) how it reacts to input.
///
/// Structure (parent, children, focus) lives in the [`ComponentTree`]; a
/// widget only sees its own state plus the [`ComponentContext`] the tree
/// hands it.
pub trait Widget {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn preferred_size(&self) -> Size {
        Size::new(1, 1)
    }

    /// Where the terminal cursor should sit while this widget is focused, in
    /// widget-local coordinates. `None` hides the cursor.
    fn cursor_location(&self) -> Option<Position> {
        None
    }

    /// Input delivered to the focused interactable. Mouse coordinates arrive
    /// rebased to the widget's top-left corner.
    fn handle_input(&mut self, event: &InputEvent, _ctx: &ComponentContext) -> InputResult {
        default_navigation(event)
    }

    /// Raw input bubbling up from an unhandled descendant. Containers return
    /// true to consume it.
    fn handle_shortcut(&mut self, _event: &InputEvent) -> bool {
        false
    }

    /// For single-child composites: the part of `area` given to the child.
    fn content_area(&self, area: Rect) -> Rect {
        area
    }

    /// For single-child composites: columns and rows added around the
    /// child's preferred size.
    fn decoration_size(&self) -> Size {
        Size::ZERO
    }

    fn theme_class(&self) -> &'static str {
        "default"
    }
}

/// Object-safe downcasting for widgets stored in the tree.
pub trait AnyWidget: Widget + Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Widget + Any> AnyWidget for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The navigation keys every interactable understands unless it overrides
/// `handle_input`: tab order keys and arrows request focus movement.
pub fn default_navigation(event: &InputEvent) -> InputResult {
    let InputEvent::Key(key) = event else {
        return InputResult::Unhandled;
    };
    match KeyBindings::default().focus_direction_for(key) {
        Some(direction) => InputResult::MoveFocus(direction),
        None => InputResult::Unhandled,
    }
}
