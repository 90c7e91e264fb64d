//! A composited surface (a window, or the desktop behind the windows) and the
//! per-event focus dispatch that runs inside it.

use std::sync::Arc;

use crossterm::event::{MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect, Size};

use crate::component::{ComponentTree, NodeId};
use crate::error::TreeError;
use crate::event::InputEvent;
use crate::focus::{FocusChangeDirection, InputResult, InteractableLookupMap};
use crate::keybindings::initial_focus_direction;
use crate::theme::Theme;
use crate::ui::UiFrame;

/// Hooks that see every event a pane dispatches. `before` runs ahead of
/// focus handling and can swallow the event; `after` only sees events
/// nothing else consumed.
pub trait PaneInterceptor {
    fn before(&mut self, _event: &InputEvent) -> bool {
        false
    }

    fn after(&mut self, _event: &InputEvent) -> bool {
        false
    }
}

pub struct RootPane {
    tree: ComponentTree,
    lookup: InteractableLookupMap,
    interceptors: Vec<Box<dyn PaneInterceptor>>,
    strict_focus_change: bool,
    direction_based_movements: bool,
    theme: Option<Arc<Theme>>,
    size: Size,
    /// Interactable that took the last mouse-down; receives drag and up.
    mouse_target: Option<NodeId>,
    invalid: bool,
}

impl Default for RootPane {
    fn default() -> Self {
        Self::new()
    }
}

impl RootPane {
    pub fn new() -> Self {
        Self {
            tree: ComponentTree::new(),
            lookup: InteractableLookupMap::default(),
            interceptors: Vec::new(),
            strict_focus_change: false,
            direction_based_movements: true,
            theme: None,
            size: Size::ZERO,
            mouse_target: None,
            invalid: true,
        }
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    /// Structural edits go through the tree directly. Anything that changes
    /// layout or focus is picked up by the next draw.
    pub fn tree_mut(&mut self) -> &mut ComponentTree {
        &mut self.tree
    }

    pub fn content(&self) -> NodeId {
        self.tree.content()
    }

    pub fn set_content(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.tree.set_content(id)?;
        self.invalid = true;
        Ok(())
    }

    pub fn menu_bar(&self) -> Option<NodeId> {
        self.tree.menu_bar()
    }

    pub fn set_menu_bar(&mut self, id: Option<NodeId>) -> Result<(), TreeError> {
        self.tree.set_menu_bar(id)?;
        self.invalid = true;
        Ok(())
    }

    pub fn lookup(&self) -> &InteractableLookupMap {
        &self.lookup
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn theme(&self) -> Option<&Arc<Theme>> {
        self.theme.as_ref()
    }

    pub fn set_theme(&mut self, theme: Option<Arc<Theme>>) {
        self.theme = theme;
        self.invalidate();
    }

    /// When set, an arrow key with no spatial neighbour leaves focus where it
    /// is instead of falling back to tab order.
    pub fn set_strict_focus_change(&mut self, strict: bool) {
        self.strict_focus_change = strict;
    }

    pub fn strict_focus_change(&self) -> bool {
        self.strict_focus_change
    }

    /// When cleared, arrow keys move through tab order instead of searching
    /// the lookup map.
    pub fn set_direction_based_movements(&mut self, enabled: bool) {
        self.direction_based_movements = enabled;
    }

    pub fn direction_based_movements(&self) -> bool {
        self.direction_based_movements
    }

    pub fn add_interceptor(&mut self, interceptor: impl PaneInterceptor + 'static) {
        self.interceptors.push(Box::new(interceptor));
    }

    pub fn invalidate(&mut self) {
        self.invalid = true;
        let _ = self.tree.invalidate(self.tree.content());
        if let Some(bar) = self.tree.menu_bar() {
            let _ = self.tree.invalidate(bar);
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid || self.tree.needs_redraw()
    }

    // --- focus ----------------------------------------------------------

    pub fn focused(&self) -> Option<NodeId> {
        self.tree.focused()
    }

    /// Move focus to `target`. Returns false (and changes nothing) when the
    /// target already has focus or cannot take it: disabled, not focusable,
    /// not an interactable, or not attached to this pane.
    pub fn set_focus(&mut self, target: Option<NodeId>, direction: FocusChangeDirection) -> bool {
        if target == self.tree.focused() {
            return false;
        }
        if let Some(id) = target {
            let accepts = self
                .tree
                .interactable(id)
                .is_some_and(|interactable| interactable.accepts_focus());
            if !accepts || !self.tree.is_attached(id) {
                tracing::trace!(node = ?id, "focus request ignored");
                return false;
            }
        }
        tracing::debug!(
            from = ?self.tree.focused(),
            to = ?target,
            ?direction,
            "focus transition"
        );
        self.tree.move_focus(target, direction);
        self.invalid = true;
        true
    }

    // --- dispatch -------------------------------------------------------

    /// Route one event through this pane. Mouse coordinates are pane-local.
    /// Returns whether anything consumed it.
    pub fn dispatch(&mut self, event: &InputEvent) -> bool {
        for interceptor in &mut self.interceptors {
            if interceptor.before(event) {
                return true;
            }
        }

        let handled = match event {
            InputEvent::Mouse(mouse) => self.dispatch_mouse(event, mouse),
            InputEvent::Key(_) => self.dispatch_key(event),
            InputEvent::Resize(..) | InputEvent::Eof => false,
        };
        if handled {
            self.invalid = true;
            return true;
        }

        // Every after hook sees the leftover event, even once one claims it.
        let mut consumed = false;
        for interceptor in &mut self.interceptors {
            consumed |= interceptor.after(event);
        }
        consumed
    }

    fn dispatch_mouse(&mut self, event: &InputEvent, mouse: &MouseEvent) -> bool {
        let point = Position::new(mouse.column, mouse.row);
        let target = match mouse.kind {
            MouseEventKind::Down(_) => {
                let hit = self.lookup.at(point);
                self.mouse_target = hit;
                if let Some(id) = hit
                    && self.tree.focused() != Some(id)
                {
                    self.set_focus(Some(id), FocusChangeDirection::Teleport);
                }
                hit
            }
            MouseEventKind::Drag(_) => self.mouse_target,
            MouseEventKind::Up(_) => self.mouse_target.take(),
            _ => self.lookup.at(point),
        };
        let Some(target) = target.filter(|id| self.tree.is_attached(*id)) else {
            return false;
        };
        let Some(base) = self.tree.base_position(target) else {
            return false;
        };
        let local = Position::new(
            point.x.saturating_sub(base.x),
            point.y.saturating_sub(base.y),
        );
        let localized = event.with_mouse_position(local);
        let result = self.tree.deliver_input(target, &localized, self.theme.as_ref());
        // A click that landed on an interactable counts even if the widget
        // ignores the press itself.
        result == InputResult::Handled || matches!(mouse.kind, MouseEventKind::Down(_))
    }

    fn dispatch_key(&mut self, event: &InputEvent) -> bool {
        let InputEvent::Key(key) = event else {
            return false;
        };
        let Some(focused) = self.tree.focused() else {
            let Some(direction) = initial_focus_direction(key) else {
                return false;
            };
            let target = self.initial_focus_target(direction);
            return match target {
                Some(id) => {
                    self.set_focus(Some(id), direction);
                    true
                }
                None => false,
            };
        };

        match self.tree.deliver_input(focused, event, self.theme.as_ref()) {
            InputResult::Handled => true,
            InputResult::Unhandled => self.tree.offer_to_ancestors(focused, event),
            InputResult::MoveFocus(direction) => self.move_focus_from(focused, direction),
        }
    }

    /// Menu bar first, then content.
    fn initial_focus_target(&self, direction: FocusChangeDirection) -> Option<NodeId> {
        let roots = self.tree.menu_bar().into_iter().chain([self.tree.content()]);
        for root in roots {
            let focusables = self.tree.focusables(root);
            let pick = match direction {
                FocusChangeDirection::Previous => focusables.last(),
                _ => focusables.first(),
            };
            if let Some(id) = pick {
                return Some(*id);
            }
        }
        None
    }

    fn move_focus_from(&mut self, focused: NodeId, direction: FocusChangeDirection) -> bool {
        let direction = if !self.direction_based_movements && direction.is_spatial() {
            direction.as_tab_order()
        } else {
            direction
        };
        let target = match direction {
            FocusChangeDirection::Next => self.tree.next_focus(Some(focused)),
            FocusChangeDirection::Previous => self.tree.previous_focus(Some(focused)),
            FocusChangeDirection::Up
            | FocusChangeDirection::Down
            | FocusChangeDirection::Left
            | FocusChangeDirection::Right => {
                let found = self.lookup.find_next(&self.tree, focused, direction);
                match (found, direction) {
                    (Some(id), _) => Some(id),
                    (None, FocusChangeDirection::Up) if !self.strict_focus_change => {
                        self.tree.previous_focus(Some(focused))
                    }
                    (None, FocusChangeDirection::Down) if !self.strict_focus_change => {
                        self.tree.next_focus(Some(focused))
                    }
                    (None, _) => None,
                }
            }
            FocusChangeDirection::Teleport | FocusChangeDirection::Reset => None,
        };
        match target {
            Some(id) => {
                self.set_focus(Some(id), direction);
                true
            }
            None => false,
        }
    }

    // --- drawing --------------------------------------------------------

    /// Combined preferred size of the menu bar and content.
    pub fn preferred_size(&self) -> Size {
        let content = self.tree.preferred_size(self.tree.content());
        match self.tree.menu_bar() {
            Some(bar) => {
                let bar = self.tree.preferred_size(bar);
                Size::new(
                    content.width.max(bar.width),
                    content.height.saturating_add(1),
                )
            }
            None => content,
        }
    }

    /// Lay out and paint the pane into `area` of `frame`, then rebuild the
    /// lookup map for the new geometry.
    pub fn draw(&mut self, frame: &mut UiFrame<'_>, area: Rect) -> Result<(), TreeError> {
        let size = area.as_size();
        self.size = size;
        let content = self.tree.content();
        let origin = area.as_position();
        let theme = self.theme.clone();
        match self.tree.menu_bar() {
            Some(bar) => {
                self.tree.set_position(bar, Position::ORIGIN)?;
                self.tree.layout(bar, Size::new(size.width, size.height.min(1)))?;
                self.tree.set_position(content, Position::new(0, 1))?;
                self.tree
                    .layout(content, Size::new(size.width, size.height.saturating_sub(1)))?;
                self.tree.render(content, frame, origin, theme.as_ref());
                self.tree.render(bar, frame, origin, theme.as_ref());
            }
            None => {
                self.tree.set_position(content, Position::ORIGIN)?;
                self.tree.layout(content, size)?;
                self.tree.render(content, frame, origin, theme.as_ref());
            }
        }
        self.lookup.rebuild(&self.tree, size);
        self.invalid = false;
        Ok(())
    }

    /// Cursor of the focused interactable in pane coordinates.
    pub fn cursor_position(&self) -> Option<Position> {
        let focused = self.tree.focused()?;
        let local = self.tree.cursor_location(focused)?;
        self.tree.to_base_pane(focused, local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::AbsoluteLayout;
    use crate::widgets::{Button, CheckBox, Panel, create_menu_bar};
    use crossterm::event::KeyCode;
    use ratatui::buffer::Buffer;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn draw(pane: &mut RootPane) {
        let area = Rect::new(0, 0, 30, 10);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        pane.draw(&mut frame, area).unwrap();
    }

    /// Buttons at absolute positions inside the content panel.
    fn pane_with(rects: &[Rect]) -> (RootPane, Vec<NodeId>) {
        let mut pane = RootPane::new();
        let tree = pane.tree_mut();
        let panel = tree.create_container(Panel::new(), AbsoluteLayout::new());
        let ids = rects
            .iter()
            .enumerate()
            .map(|(i, rect)| {
                let id = tree.create_interactable(Button::new(format!("{i}")));
                tree.add_child(panel, id).unwrap();
                tree.set_position(id, rect.as_position()).unwrap();
                tree.set_preferred_size(id, Some(rect.as_size())).unwrap();
                id
            })
            .collect();
        pane.set_content(panel).unwrap();
        draw(&mut pane);
        (pane, ids)
    }

    fn press(pane: &mut RootPane, code: KeyCode) -> bool {
        pane.dispatch(&InputEvent::key(code))
    }

    #[test]
    fn first_navigation_key_picks_initial_focus() {
        let (mut pane, ids) = pane_with(&[Rect::new(0, 0, 4, 1), Rect::new(0, 2, 4, 1)]);
        assert!(!press(&mut pane, KeyCode::Char('q')));
        assert_eq!(pane.focused(), None);
        assert!(press(&mut pane, KeyCode::Up));
        assert_eq!(pane.focused(), Some(ids[1]));
    }

    #[test]
    fn menu_bar_takes_initial_focus_before_content() {
        let (mut pane, _) = pane_with(&[Rect::new(0, 0, 4, 1)]);
        let bar = create_menu_bar(pane.tree_mut(), [("File".to_string(), || {})]);
        pane.set_menu_bar(Some(bar)).unwrap();
        draw(&mut pane);
        assert!(press(&mut pane, KeyCode::Tab));
        assert_eq!(pane.focused(), Some(pane.tree().children(bar)[0]));
    }

    #[test]
    fn tab_wraps_and_one_transition_per_event() {
        let (mut pane, ids) = pane_with(&[Rect::new(0, 0, 4, 1), Rect::new(6, 0, 4, 1)]);
        let transitions = Rc::new(RefCell::new(0));
        for id in &ids {
            let counter = Rc::clone(&transitions);
            pane.tree_mut()
                .add_focus_listener(*id, move |event| {
                    if matches!(event, crate::focus::FocusEvent::Gained { .. }) {
                        *counter.borrow_mut() += 1;
                    }
                })
                .unwrap();
        }
        press(&mut pane, KeyCode::Tab);
        press(&mut pane, KeyCode::Tab);
        press(&mut pane, KeyCode::Tab);
        assert_eq!(pane.focused(), Some(ids[0]));
        assert_eq!(*transitions.borrow(), 3);
        press(&mut pane, KeyCode::BackTab);
        assert_eq!(pane.focused(), Some(ids[1]));
    }

    #[test]
    fn arrows_use_the_lookup_map_with_tab_fallback() {
        // a   b
        //
        //     c
        let (mut pane, ids) = pane_with(&[
            Rect::new(0, 0, 4, 1),
            Rect::new(8, 0, 4, 1),
            Rect::new(8, 3, 4, 1),
        ]);
        pane.set_focus(Some(ids[1]), FocusChangeDirection::Teleport);
        assert!(press(&mut pane, KeyCode::Down));
        assert_eq!(pane.focused(), Some(ids[2]));
        // Nothing below c: relaxed mode falls back to tab order (wraps to a).
        assert!(press(&mut pane, KeyCode::Down));
        assert_eq!(pane.focused(), Some(ids[0]));
        // Left has no fallback.
        assert!(!press(&mut pane, KeyCode::Left));
        assert_eq!(pane.focused(), Some(ids[0]));
    }

    #[test]
    fn strict_mode_keeps_focus_when_no_neighbour() {
        let (mut pane, ids) = pane_with(&[Rect::new(0, 0, 4, 1), Rect::new(8, 0, 4, 1)]);
        pane.set_strict_focus_change(true);
        pane.set_focus(Some(ids[0]), FocusChangeDirection::Teleport);
        assert!(!press(&mut pane, KeyCode::Down));
        assert_eq!(pane.focused(), Some(ids[0]));
    }

    #[test]
    fn direction_movements_off_turns_arrows_into_tab_order() {
        let (mut pane, ids) = pane_with(&[Rect::new(0, 0, 4, 1), Rect::new(8, 0, 4, 1)]);
        pane.set_direction_based_movements(false);
        pane.set_focus(Some(ids[0]), FocusChangeDirection::Teleport);
        assert!(press(&mut pane, KeyCode::Right));
        assert_eq!(pane.focused(), Some(ids[1]));
        assert!(press(&mut pane, KeyCode::Up));
        assert_eq!(pane.focused(), Some(ids[0]));
    }

    #[test]
    fn disabled_targets_are_ignored() {
        let (mut pane, ids) = pane_with(&[Rect::new(0, 0, 4, 1)]);
        pane.tree_mut().set_enabled(ids[0], false).unwrap();
        assert!(!pane.set_focus(Some(ids[0]), FocusChangeDirection::Teleport));
        assert_eq!(pane.focused(), None);
    }

    #[test]
    fn mouse_down_focuses_and_delivers_local_coordinates() {
        let (mut pane, ids) = pane_with(&[Rect::new(2, 1, 6, 1), Rect::new(2, 4, 6, 1)]);
        assert!(pane.dispatch(&InputEvent::mouse_down(5, 4)));
        assert_eq!(pane.focused(), Some(ids[1]));
        assert_eq!(pane.tree().widget::<Button>(ids[1]).unwrap().activations(), 1);
        assert!(!pane.dispatch(&InputEvent::mouse_down(20, 8)));
        assert_eq!(pane.focused(), Some(ids[1]));
    }

    #[test]
    fn unhandled_keys_bubble_to_container_shortcuts() {
        let mut pane = RootPane::new();
        let fired = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&fired);
        let tree = pane.tree_mut();
        let panel = tree.create_container(
            Panel::new().with_shortcut(
                crate::keybindings::KeyCombo::new(
                    KeyCode::Char('q'),
                    crossterm::event::KeyModifiers::NONE,
                ),
                move || *flag.borrow_mut() = true,
            ),
            AbsoluteLayout::new(),
        );
        let check = tree.create_interactable(CheckBox::new("x"));
        tree.add_child(panel, check).unwrap();
        pane.set_content(panel).unwrap();
        draw(&mut pane);
        pane.set_focus(Some(check), FocusChangeDirection::Teleport);
        assert!(press(&mut pane, KeyCode::Char('q')));
        assert!(*fired.borrow());
        assert!(!press(&mut pane, KeyCode::Char('z')));
    }

    struct Swallow {
        before: bool,
        after_calls: Rc<RefCell<usize>>,
    }

    impl PaneInterceptor for Swallow {
        fn before(&mut self, _event: &InputEvent) -> bool {
            self.before
        }

        fn after(&mut self, _event: &InputEvent) -> bool {
            *self.after_calls.borrow_mut() += 1;
            true
        }
    }

    #[test]
    fn interceptors_wrap_dispatch() {
        let (mut pane, _) = pane_with(&[Rect::new(0, 0, 4, 1)]);
        let calls = Rc::new(RefCell::new(0));
        pane.add_interceptor(Swallow {
            before: false,
            after_calls: Rc::clone(&calls),
        });
        // Unhandled key reaches the after hook, which claims it.
        assert!(press(&mut pane, KeyCode::Char('z')));
        assert_eq!(*calls.borrow(), 1);
        // Handled keys never reach it.
        assert!(press(&mut pane, KeyCode::Tab));
        assert_eq!(*calls.borrow(), 1);

        let (mut blocked, _) = pane_with(&[Rect::new(0, 0, 4, 1)]);
        blocked.add_interceptor(Swallow {
            before: true,
            after_calls: Rc::clone(&calls),
        });
        assert!(press(&mut blocked, KeyCode::Tab));
        assert_eq!(blocked.focused(), None);
    }

    struct Tagged {
        tag: u8,
        seen: Rc<RefCell<Vec<u8>>>,
    }

    impl PaneInterceptor for Tagged {
        fn after(&mut self, _event: &InputEvent) -> bool {
            self.seen.borrow_mut().push(self.tag);
            true
        }
    }

    #[test]
    fn every_after_hook_sees_an_unhandled_event() {
        let (mut pane, _) = pane_with(&[Rect::new(0, 0, 4, 1)]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        for tag in [1, 2] {
            pane.add_interceptor(Tagged {
                tag,
                seen: Rc::clone(&seen),
            });
        }
        assert!(press(&mut pane, KeyCode::Char('z')));
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn removing_focused_node_leaves_pane_unfocused() {
        let (mut pane, ids) = pane_with(&[Rect::new(0, 0, 4, 1), Rect::new(0, 2, 4, 1)]);
        pane.set_focus(Some(ids[0]), FocusChangeDirection::Teleport);
        pane.tree_mut().remove(ids[0]).unwrap();
        assert_eq!(pane.focused(), None);
        draw(&mut pane);
        assert!(press(&mut pane, KeyCode::Tab));
        assert_eq!(pane.focused(), Some(ids[1]));
    }

    #[test]
    fn cursor_maps_to_pane_coordinates() {
        let mut pane = RootPane::new();
        let tree = pane.tree_mut();
        let panel = tree.create_container(Panel::new(), AbsoluteLayout::new());
        let check = tree.create_interactable(CheckBox::new("x"));
        tree.add_child(panel, check).unwrap();
        tree.set_position(check, Position::new(3, 2)).unwrap();
        pane.set_content(panel).unwrap();
        draw(&mut pane);
        assert_eq!(pane.cursor_position(), None);
        pane.set_focus(Some(check), FocusChangeDirection::Teleport);
        assert_eq!(pane.cursor_position(), Some(Position::new(4, 2)));
    }
}
