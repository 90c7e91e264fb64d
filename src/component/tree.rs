//! Arena-backed component tree for one root pane.
//!
//! Nodes live in a `SlotMap` addressed by [`NodeId`] keys. A container owns
//! its children through the ordered `children` list; the `parent` field is a
//! plain key used for upward walks and is never an owning link. Removing a
//! node frees its whole subtree; keys are versioned, so stale ids stop
//! resolving instead of aliasing new nodes.
//!
//! The tree also carries the pane's focus reference. Every structural hook
//! that can make the focused node unreachable (removal, re-parenting,
//! hiding, disabling) clears it on the spot, so dispatch never sees a
//! detached focus target.

use std::sync::Arc;

use ratatui::layout::{Position, Rect, Size};
use slotmap::SlotMap;

use super::{AnyWidget, ComponentContext, Widget};
use crate::error::TreeError;
use crate::event::InputEvent;
use crate::focus::{FocusChangeDirection, FocusEvent, FocusListener, InputResult};
use crate::layout::{LayoutChild, LayoutManager, LinearLayout};
use crate::theme::{Theme, default_theme};
use crate::ui::UiFrame;
use crate::widgets::Panel;

slotmap::new_key_type! {
    /// Handle to a node of a [`ComponentTree`].
    pub struct NodeId;
}

/// Focus bookkeeping for a focusable leaf.
pub struct Interactable {
    enabled: bool,
    focusable: bool,
    focused: bool,
    listeners: Vec<FocusListener>,
}

impl Interactable {
    fn new() -> Self {
        Self {
            enabled: true,
            focusable: true,
            focused: false,
            listeners: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether focus may land here right now.
    pub fn accepts_focus(&self) -> bool {
        self.enabled && self.focusable
    }

    fn notify(&mut self, event: FocusEvent) {
        self.focused = matches!(event, FocusEvent::Gained { .. });
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

pub struct Container {
    children: Vec<NodeId>,
    layout: Box<dyn LayoutManager>,
}

/// Closed set of node capabilities. Focus delegation and lookup-map
/// population switch on this tag.
pub enum NodeKind {
    /// Static content; never focusable.
    Leaf,
    Interactable(Interactable),
    /// Wraps at most one child (borders, frames).
    Composite(Option<NodeId>),
    Container(Container),
}

impl NodeKind {
    fn children(&self) -> &[NodeId] {
        match self {
            NodeKind::Container(container) => &container.children,
            NodeKind::Composite(Some(child)) => std::slice::from_ref(child),
            NodeKind::Composite(None) | NodeKind::Leaf | NodeKind::Interactable(_) => &[],
        }
    }
}

struct Node {
    parent: Option<NodeId>,
    position: Position,
    size: Size,
    preferred_override: Option<Size>,
    visible: bool,
    invalid: bool,
    theme: Option<Arc<Theme>>,
    kind: NodeKind,
    widget: Box<dyn AnyWidget>,
}

impl Node {
    fn new(kind: NodeKind, widget: Box<dyn AnyWidget>) -> Self {
        Self {
            parent: None,
            position: Position::ORIGIN,
            size: Size::ZERO,
            preferred_override: None,
            visible: true,
            invalid: true,
            theme: None,
            kind,
            widget,
        }
    }
}

pub struct ComponentTree {
    nodes: SlotMap<NodeId, Node>,
    content: NodeId,
    menu_bar: Option<NodeId>,
    focused: Option<NodeId>,
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentTree {
    /// A tree whose content root is an empty vertical [`Panel`].
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: SlotMap::with_key(),
            content: NodeId::default(),
            menu_bar: None,
            focused: None,
        };
        tree.content = tree.create_container(Panel::new(), LinearLayout::vertical());
        tree
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.insert(node)
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.get(id).ok_or(TreeError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.get_mut(id).ok_or(TreeError::UnknownNode(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    // --- creation -------------------------------------------------------

    /// Create a detached static leaf. It stays unreachable until added to a
    /// container or composite.
    pub fn create_leaf(&mut self, widget: impl Widget + 'static) -> NodeId {
        self.alloc(Node::new(NodeKind::Leaf, Box::new(widget)))
    }

    pub fn create_interactable(&mut self, widget: impl Widget + 'static) -> NodeId {
        self.alloc(Node::new(
            NodeKind::Interactable(Interactable::new()),
            Box::new(widget),
        ))
    }

    pub fn create_composite(&mut self, widget: impl Widget + 'static) -> NodeId {
        self.alloc(Node::new(NodeKind::Composite(None), Box::new(widget)))
    }

    pub fn create_container(
        &mut self,
        widget: impl Widget + 'static,
        layout: impl LayoutManager + 'static,
    ) -> NodeId {
        self.alloc(Node::new(
            NodeKind::Container(Container {
                children: Vec::new(),
                layout: Box::new(layout),
            }),
            Box::new(widget),
        ))
    }

    // --- roots ----------------------------------------------------------

    pub fn content(&self) -> NodeId {
        self.content
    }

    pub fn menu_bar(&self) -> Option<NodeId> {
        self.menu_bar
    }

    fn is_root(&self, id: NodeId) -> bool {
        id == self.content || self.menu_bar == Some(id)
    }

    /// Replace the content root. The previous content subtree is destroyed.
    pub fn set_content(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == self.content {
            return Ok(());
        }
        if self.menu_bar == Some(id) {
            return Err(TreeError::PaneRoot(id));
        }
        self.detach(id)?;
        let old = self.content;
        self.clear_focus_within(old);
        self.destroy(old);
        self.content = id;
        self.invalidate(id)
    }

    /// Install or clear the menu bar root. A replaced menu bar is destroyed.
    pub fn set_menu_bar(&mut self, id: Option<NodeId>) -> Result<(), TreeError> {
        if id == self.menu_bar {
            return Ok(());
        }
        if let Some(new) = id {
            if new == self.content {
                return Err(TreeError::PaneRoot(new));
            }
            self.detach(new)?;
        }
        if let Some(old) = self.menu_bar.take() {
            self.clear_focus_within(old);
            self.destroy(old);
        }
        self.menu_bar = id;
        if let Some(new) = id {
            self.invalidate(new)?;
        }
        self.mark_invalid(self.content);
        Ok(())
    }

    // --- structure ------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|node| node.kind.children()).unwrap_or(&[])
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|node| &node.kind)
    }

    pub fn interactable(&self, id: NodeId) -> Option<&Interactable> {
        match self.get(id).map(|node| &node.kind) {
            Some(NodeKind::Interactable(interactable)) => Some(interactable),
            _ => None,
        }
    }

    fn interactable_mut(&mut self, id: NodeId) -> Option<&mut Interactable> {
        match self.get_mut(id).map(|node| &mut node.kind) {
            Some(NodeKind::Interactable(interactable)) => Some(interactable),
            _ => None,
        }
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            out.push(parent);
            current = self.parent(parent);
        }
        out
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, of: NodeId) -> bool {
        candidate == of || self.ancestors(of).contains(&candidate)
    }

    /// Whether `id` is reachable from the content root or the menu bar.
    pub fn is_attached(&self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let top = self.ancestors(id).last().copied().unwrap_or(id);
        self.is_root(top)
    }

    /// Append `child` to `parent`. A child that already has a parent is
    /// detached from it first.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let index = match &self.node(parent)?.kind {
            NodeKind::Container(container) => container.children.len(),
            _ => return Err(TreeError::NotAContainer(parent)),
        };
        self.insert_child(parent, index, child)
    }

    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError> {
        self.check_attach(parent, child)?;
        if !matches!(self.node(parent)?.kind, NodeKind::Container(_)) {
            return Err(TreeError::NotAContainer(parent));
        }
        self.detach(child)?;
        let NodeKind::Container(container) = &mut self.node_mut(parent)?.kind else {
            return Err(TreeError::NotAContainer(parent));
        };
        let index = index.min(container.children.len());
        container.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        self.invalidate(child)?;
        self.mark_invalid(parent);
        Ok(())
    }

    /// Put `child` inside a composite, destroying the child it replaces.
    /// `None` empties the composite.
    pub fn set_child(&mut self, composite: NodeId, child: Option<NodeId>) -> Result<(), TreeError> {
        let current = match &self.node(composite)?.kind {
            NodeKind::Composite(current) => *current,
            _ => return Err(TreeError::NotAComposite(composite)),
        };
        if current == child {
            return Ok(());
        }
        if let Some(child) = child {
            self.check_attach(composite, child)?;
            self.detach(child)?;
        }
        if let Some(old) = current {
            self.clear_focus_within(old);
            self.destroy(old);
        }
        self.node_mut(composite)?.kind = NodeKind::Composite(child);
        if let Some(child) = child {
            self.node_mut(child)?.parent = Some(composite);
            self.invalidate(child)?;
        }
        self.mark_invalid(composite);
        Ok(())
    }

    fn check_attach(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.node(parent)?;
        self.node(child)?;
        if self.is_root(child) {
            return Err(TreeError::PaneRoot(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(TreeError::Cycle { parent, child });
        }
        Ok(())
    }

    /// Unhook `id` from its parent without destroying it.
    fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        self.clear_focus_within(id);
        if let Some(node) = self.get_mut(parent) {
            match &mut node.kind {
                NodeKind::Container(container) => container.children.retain(|c| *c != id),
                NodeKind::Composite(slot) => *slot = None,
                NodeKind::Leaf | NodeKind::Interactable(_) => {}
            }
        }
        self.node_mut(id)?.parent = None;
        self.mark_invalid(parent);
        Ok(())
    }

    /// Remove `id` from its parent and destroy its subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        if self.is_root(id) {
            return Err(TreeError::PaneRoot(id));
        }
        self.detach(id)?;
        self.destroy(id);
        Ok(())
    }

    /// Remove and destroy every child of a container.
    pub fn remove_all_children(&mut self, parent: NodeId) -> Result<(), TreeError> {
        let children = match &self.node(parent)?.kind {
            NodeKind::Container(container) => container.children.clone(),
            _ => return Err(TreeError::NotAContainer(parent)),
        };
        for child in children {
            self.remove(child)?;
        }
        Ok(())
    }

    fn destroy(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend_from_slice(node.kind.children());
            }
        }
        if self.focused.is_some_and(|focused| !self.contains(focused)) {
            self.focused = None;
        }
    }

    // --- invalidation ---------------------------------------------------

    /// Mark `id` and every descendant dirty.
    pub fn invalidate(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.node(id)?;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.get_mut(current) {
                node.invalid = true;
                stack.extend_from_slice(node.kind.children());
            }
        }
        Ok(())
    }

    /// Mark only `id` itself dirty.
    fn mark_invalid(&mut self, id: NodeId) {
        if let Some(node) = self.get_mut(id) {
            node.invalid = true;
        }
    }

    /// True if `id` or any visible descendant is dirty, or a layout manager
    /// in the subtree has a pending change.
    pub fn is_invalid(&self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        if node.invalid {
            return true;
        }
        if let NodeKind::Container(container) = &node.kind
            && container.layout.has_pending_change()
        {
            return true;
        }
        node.kind.children().iter().any(|child| {
            self.get(*child).is_some_and(|c| c.visible) && self.is_invalid(*child)
        })
    }

    /// True if the content root or menu bar needs a redraw.
    pub fn needs_redraw(&self) -> bool {
        self.is_invalid(self.content) || self.menu_bar.is_some_and(|bar| self.is_invalid(bar))
    }

    // --- per-node state -------------------------------------------------

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|node| node.visible)
    }

    /// Hiding a node drops focus from anything inside it and marks the
    /// parent (not the hidden node) dirty. Showing always invalidates.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), TreeError> {
        let node = self.node(id)?;
        if node.visible == visible {
            return Ok(());
        }
        let parent = node.parent;
        if visible {
            self.node_mut(id)?.visible = true;
            self.invalidate(id)
        } else {
            self.clear_focus_within(id);
            self.node_mut(id)?.visible = false;
            if let Some(parent) = parent {
                self.mark_invalid(parent);
            }
            Ok(())
        }
    }

    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.get(id).map(|node| node.position)
    }

    pub fn size(&self, id: NodeId) -> Option<Size> {
        self.get(id).map(|node| node.size)
    }

    pub fn set_position(&mut self, id: NodeId, position: Position) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.position != position {
            node.position = position;
            node.invalid = true;
        }
        Ok(())
    }

    pub fn set_size(&mut self, id: NodeId, size: Size) -> Result<(), TreeError> {
        let node = self.node(id)?;
        if node.size != size {
            self.node_mut(id)?.size = size;
            self.invalidate(id)?;
        }
        Ok(())
    }

    /// Pin the size a layout manager sees for `id`, or restore the widget's
    /// own preference with `None`.
    pub fn set_preferred_size(&mut self, id: NodeId, size: Option<Size>) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        node.preferred_override = size;
        node.invalid = true;
        if let Some(parent) = node.parent {
            self.mark_invalid(parent);
        }
        Ok(())
    }

    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> Result<(), TreeError> {
        let interactable = self
            .interactable_mut(id)
            .ok_or(TreeError::NotInteractable(id))?;
        if interactable.enabled == enabled {
            return Ok(());
        }
        interactable.enabled = enabled;
        if !enabled {
            self.clear_focus_within(id);
        }
        self.invalidate(id)
    }

    pub fn set_focusable(&mut self, id: NodeId, focusable: bool) -> Result<(), TreeError> {
        let interactable = self
            .interactable_mut(id)
            .ok_or(TreeError::NotInteractable(id))?;
        interactable.focusable = focusable;
        Ok(())
    }

    pub fn add_focus_listener(
        &mut self,
        id: NodeId,
        listener: impl FnMut(FocusEvent) + 'static,
    ) -> Result<(), TreeError> {
        self.interactable_mut(id)
            .ok_or(TreeError::NotInteractable(id))?
            .listeners
            .push(Box::new(listener));
        Ok(())
    }

    /// Override the theme for `id` and its subtree.
    pub fn set_theme(&mut self, id: NodeId, theme: Option<Arc<Theme>>) -> Result<(), TreeError> {
        self.node_mut(id)?.theme = theme;
        self.invalidate(id)
    }

    /// Theme for `id`: its own override, then the nearest ancestor's, then
    /// `fallback` (the pane theme), then the built-in default.
    pub fn resolve_theme(&self, id: NodeId, fallback: Option<&Arc<Theme>>) -> Arc<Theme> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.get(node_id) else {
                break;
            };
            if let Some(theme) = &node.theme {
                return Arc::clone(theme);
            }
            current = node.parent;
        }
        fallback.cloned().unwrap_or_else(default_theme)
    }

    // --- widgets --------------------------------------------------------

    pub fn widget<T: Widget + 'static>(&self, id: NodeId) -> Option<&T> {
        self.get(id)
            .and_then(|node| node.widget.as_ref().as_any().downcast_ref::<T>())
    }

    pub fn widget_mut<T: Widget + 'static>(&mut self, id: NodeId) -> Option<&mut T> {
        self.get_mut(id)
            .and_then(|node| node.widget.as_mut().as_any_mut().downcast_mut::<T>())
    }

    /// Mutate a widget's own state and mark it dirty. Returns `None` if the
    /// node is gone or holds a different widget type.
    pub fn update_widget<T: Widget + 'static, O>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut T) -> O,
    ) -> Option<O> {
        let out = f(self.widget_mut::<T>(id)?);
        let _ = self.invalidate(id);
        if let Some(parent) = self.parent(id) {
            self.mark_invalid(parent);
        }
        Some(out)
    }

    pub fn cursor_location(&self, id: NodeId) -> Option<Position> {
        self.get(id).and_then(|node| node.widget.cursor_location())
    }

    pub fn preferred_size(&self, id: NodeId) -> Size {
        let Some(node) = self.get(id) else {
            return Size::ZERO;
        };
        if let Some(size) = node.preferred_override {
            return size;
        }
        match &node.kind {
            NodeKind::Leaf | NodeKind::Interactable(_) => node.widget.preferred_size(),
            NodeKind::Composite(child) => {
                let inner = child
                    .filter(|c| self.is_visible(*c))
                    .map(|c| self.preferred_size(c))
                    .unwrap_or(Size::ZERO);
                let extra = node.widget.decoration_size();
                Size::new(
                    inner.width.saturating_add(extra.width),
                    inner.height.saturating_add(extra.height),
                )
            }
            NodeKind::Container(container) => {
                let children = self.layout_children(&container.children);
                container.layout.preferred_size(&children)
            }
        }
    }

    fn layout_children(&self, children: &[NodeId]) -> Vec<LayoutChild> {
        children
            .iter()
            .filter_map(|id| {
                let node = self.get(*id)?;
                Some(LayoutChild {
                    preferred: self.preferred_size(*id),
                    position: node.position,
                    size: node.size,
                    visible: node.visible,
                })
            })
            .collect()
    }

    // --- coordinates ----------------------------------------------------

    /// Top-left of `id` in pane coordinates. `None` if any link up to the
    /// content root or menu bar is broken.
    pub fn base_position(&self, id: NodeId) -> Option<Position> {
        let mut current = id;
        let mut x = 0u16;
        let mut y = 0u16;
        loop {
            let node = self.get(current)?;
            x = x.saturating_add(node.position.x);
            y = y.saturating_add(node.position.y);
            match node.parent {
                Some(parent) => current = parent,
                None if self.is_root(current) => return Some(Position::new(x, y)),
                None => return None,
            }
        }
    }

    /// Translate a widget-local point into pane coordinates.
    pub fn to_base_pane(&self, id: NodeId, local: Position) -> Option<Position> {
        let base = self.base_position(id)?;
        Some(Position::new(
            base.x.saturating_add(local.x),
            base.y.saturating_add(local.y),
        ))
    }

    /// Bounding rectangle of `id` in pane coordinates.
    pub fn bounds_in_pane(&self, id: NodeId) -> Option<Rect> {
        let base = self.base_position(id)?;
        let size = self.size(id)?;
        Some(Rect::new(base.x, base.y, size.width, size.height))
    }

    // --- focus ----------------------------------------------------------

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Move the focus reference, firing lost/gained on the two holders.
    /// Callers enforce the transition rules; this only does the bookkeeping.
    pub(crate) fn move_focus(&mut self, target: Option<NodeId>, direction: FocusChangeDirection) {
        let previous = self.focused;
        if let Some(prev) = previous
            && let Some(interactable) = self.interactable_mut(prev)
        {
            interactable.notify(FocusEvent::Lost { direction });
        }
        self.focused = target;
        if let Some(next) = target
            && let Some(interactable) = self.interactable_mut(next)
        {
            interactable.notify(FocusEvent::Gained {
                direction,
                previous,
            });
        }
        for id in previous.into_iter().chain(target) {
            let _ = self.invalidate(id);
        }
    }

    /// Drop focus if it sits inside the subtree rooted at `id`. The outgoing
    /// node is not dirtied; callers invalidate whatever now needs a redraw.
    fn clear_focus_within(&mut self, id: NodeId) {
        let Some(focused) = self.focused else {
            return;
        };
        if self.is_ancestor_or_self(id, focused) {
            tracing::debug!(node = ?focused, "focused component left the tree; clearing focus");
            if let Some(interactable) = self.interactable_mut(focused) {
                interactable.notify(FocusEvent::Lost {
                    direction: FocusChangeDirection::Reset,
                });
            }
            self.focused = None;
        }
    }

    /// Visible, enabled, focusable interactables under `root` in tab order.
    pub fn focusables(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_focusables(root, &mut out);
        out
    }

    fn collect_focusables(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.get(id) else {
            return;
        };
        if !node.visible {
            return;
        }
        match &node.kind {
            NodeKind::Interactable(interactable) if interactable.accepts_focus() => out.push(id),
            NodeKind::Leaf | NodeKind::Interactable(_) => {}
            NodeKind::Composite(_) | NodeKind::Container(_) => {
                for child in node.kind.children() {
                    self.collect_focusables(*child, out);
                }
            }
        }
    }

    /// Full tab order: menu bar entries, then content.
    pub fn tab_order(&self) -> Vec<NodeId> {
        let mut order = self.menu_bar.map(|bar| self.focusables(bar)).unwrap_or_default();
        order.extend(self.focusables(self.content));
        order
    }

    /// Focusables of whichever root `from` lives under.
    fn focus_scope(&self, from: NodeId) -> Vec<NodeId> {
        match self.menu_bar {
            Some(bar) if self.is_ancestor_or_self(bar, from) => self.focusables(bar),
            _ => self.focusables(self.content),
        }
    }

    /// Next focusable after `from` within its root. Running off the end (or
    /// starting from nothing) lands on the first content focusable; tab
    /// order never wraps back into the menu bar.
    pub fn next_focus(&self, from: Option<NodeId>) -> Option<NodeId> {
        if let Some(from) = from {
            let scope = self.focus_scope(from);
            if let Some(idx) = scope.iter().position(|id| *id == from)
                && let Some(next) = scope.get(idx + 1)
            {
                return Some(*next);
            }
        }
        self.focusables(self.content).first().copied()
    }

    /// Previous focusable before `from` within its root, wrapping to the
    /// last content focusable.
    pub fn previous_focus(&self, from: Option<NodeId>) -> Option<NodeId> {
        if let Some(from) = from {
            let scope = self.focus_scope(from);
            if let Some(idx) = scope.iter().position(|id| *id == from)
                && idx > 0
            {
                return Some(scope[idx - 1]);
            }
        }
        self.focusables(self.content).last().copied()
    }

    // --- input ----------------------------------------------------------

    pub(crate) fn context_for(&self, id: NodeId, pane_theme: Option<&Arc<Theme>>) -> ComponentContext {
        let Some(node) = self.get(id) else {
            return ComponentContext::default();
        };
        let enabled = match &node.kind {
            NodeKind::Interactable(interactable) => interactable.enabled,
            _ => true,
        };
        let theme = self.resolve_theme(id, pane_theme);
        ComponentContext::new(self.focused == Some(id))
            .with_enabled(enabled)
            .with_theme(theme.definition(node.widget.theme_class()))
    }

    /// Hand an event to a widget. A handled event dirties the widget.
    pub(crate) fn deliver_input(
        &mut self,
        id: NodeId,
        event: &InputEvent,
        pane_theme: Option<&Arc<Theme>>,
    ) -> InputResult {
        let ctx = self.context_for(id, pane_theme);
        let Some(node) = self.get_mut(id) else {
            return InputResult::Unhandled;
        };
        let result = node.widget.handle_input(event, &ctx);
        if result == InputResult::Handled {
            let _ = self.invalidate(id);
        }
        result
    }

    /// Offer an unhandled event to each ancestor of `id`, nearest first.
    pub(crate) fn offer_to_ancestors(&mut self, id: NodeId, event: &InputEvent) -> bool {
        for ancestor in self.ancestors(id) {
            let Some(node) = self.get_mut(ancestor) else {
                continue;
            };
            if matches!(node.kind, NodeKind::Leaf | NodeKind::Interactable(_)) {
                continue;
            }
            if node.widget.handle_shortcut(event) {
                let _ = self.invalidate(ancestor);
                return true;
            }
        }
        false
    }

    // --- layout and drawing ---------------------------------------------

    /// Size `id` to `size` and lay out its subtree.
    pub fn layout(&mut self, id: NodeId, size: Size) -> Result<(), TreeError> {
        self.set_size(id, size)?;
        let node = self.node(id)?;
        let placements: Vec<(NodeId, Rect)> = match &node.kind {
            NodeKind::Leaf | NodeKind::Interactable(_) | NodeKind::Composite(None) => Vec::new(),
            NodeKind::Composite(Some(child)) => {
                let inner = node
                    .widget
                    .content_area(Rect::new(0, 0, size.width, size.height));
                vec![(*child, inner)]
            }
            NodeKind::Container(container) => {
                let ids = container.children.clone();
                let children = self.layout_children(&ids);
                let rects = match &mut self.node_mut(id)?.kind {
                    NodeKind::Container(container) => {
                        container.layout.compute_layout(size, &children)
                    }
                    _ => return Err(TreeError::NotAContainer(id)),
                };
                ids.into_iter().zip(rects).collect()
            }
        };
        for (child, rect) in placements {
            if !self.is_visible(child) {
                continue;
            }
            self.set_position(child, rect.as_position())?;
            self.layout(child, rect.as_size())?;
        }
        Ok(())
    }

    /// Paint the subtree rooted at `id`. `origin` is where the pane's (0,0)
    /// falls inside `frame`. Rendered nodes are marked clean.
    pub fn render(
        &mut self,
        id: NodeId,
        frame: &mut UiFrame<'_>,
        origin: Position,
        pane_theme: Option<&Arc<Theme>>,
    ) {
        let Some(base) = self.base_position(id) else {
            return;
        };
        self.render_at(id, frame, origin, base, pane_theme);
    }

    fn render_at(
        &mut self,
        id: NodeId,
        frame: &mut UiFrame<'_>,
        origin: Position,
        base: Position,
        pane_theme: Option<&Arc<Theme>>,
    ) {
        if !self.is_visible(id) {
            return;
        }
        let ctx = self.context_for(id, pane_theme);
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let area = Rect::new(
            origin.x.saturating_add(base.x),
            origin.y.saturating_add(base.y),
            node.size.width,
            node.size.height,
        );
        node.invalid = false;
        let children: Vec<NodeId> = node.kind.children().to_vec();
        {
            let mut clipped = frame.sub_frame(area);
            node.widget.render(&mut clipped, area, &ctx);
        }
        let mut clipped = frame.sub_frame(area);
        for child in children {
            let Some(position) = self.position(child) else {
                continue;
            };
            let child_base = Position::new(
                base.x.saturating_add(position.x),
                base.y.saturating_add(position.y),
            );
            self.render_at(child, &mut clipped, origin, child_base, pane_theme);
        }
    }
}
