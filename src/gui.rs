//! The multi-window compositor.
//!
//! `MultiWindowGui` owns a screen, a background pane and a z-ordered list of
//! windows (last is topmost). Input is routed to the active window, or to the
//! background when none is active; mouse-down picks the active window first.
//! Each visible window paints into its own retained buffer, which is copied
//! onto the screen in z-order with its post-render effect on top.
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::{Offset, Position, Rect, Size};

use crate::constants::DEFAULT_POLL_INTERVAL_MS;
use crate::error::GuiError;
use crate::event::InputEvent;
use crate::event_loop::ControlFlow;
use crate::gui_thread::{GuiHandle, TaskQueue};
use crate::layout::LinearLayout;
use crate::root_pane::RootPane;
use crate::theme::{Theme, default_theme};
use crate::ui::UiFrame;
use crate::widgets::Panel;
use crate::window::{DefaultWindowManager, Hints, Window, WindowId, WindowManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuiConfig {
    /// Wait on the screen for input instead of polling it.
    pub blocking_io: bool,
    /// Once windows have been shown and the last one is closed, report
    /// end of input as soon as buffered input runs out.
    pub eof_when_no_windows: bool,
    /// Sleep between idle passes when polling.
    pub poll_interval: Duration,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            blocking_io: false,
            eof_when_no_windows: false,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// What one processing pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pass {
    pub tasks: usize,
    pub events: usize,
    pub redrawn: bool,
    pub quit: bool,
}

impl Pass {
    pub fn is_idle(&self) -> bool {
        self.tasks == 0 && self.events == 0
    }
}

/// Called with input that neither a window nor the background consumed.
pub type UnhandledInputListener = Box<dyn FnMut(&InputEvent) -> bool>;

#[derive(Debug, Clone, Copy)]
struct DragSession {
    window: WindowId,
    origin: Offset,
    start: Position,
}

pub struct MultiWindowGui {
    screen: Box<dyn crate::screen::Screen>,
    windows: Vec<Window>,
    active: Option<WindowId>,
    background: RootPane,
    window_manager: Box<dyn WindowManager>,
    config: GuiConfig,
    theme: Arc<Theme>,
    tasks: TaskQueue,
    unhandled: Vec<UnhandledInputListener>,
    drag: Option<DragSession>,
    ever_had_windows: bool,
    next_seq: u64,
    /// Set when something outside any window's own invalidation changed
    /// what the screen shows (a window moved, closed or changed z-order).
    full_redraw: bool,
}

impl std::fmt::Debug for MultiWindowGui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiWindowGui")
            .field("windows", &self.windows)
            .field("active", &self.active)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MultiWindowGui {
    pub fn new(screen: impl crate::screen::Screen + 'static) -> Self {
        Self::with_config(screen, GuiConfig::default())
    }

    pub fn with_config(screen: impl crate::screen::Screen + 'static, config: GuiConfig) -> Self {
        let theme = default_theme();
        let mut background = RootPane::new();
        background.set_theme(Some(Arc::clone(&theme)));
        let desktop = background.tree_mut().create_container(
            Panel::new().with_theme_class("desktop"),
            LinearLayout::vertical(),
        );
        // A fresh pane always accepts a new detached container as content.
        let _ = background.set_content(desktop);
        Self {
            screen: Box::new(screen),
            windows: Vec::new(),
            active: None,
            background,
            window_manager: Box::new(DefaultWindowManager),
            config,
            theme,
            tasks: TaskQueue::new(),
            unhandled: Vec::new(),
            drag: None,
            ever_had_windows: false,
            next_seq: 0,
            full_redraw: true,
        }
    }

    pub fn config(&self) -> &GuiConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GuiConfig) {
        self.config = config;
    }

    pub fn screen(&self) -> &dyn crate::screen::Screen {
        self.screen.as_ref()
    }

    pub fn screen_mut(&mut self) -> &mut dyn crate::screen::Screen {
        self.full_redraw = true;
        self.screen.as_mut()
    }

    pub fn background(&self) -> &RootPane {
        &self.background
    }

    pub fn background_mut(&mut self) -> &mut RootPane {
        &mut self.background
    }

    pub fn theme(&self) -> &Arc<Theme> {
        &self.theme
    }

    /// Theme for decorations, shadows, the background and any window pane
    /// without its own theme.
    pub fn set_theme(&mut self, theme: Arc<Theme>) {
        self.background.set_theme(Some(Arc::clone(&theme)));
        for window in &mut self.windows {
            if window
                .pane()
                .theme()
                .is_none_or(|current| Arc::ptr_eq(current, &self.theme))
            {
                window.pane_mut().set_theme(Some(Arc::clone(&theme)));
            }
            window.invalidate();
        }
        self.theme = theme;
        self.full_redraw = true;
    }

    pub fn set_window_manager(&mut self, manager: Box<dyn WindowManager>) {
        self.window_manager = manager;
        self.full_redraw = true;
    }

    pub fn handle(&self) -> GuiHandle {
        self.tasks.handle()
    }

    /// Run `task` immediately. Code already on the gui thread uses this
    /// instead of [`GuiHandle::invoke_and_wait`], which would wait on itself.
    pub fn invoke_and_wait<R>(&mut self, task: impl FnOnce(&mut MultiWindowGui) -> R) -> R {
        task(self)
    }

    pub fn add_unhandled_input_listener(
        &mut self,
        listener: impl FnMut(&InputEvent) -> bool + 'static,
    ) {
        self.unhandled.push(Box::new(listener));
    }

    // --- window list ------------------------------------------------------

    /// Windows from bottom to top.
    pub fn windows(&self) -> impl DoubleEndedIterator<Item = &Window> {
        self.windows.iter()
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|window| window.id() == id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|window| window.id() == id)
    }

    fn index_of(&self, id: WindowId) -> Result<usize, GuiError> {
        self.windows
            .iter()
            .position(|window| window.id() == id)
            .ok_or(GuiError::UnknownWindow(id))
    }

    pub fn active_window(&self) -> Option<WindowId> {
        self.active
    }

    fn active_index(&self) -> Option<usize> {
        self.active.and_then(|id| self.index_of(id).ok())
    }

    /// Place `window` with the window manager, put it on top and make it
    /// active unless it carries `NO_FOCUS`.
    pub fn add_window(&mut self, mut window: Window) -> WindowId {
        let screen = self.screen.size();
        if window.pane().theme().is_none() {
            window.pane_mut().set_theme(Some(Arc::clone(&self.theme)));
        }
        let newest = self.windows.iter().max_by_key(|existing| existing.seq);
        self.window_manager.on_added(screen, &mut window, newest);
        self.window_manager.prepare_window(screen, &mut window);
        self.next_seq += 1;
        window.seq = self.next_seq;

        let id = window.id();
        let focusable = !window.hints().contains(Hints::NO_FOCUS);
        tracing::debug!(
            window = %id,
            title = window.title(),
            position = ?window.position(),
            size = ?window.decorated_size(),
            "opened window"
        );
        self.windows.push(window);
        self.ever_had_windows = true;
        if focusable {
            self.activate(Some(id));
        }
        self.full_redraw = true;
        id
    }

    /// Add `window` and keep processing input until it is closed or input
    /// ends. Must be called on the gui thread.
    pub fn add_window_and_wait(&mut self, window: Window) -> Result<(), GuiError> {
        let id = self.add_window(window);
        while self.window(id).is_some() {
            let pass = self.process_pass()?;
            if pass.quit {
                break;
            }
            if pass.is_idle() && !self.config.blocking_io {
                thread::sleep(self.config.poll_interval);
            }
        }
        Ok(())
    }

    /// Remove a window. The topmost remaining focusable window becomes
    /// active if the closed one was.
    pub fn close_window(&mut self, id: WindowId) -> Result<Window, GuiError> {
        let index = self.index_of(id)?;
        let window = self.windows.remove(index);
        if self.drag.is_some_and(|drag| drag.window == id) {
            self.drag = None;
        }
        if self.active == Some(id) {
            self.active = None;
            let next = self.topmost_focusable();
            self.activate(next);
        }
        tracing::debug!(window = %id, remaining = self.windows.len(), "closed window");
        self.full_redraw = true;
        Ok(window)
    }

    /// Make `id` active and bring it to the top. `NO_FOCUS` windows are
    /// left alone. `None` hands input to the background.
    pub fn set_active_window(&mut self, id: Option<WindowId>) -> Result<(), GuiError> {
        if let Some(id) = id {
            let index = self.index_of(id)?;
            if self.windows[index].hints().contains(Hints::NO_FOCUS) {
                return Ok(());
            }
            self.move_to_top(id)?;
        }
        self.activate(id);
        Ok(())
    }

    /// Rotate the active window through the focusable windows. Forward sends
    /// the active window to the bottom; reverse raises the bottom-most one.
    pub fn cycle_active_window(&mut self, reverse: bool) -> Result<(), GuiError> {
        let focusable: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|window| window.is_visible() && !window.hints().contains(Hints::NO_FOCUS))
            .map(Window::id)
            .collect();
        if focusable.is_empty() {
            return Ok(());
        }
        if reverse {
            self.set_active_window(focusable.first().copied())
        } else {
            if let Some(active) = self.active {
                self.move_to_bottom(active)?;
            }
            let next = self.topmost_focusable();
            self.activate(next);
            Ok(())
        }
    }

    pub fn move_to_top(&mut self, id: WindowId) -> Result<(), GuiError> {
        let index = self.index_of(id)?;
        if index + 1 != self.windows.len() {
            let window = self.windows.remove(index);
            self.windows.push(window);
            self.full_redraw = true;
        }
        Ok(())
    }

    pub fn move_to_bottom(&mut self, id: WindowId) -> Result<(), GuiError> {
        let index = self.index_of(id)?;
        if index != 0 {
            let window = self.windows.remove(index);
            self.windows.insert(0, window);
            self.full_redraw = true;
        }
        Ok(())
    }

    fn topmost_focusable(&self) -> Option<WindowId> {
        self.windows
            .iter()
            .rev()
            .find(|window| window.is_visible() && !window.hints().contains(Hints::NO_FOCUS))
            .map(Window::id)
    }

    /// Switch the active pointer, repainting both frames.
    fn activate(&mut self, id: Option<WindowId>) {
        if self.active == id {
            return;
        }
        let previous = std::mem::replace(&mut self.active, id);
        for changed in [previous, id].into_iter().flatten() {
            if let Some(window) = self.window_mut(changed) {
                window.invalidate();
            }
        }
        tracing::debug!(from = ?previous, to = ?id, "active window changed");
    }

    // --- input ------------------------------------------------------------

    fn should_synthesize_eof(&self) -> bool {
        self.config.eof_when_no_windows && self.ever_had_windows && self.windows.is_empty()
    }

    fn next_event(&mut self, block: bool) -> Result<Option<InputEvent>, GuiError> {
        if self.should_synthesize_eof() {
            let buffered = self.screen.poll_input()?;
            return Ok(Some(buffered.unwrap_or_else(|| {
                tracing::debug!("no windows left; reporting end of input");
                InputEvent::Eof
            })));
        }
        if block {
            Ok(Some(self.screen.read_input()?))
        } else {
            Ok(self.screen.poll_input()?)
        }
    }

    /// Route one event. Returns whether anything consumed it.
    pub fn handle_input(&mut self, event: &InputEvent) -> Result<bool, GuiError> {
        let handled = match event {
            InputEvent::Resize(width, height) => {
                self.resize(Size::new(*width, *height))?;
                true
            }
            InputEvent::Eof => false,
            InputEvent::Mouse(mouse) => self.handle_mouse(event, mouse)?,
            InputEvent::Key(_) => match self.active_index() {
                Some(index) => self.windows[index].pane_mut().dispatch(event),
                None => self.background.dispatch(event),
            },
        };
        if handled {
            return Ok(true);
        }
        for listener in &mut self.unhandled {
            if listener(event) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn handle_mouse(&mut self, event: &InputEvent, mouse: &MouseEvent) -> Result<bool, GuiError> {
        let point = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(_) => self.mouse_down(event, point),
            MouseEventKind::Drag(_) if self.drag.is_some() => {
                self.drag_to(point);
                Ok(true)
            }
            MouseEventKind::Up(_) if self.drag.is_some() => {
                self.drag_to(point);
                if let Some(drag) = self.drag.take() {
                    tracing::debug!(window = %drag.window, "drag finished");
                }
                Ok(true)
            }
            MouseEventKind::Drag(_) | MouseEventKind::Up(_) => {
                Ok(self.forward_to_active(event, point, true))
            }
            _ => Ok(self.forward_to_active(event, point, false)),
        }
    }

    fn mouse_down(&mut self, event: &InputEvent, point: Position) -> Result<bool, GuiError> {
        if let Some(drag) = self.drag.take() {
            tracing::debug!(window = %drag.window, "drag interrupted");
        }
        let (column, row) = (point.x as i32, point.y as i32);
        let hit = self
            .windows
            .iter()
            .rev()
            .find(|window| {
                window.is_visible()
                    && !window.hints().contains(Hints::NO_FOCUS)
                    && window.bounds().contains(column, row)
            })
            .map(Window::id);

        if let Some(previous) = self.active
            && hit != Some(previous)
            && self
                .window(previous)
                .is_some_and(|window| window.hints().contains(Hints::MENU_POPUP))
        {
            tracing::debug!(window = %previous, "click outside popup; closing it");
            self.close_window(previous)?;
        }

        let Some(id) = hit else {
            return Ok(self.background.dispatch(event));
        };
        self.set_active_window(Some(id))?;
        let index = self.index_of(id)?;
        let window = &mut self.windows[index];

        let on_title = window
            .to_local(point.x, point.y)
            .zip(window.title_bar())
            .is_some_and(|(local, bar)| bar.contains(local));
        if on_title && !window.hints().contains(Hints::MENU_POPUP) {
            tracing::debug!(window = %id, origin = ?window.position(), "drag started");
            self.drag = Some(DragSession {
                window: id,
                origin: window.position(),
                start: point,
            });
            return Ok(true);
        }
        if let Some(local) = window.to_pane(point.x, point.y) {
            window.pane_mut().dispatch(&event.with_mouse_position(local));
        }
        // Selecting the window consumes the click even when nothing inside
        // did.
        Ok(true)
    }

    fn drag_to(&mut self, point: Position) {
        let Some(drag) = self.drag else {
            return;
        };
        let Some(window) = self.window_mut(drag.window) else {
            self.drag = None;
            return;
        };
        let position = Offset {
            x: drag.origin.x + point.x as i32 - drag.start.x as i32,
            y: drag.origin.y + point.y as i32 - drag.start.y as i32,
        };
        if position != window.position() {
            window.set_position(position);
            window.remove_hints(Hints::CENTERED);
            window.add_hints(Hints::FIXED_POSITION);
            self.full_redraw = true;
        }
    }

    /// Hand a mouse event to the active window's pane in pane coordinates.
    /// `clamp` keeps drags and releases that stray outside the content
    /// flowing to whatever took the press.
    fn forward_to_active(&mut self, event: &InputEvent, point: Position, clamp: bool) -> bool {
        let Some(index) = self.active_index() else {
            return self.background.dispatch(event);
        };
        let window = &mut self.windows[index];
        let local = match window.to_pane(point.x, point.y) {
            Some(local) => local,
            None if clamp => {
                let area = window.content_area();
                let origin = window.position();
                let x = point.x as i32 - origin.x - area.x as i32;
                let y = point.y as i32 - origin.y - area.y as i32;
                Position::new(x.max(0) as u16, y.max(0) as u16)
            }
            None => return false,
        };
        window.pane_mut().dispatch(&event.with_mouse_position(local))
    }

    fn resize(&mut self, size: Size) -> Result<(), GuiError> {
        tracing::debug!(?size, "screen resized");
        self.screen.resize(size)?;
        for window in &mut self.windows {
            self.window_manager.prepare_window(size, window);
            window.invalidate();
        }
        self.background.invalidate();
        self.full_redraw = true;
        Ok(())
    }

    // --- processing ---------------------------------------------------------

    fn run_tasks(&mut self) -> usize {
        let tasks = self.tasks.drain();
        let count = tasks.len();
        if count > 0 {
            tracing::trace!(count, "running queued tasks");
        }
        for task in tasks {
            task(self);
        }
        count
    }

    /// One pass: queued tasks, then every buffered event in arrival order,
    /// then a single redraw if anything was handled or invalidated.
    pub fn process_pass(&mut self) -> Result<Pass, GuiError> {
        let mut pass = Pass {
            tasks: self.run_tasks(),
            ..Pass::default()
        };
        let mut handled = false;
        let mut block = self.config.blocking_io && pass.tasks == 0;
        while let Some(event) = self.next_event(block)? {
            block = false;
            pass.events += 1;
            if event.is_eof() {
                pass.quit = true;
                break;
            }
            handled |= self.handle_input(&event)?;
        }
        if self.tasks.is_stop_requested() {
            pass.quit = true;
        }
        if handled || self.is_pending_update() {
            self.update_screen()?;
            pass.redrawn = true;
        }
        Ok(pass)
    }

    pub fn process_input_and_update_screen(&mut self) -> Result<ControlFlow, GuiError> {
        let pass = self.process_pass()?;
        Ok(if pass.quit {
            ControlFlow::Quit
        } else {
            ControlFlow::Continue
        })
    }

    pub fn is_pending_update(&self) -> bool {
        self.full_redraw
            || self.background.is_invalid()
            || self.windows.iter().any(Window::is_invalid)
    }

    // --- rendering ----------------------------------------------------------

    /// Paint the background and every visible window, place the cursor and
    /// refresh the screen.
    pub fn update_screen(&mut self) -> Result<(), GuiError> {
        let size = self.screen.size();
        let theme = Arc::clone(&self.theme);
        for window in &mut self.windows {
            if window.is_visible() && window.is_invalid() {
                self.window_manager.prepare_window(size, window);
            }
        }

        let buffer = self.screen.buffer_mut();
        let area = buffer.area;
        let mut frame = UiFrame::from_parts(area, buffer);
        self.background.draw(&mut frame, area)?;

        for window in self.windows.iter_mut().filter(|window| window.is_visible()) {
            let active = self.active == Some(window.id());
            let decorated = window.decorated_size();
            let local = Rect::from((Position::ORIGIN, decorated));
            let stale = window
                .buffer
                .as_ref()
                .is_none_or(|retained| retained.area != local);
            if stale || window.is_invalid() {
                let mut retained = match window.buffer.take() {
                    Some(mut retained) if retained.area == local => {
                        retained.reset();
                        retained
                    }
                    _ => Buffer::empty(local),
                };
                let mut surface = UiFrame::from_parts(local, &mut retained);
                surface.fill(local, theme.definition("panel").normal);
                window
                    .decoration()
                    .draw(&mut surface, local, window.title(), active, &theme);
                let content = window.content_area();
                window.pane_mut().draw(&mut surface.sub_frame(content), content)?;
                window.buffer = Some(retained);
                window.clear_invalid();
            }
            let bounds = window.bounds();
            if let Some(retained) = &window.buffer {
                frame.blit_from_signed(retained, bounds);
            }
            if let Some(post) = window.post_renderer() {
                post.post_render(&mut frame, bounds, &theme);
            }
        }

        let cursor = self.cursor_position();
        self.screen.set_cursor(cursor);
        self.screen.refresh()?;
        self.full_redraw = false;
        Ok(())
    }

    /// Focused interactable's cursor in screen coordinates, if it is on
    /// screen.
    pub fn cursor_position(&self) -> Option<Position> {
        let Some(window) = self.active.and_then(|id| self.window(id)) else {
            return self.background.cursor_position();
        };
        let local = window.pane().cursor_position()?;
        let area = window.content_area();
        if local.x >= area.width || local.y >= area.height {
            return None;
        }
        let x = window.position().x + area.x as i32 + local.x as i32;
        let y = window.position().y + area.y as i32 + local.y as i32;
        let size = self.screen.size();
        if x < 0 || y < 0 || x >= size.width as i32 || y >= size.height as i32 {
            return None;
        }
        Some(Position::new(x as u16, y as u16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::VirtualScreen;
    use crate::widgets::{Button, Label};
    use crossterm::event::KeyCode;

    fn gui() -> MultiWindowGui {
        MultiWindowGui::new(VirtualScreen::new(Size::new(40, 12)))
    }

    fn fixed(title: &str, x: i32, y: i32, width: u16, height: u16) -> Window {
        let mut window =
            Window::new(title).with_hints(Hints::FIXED_POSITION | Hints::FIXED_SIZE);
        window.set_position(Offset { x, y });
        window.set_size(Size::new(width, height));
        window
    }

    #[test]
    fn adding_windows_activates_and_cascades() {
        let mut gui = gui();
        let first = gui.add_window(Window::new("a"));
        let second = gui.add_window(Window::new("b"));
        assert_eq!(gui.active_window(), Some(second));
        assert_eq!(gui.window(first).unwrap().position(), Offset { x: 1, y: 1 });
        assert_eq!(gui.window(second).unwrap().position(), Offset { x: 3, y: 2 });
    }

    #[test]
    fn no_focus_windows_never_become_active() {
        let mut gui = gui();
        let id = gui.add_window(Window::new("status").with_hints(Hints::NO_FOCUS));
        assert_eq!(gui.active_window(), None);
        gui.set_active_window(Some(id)).unwrap();
        assert_eq!(gui.active_window(), None);
    }

    #[test]
    fn closing_active_window_activates_next_topmost() {
        let mut gui = gui();
        let a = gui.add_window(Window::new("a"));
        let b = gui.add_window(Window::new("b"));
        gui.close_window(b).unwrap();
        assert_eq!(gui.active_window(), Some(a));
        assert!(matches!(gui.close_window(b), Err(GuiError::UnknownWindow(id)) if id == b));
    }

    #[test]
    fn cycling_rotates_through_windows() {
        let mut gui = gui();
        let a = gui.add_window(Window::new("a"));
        let b = gui.add_window(Window::new("b"));
        let c = gui.add_window(Window::new("c"));
        gui.cycle_active_window(false).unwrap();
        assert_eq!(gui.active_window(), Some(b));
        let order: Vec<_> = gui.windows().map(Window::id).collect();
        assert_eq!(order, vec![c, a, b]);
        gui.cycle_active_window(true).unwrap();
        assert_eq!(gui.active_window(), Some(c));
    }

    #[test]
    fn keys_reach_the_active_window() {
        let mut gui = gui();
        let mut window = Window::new("w");
        let pane = window.pane_mut();
        let content = pane.content();
        let button = pane.tree_mut().create_interactable(Button::new("ok"));
        pane.tree_mut().add_child(content, button).unwrap();
        gui.add_window(window);
        gui.update_screen().unwrap();
        assert!(gui.handle_input(&InputEvent::key(KeyCode::Tab)).unwrap());
        let id = gui.active_window().unwrap();
        assert_eq!(gui.window(id).unwrap().pane().focused(), Some(button));
    }

    #[test]
    fn unhandled_input_reaches_listeners() {
        let mut gui = gui();
        let seen = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = std::rc::Rc::clone(&seen);
        gui.add_unhandled_input_listener(move |_event| {
            counter.set(counter.get() + 1);
            true
        });
        assert!(gui.handle_input(&InputEvent::key(KeyCode::Char('q'))).unwrap());
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn clicking_outside_a_popup_closes_it() {
        let mut gui = gui();
        let base = gui.add_window(fixed("base", 0, 0, 20, 8));
        let popup = gui.add_window(
            fixed("menu", 25, 2, 6, 3).with_hints(
                Hints::MENU_POPUP | Hints::FIXED_POSITION | Hints::FIXED_SIZE,
            ),
        );
        assert_eq!(gui.active_window(), Some(popup));
        gui.handle_input(&InputEvent::mouse_down(5, 5)).unwrap();
        assert!(gui.window(popup).is_none());
        assert_eq!(gui.active_window(), Some(base));
    }

    #[test]
    fn windows_are_composited_with_frame_and_shadow() {
        let mut gui = gui();
        let mut window = fixed("Hi", 2, 1, 6, 1);
        let pane = window.pane_mut();
        let content = pane.content();
        let label = pane.tree_mut().create_leaf(Label::new("hello"));
        pane.tree_mut().add_child(content, label).unwrap();
        gui.add_window(window);
        gui.update_screen().unwrap();

        let buffer = gui.screen().buffer();
        let row = |y: u16| -> String {
            (2..10).map(|x| buffer[(x, y)].symbol().to_string()).collect()
        };
        assert_eq!(row(1), "┌─ Hi ─┐");
        assert_eq!(row(2), "│hello │");
        assert_eq!(row(3), "└──────┘");
        let shadow = gui.theme().definition("shadow").normal.bg.unwrap_or_default();
        assert_eq!(buffer[(10, 2)].bg, shadow);
        assert_eq!(buffer[(4, 4)].bg, shadow);
    }

    #[test]
    fn retained_buffer_survives_clean_frames() {
        let mut gui = gui();
        let id = gui.add_window(fixed("w", 0, 0, 4, 2));
        gui.update_screen().unwrap();
        assert!(!gui.is_pending_update());
        let before = gui.window(id).unwrap().buffer.as_ref().map(|b| b.area);
        gui.update_screen().unwrap();
        assert_eq!(gui.window(id).unwrap().buffer.as_ref().map(|b| b.area), before);
    }

    #[test]
    fn resize_reruns_the_window_manager() {
        let mut gui = gui();
        let id = gui.add_window(Window::new("full").with_hints(Hints::FULL_SCREEN));
        assert_eq!(gui.window(id).unwrap().decorated_size(), Size::new(40, 12));
        gui.handle_input(&InputEvent::Resize(50, 20)).unwrap();
        assert_eq!(gui.screen().size(), Size::new(50, 20));
        assert_eq!(gui.window(id).unwrap().decorated_size(), Size::new(50, 20));
    }

    #[test]
    fn cursor_maps_to_screen_coordinates() {
        let mut gui = gui();
        let mut window = fixed("w", 5, 3, 10, 2);
        let pane = window.pane_mut();
        let content = pane.content();
        let check = pane
            .tree_mut()
            .create_interactable(crate::widgets::CheckBox::new("x"));
        pane.tree_mut().add_child(content, check).unwrap();
        let id = gui.add_window(window);
        gui.update_screen().unwrap();
        gui.handle_input(&InputEvent::key(KeyCode::Tab)).unwrap();
        gui.update_screen().unwrap();
        assert_eq!(gui.window(id).unwrap().pane().focused(), Some(check));
        assert_eq!(gui.cursor_position(), Some(Position::new(7, 4)));
        assert_eq!(gui.screen().cursor(), Some(Position::new(7, 4)));
    }

    #[test]
    fn invoke_and_wait_on_the_gui_thread_runs_inline() {
        let mut gui = gui();
        let handle = gui.handle();
        assert!(matches!(
            handle.invoke_and_wait(|gui| gui.windows().count()),
            Err(GuiError::WaitOnGuiThread)
        ));
        let id = gui.invoke_and_wait(|gui| gui.add_window(Window::new("inline")));
        assert_eq!(gui.active_window(), Some(id));
    }
}
