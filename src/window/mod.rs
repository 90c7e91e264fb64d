//! Windows: a root pane plus position, decorated size and sizing hints.

pub mod decorator;
pub mod post_render;
pub mod window_manager;

pub use decorator::{DefaultDecoration, NoDecorations, WindowDecorationRenderer};
pub use post_render::{WindowPostRenderer, WindowShadowRenderer};
pub use window_manager::{DefaultWindowManager, WindowManager};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;
use ratatui::buffer::Buffer;
use ratatui::layout::{Offset, Position, Rect, Size};

use crate::root_pane::RootPane;
use crate::ui::FloatRect;

bitflags! {
    /// Independent sizing and behaviour flags for a window.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Hints: u16 {
        const CENTERED = 1 << 0;
        /// Position was set by the caller (or a drag); never auto-placed.
        const FIXED_POSITION = 1 << 1;
        /// Use the content size set with `Window::set_size` instead of the
        /// pane's preferred size.
        const FIXED_SIZE = 1 << 2;
        const FULL_SCREEN = 1 << 3;
        const EXPANDED = 1 << 4;
        const FIT_TERMINAL_WINDOW = 1 << 5;
        const NO_DECORATIONS = 1 << 6;
        /// Never becomes the active window.
        const NO_FOCUS = 1 << 7;
        /// Closes itself when a click lands anywhere else.
        const MENU_POPUP = 1 << 8;
        const NO_POST_RENDERING = 1 << 9;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

pub struct Window {
    id: WindowId,
    title: String,
    pane: RootPane,
    position: Offset,
    decorated_size: Size,
    /// Content size set by the caller; honoured with `FIXED_SIZE`.
    size: Option<Size>,
    hints: Hints,
    visible: bool,
    invalid: bool,
    /// Order of addition to the compositor, for cascading.
    pub(crate) seq: u64,
    decoration: Option<Box<dyn WindowDecorationRenderer>>,
    post_renderer: Option<Box<dyn WindowPostRenderer>>,
    /// Retained off-screen buffer, reallocated only on size change.
    pub(crate) buffer: Option<Buffer>,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("position", &self.position)
            .field("decorated_size", &self.decorated_size)
            .field("hints", &self.hints)
            .finish_non_exhaustive()
    }
}

impl Window {
    pub fn new<T: Into<String>>(title: T) -> Self {
        Self {
            id: WindowId::next(),
            title: title.into(),
            pane: RootPane::new(),
            position: Offset { x: 0, y: 0 },
            decorated_size: Size::ZERO,
            size: None,
            hints: Hints::empty(),
            visible: true,
            invalid: true,
            seq: 0,
            decoration: None,
            post_renderer: Some(Box::new(WindowShadowRenderer)),
            buffer: None,
        }
    }

    pub fn with_hints(mut self, hints: Hints) -> Self {
        self.hints = hints;
        self
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title<T: Into<String>>(&mut self, title: T) {
        self.title = title.into();
        self.invalid = true;
    }

    pub fn pane(&self) -> &RootPane {
        &self.pane
    }

    pub fn pane_mut(&mut self) -> &mut RootPane {
        &mut self.pane
    }

    pub fn hints(&self) -> Hints {
        self.hints
    }

    /// Replace the hint set. The window is re-laid out on the next pass.
    pub fn set_hints(&mut self, hints: Hints) {
        if self.hints != hints {
            self.hints = hints;
            self.invalid = true;
        }
    }

    pub fn add_hints(&mut self, hints: Hints) {
        self.set_hints(self.hints | hints);
    }

    pub fn remove_hints(&mut self, hints: Hints) {
        self.set_hints(self.hints - hints);
    }

    pub fn position(&self) -> Offset {
        self.position
    }

    /// Moving a window marks it for the next redraw.
    pub fn set_position(&mut self, position: Offset) {
        if self.position != position {
            self.position = position;
            self.invalid = true;
        }
    }

    pub fn decorated_size(&self) -> Size {
        self.decorated_size
    }

    /// Normally assigned by the window manager.
    pub fn set_decorated_size(&mut self, size: Size) {
        if self.decorated_size != size {
            self.decorated_size = size;
            self.pane.invalidate();
        }
    }

    /// Content size used with `FIXED_SIZE`.
    pub fn set_size(&mut self, size: Size) {
        self.size = Some(size);
        self.invalid = true;
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Content size the window manager should fit: the fixed size when
    /// `FIXED_SIZE` is set (and a size was given), the pane's preference
    /// otherwise.
    pub fn content_size(&self) -> Size {
        match self.size {
            Some(size) if self.hints.contains(Hints::FIXED_SIZE) => size,
            _ => self.pane.preferred_size(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.invalid = true;
    }

    pub fn invalidate(&mut self) {
        self.invalid = true;
        self.pane.invalidate();
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid || self.pane.is_invalid()
    }

    pub(crate) fn clear_invalid(&mut self) {
        self.invalid = false;
    }

    pub fn set_decoration_renderer(&mut self, renderer: Option<Box<dyn WindowDecorationRenderer>>) {
        self.decoration = renderer;
        self.invalid = true;
    }

    /// The renderer in effect: none at all with `NO_DECORATIONS`, otherwise
    /// the window's own or the default frame.
    pub fn decoration(&self) -> &dyn WindowDecorationRenderer {
        if self.hints.contains(Hints::NO_DECORATIONS) {
            return &NoDecorations;
        }
        match &self.decoration {
            Some(renderer) => renderer.as_ref(),
            None => &DefaultDecoration,
        }
    }

    pub fn set_post_renderer(&mut self, renderer: Option<Box<dyn WindowPostRenderer>>) {
        self.post_renderer = renderer;
    }

    pub fn post_renderer(&self) -> Option<&dyn WindowPostRenderer> {
        if self.hints.contains(Hints::NO_POST_RENDERING) {
            return None;
        }
        self.post_renderer.as_deref()
    }

    /// Screen rectangle of the decorated window.
    pub fn bounds(&self) -> FloatRect {
        FloatRect {
            x: self.position.x,
            y: self.position.y,
            width: self.decorated_size.width,
            height: self.decorated_size.height,
        }
    }

    /// Content area inside the decorations, window-local.
    pub fn content_area(&self) -> Rect {
        self.decoration().content_area(self.decorated_size)
    }

    /// Title bar in window-local coordinates, if the decoration has one.
    pub fn title_bar(&self) -> Option<Rect> {
        self.decoration().title_bar(self.decorated_size)
    }

    /// Screen point to pane-local point, if it falls inside the content.
    pub fn to_pane(&self, column: u16, row: u16) -> Option<Position> {
        let area = self.content_area();
        let x = column as i32 - self.position.x - area.x as i32;
        let y = row as i32 - self.position.y - area.y as i32;
        if x < 0 || y < 0 || x >= area.width as i32 || y >= area.height as i32 {
            return None;
        }
        Some(Position::new(x as u16, y as u16))
    }

    /// Screen point to window-local point, if it falls inside the window.
    pub fn to_local(&self, column: u16, row: u16) -> Option<Position> {
        let x = column as i32 - self.position.x;
        let y = row as i32 - self.position.y;
        if !self.bounds().contains(column as i32, row as i32) {
            return None;
        }
        Some(Position::new(x as u16, y as u16))
    }
}
