//! Clipped drawing surface over a ratatui `Buffer`.
//!
//! Widgets, window decorations and the compositor all draw through
//! [`UiFrame`]. Each frame carries a clip rectangle; nothing outside it is
//! ever touched, so a child slot or a window dragged half off screen cannot
//! spill into its neighbours.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::widgets::Widget;

/// Signed origin with unsigned size. Windows may sit partly off screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl FloatRect {
    fn right(&self) -> i32 {
        self.x + i32::from(self.width)
    }

    fn bottom(&self) -> i32 {
        self.y + i32::from(self.height)
    }

    pub fn contains(&self, column: i32, row: i32) -> bool {
        (self.x..self.right()).contains(&column) && (self.y..self.bottom()).contains(&row)
    }

    /// The on-screen part of this rectangle inside `area`, if any.
    pub fn clip_to(&self, area: Rect) -> Option<Rect> {
        let left = self.x.max(i32::from(area.left()));
        let top = self.y.max(i32::from(area.top()));
        let right = self.right().min(i32::from(area.right()));
        let bottom = self.bottom().min(i32::from(area.bottom()));
        if left >= right || top >= bottom {
            return None;
        }
        // All four values lie within `area`, so they fit in u16.
        Some(Rect::new(
            left as u16,
            top as u16,
            (right - left) as u16,
            (bottom - top) as u16,
        ))
    }
}

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    /// Frame over a whole ratatui terminal frame.
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        Self::from_parts(area, frame.buffer_mut())
    }

    /// Frame over `buffer`, clipped to `area`. Used for windows' retained
    /// buffers as well as the screen itself.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self {
            area: area.intersection(buffer.area),
            buffer,
        }
    }

    /// Narrower frame over the same buffer. The clip only ever shrinks.
    pub fn sub_frame(&mut self, area: Rect) -> UiFrame<'_> {
        UiFrame {
            area: area.intersection(self.area),
            buffer: self.buffer,
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        self.area.contains(Position::new(x, y))
    }

    fn clip(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        (!clipped.is_empty()).then_some(clipped)
    }

    pub fn set_cell(&mut self, x: u16, y: u16, symbol: &str, style: Style) {
        if self.contains(x, y) {
            self.buffer[(x, y)].set_symbol(symbol).set_style(style);
        }
    }

    /// Blank `area` with spaces in `style`.
    pub fn fill(&mut self, area: Rect, style: Style) {
        let Some(area) = self.clip(area) else {
            return;
        };
        for position in area.positions() {
            let cell = &mut self.buffer[position];
            cell.reset();
            cell.set_style(style);
        }
    }

    /// Write `text` from `(x, y)` rightwards, cut off at the clip edge.
    pub fn set_string(&mut self, x: u16, y: u16, text: &str, style: Style) {
        if !self.contains(x, y) {
            return;
        }
        let room = self.area.right() - x;
        self.buffer.set_stringn(x, y, text, usize::from(room), style);
    }

    /// Layer `style` over whatever is already drawn in `area`.
    pub fn patch_style(&mut self, area: Rect, style: Style) {
        if let Some(area) = self.clip(area) {
            self.buffer.set_style(area, style);
        }
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        if let Some(area) = self.clip(area) {
            widget.render(area, self.buffer);
        }
    }

    /// Copy the cells of `src` that share coordinates with this frame.
    pub fn blit_from(&mut self, src: &Buffer, src_area: Rect) {
        let Some(area) = self.clip(src_area.intersection(src.area)) else {
            return;
        };
        for position in area.positions() {
            self.buffer[position] = src[position].clone();
        }
    }

    /// Copy `src` (whose origin is `(0, 0)`) so that it lands at `dest`,
    /// dropping whatever falls outside this frame.
    pub fn blit_from_signed(&mut self, src: &Buffer, dest: FloatRect) {
        let Some(visible) = dest.clip_to(self.area) else {
            return;
        };
        for position in visible.positions() {
            let source = (
                (i32::from(position.x) - dest.x) as u16,
                (i32::from(position.y) - dest.y) as u16,
            );
            if let Some(cell) = src.cell(source) {
                self.buffer[position] = cell.clone();
            }
        }
    }
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    value.chars().take(width).collect()
}
