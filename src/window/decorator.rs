//! Window frames drawn around a window's content.
use std::fmt::Debug;

use ratatui::layout::{Rect, Size};

use crate::theme::Theme;
use crate::ui::UiFrame;
use crate::widgets::text_width;

pub trait WindowDecorationRenderer: Debug {
    /// Columns and rows the frame adds around the content.
    fn extra_size(&self) -> Size;

    /// Column and row offset of the content inside the frame.
    fn content_offset(&self) -> Size;

    fn decorated_size(&self, content: Size) -> Size {
        let extra = self.extra_size();
        Size::new(
            content.width.saturating_add(extra.width),
            content.height.saturating_add(extra.height),
        )
    }

    /// Content rectangle, window-local, for a window of `decorated` size.
    fn content_area(&self, decorated: Size) -> Rect {
        let offset = self.content_offset();
        let extra = self.extra_size();
        Rect::new(
            offset.width.min(decorated.width),
            offset.height.min(decorated.height),
            decorated.width.saturating_sub(extra.width),
            decorated.height.saturating_sub(extra.height),
        )
    }

    /// Window-local row a drag can start from.
    fn title_bar(&self, decorated: Size) -> Option<Rect>;

    /// Draw the frame into `frame` covering `area`.
    fn draw(&self, frame: &mut UiFrame<'_>, area: Rect, title: &str, active: bool, theme: &Theme);
}

/// Single-line box frame with the title centred in the top edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDecoration;

impl WindowDecorationRenderer for DefaultDecoration {
    fn extra_size(&self) -> Size {
        Size::new(2, 2)
    }

    fn content_offset(&self) -> Size {
        Size::new(1, 1)
    }

    fn title_bar(&self, decorated: Size) -> Option<Rect> {
        (decorated.height > 0).then(|| Rect::new(0, 0, decorated.width, 1))
    }

    fn draw(&self, frame: &mut UiFrame<'_>, area: Rect, title: &str, active: bool, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let class = theme.definition("window");
        let border = if active { class.selected } else { class.normal };
        let header = if active { class.active } else { class.normal };

        let left = area.x;
        let top = area.y;
        let right = area.right() - 1;
        let bottom = area.bottom() - 1;

        for x in left..=right {
            let (upper, lower) = match x {
                x if x == left => ("┌", "└"),
                x if x == right => ("┐", "┘"),
                _ => ("─", "─"),
            };
            frame.set_cell(x, top, upper, border);
            if bottom > top {
                frame.set_cell(x, bottom, lower, border);
            }
        }
        for y in top.saturating_add(1)..bottom {
            frame.set_cell(left, y, "│", border);
            if right > left {
                frame.set_cell(right, y, "│", border);
            }
        }

        // Title sits between the corners with one space of padding each side.
        let room = area.width.saturating_sub(4);
        if room == 0 || title.is_empty() {
            return;
        }
        let shown = crate::ui::truncate_to_width(title, room as usize);
        let width = text_width(&shown);
        let start = left + 1 + (area.width - 2 - width - 2) / 2;
        frame.set_cell(start, top, " ", header);
        frame.set_string(start + 1, top, &shown, header);
        frame.set_cell(start + 1 + width, top, " ", header);
    }
}

/// Identity frame: the content fills the whole window.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDecorations;

impl WindowDecorationRenderer for NoDecorations {
    fn extra_size(&self) -> Size {
        Size::ZERO
    }

    fn content_offset(&self) -> Size {
        Size::ZERO
    }

    fn title_bar(&self, _decorated: Size) -> Option<Rect> {
        None
    }

    fn draw(&self, _frame: &mut UiFrame<'_>, _area: Rect, _title: &str, _active: bool, _theme: &Theme) {}
}
