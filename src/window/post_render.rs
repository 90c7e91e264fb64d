//! Effects drawn onto the screen after a window has been composited.
use std::fmt::Debug;

use crate::theme::Theme;
use crate::ui::{FloatRect, UiFrame};

pub trait WindowPostRenderer: Debug {
    /// `bounds` is the window's decorated rectangle in screen coordinates.
    fn post_render(&self, frame: &mut UiFrame<'_>, bounds: FloatRect, theme: &Theme);
}

/// Drop shadow two columns wide on the right and one row tall below.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowShadowRenderer;

impl WindowShadowRenderer {
    const WIDTH: u16 = 2;
}

impl WindowPostRenderer for WindowShadowRenderer {
    fn post_render(&self, frame: &mut UiFrame<'_>, bounds: FloatRect, theme: &Theme) {
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        let style = theme.definition("shadow").normal;
        let right = bounds.x + bounds.width as i32;
        let bottom = bounds.y + bounds.height as i32;
        let strips = [
            // Right edge, starting one row down.
            FloatRect {
                x: right,
                y: bounds.y + 1,
                width: Self::WIDTH,
                height: bounds.height,
            },
            // Bottom edge, starting two columns in.
            FloatRect {
                x: bounds.x + i32::from(Self::WIDTH),
                y: bottom,
                width: bounds.width,
                height: 1,
            },
        ];
        for strip in strips {
            if let Some(area) = strip.clip_to(frame.area()) {
                frame.patch_style(area, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;

    fn shaded(buffer: &Buffer, theme: &Theme) -> Vec<(u16, u16)> {
        let bg = theme.definition("shadow").normal.bg;
        let area = buffer.area;
        let mut cells = Vec::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if buffer[(x, y)].bg == bg.unwrap_or_default() {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    #[test]
    fn shadow_falls_right_and_below() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 10, 6);
        let mut buffer = Buffer::empty(area);
        buffer[(5, 2)].set_symbol("x");
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        let bounds = FloatRect { x: 1, y: 1, width: 4, height: 2 };
        WindowShadowRenderer.post_render(&mut frame, bounds, &theme);

        let cells = shaded(&buffer, &theme);
        assert_eq!(
            cells,
            vec![(5, 2), (6, 2), (3, 3), (4, 3), (5, 3), (6, 3)]
        );
        assert_eq!(buffer[(5, 2)].symbol(), "x");
    }

    #[test]
    fn shadow_of_offscreen_window_is_clipped() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 4, 4);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        let bounds = FloatRect { x: -5, y: -1, width: 4, height: 2 };
        WindowShadowRenderer.post_render(&mut frame, bounds, &theme);
        assert_eq!(shaded(&buffer, &theme), vec![(0, 0), (0, 1)]);
    }
}
