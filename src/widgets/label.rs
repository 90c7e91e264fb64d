use ratatui::layout::{Rect, Size};
use ratatui::style::Style;

use crate::component::{ComponentContext, Widget};
use crate::ui::UiFrame;
use crate::widgets::text_width;

/// Static, possibly multi-line text.
#[derive(Debug, Clone, Default)]
pub struct Label {
    text: String,
    style: Option<Style>,
}

impl Label {
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text<T: Into<String>>(&mut self, text: T) {
        self.text = text.into();
    }

    /// Draw with `style` instead of the theme's.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}

impl Widget for Label {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let style = self.style.unwrap_or_else(|| ctx.style());
        frame.fill(area, style);
        for (row, line) in self.text.lines().enumerate() {
            let y = area.y.saturating_add(row as u16);
            if y >= area.bottom() {
                break;
            }
            frame.set_string(area.x, y, line, style);
        }
    }

    fn preferred_size(&self) -> Size {
        let width = self.text.lines().map(text_width).max().unwrap_or(0);
        let height = self.text.lines().count().max(1) as u16;
        Size::new(width, height)
    }

    fn theme_class(&self) -> &'static str {
        "label"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    #[test]
    fn preferred_size_spans_every_line() {
        assert_eq!(Label::new("ab\nlonger").preferred_size(), Size::new(6, 2));
        assert_eq!(Label::new("").preferred_size(), Size::new(0, 1));
    }

    #[test]
    fn renders_lines_inside_its_area() {
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        Label::new("hello\nyo").render(&mut frame, area, &ComponentContext::default());
        assert_eq!(buf.cell((3, 0)).unwrap().symbol(), "l");
        assert_eq!(buf.cell((1, 1)).unwrap().symbol(), "o");
        assert_eq!(buf.cell((2, 1)).unwrap().symbol(), " ");
    }
}
