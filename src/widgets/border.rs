use ratatui::layout::{Rect, Size};
use ratatui::widgets::{Block, Borders};

use crate::component::{ComponentContext, Widget};
use crate::ui::UiFrame;

/// One-cell frame around a single child, with an optional title on the top
/// edge. Used as the widget of a composite node.
#[derive(Debug, Clone, Default)]
pub struct Border {
    title: Option<String>,
}

impl Border {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titled<T: Into<String>>(title: T) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}

impl Widget for Border {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .style(ctx.theme().normal);
        if let Some(title) = &self.title {
            block = block.title(title.as_str());
        }
        frame.render_widget(block, area);
    }

    fn preferred_size(&self) -> Size {
        Size::new(2, 2)
    }

    fn content_area(&self, area: Rect) -> Rect {
        Block::default().borders(Borders::ALL).inner(area)
    }

    fn decoration_size(&self) -> Size {
        Size::new(2, 2)
    }
}
