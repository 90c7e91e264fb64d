use ratatui::layout::{Rect, Size};

use super::{LayoutChild, LayoutManager};

/// Leaves children where they were put. Each child is sized to its
/// preferred size at its own position.
#[derive(Debug, Default, Clone, Copy)]
pub struct AbsoluteLayout;

impl AbsoluteLayout {
    pub fn new() -> Self {
        Self
    }
}

impl LayoutManager for AbsoluteLayout {
    fn preferred_size(&self, children: &[LayoutChild]) -> Size {
        children
            .iter()
            .filter(|c| c.visible)
            .fold(Size::ZERO, |acc, c| {
                Size::new(
                    acc.width
                        .max(c.position.x.saturating_add(c.preferred.width)),
                    acc.height
                        .max(c.position.y.saturating_add(c.preferred.height)),
                )
            })
    }

    fn compute_layout(&mut self, _area: Size, children: &[LayoutChild]) -> Vec<Rect> {
        children
            .iter()
            .map(|c| {
                if c.visible {
                    Rect::from((c.position, c.preferred))
                } else {
                    Rect::ZERO
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Position;

    #[test]
    fn children_keep_their_positions() {
        let mut child = LayoutChild::new(Size::new(3, 1));
        child.position = Position::new(5, 2);
        let mut hidden = LayoutChild::new(Size::new(50, 50));
        hidden.visible = false;
        let mut layout = AbsoluteLayout::new();
        assert_eq!(
            layout.compute_layout(Size::new(10, 10), &[child, hidden]),
            vec![Rect::new(5, 2, 3, 1), Rect::ZERO]
        );
        assert_eq!(layout.preferred_size(&[child, hidden]), Size::new(8, 3));
    }
}
