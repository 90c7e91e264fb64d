use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect, Size};

use super::{LayoutChild, LayoutManager};

/// Stacks visible children along one axis at their preferred length.
///
/// The main axis is split by ratatui's constraint solver (one `Length` per
/// child, packed from the start). On the cross axis a child gets its
/// preferred extent unless `fill` is set, in which case it spans the whole
/// container.
#[derive(Debug, Clone)]
pub struct LinearLayout {
    direction: Direction,
    spacing: u16,
    fill: bool,
    changed: bool,
}

impl LinearLayout {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            spacing: 0,
            fill: false,
            changed: true,
        }
    }

    pub fn vertical() -> Self {
        Self::new(Direction::Vertical)
    }

    pub fn horizontal() -> Self {
        Self::new(Direction::Horizontal)
    }

    pub fn with_spacing(mut self, spacing: u16) -> Self {
        self.set_spacing(spacing);
        self
    }

    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self.changed = true;
        self
    }

    pub fn set_spacing(&mut self, spacing: u16) {
        if self.spacing != spacing {
            self.spacing = spacing;
            self.changed = true;
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn main(&self, size: Size) -> u16 {
        match self.direction {
            Direction::Horizontal => size.width,
            Direction::Vertical => size.height,
        }
    }

    fn cross(&self, size: Size) -> u16 {
        match self.direction {
            Direction::Horizontal => size.height,
            Direction::Vertical => size.width,
        }
    }
}

impl LayoutManager for LinearLayout {
    fn preferred_size(&self, children: &[LayoutChild]) -> Size {
        let visible: Vec<Size> = children
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.preferred)
            .collect();
        let gaps = self
            .spacing
            .saturating_mul(visible.len().saturating_sub(1) as u16);
        let main = visible
            .iter()
            .fold(gaps, |acc, s| acc.saturating_add(self.main(*s)));
        let cross = visible.iter().map(|s| self.cross(*s)).max().unwrap_or(0);
        match self.direction {
            Direction::Horizontal => Size::new(main, cross),
            Direction::Vertical => Size::new(cross, main),
        }
    }

    fn compute_layout(&mut self, area: Size, children: &[LayoutChild]) -> Vec<Rect> {
        self.changed = false;
        let constraints: Vec<Constraint> = children
            .iter()
            .filter(|c| c.visible)
            .map(|c| Constraint::Length(self.main(c.preferred)))
            .collect();
        let slots = Layout::default()
            .direction(self.direction)
            .constraints(constraints)
            .spacing(self.spacing)
            .flex(Flex::Start)
            .split(Rect::new(0, 0, area.width, area.height));

        let mut slots = slots.iter();
        children
            .iter()
            .map(|child| {
                if !child.visible {
                    return Rect::ZERO;
                }
                let Some(slot) = slots.next().copied() else {
                    return Rect::ZERO;
                };
                if self.fill {
                    return slot;
                }
                match self.direction {
                    Direction::Horizontal => Rect {
                        height: slot.height.min(child.preferred.height),
                        ..slot
                    },
                    Direction::Vertical => Rect {
                        width: slot.width.min(child.preferred.width),
                        ..slot
                    },
                }
            })
            .collect()
    }

    fn has_pending_change(&self) -> bool {
        self.changed
    }
}
