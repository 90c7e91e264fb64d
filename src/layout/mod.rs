//! Size negotiation for containers.
//!
//! A container hands its layout manager a snapshot of its children and gets
//! back one rectangle per child, relative to the container's own top-left.

pub mod absolute;
pub mod linear;

pub use absolute::AbsoluteLayout;
pub use linear::LinearLayout;

use ratatui::layout::{Position, Rect, Size};

/// What a layout manager sees of one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutChild {
    pub preferred: Size,
    pub position: Position,
    pub size: Size,
    pub visible: bool,
}

impl LayoutChild {
    pub fn new(preferred: Size) -> Self {
        Self {
            preferred,
            position: Position::ORIGIN,
            size: Size::ZERO,
            visible: true,
        }
    }
}

pub trait LayoutManager {
    /// Smallest size that fits every visible child at its preferred size.
    fn preferred_size(&self, children: &[LayoutChild]) -> Size;

    /// One rectangle per entry of `children`, in the same order. Hidden
    /// children get an empty rectangle.
    fn compute_layout(&mut self, area: Size, children: &[LayoutChild]) -> Vec<Rect>;

    /// True when the manager's own configuration changed since the last
    /// `compute_layout`.
    fn has_pending_change(&self) -> bool {
        false
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}
