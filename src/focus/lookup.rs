//! Per-frame spatial index of a pane's focusable interactables.
//!
//! The map is a grid the size of the pane where each cell holds an index into
//! the interactables captured during the last draw. It answers hit tests for
//! the mouse and drives arrow-key navigation.

use ratatui::layout::{Position, Rect, Size};

use crate::component::{ComponentTree, NodeId};
use crate::focus::FocusChangeDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    /// Searching up or down; the lateral scan walks columns.
    Vertical,
    /// Searching left or right; the lateral scan walks rows.
    Horizontal,
}

#[derive(Debug, Default, Clone)]
pub struct InteractableLookupMap {
    size: Size,
    cells: Vec<Option<usize>>,
    interactables: Vec<NodeId>,
}

impl InteractableLookupMap {
    pub fn new(size: Size) -> Self {
        let mut map = Self::default();
        map.reset(size);
        map
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Clear every cell, resizing the grid only if `size` changed.
    pub fn reset(&mut self, size: Size) {
        let len = size.width as usize * size.height as usize;
        if self.size != size || self.cells.len() != len {
            self.size = size;
            self.cells = vec![None; len];
        } else {
            self.cells.fill(None);
        }
        self.interactables.clear();
    }

    /// Clear the grid and stamp every focusable interactable of `tree`.
    pub fn rebuild(&mut self, tree: &ComponentTree, size: Size) {
        self.reset(size);
        for id in tree.tab_order() {
            if let Some(bounds) = tree.bounds_in_pane(id) {
                self.add(id, bounds);
            }
        }
    }

    /// Stamp `id` over `bounds`, clipped to the grid.
    pub fn add(&mut self, id: NodeId, bounds: Rect) {
        let clipped = bounds.intersection(Rect::from((Position::ORIGIN, self.size)));
        if clipped.is_empty() {
            return;
        }
        let index = self.interactables.len();
        self.interactables.push(id);
        for y in clipped.top()..clipped.bottom() {
            for x in clipped.left()..clipped.right() {
                let cell = self.cell_index(x as i32, y as i32);
                if let Some(cell) = cell {
                    self.cells[cell] = Some(index);
                }
            }
        }
    }

    pub fn interactables(&self) -> &[NodeId] {
        &self.interactables
    }

    fn cell_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.size.width as i32 || y >= self.size.height as i32 {
            return None;
        }
        Some(y as usize * self.size.width as usize + x as usize)
    }

    fn lookup(&self, x: i32, y: i32) -> Option<NodeId> {
        let cell = self.cell_index(x, y)?;
        self.cells[cell].map(|index| self.interactables[index])
    }

    /// The interactable covering `point`, if any.
    pub fn at(&self, point: Position) -> Option<NodeId> {
        self.lookup(point.x as i32, point.y as i32)
    }

    /// Nearest interactable from `from` in a spatial direction. Tab-order and
    /// non-spatial directions return `None`.
    pub fn find_next(
        &self,
        tree: &ComponentTree,
        from: NodeId,
        direction: FocusChangeDirection,
    ) -> Option<NodeId> {
        match direction {
            FocusChangeDirection::Up => self.find_next_up(tree, from),
            FocusChangeDirection::Down => self.find_next_down(tree, from),
            FocusChangeDirection::Left => self.find_next_left(tree, from),
            FocusChangeDirection::Right => self.find_next_right(tree, from),
            _ => None,
        }
    }

    pub fn find_next_up(&self, tree: &ComponentTree, from: NodeId) -> Option<NodeId> {
        self.search(tree, from, Axis::Vertical, -1)
    }

    pub fn find_next_down(&self, tree: &ComponentTree, from: NodeId) -> Option<NodeId> {
        self.search(tree, from, Axis::Vertical, 1)
    }

    pub fn find_next_left(&self, tree: &ComponentTree, from: NodeId) -> Option<NodeId> {
        self.search(tree, from, Axis::Horizontal, -1)
    }

    pub fn find_next_right(&self, tree: &ComponentTree, from: NodeId) -> Option<NodeId> {
        self.search(tree, from, Axis::Horizontal, 1)
    }

    /// Start point of a search in pane coordinates: the cursor if the widget
    /// shows one, pushed to the leading edge, otherwise the leading corner.
    fn start_point(
        tree: &ComponentTree,
        from: NodeId,
        axis: Axis,
        step: i32,
    ) -> Option<(i32, i32)> {
        let size = tree.size(from)?;
        let last_col = size.width.saturating_sub(1);
        let last_row = size.height.saturating_sub(1);
        let forward = step > 0;
        let local = match (axis, tree.cursor_location(from)) {
            (Axis::Vertical, Some(cursor)) => {
                Position::new(cursor.x, if forward { last_row } else { 0 })
            }
            (Axis::Vertical, None) => Position::new(0, if forward { last_row } else { 0 }),
            (Axis::Horizontal, Some(cursor)) => {
                Position::new(if forward { last_col } else { 0 }, cursor.y)
            }
            (Axis::Horizontal, None) => Position::new(if forward { last_col } else { 0 }, 0),
        };
        let global = tree.to_base_pane(from, local)?;
        Some((global.x as i32, global.y as i32))
    }

    /// Everything on the start row (vertical search) or start column
    /// (horizontal search). These are never picked, even when they sit far
    /// outside the lateral envelope.
    fn disqualified(&self, start: (i32, i32), axis: Axis) -> Vec<NodeId> {
        let mut out = Vec::new();
        let (len, fixed) = match axis {
            Axis::Vertical => (self.size.width as i32, start.1),
            Axis::Horizontal => (self.size.height as i32, start.0),
        };
        for i in 0..len {
            let hit = match axis {
                Axis::Vertical => self.lookup(i, fixed),
                Axis::Horizontal => self.lookup(fixed, i),
            };
            if let Some(id) = hit
                && !out.contains(&id)
            {
                out.push(id);
            }
        }
        out
    }

    fn search(&self, tree: &ComponentTree, from: NodeId, axis: Axis, step: i32) -> Option<NodeId> {
        let (sx, sy) = Self::start_point(tree, from, axis, step)?;
        let disqualified = self.disqualified((sx, sy), axis);
        let origin = tree.base_position(from)?;
        let extent = tree.size(from)?;

        // Lateral envelope: the band the origin component spans, clamped to
        // the map.
        let (low, high, start_lateral, start_main, main_len) = match axis {
            Axis::Vertical => {
                let low = (origin.x as i32).max(0);
                let high = (origin.x as i32 + extent.width as i32 - 1)
                    .min(self.size.width as i32 - 1);
                (low, high, sx, sy, self.size.height as i32)
            }
            Axis::Horizontal => {
                let low = (origin.y as i32).max(0);
                let high = (origin.y as i32 + extent.height as i32 - 1)
                    .min(self.size.height as i32 - 1);
                (low, high, sy, sx, self.size.width as i32)
            }
        };
        let max_shift = (start_lateral - low).max(high - start_lateral);

        let mut main = start_main + step;
        while main >= 0 && main < main_len {
            for shift in 0..=max_shift.max(-1) {
                for sign in [1, -1] {
                    if shift == 0 && sign == -1 {
                        break;
                    }
                    let lateral = start_lateral + shift * sign;
                    if lateral < low || lateral > high {
                        continue;
                    }
                    let hit = match axis {
                        Axis::Vertical => self.lookup(lateral, main),
                        Axis::Horizontal => self.lookup(main, lateral),
                    };
                    if let Some(id) = hit
                        && !disqualified.contains(&id)
                    {
                        return Some(id);
                    }
                }
            }
            main += step;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::AbsoluteLayout;
    use crate::widgets::{Button, Panel};

    /// Buttons placed at absolute rects inside a content panel.
    fn grid(rects: &[Rect]) -> (ComponentTree, Vec<NodeId>, InteractableLookupMap) {
        let mut tree = ComponentTree::new();
        let panel = tree.create_container(Panel::new(), AbsoluteLayout::new());
        tree.set_content(panel).unwrap();
        let ids: Vec<NodeId> = rects
            .iter()
            .enumerate()
            .map(|(i, rect)| {
                let id = tree.create_interactable(Button::new(format!("{i}")));
                tree.add_child(panel, id).unwrap();
                tree.set_position(id, rect.as_position()).unwrap();
                tree.set_preferred_size(id, Some(rect.as_size())).unwrap();
                id
            })
            .collect();
        tree.layout(panel, Size::new(20, 10)).unwrap();
        let mut map = InteractableLookupMap::default();
        map.rebuild(&tree, Size::new(20, 10));
        (tree, ids, map)
    }

    #[test]
    fn at_is_none_outside_the_grid() {
        let (_, ids, map) = grid(&[Rect::new(0, 0, 4, 1)]);
        assert_eq!(map.at(Position::new(0, 0)), Some(ids[0]));
        assert_eq!(map.at(Position::new(3, 0)), Some(ids[0]));
        assert_eq!(map.at(Position::new(4, 0)), None);
        assert_eq!(map.at(Position::new(20, 0)), None);
        assert_eq!(map.at(Position::new(0, 10)), None);

        let empty = InteractableLookupMap::new(Size::ZERO);
        assert_eq!(empty.at(Position::ORIGIN), None);
    }

    #[test]
    fn stamps_are_clipped_to_the_grid() {
        let mut map = InteractableLookupMap::new(Size::new(5, 5));
        let mut tree = ComponentTree::new();
        let id = tree.create_interactable(Button::new("wide"));
        map.add(id, Rect::new(3, 3, 10, 10));
        assert_eq!(map.at(Position::new(4, 4)), Some(id));
        assert_eq!(map.at(Position::new(2, 2)), None);
    }

    #[test]
    fn down_prefers_nearest_row_then_nearest_column() {
        // a above; b straight below; c further below.
        let (tree, ids, map) = grid(&[
            Rect::new(2, 0, 6, 1),
            Rect::new(4, 3, 4, 1),
            Rect::new(2, 6, 6, 1),
        ]);
        assert_eq!(map.find_next_down(&tree, ids[0]), Some(ids[1]));
        assert_eq!(map.find_next_down(&tree, ids[1]), Some(ids[2]));
        assert_eq!(map.find_next_down(&tree, ids[2]), None);
        assert_eq!(map.find_next_up(&tree, ids[2]), Some(ids[1]));
    }

    #[test]
    fn same_row_neighbors_are_never_picked_by_vertical_search() {
        // a and b share row 0; c sits below b only.
        let (tree, ids, map) = grid(&[
            Rect::new(0, 0, 4, 1),
            Rect::new(5, 0, 4, 1),
            Rect::new(5, 2, 4, 1),
        ]);
        // c lies outside a's column band.
        assert_eq!(map.find_next_down(&tree, ids[0]), None);
        assert_eq!(map.find_next_down(&tree, ids[1]), Some(ids[2]));
    }

    #[test]
    fn right_scans_columns_from_the_right_edge() {
        let (tree, ids, map) = grid(&[
            Rect::new(0, 0, 3, 2),
            Rect::new(5, 1, 3, 1),
            Rect::new(10, 0, 3, 1),
        ]);
        assert_eq!(map.find_next_right(&tree, ids[0]), Some(ids[1]));
        assert_eq!(map.find_next_left(&tree, ids[1]), Some(ids[0]));
        assert_eq!(map.find_next_left(&tree, ids[0]), None);
    }

    #[test]
    fn lateral_scan_stays_inside_origin_band() {
        // The nearer candidate sits one column left of `from`, outside the
        // columns it spans, so the search keeps going to the next row.
        let (tree, ids, map) = grid(&[
            Rect::new(4, 0, 3, 1),
            Rect::new(3, 2, 1, 1),
            Rect::new(6, 3, 1, 1),
        ]);
        assert_eq!(map.find_next_down(&tree, ids[0]), Some(ids[2]));
    }

    #[test]
    fn detached_origin_yields_no_target() {
        let (mut tree, ids, map) = grid(&[Rect::new(0, 0, 3, 1), Rect::new(0, 2, 3, 1)]);
        let stray = tree.create_interactable(Button::new("stray"));
        assert_eq!(map.find_next_down(&tree, stray), None);
        assert_eq!(map.find_next(&tree, ids[0], FocusChangeDirection::Next), None);
    }
}
