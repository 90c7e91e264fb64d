use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect, Size};

use super::Screen;
use crate::event::InputEvent;

/// Cloneable handle for feeding input to a [`VirtualScreen`], possibly from
/// another thread.
#[derive(Debug, Clone, Default)]
pub struct VirtualInput {
    queue: Arc<Mutex<VecDeque<InputEvent>>>,
}

impl VirtualInput {
    pub fn push(&self, event: InputEvent) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(event);
    }

    pub fn extend(&self, events: impl IntoIterator<Item = InputEvent>) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(events);
    }

    pub fn len(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn pop(&self) -> Option<InputEvent> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

/// In-memory screen with a scripted input queue. Used headless and by tests.
///
/// A blocking read on an empty queue returns `Eof`, since nothing could ever
/// arrive to wake it.
#[derive(Debug)]
pub struct VirtualScreen {
    front: Buffer,
    back: Buffer,
    cursor: Option<Position>,
    input: VirtualInput,
    refreshes: usize,
}

impl VirtualScreen {
    pub fn new(size: Size) -> Self {
        let area = Rect::from((Position::ORIGIN, size));
        Self {
            front: Buffer::empty(area),
            back: Buffer::empty(area),
            cursor: None,
            input: VirtualInput::default(),
            refreshes: 0,
        }
    }

    pub fn input(&self) -> VirtualInput {
        self.input.clone()
    }

    pub fn push_input(&self, event: InputEvent) {
        self.input.push(event);
    }

    /// What the last `refresh` presented.
    pub fn front(&self) -> &Buffer {
        &self.front
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    /// Row `y` of the presented buffer as a string.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.front.area.width)
            .filter_map(|x| self.front.cell((x, y)))
            .map(|cell| cell.symbol())
            .collect()
    }
}

impl Screen for VirtualScreen {
    fn size(&self) -> Size {
        self.back.area.as_size()
    }

    fn buffer(&self) -> &Buffer {
        &self.back
    }

    fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.back
    }

    fn set_cursor(&mut self, position: Option<Position>) {
        self.cursor = position;
    }

    fn cursor(&self) -> Option<Position> {
        self.cursor
    }

    fn poll_input(&mut self) -> io::Result<Option<InputEvent>> {
        Ok(self.input.pop())
    }

    fn read_input(&mut self) -> io::Result<InputEvent> {
        Ok(self.input.pop().unwrap_or(InputEvent::Eof))
    }

    fn resize(&mut self, size: Size) -> io::Result<()> {
        let area = Rect::from((Position::ORIGIN, size));
        self.back.resize(area);
        self.front.resize(area);
        Ok(())
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.front.clone_from(&self.back);
        self.refreshes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use ratatui::style::Style;

    #[test]
    fn refresh_presents_the_back_buffer() {
        let mut screen = VirtualScreen::new(Size::new(3, 1));
        screen.set_cell(Position::new(1, 0), "x", Style::default());
        assert_eq!(screen.row_text(0), "   ");
        screen.refresh().unwrap();
        assert_eq!(screen.row_text(0), " x ");
        assert_eq!(screen.refresh_count(), 1);
    }

    #[test]
    fn input_drains_in_order_then_reports_eof() {
        let mut screen = VirtualScreen::new(Size::new(1, 1));
        let input = screen.input();
        input.extend([InputEvent::key(KeyCode::Tab), InputEvent::key(KeyCode::Enter)]);
        assert_eq!(screen.poll_input().unwrap(), Some(InputEvent::key(KeyCode::Tab)));
        assert_eq!(screen.read_input().unwrap(), InputEvent::key(KeyCode::Enter));
        assert_eq!(screen.poll_input().unwrap(), None);
        assert_eq!(screen.read_input().unwrap(), InputEvent::Eof);
    }

    #[test]
    fn resize_keeps_cells_addressable() {
        let mut screen = VirtualScreen::new(Size::new(2, 2));
        screen.resize(Size::new(5, 4)).unwrap();
        assert_eq!(screen.size(), Size::new(5, 4));
        assert!(screen.get_cell(Position::new(4, 3)).is_some());
    }
}
