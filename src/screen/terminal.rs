use std::io;
use std::time::Duration;

use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect, Size};

use super::Screen;
use crate::drivers::InputDriver;
use crate::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use crate::drivers::keyboard::KeyboardNormalizer;
use crate::event::InputEvent;

/// The real terminal: alternate screen, raw mode and mouse capture for as
/// long as the value lives.
pub struct TerminalScreen {
    input: ConsoleInputDriver,
    output: ConsoleOutputDriver,
    normalizer: KeyboardNormalizer,
    back: Buffer,
    cursor: Option<Position>,
}

impl TerminalScreen {
    pub fn new() -> io::Result<Self> {
        let mut output = ConsoleOutputDriver::new()?;
        output.enter()?;
        let mut input = ConsoleInputDriver::new();
        input.set_mouse_capture(true)?;
        let size = output.size()?;
        Ok(Self {
            input,
            output,
            normalizer: KeyboardNormalizer::new(),
            back: Buffer::empty(Rect::from((Position::ORIGIN, size))),
            cursor: None,
        })
    }

    fn next_ready(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>> {
        while self.input.poll(timeout)? {
            if let Some(event) = self.normalizer.normalize(self.input.read()?) {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }
}

impl Screen for TerminalScreen {
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
        self.next_ready(Duration::ZERO)
    }

    fn read_input(&mut self) -> io::Result<InputEvent> {
        loop {
            if let Some(event) = self.normalizer.normalize(self.input.read()?) {
                return Ok(event);
            }
        }
    }

    fn resize(&mut self, size: Size) -> io::Result<()> {
        self.back.resize(Rect::from((Position::ORIGIN, size)));
        self.output.autoresize()
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.output.present(&self.back, self.cursor)
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        let _ = self.input.set_mouse_capture(false);
    }
}
