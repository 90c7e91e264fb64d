//! The character grid the compositor draws into and reads input from.

pub mod terminal;
pub mod virtual_screen;

pub use terminal::TerminalScreen;
pub use virtual_screen::{VirtualInput, VirtualScreen};

use std::io;

use ratatui::buffer::{Buffer, Cell};
use ratatui::layout::{Position, Size};
use ratatui::style::Style;

use crate::event::InputEvent;

pub trait Screen {
    fn size(&self) -> Size;

    /// Back buffer. Changes become visible on the next `refresh`.
    fn buffer(&self) -> &Buffer;
    fn buffer_mut(&mut self) -> &mut Buffer;

    fn set_cell(&mut self, position: Position, symbol: &str, style: Style) {
        if let Some(cell) = self.buffer_mut().cell_mut(position) {
            cell.set_symbol(symbol);
            cell.set_style(style);
        }
    }

    fn get_cell(&self, position: Position) -> Option<&Cell> {
        self.buffer().cell(position)
    }

    /// Show the cursor at `position`, or hide it.
    fn set_cursor(&mut self, position: Option<Position>);
    fn cursor(&self) -> Option<Position>;

    /// Next event if one is ready, without blocking.
    fn poll_input(&mut self) -> io::Result<Option<InputEvent>>;

    /// Next event, waiting for one.
    fn read_input(&mut self) -> io::Result<InputEvent>;

    /// Resize the back buffer after the surface changed size.
    fn resize(&mut self, size: Size) -> io::Result<()>;

    fn refresh(&mut self) -> io::Result<()>;
}
