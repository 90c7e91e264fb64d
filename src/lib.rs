//! Character-cell UI toolkit: a component tree with spatial focus
//! navigation, root panes that dispatch input through it, and a compositor
//! that stacks decorated windows on a screen.

pub mod component;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event;
pub mod event_loop;
pub mod focus;
pub mod gui;
pub mod gui_thread;
pub mod keybindings;
pub mod layout;
pub mod logging;
pub mod root_pane;
pub mod screen;
pub mod theme;
pub mod ui;
pub mod widgets;
pub mod window;

pub use error::{GuiError, TreeError};
pub use event::InputEvent;
pub use event_loop::{ControlFlow, EventLoop};
pub use gui::{GuiConfig, MultiWindowGui};
pub use gui_thread::{GuiHandle, spawn_gui_thread};
pub use root_pane::RootPane;
pub use window::{Hints, Window, WindowId};
