use std::thread;
use std::time::Duration;

use crate::error::GuiError;
use crate::gui::MultiWindowGui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// Drives a gui on the current thread.
///
/// Each turn runs one processing pass (queued tasks, then all buffered input,
/// then at most one redraw). In polling mode a pass that found nothing to do
/// is followed by a sleep of `poll_interval`; in blocking mode the pass itself
/// waits on the screen for input.
#[derive(Debug, Clone, Copy)]
pub struct EventLoop {
    poll_interval: Duration,
}

impl EventLoop {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Run until end of input or a stop request.
    pub fn run(&self, gui: &mut MultiWindowGui) -> Result<(), GuiError> {
        loop {
            let pass = gui.process_pass()?;
            if pass.quit {
                tracing::debug!("event loop finished");
                return Ok(());
            }
            if pass.is_idle() && !gui.config().blocking_io {
                thread::sleep(self.poll_interval);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InputEvent;
    use crate::screen::VirtualScreen;
    use crossterm::event::KeyCode;
    use ratatui::layout::Size;

    #[test]
    fn runs_until_eof_after_draining_earlier_input() {
        let screen = VirtualScreen::new(Size::new(20, 5));
        let input = screen.input();
        input.extend([InputEvent::key(KeyCode::Tab), InputEvent::Eof]);
        let mut gui = MultiWindowGui::new(screen);
        EventLoop::new(Duration::from_millis(1)).run(&mut gui).unwrap();
        assert!(input.is_empty());
    }

    #[test]
    fn stop_request_ends_the_loop() {
        let mut gui = MultiWindowGui::new(VirtualScreen::new(Size::new(20, 5)));
        gui.handle().stop();
        EventLoop::new(Duration::from_millis(1)).run(&mut gui).unwrap();
    }
}
