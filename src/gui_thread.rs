//! Cross-thread access to a gui.
//!
//! All gui state lives on one thread. Other threads talk to it by queueing
//! closures through a [`GuiHandle`]; the gui drains the queue at the start of
//! every processing pass and runs each task with `&mut MultiWindowGui`.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle, ThreadId};

use crate::error::GuiError;
use crate::event_loop::EventLoop;
use crate::gui::MultiWindowGui;

pub type Task = Box<dyn FnOnce(&mut MultiWindowGui) + Send + 'static>;

/// Receiving end of the task channel, owned by the gui.
#[derive(Debug)]
pub struct TaskQueue {
    sender: Sender<Task>,
    receiver: Receiver<Task>,
    stop: Arc<AtomicBool>,
    gui_thread: ThreadId,
}

impl TaskQueue {
    /// Bound to the calling thread, which becomes the gui thread.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            stop: Arc::new(AtomicBool::new(false)),
            gui_thread: thread::current().id(),
        }
    }

    pub fn handle(&self) -> GuiHandle {
        GuiHandle {
            sender: self.sender.clone(),
            stop: Arc::clone(&self.stop),
            gui_thread: self.gui_thread,
        }
    }

    /// Everything queued so far, in submission order.
    pub fn drain(&self) -> Vec<Task> {
        self.receiver.try_iter().collect()
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub fn is_gui_thread(&self) -> bool {
        thread::current().id() == self.gui_thread
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable, `Send` handle for scheduling work on the gui thread.
#[derive(Debug, Clone)]
pub struct GuiHandle {
    sender: Sender<Task>,
    stop: Arc<AtomicBool>,
    gui_thread: ThreadId,
}

impl GuiHandle {
    /// Queue `task` to run on the gui thread during its next pass.
    pub fn invoke_later<F>(&self, task: F) -> Result<(), GuiError>
    where
        F: FnOnce(&mut MultiWindowGui) + Send + 'static,
    {
        if self.is_stopped() {
            return Err(GuiError::GuiThreadStopped);
        }
        self.sender
            .send(Box::new(task))
            .map_err(|_| GuiError::GuiThreadStopped)
    }

    /// Queue `task` and block until the gui thread has run it.
    ///
    /// Calling this from the gui thread itself would deadlock, so it fails
    /// with [`GuiError::WaitOnGuiThread`]; use the gui directly there.
    pub fn invoke_and_wait<F, R>(&self, task: F) -> Result<R, GuiError>
    where
        F: FnOnce(&mut MultiWindowGui) -> R + Send + 'static,
        R: Send + 'static,
    {
        if thread::current().id() == self.gui_thread {
            return Err(GuiError::WaitOnGuiThread);
        }
        let (done, wait) = mpsc::sync_channel(1);
        self.invoke_later(move |gui| {
            let _ = done.send(task(gui));
        })?;
        // The sender is dropped unrun if the gui goes away first.
        wait.recv().map_err(|_| GuiError::GuiThreadStopped)
    }

    /// Ask the gui thread to leave its event loop after the current pass.
    pub fn stop(&self) {
        tracing::debug!("gui stop requested");
        self.stop.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

/// A gui running on its own thread.
#[derive(Debug)]
pub struct GuiThread {
    handle: GuiHandle,
    join: JoinHandle<Result<(), GuiError>>,
}

impl GuiThread {
    pub fn handle(&self) -> &GuiHandle {
        &self.handle
    }

    /// Wait for the gui thread to finish and return how its loop ended.
    pub fn join(self) -> Result<(), GuiError> {
        self.join.join().map_err(|_| GuiError::GuiThreadStopped)?
    }
}

/// Build a gui on a new thread with `builder` and run its event loop there
/// until end of input or [`GuiHandle::stop`].
pub fn spawn_gui_thread<F>(builder: F) -> Result<GuiThread, GuiError>
where
    F: FnOnce() -> Result<MultiWindowGui, GuiError> + Send + 'static,
{
    let (ready, handle_rx) = mpsc::sync_channel(1);
    let join = thread::Builder::new()
        .name("term-kit-gui".into())
        .spawn(move || {
            let mut gui = builder()?;
            let _ = ready.send(gui.handle());
            tracing::debug!("gui thread started");
            let result = EventLoop::new(gui.config().poll_interval).run(&mut gui);
            tracing::debug!(ok = result.is_ok(), "gui thread finished");
            result
        })?;
    match handle_rx.recv() {
        Ok(handle) => Ok(GuiThread { handle, join }),
        // The builder failed before producing a handle; surface its error.
        Err(_) => match join.join() {
            Ok(Err(err)) => Err(err),
            _ => Err(GuiError::GuiThreadStopped),
        },
    }
}
