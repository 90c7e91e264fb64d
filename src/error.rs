//! Error types shared across the toolkit.
//!
//! Navigation failures are never errors (they surface as `None`), and end of
//! input is an event, not an error. What remains here is structural misuse of
//! the component tree or window list, and I/O from the screen.

use std::io;

use thiserror::Error;

use crate::component::NodeId;
use crate::window::WindowId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("component {0:?} does not exist (removed or never created)")]
    UnknownNode(NodeId),
    #[error("component {0:?} cannot hold children")]
    NotAContainer(NodeId),
    #[error("component {0:?} is not a single-child composite")]
    NotAComposite(NodeId),
    #[error("component {0:?} is not interactable")]
    NotInteractable(NodeId),
    #[error("adding {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
    #[error("component {0:?} is a pane root and cannot be re-parented or removed")]
    PaneRoot(NodeId),
}

#[derive(Debug, Error)]
pub enum GuiError {
    #[error("screen i/o error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("window {0:?} is not part of this gui")]
    UnknownWindow(WindowId),
    #[error("the gui thread has stopped accepting tasks")]
    GuiThreadStopped,
    #[error("invoke_and_wait called from the gui thread through a handle; use the gui directly")]
    WaitOnGuiThread,
}
