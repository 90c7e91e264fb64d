//! Focus vocabulary shared by widgets, the component tree and root panes.

pub mod lookup;

pub use lookup::InteractableLookupMap;

use crate::component::NodeId;

/// Why focus moved. Carried to focus listeners on both sides of a
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusChangeDirection {
    /// Forward in tab order.
    Next,
    /// Backward in tab order.
    Previous,
    Up,
    Down,
    Left,
    Right,
    /// Moved directly, e.g. by a mouse click or a programmatic jump.
    Teleport,
    /// Cleared or reset, e.g. because the focused component went away.
    Reset,
}

impl FocusChangeDirection {
    pub fn is_spatial(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }

    /// Tab-order equivalent of a spatial direction: up/left go backward,
    /// down/right go forward. Non-spatial directions are returned as-is.
    pub fn as_tab_order(self) -> Self {
        match self {
            Self::Up | Self::Left => Self::Previous,
            Self::Down | Self::Right => Self::Next,
            other => other,
        }
    }
}

/// What an interactable did with an event delivered to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    Handled,
    Unhandled,
    MoveFocus(FocusChangeDirection),
}

/// A focus transition as seen by listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEvent {
    Gained {
        direction: FocusChangeDirection,
        previous: Option<NodeId>,
    },
    Lost {
        direction: FocusChangeDirection,
    },
}

pub type FocusListener = Box<dyn FnMut(FocusEvent)>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spatial_directions_fold_onto_tab_order() {
        assert_eq!(
            FocusChangeDirection::Up.as_tab_order(),
            FocusChangeDirection::Previous
        );
        assert_eq!(
            FocusChangeDirection::Right.as_tab_order(),
            FocusChangeDirection::Next
        );
        assert_eq!(
            FocusChangeDirection::Teleport.as_tab_order(),
            FocusChangeDirection::Teleport
        );
        assert!(!FocusChangeDirection::Next.is_spatial());
    }
}
