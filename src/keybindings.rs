use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::focus::FocusChangeDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Tab order
    FocusNext,
    FocusPrev,
    // Spatial navigation
    FocusUp,
    FocusDown,
    FocusLeft,
    FocusRight,
    // Interactable actions
    Activate,
    Toggle,
}

impl Action {
    /// The focus transition an action requests, if it is a navigation action.
    pub fn focus_direction(self) -> Option<FocusChangeDirection> {
        match self {
            Action::FocusNext => Some(FocusChangeDirection::Next),
            Action::FocusPrev => Some(FocusChangeDirection::Previous),
            Action::FocusUp => Some(FocusChangeDirection::Up),
            Action::FocusDown => Some(FocusChangeDirection::Down),
            Action::FocusLeft => Some(FocusChangeDirection::Left),
            Action::FocusRight => Some(FocusChangeDirection::Right),
            Action::Activate | Action::Toggle => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::FocusNext => "Focus next (Tab)",
            Action::FocusPrev => "Focus previous (BackTab)",
            Action::FocusUp => "Focus up",
            Action::FocusDown => "Focus down",
            Action::FocusLeft => "Focus left",
            Action::FocusRight => "Focus right",
            Action::Activate => "Activate",
            Action::Toggle => "Toggle",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "BackTab".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(FocusNext, KeyCombo::new(KeyCode::Tab, KeyModifiers::NONE));
        kb.add(
            FocusPrev,
            KeyCombo::new(KeyCode::BackTab, KeyModifiers::NONE),
        );
        kb.add(FocusUp, KeyCombo::new(KeyCode::Up, KeyModifiers::NONE));
        kb.add(FocusDown, KeyCombo::new(KeyCode::Down, KeyModifiers::NONE));
        kb.add(FocusLeft, KeyCombo::new(KeyCode::Left, KeyModifiers::NONE));
        kb.add(
            FocusRight,
            KeyCombo::new(KeyCode::Right, KeyModifiers::NONE),
        );
        kb.add(Activate, KeyCombo::new(KeyCode::Enter, KeyModifiers::NONE));
        kb.add(
            Toggle,
            KeyCombo::new(KeyCode::Char(' '), KeyModifiers::NONE),
        );
        kb.add(Toggle, KeyCombo::new(KeyCode::Enter, KeyModifiers::NONE));
        kb
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    /// The navigation direction bound to `key`, if any.
    pub fn focus_direction_for(&self, key: &KeyEvent) -> Option<FocusChangeDirection> {
        [
            Action::FocusNext,
            Action::FocusPrev,
            Action::FocusUp,
            Action::FocusDown,
            Action::FocusLeft,
            Action::FocusRight,
        ]
        .into_iter()
        .find(|action| self.matches(*action, key))
        .and_then(Action::focus_direction)
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }
}

/// Keys that pick an initial focus target on a pane that has none:
/// forward keys start from the front of the tab order, backward keys from
/// the back.
pub fn initial_focus_direction(key: &KeyEvent) -> Option<FocusChangeDirection> {
    if !key.modifiers.is_empty() && key.modifiers != KeyModifiers::SHIFT {
        return None;
    }
    match key.code {
        KeyCode::Tab | KeyCode::Right | KeyCode::Down => Some(FocusChangeDirection::Next),
        KeyCode::BackTab | KeyCode::Up | KeyCode::Left => Some(FocusChangeDirection::Previous),
        _ => None,
    }
}
