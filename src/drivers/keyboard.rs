//! Cleans raw crossterm events before they reach the toolkit.
//!
//! Terminals disagree on Shift+Tab (some report `Tab` with SHIFT, some
//! `BackTab`) and Windows consoles report key releases and auto-repeats that
//! Unix terminals never send. Everything downstream matches on `BackTab` and
//! sees presses only.
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::event::InputEvent;

#[derive(Debug, Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate one raw event. `None` means drop it.
    pub fn normalize(&mut self, evt: Event) -> Option<InputEvent> {
        match evt {
            Event::Key(key) => self.normalize_key(key, cfg!(windows)).map(InputEvent::Key),
            other => InputEvent::from_crossterm(other),
        }
    }

    fn normalize_key(&mut self, mut key: KeyEvent, windows: bool) -> Option<KeyEvent> {
        if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
            key.code = KeyCode::BackTab;
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
        if key.code == KeyCode::BackTab {
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
        if !windows {
            return (key.kind != KeyEventKind::Release).then_some(key);
        }
        match key.kind {
            KeyEventKind::Release => {
                if key.code == KeyCode::Esc {
                    self.esc_down = false;
                }
                return None;
            }
            KeyEventKind::Repeat => return None,
            KeyEventKind::Press => {}
        }
        // Some Windows consoles report Esc twice per press.
        if key.code == KeyCode::Esc {
            if self.esc_down {
                return None;
            }
            self.esc_down = true;
        } else {
            self.esc_down = false;
        }
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        let mut key = KeyEvent::new(code, modifiers);
        key.kind = kind;
        key
    }

    #[test]
    fn shift_tab_becomes_plain_backtab() {
        let mut norm = KeyboardNormalizer::new();
        for raw in [
            key(KeyCode::Tab, KeyModifiers::SHIFT, KeyEventKind::Press),
            key(KeyCode::BackTab, KeyModifiers::SHIFT, KeyEventKind::Press),
        ] {
            match norm.normalize(Event::Key(raw)) {
                Some(InputEvent::Key(k)) => {
                    assert_eq!(k.code, KeyCode::BackTab);
                    assert!(k.modifiers.is_empty());
                }
                other => panic!("expected key event, got {other:?}"),
            }
        }
    }

    #[test]
    fn releases_are_dropped() {
        let mut norm = KeyboardNormalizer::new();
        let release = key(KeyCode::Char('a'), KeyModifiers::NONE, KeyEventKind::Release);
        assert!(norm.normalize_key(release, false).is_none());
        assert!(norm.normalize_key(release, true).is_none());
    }

    #[test]
    fn windows_drops_repeats_and_doubled_escape() {
        let mut norm = KeyboardNormalizer::new();
        let esc = key(KeyCode::Esc, KeyModifiers::NONE, KeyEventKind::Press);
        let repeat = key(KeyCode::Char('a'), KeyModifiers::NONE, KeyEventKind::Repeat);
        assert!(norm.normalize_key(repeat, true).is_none());
        assert!(norm.normalize_key(esc, true).is_some());
        assert!(norm.normalize_key(esc, true).is_none());
        let esc_up = key(KeyCode::Esc, KeyModifiers::NONE, KeyEventKind::Release);
        assert!(norm.normalize_key(esc_up, true).is_none());
        assert!(norm.normalize_key(esc, true).is_some());
    }

    #[test]
    fn resize_passes_through_and_focus_reports_drop() {
        let mut norm = KeyboardNormalizer::new();
        assert_eq!(
            norm.normalize(Event::Resize(10, 20)),
            Some(InputEvent::Resize(10, 20))
        );
        assert_eq!(norm.normalize(Event::FocusGained), None);
    }
}
