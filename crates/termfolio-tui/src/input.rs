//! Input controller.
//!
//! Maps key events to [`InputAction`]s. The reducer applies the actions to
//! the session; nothing here touches state.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Submit,
    HistoryOlder,
    HistoryNewer,
    Insert(char),
    Backspace,
    /// Ctrl+U: drop the whole input line.
    ClearLine,
    ScrollUp,
    ScrollDown,
    Quit,
    /// Ctrl+D: quits only when the input line is empty.
    EndOfInput,
    Ignore,
}

/// Parsed key modifiers for cleaner pattern matching.
struct Modifiers {
    ctrl: bool,
    shift: bool,
    alt: bool,
    super_key: bool,
}

impl Modifiers {
    fn from(key: &KeyEvent) -> Self {
        Self {
            ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
            shift: key.modifiers.contains(KeyModifiers::SHIFT),
            alt: key.modifiers.contains(KeyModifiers::ALT),
            super_key: key.modifiers.contains(KeyModifiers::SUPER),
        }
    }

    fn none(&self) -> bool {
        !self.ctrl && !self.shift && !self.alt && !self.super_key
    }

    fn only_ctrl(&self) -> bool {
        self.ctrl && !self.shift && !self.alt && !self.super_key
    }

    /// No modifiers, or shift alone (upper-case and symbols).
    fn text(&self) -> bool {
        !self.ctrl && !self.alt && !self.super_key
    }
}

pub fn map_key(key: KeyEvent) -> InputAction {
    if key.kind == KeyEventKind::Release {
        return InputAction::Ignore;
    }

    let mods = Modifiers::from(&key);
    match key.code {
        KeyCode::Char('c') if mods.only_ctrl() => InputAction::Quit,
        KeyCode::Char('d') if mods.only_ctrl() => InputAction::EndOfInput,
        KeyCode::Char('u') if mods.only_ctrl() => InputAction::ClearLine,
        KeyCode::Char(c) if mods.text() => InputAction::Insert(c),
        KeyCode::Enter if mods.none() => InputAction::Submit,
        KeyCode::Up if mods.none() => InputAction::HistoryOlder,
        KeyCode::Down if mods.none() => InputAction::HistoryNewer,
        KeyCode::Backspace => InputAction::Backspace,
        KeyCode::PageUp => InputAction::ScrollUp,
        KeyCode::PageDown => InputAction::ScrollDown,
        _ => InputAction::Ignore,
    }
}

/// Flattens pasted text onto the single input line.
///
/// Line breaks and escape bytes are dropped, tabs become four spaces.
pub fn sanitize_paste(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\t' => out.push_str("    "),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}
