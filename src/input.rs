//! Input handling - key translation

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// An editor command produced by a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Insert(char),
    Newline,
    Tab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Save,
    ToggleReadOnly,
    ToggleHighlightMode,
    Quit,
}

/// Translate a crossterm key event; `None` for releases and unbound keys
pub fn translate_key(event: KeyEvent) -> Option<Action> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let action = match event.code {
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            's' => Action::Save,
            'q' => Action::Quit,
            'r' => Action::ToggleReadOnly,
            't' => Action::ToggleHighlightMode,
            _ => return None,
        },
        KeyCode::Char(c) => Action::Insert(c),
        KeyCode::Enter => Action::Newline,
        KeyCode::Tab => Action::Tab,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete => Action::Delete,
        KeyCode::Left => Action::Left,
        KeyCode::Right => Action::Right,
        KeyCode::Up => Action::Up,
        KeyCode::Down => Action::Down,
        KeyCode::Home => Action::Home,
        KeyCode::End => Action::End,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        _ => return None,
    };
    Some(action)
}
