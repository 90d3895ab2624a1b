mod navigate;
mod reason;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

use navigate::handle_navigate;
use reason::handle_reason;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Reason => handle_reason(app, key),
    }
}

/// Some terminals report Shift+. instead of `>`; fold those into the
/// shifted symbol.
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
    {
        let shifted = match c {
            '.' => Some('>'),
            ',' => Some('<'),
            '/' => Some('?'),
            _ => None,
        };
        if let Some(s) = shifted {
            key.code = KeyCode::Char(s);
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    key
}
