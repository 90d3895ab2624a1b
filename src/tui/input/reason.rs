use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

pub(super) fn handle_reason(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_reason(),
        KeyCode::Enter => app.submit_reason(),
        KeyCode::Backspace => {
            app.reason_input.pop();
        }
        KeyCode::Char(c) => app.reason_input.push(c),
        _ => {}
    }
}
