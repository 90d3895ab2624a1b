use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Focus};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts ? and Esc
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    match (key.modifiers, key.code) {
        (m, KeyCode::Char('c')) if m.contains(KeyModifiers::CONTROL) => app.should_quit = true,
        (_, KeyCode::Char('q')) => app.should_quit = true,
        (_, KeyCode::Char('?')) => app.show_help = true,
        (_, KeyCode::Esc) => app.status = None,
        (_, KeyCode::Tab) | (_, KeyCode::BackTab) => app.toggle_focus(),
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => app.move_cursor(1),
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => app.move_cursor(-1),
        (_, KeyCode::Enter) | (_, KeyCode::Char(' ')) => match app.focus {
            Focus::Sidebar => app.select_sidebar(),
            Focus::Page => app.activate_selected(),
        },
        (_, KeyCode::Char('>')) if app.focus == Focus::Page => app.step_selected(true),
        (_, KeyCode::Char('<')) if app.focus == Focus::Page => app.step_selected(false),
        (_, KeyCode::Char('x')) if app.focus == Focus::Page => app.start_reject(),
        (_, KeyCode::Char('u')) => app.undo(),
        _ => {}
    }
}
