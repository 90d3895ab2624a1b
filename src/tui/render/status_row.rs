use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::PageKind;
use crate::tui::app::{App, Focus, Mode};

use super::helpers::spans_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans: Vec<Span> = Vec::new();
    let hint = match app.mode {
        Mode::Reason => {
            // Reason prompt: Reason: text▌
            spans.push(Span::styled(
                format!("Reason: {}", app.reason_input),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ));
            spans.push(Span::styled(
                "\u{258C}",
                Style::default().fg(app.theme.highlight).bg(bg),
            ));
            if let Some(msg) = &app.status {
                spans.push(Span::styled(
                    format!("  {}", msg.text),
                    Style::default().fg(app.theme.red).bg(bg),
                ));
            }
            Some("Enter reject  Esc cancel")
        }
        Mode::Navigate => {
            if let Some(msg) = &app.status {
                let fg = if msg.is_error {
                    app.theme.red
                } else {
                    app.theme.text
                };
                spans.push(Span::styled(msg.text.clone(), Style::default().fg(fg).bg(bg)));
            }
            if app.desk.config.ui.show_key_hints {
                Some(key_hints(app))
            } else {
                None
            }
        }
    };

    if let Some(hint) = hint {
        let content_width = spans_width(&spans);
        let hint_width = hint.chars().count();
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn key_hints(app: &App) -> &'static str {
    match (app.focus, app.current_page().map(|p| p.kind())) {
        (Focus::Sidebar, _) => "jk move  Enter open  Tab page  ? help",
        (Focus::Page, Some(PageKind::Checklist)) => "Space done  >/< stage  Tab nav  ? help",
        (Focus::Page, Some(PageKind::Leave | PageKind::Pipeline)) => {
            ">/< move  x reject  u undo  ? help"
        }
        (Focus::Page, _) => ">/< move  u undo  Tab nav  ? help",
    }
}
