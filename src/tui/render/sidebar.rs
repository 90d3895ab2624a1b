use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, Focus};

use super::helpers::{display_width, truncate_to_width};

/// Render the navigation sidebar: visible rows with the active path lit
pub fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let active = app.shell.active_id();
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        format!(" {}", truncate_to_width(&app.desk.config.desk.name, width.saturating_sub(1))),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    for (i, row) in app.sidebar_rows().iter().enumerate() {
        let marker = match (row.has_children, row.expanded) {
            (true, true) => "\u{25BE}",
            (true, false) => "\u{25B8}",
            (false, _) => " ",
        };
        let prefix = format!(" {}{} ", "  ".repeat(row.depth), marker);
        let label = truncate_to_width(&row.label, width.saturating_sub(display_width(&prefix)));

        let is_cursor = i == app.sidebar_cursor;
        let row_bg = if is_cursor && app.focus == Focus::Sidebar {
            app.theme.selection_bg
        } else {
            bg
        };
        let mut style = Style::default().fg(app.theme.text).bg(row_bg);
        if row.active_path {
            style = style.fg(app.theme.highlight);
        }
        if active == Some(row.id.as_str()) {
            style = style.add_modifier(Modifier::BOLD);
        }

        let used = display_width(&prefix) + display_width(&label);
        lines.push(Line::from(vec![
            Span::styled(prefix, style.fg(app.theme.dim)),
            Span::styled(label, style),
            Span::styled(" ".repeat(width.saturating_sub(used)), style),
        ]));
    }

    let scroll = (app.sidebar_cursor + 2).saturating_sub(inner.height.saturating_sub(1) as usize);
    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(bg))
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, inner);
}
