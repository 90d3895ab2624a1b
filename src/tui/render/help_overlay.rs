use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

/// (section, [(keys, action)])
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Sidebar",
        &[
            ("\u{2191}\u{2193} j k", "Move cursor"),
            ("Enter Space", "Open page or expand section"),
            ("Tab", "Focus the page"),
        ],
    ),
    (
        "Page",
        &[
            ("Enter Space", "Toggle done / advance card"),
            ("> <", "Move one stage forward / back"),
            ("x", "Reject (asks for a reason)"),
            ("u", "Undo last card move"),
            ("Tab", "Back to the sidebar"),
        ],
    ),
    (
        "Anywhere",
        &[("?", "Toggle this help"), ("Esc", "Clear message"), ("q", "Quit")],
    ),
];

const KEY_COLUMN: usize = 14;

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(" Key Bindings", header_style)),
        Line::from(""),
    ];
    for (i, (section, bindings)) in SECTIONS.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(format!(" {}", section), header_style)));
        for (keys, action) in *bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<w$}", keys, w = KEY_COLUMN), key_style),
                Span::styled(*action, desc_style),
            ]));
        }
    }

    // Content plus borders, clipped to the screen
    let height = (lines.len() as u16 + 2).min(area.height);
    let width = 52.min(area.width);
    let popup = centered(width, height, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(
        Paragraph::new(lines).block(block).style(Style::default().bg(bg)),
        popup,
    );
}

fn centered(width: u16, height: u16, area: Rect) -> Rect {
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
