use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::{ChecklistStatus, KanbanBoard, Page, StageGroup, StageItem, Status};
use crate::ops::progress::{Summary, collection_progress, group_progress, stage_progress};
use crate::tui::app::{App, Focus};

use super::helpers::{bar, checklist_symbol, display_width, spans_width, truncate_to_width};

/// Render the breadcrumb header and the active page
pub fn render_page_view(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // breadcrumb + separator
            Constraint::Min(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);

    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let (lines, cursor_line) = match (app.shell.active_node(), app.current_page()) {
        (None, _) => (
            vec![Line::from(Span::styled(
                " Select a page in the sidebar",
                dim,
            ))],
            None,
        ),
        (Some(node), None) => {
            let msg = match &node.page {
                Some(key) => format!(" Page not found: {}", key),
                None => " Nothing to show for this section".to_string(),
            };
            (
                vec![
                    Line::from(Span::styled(
                        format!(" {}", node.label),
                        Style::default()
                            .fg(app.theme.text_bright)
                            .bg(bg)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(msg, dim)),
                ],
                None,
            )
        }
        (Some(_), Some(page)) => {
            let ctx = LineCtx {
                app,
                width: area.width as usize,
                cursor: (app.focus == Focus::Page).then(|| app.page_cursor()),
                today: chrono::Local::now().date_naive(),
            };
            match page {
                Page::Checklist(g) => checklist_lines(&ctx, g),
                Page::Tasks(b) => board_lines(&ctx, b, false),
                Page::Leave(b) => board_lines(&ctx, b, false),
                Page::Pipeline(b) => board_lines(&ctx, b, true),
            }
        }
    };

    let height = chunks[1].height as usize;
    let scroll = cursor_line.map_or(0, |l| (l + 1).saturating_sub(height));
    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(bg))
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, chunks[1]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let crumbs = app.shell.breadcrumb();

    let mut spans: Vec<Span> = vec![Span::styled(" ", Style::default().bg(bg))];
    if crumbs.is_empty() {
        spans.push(Span::styled(
            app.desk.config.desk.name.clone(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
    }
    for (i, crumb) in crumbs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(
                " \u{203A} ",
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
        let style = if i + 1 == crumbs.len() {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        spans.push(Span::styled(crumb.to_string(), style));
    }

    // Route right-aligned when it fits
    if let Some(route) = app.current_route() {
        let used = spans_width(&spans);
        let route_width = display_width(route) + 1;
        if used + route_width < width {
            spans.push(Span::styled(
                " ".repeat(width - used - route_width),
                Style::default().bg(bg),
            ));
            spans.push(Span::styled(
                route.to_string(),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
    }

    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(
            "\u{2500}".repeat(width),
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

struct LineCtx<'a> {
    app: &'a App,
    width: usize,
    /// Page cursor, when the page has focus
    cursor: Option<usize>,
    today: NaiveDate,
}

fn title_line<'a>(ctx: &LineCtx, title: &str, summary: Summary) -> Line<'a> {
    let theme = &ctx.app.theme;
    let bg = theme.background;
    Line::from(vec![
        Span::styled(
            format!(" {}  ", title),
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(bar(summary.percent, 20), Style::default().fg(theme.green).bg(bg)),
        Span::styled(
            format!(" {}/{} ({}%)", summary.completed, summary.total, summary.percent),
            Style::default().fg(theme.text).bg(bg),
        ),
    ])
}

/// One item row. `lead` is the checkbox or stage bar in front of the title.
fn item_line<'a, S: Status>(
    ctx: &LineCtx,
    item: &StageItem<S>,
    lead: Span<'a>,
    selected: bool,
) -> Line<'a> {
    let theme = &ctx.app.theme;
    let row_bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let text_style = Style::default().fg(theme.text).bg(row_bg);
    let dim_style = Style::default().fg(theme.dim).bg(row_bg);

    let mut spans: Vec<Span> = vec![Span::styled("   ", text_style), lead];
    spans.push(Span::styled(" ", text_style));

    let mut tail: Vec<Span> = Vec::new();
    if let Some(p) = item.priority {
        tail.push(Span::styled(
            format!("  !{}", p.key()),
            Style::default().fg(theme.yellow).bg(row_bg),
        ));
    }
    if let Some(a) = &item.assignee {
        tail.push(Span::styled(format!("  @{}", a), dim_style));
    }
    if let Some(d) = item.due_date {
        let style = if item.is_overdue(ctx.today) {
            Style::default().fg(theme.red).bg(row_bg)
        } else {
            dim_style
        };
        tail.push(Span::styled(format!("  due {}", d), style));
    }

    let room = ctx
        .width
        .saturating_sub(spans_width(&spans) + spans_width(&tail));
    let title_style = if selected {
        text_style.fg(theme.text_bright)
    } else {
        text_style
    };
    spans.push(Span::styled(truncate_to_width(&item.title, room.max(8)), title_style));
    spans.extend(tail);

    let used = spans_width(&spans);
    if selected && used < ctx.width {
        spans.push(Span::styled(" ".repeat(ctx.width - used), text_style));
    }
    Line::from(spans)
}

fn checklist_lines<'a>(ctx: &LineCtx, group: &StageGroup<ChecklistStatus>) -> (Vec<Line<'a>>, Option<usize>) {
    let theme = &ctx.app.theme;
    let bg = theme.background;
    let agg = group_progress(group);
    let mut lines = vec![title_line(ctx, group.title(), agg.overall.summary()), Line::from("")];
    let mut cursor_line = None;
    let mut idx = 0usize;

    for ((name, items), cat) in group.items_by_category().zip(agg.categories.iter()) {
        let s = cat.progress.summary();
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {}  ", name),
                Style::default()
                    .fg(theme.text)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(bar(s.percent, 10), Style::default().fg(theme.green).bg(bg)),
            Span::styled(
                format!(" {}/{}", s.completed, s.total),
                Style::default().fg(theme.dim).bg(bg),
            ),
        ]));
        for item in items {
            let selected = ctx.cursor == Some(idx);
            if selected {
                cursor_line = Some(lines.len());
            }
            let row_bg = if selected { theme.selection_bg } else { bg };
            let lead = Span::styled(
                checklist_symbol(item.status()),
                Style::default().fg(theme.status_color(item.status())).bg(row_bg),
            );
            lines.push(item_line(ctx, item, lead, selected));
            idx += 1;
        }
        lines.push(Line::from(""));
    }
    (lines, cursor_line)
}

fn board_lines<'a, S: Status>(
    ctx: &LineCtx,
    board: &KanbanBoard<S>,
    pipeline: bool,
) -> (Vec<Line<'a>>, Option<usize>) {
    let theme = &ctx.app.theme;
    let bg = theme.background;
    let overall = collection_progress(board.cards()).summary();
    let mut lines = vec![title_line(ctx, board.title(), overall), Line::from("")];
    let mut cursor_line = None;
    let mut idx = 0usize;

    for column in board.columns() {
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {}", column.status.label()),
                Style::default()
                    .fg(theme.status_color(column.status))
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" ({})", column.cards.len()),
                Style::default().fg(theme.dim).bg(bg),
            ),
        ]));
        if column.cards.is_empty() {
            lines.push(Line::from(Span::styled(
                "   (empty)",
                Style::default().fg(theme.dim).bg(bg),
            )));
        }
        for card in &column.cards {
            let selected = ctx.cursor == Some(idx);
            if selected {
                cursor_line = Some(lines.len());
            }
            let row_bg = if selected { theme.selection_bg } else { bg };
            let lead = if pipeline {
                Span::styled(
                    bar(stage_progress(card.status()), 10),
                    Style::default().fg(theme.status_color(card.status())).bg(row_bg),
                )
            } else {
                Span::styled(
                    format!("{:>4}", card.id.to_string()),
                    Style::default().fg(theme.dim).bg(row_bg),
                )
            };
            lines.push(item_line(ctx, card, lead, selected));
            idx += 1;
        }
        lines.push(Line::from(""));
    }
    (lines, cursor_line)
}
