use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::ChecklistStatus;

/// Checkbox symbol for a checklist status
pub(super) fn checklist_symbol(status: ChecklistStatus) -> &'static str {
    match status {
        ChecklistStatus::Pending => "[ ]",
        ChecklistStatus::InProgress => "[>]",
        ChecklistStatus::Completed => "[x]",
        ChecklistStatus::OnHold => "[~]",
    }
}

/// `━━━━──────` style bar, `width` cells wide
pub(super) fn bar(percent: u8, width: usize) -> String {
    let filled = ((percent as usize * width + 50) / 100).min(width);
    format!(
        "{}{}",
        "\u{2501}".repeat(filled),
        "\u{2500}".repeat(width - filled)
    )
}

pub(super) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to at most `max_cells` terminal cells, ending in `…` when cut
pub(super) fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_cells - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    out
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans.iter().map(|s| display_width(&s.content)).sum()
}
