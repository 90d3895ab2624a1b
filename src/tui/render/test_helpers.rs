use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::config_io::parse_config;
use crate::io::desk_io::{Seed, build_workspace};
use crate::model::{Desk, NavigationTree};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

pub const TEST_DESK_TOML: &str = r#"
[desk]
name = "Test Desk"

[[nav]]
id = "dashboard"
label = "Dashboard"
route = "/"

[[nav]]
id = "employees"
label = "Employees"

[[nav.children]]
id = "onboarding"
label = "Onboarding"
route = "/employees/onboarding"
page = "onboarding"

[[nav]]
id = "leave"
label = "Leave"
route = "/leave"
page = "leave"

[[nav]]
id = "pipeline"
label = "Pipeline"
route = "/recruitment"
page = "hiring"
"#;

pub const TEST_SEED: &str = r#"{
  "checklists": [
    { "key": "onboarding", "title": "Onboarding", "categories": [
      { "name": "Documentation", "items": [
        { "id": "doc-1", "title": "Sign contract", "status": "completed" },
        { "id": "doc-2", "title": "Tax forms" }
      ] },
      { "name": "IT Setup", "items": [
        { "id": "it-1", "title": "Issue laptop" }
      ] }
    ] }
  ],
  "leaveBoards": [
    { "key": "leave", "title": "Leave Requests", "cards": [
      { "id": 1, "title": "Annual leave" },
      { "id": 2, "title": "Sick leave", "status": "approved" }
    ] }
  ],
  "pipelines": [
    { "key": "hiring", "title": "Hiring", "cards": [
      { "id": "cand-1", "title": "Sam Lee" }
    ] }
  ]
}"#;

/// The small in-memory desk used by the TUI tests.
pub fn test_desk() -> Desk {
    let config = parse_config(TEST_DESK_TOML).unwrap();
    let nav = NavigationTree::new(config.nav.clone()).unwrap();
    let seed: Seed = serde_json::from_str(TEST_SEED).unwrap();
    let now = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
    let workspace = build_workspace(seed, &config.rules, now).unwrap();
    Desk {
        root: PathBuf::from("/tmp/test-hrdesk"),
        desk_dir: PathBuf::from("/tmp/test-hrdesk/hrdesk"),
        config,
        nav,
        workspace,
    }
}

pub fn test_app() -> App {
    App::new(test_desk())
}
