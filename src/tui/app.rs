use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::desk_io::{discover_desk, load_desk};
use crate::model::{
    ChecklistStatus, Desk, KanbanBoard, NavRow, NavigationEvent, NavigationShell, Page, PageKind,
    PageMut, Selection, StageError, Status, TransitionMeta,
};

use super::input;
use super::render;
use super::theme::Theme;

/// Which pane receives movement keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Page,
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a rejection reason for the selected card
    Reason,
}

/// One-line feedback shown in the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Main application state
pub struct App {
    pub desk: Desk,
    pub shell: NavigationShell,
    /// Navigation events issued this session, newest last
    pub history: Vec<NavigationEvent>,
    pub focus: Focus,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Cursor into the sidebar's visible rows
    pub sidebar_cursor: usize,
    /// Cursor per page key, into the page's items in display order
    pub cursors: HashMap<String, usize>,
    pub reason_input: String,
    pub status: Option<StatusMessage>,
    pub show_help: bool,
}

impl App {
    pub fn new(desk: Desk) -> Self {
        let shell = NavigationShell::new(desk.nav.clone());
        let theme = Theme::from_config(&desk.config.ui);
        App {
            desk,
            shell,
            history: Vec::new(),
            focus: Focus::Sidebar,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            sidebar_cursor: 0,
            cursors: HashMap::new(),
            reason_input: String::new(),
            status: None,
            show_help: false,
        }
    }

    pub fn sidebar_rows(&self) -> Vec<NavRow> {
        self.shell.visible_rows()
    }

    /// Key of the page behind the active nav leaf
    pub fn current_page_key(&self) -> Option<&str> {
        self.shell.active_node()?.page.as_deref()
    }

    pub fn current_page(&self) -> Option<Page<'_>> {
        self.desk.workspace.page(self.current_page_key()?)
    }

    /// Route of the most recent navigation
    pub fn current_route(&self) -> Option<&str> {
        self.history.last()?.route.as_deref()
    }

    pub fn page_cursor(&self) -> usize {
        self.current_page_key()
            .and_then(|k| self.cursors.get(k).copied())
            .unwrap_or(0)
    }

    /// Item ids of the current page in the order the page view lists them
    pub fn page_item_ids(&self) -> Vec<String> {
        match self.current_page() {
            Some(Page::Checklist(g)) => g.items().map(|i| i.id.to_string()).collect(),
            Some(Page::Tasks(b)) => column_order_ids(b),
            Some(Page::Leave(b)) => column_order_ids(b),
            Some(Page::Pipeline(b)) => column_order_ids(b),
            None => Vec::new(),
        }
    }

    /// (page key, item id) under the page cursor
    pub fn selection(&self) -> Option<(String, String)> {
        let key = self.current_page_key()?.to_string();
        let id = self.page_item_ids().into_iter().nth(self.page_cursor())?;
        Some((key, id))
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sidebar if self.current_page().is_some() => Focus::Page,
            _ => Focus::Sidebar,
        };
    }

    /// Move the focused pane's cursor by `delta` rows, clamped
    pub fn move_cursor(&mut self, delta: isize) {
        match self.focus {
            Focus::Sidebar => {
                let len = self.sidebar_rows().len();
                self.sidebar_cursor = step(self.sidebar_cursor, delta, len);
            }
            Focus::Page => {
                let len = self.page_item_ids().len();
                let cursor = step(self.page_cursor(), delta, len);
                if let Some(key) = self.current_page_key().map(str::to_string) {
                    self.cursors.insert(key, cursor);
                }
            }
        }
    }

    /// Select the sidebar row under the cursor
    pub fn select_sidebar(&mut self) {
        let Some(row) = self.sidebar_rows().into_iter().nth(self.sidebar_cursor) else {
            return;
        };
        match self.shell.select(&row.id, &mut self.history) {
            Ok(Selection::Activated) => {
                self.status = None;
                if self.current_page().is_some() {
                    self.focus = Focus::Page;
                    self.clamp_page_cursor();
                } else if let Some(page) = self.current_page_key() {
                    let msg = format!("page not found: {}", page);
                    self.set_error(msg);
                }
            }
            Ok(Selection::Toggled(_)) => {}
            Err(e) => self.set_error(e.to_string()),
        }
        self.follow_sidebar(&row.id);
    }

    /// Keep the sidebar cursor on `id` after the visible rows changed
    fn follow_sidebar(&mut self, id: &str) {
        let rows = self.sidebar_rows();
        self.sidebar_cursor = rows
            .iter()
            .position(|r| r.id == id)
            .unwrap_or_else(|| self.sidebar_cursor.min(rows.len().saturating_sub(1)));
    }

    fn follow_item(&mut self, key: &str, id: &str) {
        if let Some(pos) = self.page_item_ids().iter().position(|i| i == id) {
            self.cursors.insert(key.to_string(), pos);
        }
    }

    pub fn clamp_page_cursor(&mut self) {
        let len = self.page_item_ids().len();
        if let Some(key) = self.current_page_key().map(str::to_string) {
            let cursor = self.cursors.get(&key).copied().unwrap_or(0);
            self.cursors.insert(key, cursor.min(len.saturating_sub(1)));
        }
    }

    /// `Enter`/`Space` on the page: toggle a checklist item between done
    /// and pending, advance a card on a board.
    pub fn activate_selected(&mut self) {
        let Some((key, id)) = self.selection() else {
            return;
        };
        let result = match self.desk.workspace.page_mut(&key) {
            Some(PageMut::Checklist(g)) => {
                let done = g.find(&id).is_some_and(|(_, item)| item.is_completed());
                let target = if done {
                    ChecklistStatus::Pending
                } else {
                    ChecklistStatus::Completed
                };
                g.update_status(&id, target, TransitionMeta::none())
                    .map(|_| Some(target.label()))
            }
            Some(PageMut::Tasks(b)) => step_card(b, &id, true),
            Some(PageMut::Leave(b)) => step_card(b, &id, true),
            Some(PageMut::Pipeline(b)) => step_card(b, &id, true),
            None => return,
        };
        self.report_move(&key, &id, result);
    }

    /// `>` / `<`: move the selected item one stage forward or back
    pub fn step_selected(&mut self, forward: bool) {
        let Some((key, id)) = self.selection() else {
            return;
        };
        let result = match self.desk.workspace.page_mut(&key) {
            Some(PageMut::Checklist(g)) => {
                let current = g.find(&id).map(|(_, i)| i.status());
                let target = current.and_then(|c| {
                    if forward {
                        c.next_stage()
                    } else {
                        c.prev_stage()
                    }
                });
                match (current, target) {
                    (None, _) => Err(StageError::NotFound(id.clone())),
                    (Some(_), Some(t)) => g
                        .update_status(&id, t, TransitionMeta::none())
                        .map(|_| Some(t.label())),
                    (Some(_), None) => Ok(None),
                }
            }
            Some(PageMut::Tasks(b)) => step_card(b, &id, forward),
            Some(PageMut::Leave(b)) => step_card(b, &id, forward),
            Some(PageMut::Pipeline(b)) => step_card(b, &id, forward),
            None => return,
        };
        self.report_move(&key, &id, result);
    }

    /// `x`: open the reason prompt when the page has a rejection status
    pub fn start_reject(&mut self) {
        let rejectable = matches!(
            self.current_page().map(|p| p.kind()),
            Some(PageKind::Leave) | Some(PageKind::Pipeline)
        );
        if !rejectable {
            self.set_error("nothing to reject on this page");
            return;
        }
        if self.selection().is_none() {
            return;
        }
        self.reason_input.clear();
        self.status = None;
        self.mode = Mode::Reason;
    }

    /// Submit the reason prompt. A blank reason keeps the prompt open.
    pub fn submit_reason(&mut self) {
        let reason = self.reason_input.trim().to_string();
        if reason.is_empty() {
            self.set_error("a reason is required to reject");
            return;
        }
        self.mode = Mode::Navigate;
        self.reason_input.clear();

        let Some((key, id)) = self.selection() else {
            return;
        };
        let result = match self.desk.workspace.page_mut(&key) {
            Some(PageMut::Leave(b)) => reject_card(b, &id, &reason),
            Some(PageMut::Pipeline(b)) => reject_card(b, &id, &reason),
            _ => return,
        };
        self.report_move(&key, &id, result);
    }

    pub fn cancel_reason(&mut self) {
        self.mode = Mode::Navigate;
        self.reason_input.clear();
        self.status = None;
    }

    /// `u`: revert the last card move on the current board
    pub fn undo(&mut self) {
        let Some(key) = self.current_page_key().map(str::to_string) else {
            return;
        };
        if self.current_page().map(|p| p.kind()) == Some(PageKind::Checklist) {
            self.set_error("undo is only available on boards");
            return;
        }
        let result = match self.desk.workspace.page_mut(&key) {
            Some(PageMut::Tasks(b)) => undo_card(b),
            Some(PageMut::Leave(b)) => undo_card(b),
            Some(PageMut::Pipeline(b)) => undo_card(b),
            _ => return,
        };
        match result {
            Ok(Some((id, label))) => {
                self.follow_item(&key, &id);
                self.set_status(format!("undo: {} back to {}", id, label));
            }
            Ok(None) => self.set_status("nothing to undo"),
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn report_move(&mut self, key: &str, id: &str, result: Result<Option<&'static str>, StageError>) {
        match result {
            Ok(Some(label)) => {
                self.follow_item(key, id);
                self.set_status(format!("{} -> {}", id, label));
            }
            Ok(None) => self.set_status(format!("{} cannot move further", id)),
            Err(e) => self.set_error(e.to_string()),
        }
    }
}

fn step(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    cursor.saturating_add_signed(delta).min(len - 1)
}

fn column_order_ids<S: Status>(board: &KanbanBoard<S>) -> Vec<String> {
    board
        .columns()
        .into_iter()
        .flat_map(|c| c.cards.into_iter().map(|i| i.id.to_string()))
        .collect()
}

/// Move a card one stage and settle the move at once; the TUI has no
/// backend to wait for.
fn step_card<S: Status>(
    board: &mut KanbanBoard<S>,
    id: &str,
    forward: bool,
) -> Result<Option<&'static str>, StageError> {
    let ticket = if forward {
        board.advance(id)?
    } else {
        board.retreat(id)?
    };
    match ticket {
        Some(t) => {
            board.confirm(t)?;
            Ok(board.get(id).map(|c| c.status().label()))
        }
        None => Ok(None),
    }
}

fn reject_card<S: Status>(
    board: &mut KanbanBoard<S>,
    id: &str,
    reason: &str,
) -> Result<Option<&'static str>, StageError> {
    let Some(rejected) = S::ALL.iter().copied().find(|s| s.is_rejection()) else {
        return Ok(None);
    };
    match board.move_card(id, rejected, TransitionMeta::with_reason(reason))? {
        Some(t) => {
            board.confirm(t)?;
            Ok(Some(rejected.label()))
        }
        None => Ok(None),
    }
}

fn undo_card<S: Status>(board: &mut KanbanBoard<S>) -> Result<Option<(String, &'static str)>, StageError> {
    Ok(board
        .undo()?
        .map(|t| (t.item_id.to_string(), t.from.label())))
}

/// Restore UI state from .state.json
pub fn restore_ui_state(app: &mut App) {
    use crate::io::state::read_ui_state;

    let Some(state) = read_ui_state(&app.desk.desk_dir) else {
        return;
    };
    app.shell
        .restore(state.expanded, state.active_nav.as_deref());
    app.cursors = state.cursors;
    if state.focus == "page" && app.current_page().is_some() {
        app.focus = Focus::Page;
    }
    if let Some(active) = app.shell.active_id().map(str::to_string) {
        app.follow_sidebar(&active);
    }
    app.clamp_page_cursor();
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &App) {
    use crate::io::state::{UiState, write_ui_state};

    let state = UiState {
        active_nav: app.shell.active_id().map(str::to_string),
        expanded: app.shell.expanded().clone(),
        focus: match app.focus {
            Focus::Sidebar => "sidebar".into(),
            Focus::Page => "page".into(),
        },
        cursors: app.cursors.clone(),
    };

    if let Err(e) = write_ui_state(&app.desk.desk_dir, &state) {
        tracing::warn!(error = %e, "could not save ui state");
    }
}

/// Run the TUI application
pub fn run(desk_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = match desk_dir {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let root = discover_desk(&start)?;
    let desk = load_desk(&root)?;
    crate::logging::init_tui(&desk.desk_dir);

    let mut app = App::new(desk);
    restore_ui_state(&mut app);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    save_ui_state(&app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            // Debounced state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app);
                save_counter = 0;
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
