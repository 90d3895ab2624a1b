mod init;
pub use init::cmd_init;

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use regex::Regex;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::desk_io::{self, DeskError};
use crate::io::state::read_ui_state;
use crate::model::board::KanbanBoard;
use crate::model::desk::Desk;
use crate::model::group::StageGroup;
use crate::model::item::StageItem;
use crate::model::nav::NavigationShell;
use crate::model::status::{ApplicantStage, ChecklistStatus, Status};
use crate::model::workspace::Page;
use crate::ops::progress::{self, aggregate};
use crate::ops::{check, search};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let start = cli.desk_dir.as_deref();

    match cli.command {
        None => {
            eprintln!("no subcommand given (try `hd --help`)");
            Ok(())
        }
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(args, start),
            Commands::Nav(args) => cmd_nav(args, start, json),
            Commands::Pages => cmd_pages(start, json),
            Commands::Show(args) => cmd_show(args, start, json),
            Commands::Progress(args) => cmd_progress(args, start, json),
            Commands::Next(args) => cmd_next(args, start, json),
            Commands::Overdue(args) => cmd_overdue(args, start, json),
            Commands::Search(args) => cmd_search(args, start, json),
            Commands::Check => cmd_check(start, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the directory discovery starts from: `-C` if given, else cwd.
pub fn start_dir(start: Option<&str>) -> Result<PathBuf, DeskError> {
    match start {
        Some(dir) => std::fs::canonicalize(dir).map_err(|e| DeskError::ReadError {
            path: PathBuf::from(dir),
            source: e,
        }),
        None => std::env::current_dir().map_err(DeskError::IoError),
    }
}

fn load_desk_cwd(start: Option<&str>) -> Result<Desk, DeskError> {
    let start = start_dir(start)?;
    let root = desk_io::discover_desk(&start)?;
    desk_io::load_desk(&root)
}

fn find_page<'a>(desk: &'a Desk, key: &str) -> Result<Page<'a>, Box<dyn std::error::Error>> {
    desk.workspace.page(key).ok_or_else(|| {
        let known: Vec<&str> = desk.workspace.page_keys().collect();
        format!("page not found: {} (pages: {})", key, known.join(", ")).into()
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_nav(args: NavArgs, start: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let desk = load_desk_cwd(start)?;
    let mut shell = NavigationShell::new(desk.nav.clone());
    if let Some(state) = read_ui_state(&desk.desk_dir) {
        shell.restore(state.expanded, state.active_nav.as_deref());
    }
    let rows = if args.all {
        shell.all_rows()
    } else {
        shell.visible_rows()
    };

    if json {
        let rows: Vec<NavRowJson> = rows.iter().map(nav_row_to_json).collect();
        print_json(&rows)?;
    } else {
        for line in format_nav_rows(&rows) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_pages(start: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let desk = load_desk_cwd(start)?;
    let pages = desk.workspace.pages();

    if json {
        let infos: Vec<PageInfoJson> = pages
            .iter()
            .map(|(key, page)| PageInfoJson {
                key: key.to_string(),
                kind: page.kind(),
                title: page.title().to_string(),
                progress: progress::page_summary(page),
            })
            .collect();
        print_json(&infos)?;
    } else {
        println!("{}", desk.config.desk.name);
        for (key, page) in &pages {
            println!(
                "{}",
                format_page_info(key, page.kind(), page.title(), &progress::page_summary(page))
            );
        }
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, start: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let desk = load_desk_cwd(start)?;
    let page = find_page(&desk, &args.page)?;
    let filter = args.status.as_deref();

    let groups = match page {
        Page::Checklist(g) => checklist_groups(g, filter)?,
        Page::Tasks(b) => board_groups(b, filter)?,
        Page::Leave(b) => board_groups(b, filter)?,
        Page::Pipeline(b) => board_groups(b, filter)?,
    };

    if json {
        let page_json = PageJson {
            key: args.page.clone(),
            kind: page.kind(),
            title: page.title().to_string(),
            groups: groups
                .into_iter()
                .map(|(name, _, items)| GroupJson { name, items })
                .collect(),
        };
        print_json(&page_json)?;
    } else {
        println!("{}", format_page_header(&args.page, page.title()));
        for (name, lines, _) in groups {
            println!();
            println!("-- {} --", name);
            for line in lines {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// (group heading, text lines, json items) per category or column
type ShowGroup = (String, Vec<String>, Vec<ItemJson>);

fn checklist_groups(
    group: &StageGroup<ChecklistStatus>,
    filter: Option<&str>,
) -> Result<Vec<ShowGroup>, Box<dyn std::error::Error>> {
    let status = filter.map(parse_status::<ChecklistStatus>).transpose()?;
    let agg = progress::group_progress(group);
    Ok(group
        .items_by_category()
        .zip(agg.categories.iter())
        .map(|((name, items), cat)| {
            let shown: Vec<&StageItem<ChecklistStatus>> = items
                .iter()
                .filter(|i| status.is_none_or(|s| i.status() == s))
                .collect();
            (
                format!("{} {}", name, format_summary(&cat.progress.summary())),
                shown.iter().map(|i| format_item_line(*i)).collect(),
                shown.iter().map(|i| item_to_json(*i)).collect(),
            )
        })
        .collect())
}

fn board_groups<S: Status>(
    board: &KanbanBoard<S>,
    filter: Option<&str>,
) -> Result<Vec<ShowGroup>, Box<dyn std::error::Error>> {
    let status = filter.map(parse_status::<S>).transpose()?;
    let is_pipeline = S::DOMAIN == ApplicantStage::DOMAIN;
    Ok(board
        .columns()
        .into_iter()
        .filter(|c| status.is_none_or(|s| c.status == s))
        .map(|c| {
            let lines = c
                .cards
                .iter()
                .map(|i| {
                    if is_pipeline {
                        format_applicant_line(*i)
                    } else {
                        format_item_line(*i)
                    }
                })
                .collect();
            (
                format!("{} ({})", c.status.label(), c.cards.len()),
                lines,
                c.cards.iter().map(|i| item_to_json(*i)).collect(),
            )
        })
        .collect())
}

fn cmd_progress(args: PageArg, start: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let desk = load_desk_cwd(start)?;
    let page = find_page(&desk, &args.page)?;

    let (json_out, lines) = match page {
        Page::Checklist(g) => {
            let agg = progress::group_progress(g);
            (aggregate_to_json(&args.page, &agg), format_aggregate(&agg))
        }
        Page::Tasks(b) => {
            let agg = aggregate([b.cards()]);
            (aggregate_to_json(&args.page, &agg), format_aggregate(&agg))
        }
        Page::Leave(b) => {
            let agg = aggregate([b.cards()]);
            (aggregate_to_json(&args.page, &agg), format_aggregate(&agg))
        }
        Page::Pipeline(b) => {
            let agg = aggregate([b.cards()]);
            (aggregate_to_json(&args.page, &agg), format_aggregate(&agg))
        }
    };

    if json {
        print_json(&json_out)?;
    } else {
        println!("{}", format_page_header(&args.page, page.title()));
        for line in lines {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_next(args: PageArg, start: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let desk = load_desk_cwd(start)?;
    let page = find_page(&desk, &args.page)?;

    let next = match page {
        Page::Checklist(g) => progress::next_actionable(g.items()).map(|i| (format_item_line(i), item_to_json(i))),
        Page::Tasks(b) => next_on_board(b),
        Page::Leave(b) => next_on_board(b),
        Page::Pipeline(b) => next_on_board(b),
    };

    match (next, json) {
        (Some((_, item)), true) => print_json(&item)?,
        (None, true) => println!("null"),
        (Some((line, _)), false) => println!("{}", line),
        (None, false) => println!("nothing left to do in {}", args.page),
    }
    Ok(())
}

fn next_on_board<S: Status>(board: &KanbanBoard<S>) -> Option<(String, ItemJson)> {
    progress::next_actionable(board.cards().items()).map(|i| (format_item_line(i), item_to_json(i)))
}

fn cmd_overdue(args: OverdueArgs, start: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let desk = load_desk_cwd(start)?;
    let today = match args.today.as_deref() {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| format!("invalid --today '{}': {}", s, e))?,
        None => chrono::Local::now().date_naive(),
    };

    let mut found: Vec<(String, String, ItemJson)> = Vec::new();
    for (key, page) in desk.workspace.pages() {
        let mut push = |line: String, item: ItemJson| found.push((key.to_string(), line, item));
        match page {
            Page::Checklist(g) => progress::overdue(g.items(), today)
                .into_iter()
                .for_each(|i| push(format_item_line(i), item_to_json(i))),
            Page::Tasks(b) => progress::overdue(b.cards().items(), today)
                .into_iter()
                .for_each(|i| push(format_item_line(i), item_to_json(i))),
            Page::Leave(b) => progress::overdue(b.cards().items(), today)
                .into_iter()
                .for_each(|i| push(format_item_line(i), item_to_json(i))),
            Page::Pipeline(b) => progress::overdue(b.cards().items(), today)
                .into_iter()
                .for_each(|i| push(format_item_line(i), item_to_json(i))),
        }
    }

    if json {
        let items: Vec<ItemWithPageJson> = found
            .into_iter()
            .map(|(page, _, item)| ItemWithPageJson { page, item })
            .collect();
        print_json(&items)?;
    } else if found.is_empty() {
        println!("nothing overdue as of {}", today);
    } else {
        for (page, line, _) in found {
            println!("[{}] {}", page, line);
        }
    }
    Ok(())
}

fn cmd_search(args: SearchArgs, start: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let desk = load_desk_cwd(start)?;
    if let Some(page) = &args.page {
        find_page(&desk, page)?;
    }
    let re = Regex::new(&args.pattern)?;
    let hits = search::search_items(&desk.workspace, &re, args.page.as_deref());

    if json {
        let hits: Vec<SearchHitJson> = hits.iter().map(hit_to_json).collect();
        print_json(&hits)?;
        return Ok(());
    }

    // One line per item, even when several fields match
    let mut seen = HashSet::new();
    for hit in &hits {
        if seen.insert((&hit.page, &hit.item_id)) {
            println!("{}", format_search_hit(hit));
        }
    }
    Ok(())
}

fn cmd_check(start: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let desk = load_desk_cwd(start)?;
    let result = check::check_desk(&desk);

    if json {
        print_json(&result)?;
    } else {
        if !result.errors.is_empty() {
            println!("Errors:");
            for err in &result.errors {
                match err {
                    check::CheckError::UnknownPage { node_id, page } => {
                        println!("  nav {} points at unknown page: {}", node_id, page);
                    }
                    check::CheckError::PageOnParent { node_id, page } => {
                        println!(
                            "  nav {} has children and a page ({}); parents are not navigable",
                            node_id, page
                        );
                    }
                }
            }
        }
        if !result.warnings.is_empty() {
            if !result.errors.is_empty() {
                println!();
            }
            println!("Warnings:");
            for warn in &result.warnings {
                match warn {
                    check::CheckWarning::OrphanPage { page } => {
                        println!("  page {} is not reachable from the nav", page);
                    }
                    check::CheckWarning::DeadLink { node_id } => {
                        println!("  nav {} has neither route nor page", node_id);
                    }
                    check::CheckWarning::UnassignedInProgress {
                        page,
                        item_id,
                        status,
                    } => {
                        println!("  [{}] {} is {} with no assignee", page, item_id, status);
                    }
                }
            }
        }
        if result.valid {
            println!("✓ desk is valid");
        } else {
            println!("✗ desk has errors");
        }
    }
    if result.valid {
        Ok(())
    } else {
        Err(format!("{} error(s) found", result.errors.len()).into())
    }
}
