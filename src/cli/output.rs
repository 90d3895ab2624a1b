use serde::Serialize;

use crate::model::item::StageItem;
use crate::model::nav::NavRow;
use crate::model::status::{Status, expected_keys};
use crate::model::workspace::PageKind;
use crate::ops::progress::{AggregateProgress, Progress, Summary, stage_progress};
use crate::ops::search::SearchHit;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ItemJson {
    pub id: String,
    pub title: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

#[derive(Serialize)]
pub struct GroupJson {
    /// Category name or column label
    pub name: String,
    pub items: Vec<ItemJson>,
}

#[derive(Serialize)]
pub struct PageJson {
    pub key: String,
    pub kind: PageKind,
    pub title: String,
    pub groups: Vec<GroupJson>,
}

#[derive(Serialize)]
pub struct PageInfoJson {
    pub key: String,
    pub kind: PageKind,
    pub title: String,
    #[serde(flatten)]
    pub progress: Summary,
}

#[derive(Serialize)]
pub struct ProgressJson {
    pub page: String,
    pub categories: Vec<CategoryProgressJson>,
    pub overall: Summary,
}

#[derive(Serialize)]
pub struct CategoryProgressJson {
    pub name: String,
    #[serde(flatten)]
    pub progress: Summary,
}

#[derive(Serialize)]
pub struct ItemWithPageJson {
    pub page: String,
    #[serde(flatten)]
    pub item: ItemJson,
}

#[derive(Serialize)]
pub struct NavRowJson {
    pub id: String,
    pub label: String,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
    pub active: bool,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub page: String,
    pub item_id: String,
    pub title: String,
    pub field: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn item_to_json<S: Status>(item: &StageItem<S>) -> ItemJson {
    ItemJson {
        id: item.id.to_string(),
        title: item.title.clone(),
        status: item.status().key().to_string(),
        description: item.description.clone(),
        priority: item.priority.map(|p| p.key().to_string()),
        due_date: item.due_date.map(|d| d.to_string()),
        assignee: item.assignee.clone(),
        notes: item.notes.clone(),
        completed_at: item
            .completed_at()
            .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
    }
}

pub fn aggregate_to_json<S: Status>(page: &str, agg: &AggregateProgress<S>) -> ProgressJson {
    ProgressJson {
        page: page.to_string(),
        categories: agg
            .categories
            .iter()
            .map(|c| CategoryProgressJson {
                name: c.name.clone(),
                progress: c.progress.summary(),
            })
            .collect(),
        overall: agg.overall.summary(),
    }
}

pub fn nav_row_to_json(row: &NavRow) -> NavRowJson {
    NavRowJson {
        id: row.id.clone(),
        label: row.label.clone(),
        depth: row.depth,
        has_children: row.has_children,
        expanded: row.expanded,
        active: row.active_path,
    }
}

pub fn hit_to_json(hit: &SearchHit) -> SearchHitJson {
    SearchHitJson {
        page: hit.page.clone(),
        item_id: hit.item_id.clone(),
        title: hit.title.clone(),
        field: serde_json::to_value(hit.field)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// `[####------]` style bar, `width` cells between the brackets
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent as usize * width + 50) / 100;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// `3/10 (30%)`
pub fn format_summary(summary: &Summary) -> String {
    format!("{}/{} ({}%)", summary.completed, summary.total, summary.percent)
}

/// Format a single item as a one-line summary
pub fn format_item_line<S: Status>(item: &StageItem<S>) -> String {
    let mut line = format!("[{}] {} {}", item.status().key(), item.id, item.title);
    if let Some(p) = item.priority {
        line.push_str(&format!(" !{}", p.key()));
    }
    if let Some(a) = &item.assignee {
        line.push_str(&format!(" @{}", a));
    }
    if let Some(d) = item.due_date {
        line.push_str(&format!(" due:{}", d));
    }
    line
}

/// Item line plus its stage bar, for applicant pipelines
pub fn format_applicant_line<S: Status>(item: &StageItem<S>) -> String {
    format!(
        "{} {}",
        progress_bar(stage_progress(item.status()), 10),
        format_item_line(item)
    )
}

/// Format a page listing header
pub fn format_page_header(key: &str, title: &str) -> String {
    format!("== {} ({}) ==", title, key)
}

/// One line of the `pages` listing
pub fn format_page_info(key: &str, kind: PageKind, title: &str, summary: &Summary) -> String {
    format!(
        "  {} [{}] {}  {} {}",
        key,
        kind.label(),
        title,
        progress_bar(summary.percent, 10),
        format_summary(summary)
    )
}

/// Sidebar-style tree listing
pub fn format_nav_rows(rows: &[NavRow]) -> Vec<String> {
    rows.iter()
        .map(|r| {
            let marker = match (r.has_children, r.expanded) {
                (true, true) => "▾",
                (true, false) => "▸",
                (false, _) => "·",
            };
            format!("{}{} {} ({})", "  ".repeat(r.depth), marker, r.label, r.id)
        })
        .collect()
}

/// Per-category progress lines followed by the overall figure
pub fn format_aggregate<S: Status>(agg: &AggregateProgress<S>) -> Vec<String> {
    let width = agg
        .categories
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("overall".len());
    let mut lines: Vec<String> = agg
        .categories
        .iter()
        .map(|c| format_progress_row(&c.name, width, &c.progress))
        .collect();
    lines.push(format_progress_row("overall", width, &agg.overall));
    lines
}

fn format_progress_row<S: Status>(name: &str, width: usize, p: &Progress<S>) -> String {
    format!(
        "{:<width$}  {} {}",
        name,
        progress_bar(p.percent, 20),
        format_summary(&p.summary()),
        width = width
    )
}

/// One search hit
pub fn format_search_hit(hit: &SearchHit) -> String {
    let field = serde_json::to_value(hit.field)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    format!("{} {} {} ({})", hit.page, hit.item_id, hit.title, field)
}

/// Parse a status key for domain `S`
pub fn parse_status<S: Status>(s: &str) -> Result<S, String> {
    S::from_key(s).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected: {})",
            s,
            expected_keys::<S>()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::collection::StageCollection;
    use crate::model::status::{ApplicantStage, ChecklistStatus, LeaveStatus, Priority};
    use crate::model::transition::TransitionMeta;
    use crate::ops::progress::aggregate;
    use chrono::NaiveDate;
    use insta::assert_snapshot;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 10), "[----------]");
        assert_eq!(progress_bar(67, 10), "[#######---]");
        assert_eq!(progress_bar(100, 4), "[####]");
    }

    #[test]
    fn test_item_line() {
        let item: StageItem<ChecklistStatus> = StageItem::new("doc-1", "Sign contract")
            .with_priority(Priority::High)
            .with_assignee("Dana")
            .with_due_date(NaiveDate::from_ymd_opt(2025, 5, 3).unwrap());
        assert_snapshot!(format_item_line(&item), @"[pending] doc-1 Sign contract !high @Dana due:2025-05-03");
    }

    #[test]
    fn test_applicant_line() {
        let mut c: StageCollection<ApplicantStage> = StageCollection::new("Backend");
        c.add_item(StageItem::new("c-1", "Alex Kim")).unwrap();
        c.update_status("c-1", ApplicantStage::Screening, TransitionMeta::none())
            .unwrap();
        assert_snapshot!(format_applicant_line(c.get("c-1").unwrap()), @"[####------] [screening] c-1 Alex Kim");
    }

    #[test]
    fn test_format_aggregate() {
        let mut docs: StageCollection<ChecklistStatus> = StageCollection::new("Documentation");
        docs.add_item(StageItem::new("a", "A")).unwrap();
        docs.add_item(StageItem::new("b", "B")).unwrap();
        docs.update_status("a", ChecklistStatus::Completed, TransitionMeta::none())
            .unwrap();
        let mut it: StageCollection<ChecklistStatus> = StageCollection::new("IT");
        it.add_item(StageItem::new("c", "C")).unwrap();

        let agg = aggregate([&docs, &it]);
        let text = format_aggregate(&agg).join("\n");
        assert_snapshot!(text, @r"
        Documentation  [##########----------] 1/2 (50%)
        IT             [--------------------] 0/1 (0%)
        overall        [#######-------------] 1/3 (33%)
        ");
    }

    #[test]
    fn test_format_nav_rows() {
        let rows = vec![
            NavRow {
                id: "employees".into(),
                label: "Employees".into(),
                icon: None,
                depth: 0,
                has_children: true,
                expanded: true,
                active_path: true,
            },
            NavRow {
                id: "add-new-employee".into(),
                label: "Add Employee".into(),
                icon: None,
                depth: 1,
                has_children: false,
                expanded: false,
                active_path: true,
            },
        ];
        assert_eq!(
            format_nav_rows(&rows),
            vec!["▾ Employees (employees)", "  · Add Employee (add-new-employee)"]
        );
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status::<LeaveStatus>("approved"), Ok(LeaveStatus::Approved));
        let err = parse_status::<LeaveStatus>("maybe").unwrap_err();
        assert_eq!(
            err,
            "unknown status 'maybe' (expected: pending, approved, rejected)"
        );
    }

    #[test]
    fn test_item_json_skips_empty_fields() {
        let item: StageItem<ChecklistStatus> = StageItem::new(7u32, "Orientation");
        let json = serde_json::to_value(item_to_json(&item)).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["status"], "pending");
        assert!(json.get("assignee").is_none());
        assert!(json.get("completed_at").is_none());
    }
}
