use std::ops::Range;

use regex::Regex;
use serde::Serialize;

use crate::model::item::StageItem;
use crate::model::status::Status;
use crate::model::workspace::{Page, Workspace};

/// Which field of an item matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Id,
    Title,
    Description,
    Assignee,
    Notes,
}

/// A search hit for one field of one item
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub page: String,
    /// Category within a checklist page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub item_id: String,
    pub title: String,
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search items across the workspace.
///
/// If `page_filter` is `Some`, only that page is searched.
pub fn search_items(workspace: &Workspace, re: &Regex, page_filter: Option<&str>) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for (key, page) in workspace.pages() {
        if page_filter.is_some_and(|f| f != key) {
            continue;
        }
        search_page(re, key, &page, &mut hits);
    }
    hits
}

fn search_page(re: &Regex, key: &str, page: &Page<'_>, hits: &mut Vec<SearchHit>) {
    match page {
        Page::Checklist(g) => {
            for (category, items) in g.items_by_category() {
                for item in items {
                    search_item(re, key, Some(category), item, hits);
                }
            }
        }
        Page::Tasks(b) => b
            .cards()
            .items()
            .iter()
            .for_each(|i| search_item(re, key, None, i, hits)),
        Page::Leave(b) => b
            .cards()
            .items()
            .iter()
            .for_each(|i| search_item(re, key, None, i, hits)),
        Page::Pipeline(b) => b
            .cards()
            .items()
            .iter()
            .for_each(|i| search_item(re, key, None, i, hits)),
    }
}

fn search_item<S: Status>(
    re: &Regex,
    page: &str,
    category: Option<&str>,
    item: &StageItem<S>,
    hits: &mut Vec<SearchHit>,
) {
    let fields = [
        (MatchField::Id, Some(item.id.as_str())),
        (MatchField::Title, Some(item.title.as_str())),
        (MatchField::Description, item.description.as_deref()),
        (MatchField::Assignee, item.assignee.as_deref()),
        (MatchField::Notes, item.notes.as_deref()),
    ];
    for (field, text) in fields {
        let Some(text) = text else { continue };
        let spans = find_matches(re, text);
        if !spans.is_empty() {
            hits.push(SearchHit {
                page: page.to_string(),
                category: category.map(str::to_string),
                item_id: item.id.to_string(),
                title: item.title.clone(),
                field,
                spans,
            });
        }
    }
}
