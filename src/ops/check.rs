use std::collections::HashSet;

use serde::Serialize;

use crate::model::desk::Desk;
use crate::model::item::StageItem;
use crate::model::nav::NavigationTree;
use crate::model::status::Status;
use crate::model::workspace::{Page, Workspace};

/// Structured result from `hd check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A validation error (something that should be fixed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// A nav leaf points at a page the seed does not define
    #[serde(rename = "unknown_page")]
    UnknownPage { node_id: String, page: String },
    /// A nav parent carries a page; parents are never navigable
    #[serde(rename = "page_on_parent")]
    PageOnParent { node_id: String, page: String },
}

/// A validation warning (non-critical issue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// A page no nav leaf leads to
    #[serde(rename = "orphan_page")]
    OrphanPage { page: String },
    /// A nav leaf with neither route nor page
    #[serde(rename = "dead_link")]
    DeadLink { node_id: String },
    /// Work under way with nobody assigned
    #[serde(rename = "unassigned_in_progress")]
    UnassignedInProgress {
        page: String,
        item_id: String,
        status: String,
    },
}

/// Validate a desk and return structured results.
///
/// Checks performed:
/// 1. Every nav leaf's `page` exists in the workspace
/// 2. No nav parent carries a `page`
/// 3. Warnings for orphan pages, dead links, unassigned work in progress
pub fn check_desk(desk: &Desk) -> CheckResult {
    check(&desk.nav, &desk.workspace)
}

pub fn check(nav: &NavigationTree, workspace: &Workspace) -> CheckResult {
    let mut result = CheckResult::default();
    let mut linked: HashSet<&str> = HashSet::new();

    for node in nav.nodes() {
        match (&node.page, node.is_leaf()) {
            (Some(page), true) => {
                linked.insert(page.as_str());
                if !workspace.contains(page) {
                    result.errors.push(CheckError::UnknownPage {
                        node_id: node.id.clone(),
                        page: page.clone(),
                    });
                }
            }
            (Some(page), false) => result.errors.push(CheckError::PageOnParent {
                node_id: node.id.clone(),
                page: page.clone(),
            }),
            (None, true) if node.route.is_none() => {
                result.warnings.push(CheckWarning::DeadLink {
                    node_id: node.id.clone(),
                })
            }
            (None, _) => {}
        }
    }

    for (key, page) in workspace.pages() {
        if !linked.contains(key) {
            result.warnings.push(CheckWarning::OrphanPage {
                page: key.to_string(),
            });
        }
        match page {
            Page::Checklist(g) => check_items(key, g.items(), &mut result),
            Page::Tasks(b) => check_items(key, b.cards().items(), &mut result),
            Page::Leave(b) => check_items(key, b.cards().items(), &mut result),
            Page::Pipeline(b) => check_items(key, b.cards().items(), &mut result),
        }
    }

    result.valid = result.errors.is_empty();
    result
}

fn check_items<'a, S: Status>(
    page: &str,
    items: impl IntoIterator<Item = &'a StageItem<S>>,
    result: &mut CheckResult,
) {
    for item in items {
        let status = item.status();
        if status != S::initial() && !status.is_terminal() && item.assignee.is_none() {
            result.warnings.push(CheckWarning::UnassignedInProgress {
                page: page.to_string(),
                item_id: item.id.to_string(),
                status: status.key().to_string(),
            });
        }
    }
}
