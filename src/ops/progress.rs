//! Derived progress figures. Nothing here is stored; every widget recomputes
//! from the items on each render.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::collection::StageCollection;
use crate::model::group::StageGroup;
use crate::model::item::StageItem;
use crate::model::status::Status;
use crate::model::workspace::Page;

/// Completion figures for a set of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress<S: Status> {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
    /// Every status of the domain in display order, zero counts included
    pub by_status: IndexMap<S, usize>,
}

impl<S: Status> Progress<S> {
    /// Drop the per-status breakdown
    pub fn summary(&self) -> Summary {
        Summary {
            completed: self.completed,
            total: self.total,
            percent: self.percent,
        }
    }
}

/// Status-agnostic completion figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryProgress<S: Status> {
    pub name: String,
    pub progress: Progress<S>,
}

/// Per-category figures plus one computed over the union of all items
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateProgress<S: Status> {
    pub categories: Vec<CategoryProgress<S>>,
    pub overall: Progress<S>,
}

/// `completed / total` as a whole percentage, rounded half up. Empty is 0.
pub fn percent_complete(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    ((200 * completed + total) / (2 * total)) as u8
}

pub fn progress<'a, S, I>(items: I) -> Progress<S>
where
    S: Status,
    I: IntoIterator<Item = &'a StageItem<S>>,
{
    let mut by_status: IndexMap<S, usize> = S::ALL.iter().map(|&s| (s, 0)).collect();
    let mut total = 0;
    let mut completed = 0;
    for item in items {
        total += 1;
        if item.is_completed() {
            completed += 1;
        }
        *by_status.entry(item.status()).or_insert(0) += 1;
    }
    Progress {
        completed,
        total,
        percent: percent_complete(completed, total),
        by_status,
    }
}

pub fn collection_progress<S: Status>(collection: &StageCollection<S>) -> Progress<S> {
    progress(collection.items())
}

/// Progress of each collection and of all of them together. The overall
/// figure counts items, it is not an average of the category percentages.
pub fn aggregate<'a, S, I>(collections: I) -> AggregateProgress<S>
where
    S: Status,
    I: IntoIterator<Item = &'a StageCollection<S>>,
    I::IntoIter: Clone,
{
    let collections = collections.into_iter();
    let categories = collections
        .clone()
        .map(|c| CategoryProgress {
            name: c.name().to_string(),
            progress: collection_progress(c),
        })
        .collect();
    let overall = progress(collections.flat_map(|c| c.items().iter()));
    AggregateProgress {
        categories,
        overall,
    }
}

pub fn group_progress<S: Status>(group: &StageGroup<S>) -> AggregateProgress<S> {
    aggregate(group.categories())
}

/// The item to work on next: the first one already under way, otherwise the
/// first one not finished.
pub fn next_actionable<'a, S, I>(items: I) -> Option<&'a StageItem<S>>
where
    S: Status,
    I: IntoIterator<Item = &'a StageItem<S>>,
    I::IntoIter: Clone,
{
    let items = items.into_iter();
    items
        .clone()
        .find(|i| {
            let s = i.status();
            s != S::initial() && !s.is_terminal()
        })
        .or_else(|| items.into_iter().find(|i| !i.status().is_terminal()))
}

/// Items past their due date and not in a terminal status
pub fn overdue<'a, S, I>(items: I, today: NaiveDate) -> Vec<&'a StageItem<S>>
where
    S: Status,
    I: IntoIterator<Item = &'a StageItem<S>>,
{
    items.into_iter().filter(|i| i.is_overdue(today)).collect()
}

/// How far along the forward stages `stage` sits, as a percentage. The first
/// stage counts as one step taken; rejection is 0.
pub fn stage_progress<S: Status>(stage: S) -> u8 {
    if stage.is_rejection() {
        return 0;
    }
    let total = S::stages().count();
    let step = S::stages().position(|s| s == stage).map_or(0, |p| p + 1);
    percent_complete(step, total)
}

/// Overall completion of any page
pub fn page_summary(page: &Page<'_>) -> Summary {
    match page {
        Page::Checklist(g) => progress(g.items()).summary(),
        Page::Tasks(b) => collection_progress(b.cards()).summary(),
        Page::Leave(b) => collection_progress(b.cards()).summary(),
        Page::Pipeline(b) => collection_progress(b.cards()).summary(),
    }
}
