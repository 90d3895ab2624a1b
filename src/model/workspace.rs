use indexmap::IndexMap;
use serde::Serialize;

use super::board::KanbanBoard;
use super::error::StageError;
use super::group::StageGroup;
use super::status::{ApplicantStage, ChecklistStatus, LeaveStatus, TaskColumn};

/// The kind of view a page renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Checklist,
    Tasks,
    Leave,
    Pipeline,
}

impl PageKind {
    pub fn label(self) -> &'static str {
        match self {
            PageKind::Checklist => "checklist",
            PageKind::Tasks => "tasks",
            PageKind::Leave => "leave",
            PageKind::Pipeline => "pipeline",
        }
    }
}

/// Read-only view of one page
#[derive(Debug, Clone, Copy)]
pub enum Page<'a> {
    Checklist(&'a StageGroup<ChecklistStatus>),
    Tasks(&'a KanbanBoard<TaskColumn>),
    Leave(&'a KanbanBoard<LeaveStatus>),
    Pipeline(&'a KanbanBoard<ApplicantStage>),
}

impl Page<'_> {
    pub fn kind(&self) -> PageKind {
        match self {
            Page::Checklist(_) => PageKind::Checklist,
            Page::Tasks(_) => PageKind::Tasks,
            Page::Leave(_) => PageKind::Leave,
            Page::Pipeline(_) => PageKind::Pipeline,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Checklist(g) => g.title(),
            Page::Tasks(b) => b.title(),
            Page::Leave(b) => b.title(),
            Page::Pipeline(b) => b.title(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Page::Checklist(g) => g.len(),
            Page::Tasks(b) => b.cards().len(),
            Page::Leave(b) => b.cards().len(),
            Page::Pipeline(b) => b.cards().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn revision(&self) -> u64 {
        match self {
            Page::Checklist(g) => g.revision(),
            Page::Tasks(b) => b.revision(),
            Page::Leave(b) => b.revision(),
            Page::Pipeline(b) => b.revision(),
        }
    }
}

/// Mutable view of one page
#[derive(Debug)]
pub enum PageMut<'a> {
    Checklist(&'a mut StageGroup<ChecklistStatus>),
    Tasks(&'a mut KanbanBoard<TaskColumn>),
    Leave(&'a mut KanbanBoard<LeaveStatus>),
    Pipeline(&'a mut KanbanBoard<ApplicantStage>),
}

/// Every page's data, keyed by page key. Keys are unique across kinds.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    checklists: IndexMap<String, StageGroup<ChecklistStatus>>,
    task_boards: IndexMap<String, KanbanBoard<TaskColumn>>,
    leave_boards: IndexMap<String, KanbanBoard<LeaveStatus>>,
    pipelines: IndexMap<String, KanbanBoard<ApplicantStage>>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.checklists.contains_key(key)
            || self.task_boards.contains_key(key)
            || self.leave_boards.contains_key(key)
            || self.pipelines.contains_key(key)
    }

    fn claim(&self, key: &str) -> Result<(), StageError> {
        if self.contains(key) {
            Err(StageError::duplicate(key))
        } else {
            Ok(())
        }
    }

    pub fn add_checklist(
        &mut self,
        key: impl Into<String>,
        group: StageGroup<ChecklistStatus>,
    ) -> Result<(), StageError> {
        let key = key.into();
        self.claim(&key)?;
        self.checklists.insert(key, group);
        Ok(())
    }

    pub fn add_task_board(
        &mut self,
        key: impl Into<String>,
        board: KanbanBoard<TaskColumn>,
    ) -> Result<(), StageError> {
        let key = key.into();
        self.claim(&key)?;
        self.task_boards.insert(key, board);
        Ok(())
    }

    pub fn add_leave_board(
        &mut self,
        key: impl Into<String>,
        board: KanbanBoard<LeaveStatus>,
    ) -> Result<(), StageError> {
        let key = key.into();
        self.claim(&key)?;
        self.leave_boards.insert(key, board);
        Ok(())
    }

    pub fn add_pipeline(
        &mut self,
        key: impl Into<String>,
        board: KanbanBoard<ApplicantStage>,
    ) -> Result<(), StageError> {
        let key = key.into();
        self.claim(&key)?;
        self.pipelines.insert(key, board);
        Ok(())
    }

    pub fn page(&self, key: &str) -> Option<Page<'_>> {
        if let Some(g) = self.checklists.get(key) {
            return Some(Page::Checklist(g));
        }
        if let Some(b) = self.task_boards.get(key) {
            return Some(Page::Tasks(b));
        }
        if let Some(b) = self.leave_boards.get(key) {
            return Some(Page::Leave(b));
        }
        self.pipelines.get(key).map(Page::Pipeline)
    }

    pub fn page_mut(&mut self, key: &str) -> Option<PageMut<'_>> {
        if let Some(g) = self.checklists.get_mut(key) {
            return Some(PageMut::Checklist(g));
        }
        if let Some(b) = self.task_boards.get_mut(key) {
            return Some(PageMut::Tasks(b));
        }
        if let Some(b) = self.leave_boards.get_mut(key) {
            return Some(PageMut::Leave(b));
        }
        self.pipelines.get_mut(key).map(PageMut::Pipeline)
    }

    /// Page keys grouped by kind, each group in load order
    pub fn page_keys(&self) -> impl Iterator<Item = &str> + Clone {
        self.checklists
            .keys()
            .chain(self.task_boards.keys())
            .chain(self.leave_boards.keys())
            .chain(self.pipelines.keys())
            .map(|k| k.as_str())
    }

    /// Every page with its key, in [`page_keys`](Self::page_keys) order
    pub fn pages(&self) -> Vec<(&str, Page<'_>)> {
        self.page_keys()
            .filter_map(|k| self.page(k).map(|p| (k, p)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.checklists.len() + self.task_boards.len() + self.leave_boards.len() + self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn checklists(&self) -> &IndexMap<String, StageGroup<ChecklistStatus>> {
        &self.checklists
    }

    pub fn task_boards(&self) -> &IndexMap<String, KanbanBoard<TaskColumn>> {
        &self.task_boards
    }

    pub fn leave_boards(&self) -> &IndexMap<String, KanbanBoard<LeaveStatus>> {
        &self.leave_boards
    }

    pub fn pipelines(&self) -> &IndexMap<String, KanbanBoard<ApplicantStage>> {
        &self.pipelines
    }
}
