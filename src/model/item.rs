use std::borrow::Borrow;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::status::{Priority, Status};

/// Identity of a stage item. Seed data may use strings or integers; both are
/// normalized to their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId(s)
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        ItemId(n.to_string())
    }
}

impl From<u32> for ItemId {
    fn from(n: u32) -> Self {
        ItemId(n.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => ItemId(s),
            RawId::Number(n) => ItemId(n.to_string()),
        })
    }
}

/// One trackable unit of work: a checklist line, a kanban card, an applicant.
///
/// `status` and `completed_at` are only writable through
/// [`crate::model::transition`], which keeps `completed_at` set exactly while
/// the status is the domain's completed status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageItem<S: Status> {
    pub id: ItemId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    status: S,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
}

impl<S: Status> StageItem<S> {
    /// Create an item in the domain's initial status
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        StageItem {
            id: id.into(),
            title: title.into(),
            description: None,
            status: S::initial(),
            priority: None,
            due_date: None,
            assignee: None,
            notes: None,
            completed_at: None,
        }
    }

    /// Rebuild an item from loaded data. `completed_at` must agree with
    /// `status`; a completed item without a timestamp is stamped with `now`.
    pub(crate) fn restore(
        mut self,
        status: S,
        completed_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Self, String> {
        match (status.is_completed(), completed_at) {
            (true, Some(at)) => self.completed_at = Some(at),
            (true, None) => {
                tracing::debug!(item = %self.id, "stamping completed item without completed_at");
                self.completed_at = Some(now);
            }
            (false, Some(_)) => {
                return Err(format!(
                    "item {} has completed_at but status is {}",
                    self.id, status
                ));
            }
            (false, None) => self.completed_at = None,
        }
        self.status = status;
        Ok(self)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn status(&self) -> S {
        self.status
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Past its due date without reaching a terminal status
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_terminal() && self.due_date.is_some_and(|due| due < today)
    }

    pub(crate) fn set_status_raw(&mut self, status: S, completed_at: Option<DateTime<Utc>>) {
        self.status = status;
        self.completed_at = completed_at;
    }
}
