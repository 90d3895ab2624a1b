use std::fmt;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// How strictly a domain orders its statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any status may move to any other status
    #[default]
    Permissive,
    /// Only one step forward along the stage order, or rejection
    Linear,
}

/// Rule set a collection applies to every status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRules {
    pub policy: TransitionPolicy,
    /// Moving into a rejection status needs a non-blank reason
    pub rejection_reason_required: bool,
}

impl TransitionRules {
    pub const fn permissive() -> Self {
        TransitionRules {
            policy: TransitionPolicy::Permissive,
            rejection_reason_required: false,
        }
    }

    pub const fn linear() -> Self {
        TransitionRules {
            policy: TransitionPolicy::Linear,
            rejection_reason_required: true,
        }
    }

    pub const fn with_reason_required(mut self, required: bool) -> Self {
        self.rejection_reason_required = required;
        self
    }
}

/// A closed set of statuses for one domain (checklist, kanban, leave, pipeline).
///
/// `ALL` doubles as the display order and the kanban column order. The first
/// entry is the initial status of a freshly created item.
pub trait Status:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + Serialize + DeserializeOwned + 'static
{
    const ALL: &'static [Self];
    /// Name of the domain, used in config sections and messages
    const DOMAIN: &'static str;

    /// Stable lowercase key (same as the serde representation)
    fn key(self) -> &'static str;

    /// Human-readable column / badge label
    fn label(self) -> &'static str;

    /// The status that marks an item as done; `completed_at` tracks it
    fn is_completed(self) -> bool;

    fn is_rejection(self) -> bool {
        false
    }

    /// Set aside, off the forward path (on hold)
    fn is_parked(self) -> bool {
        false
    }

    fn default_rules() -> TransitionRules;

    fn initial() -> Self {
        Self::ALL[0]
    }

    /// No further work is expected
    fn is_terminal(self) -> bool {
        self.is_completed() || self.is_rejection()
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.key() == key)
    }

    /// Index in `ALL`
    fn position(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// Statuses along the forward path, rejection and parked excluded
    fn stages() -> impl Iterator<Item = Self> + Clone {
        Self::ALL
            .iter()
            .copied()
            .filter(|s| !s.is_rejection() && !s.is_parked())
    }

    /// The stage directly after this one on the forward path
    fn next_stage(self) -> Option<Self> {
        if self.is_rejection() || self.is_parked() {
            return None;
        }
        Self::stages().skip_while(|s| *s != self).nth(1)
    }

    /// The stage directly before this one on the forward path
    fn prev_stage(self) -> Option<Self> {
        if self.is_rejection() || self.is_parked() {
            return None;
        }
        let mut prev = None;
        for s in Self::stages() {
            if s == self {
                return prev;
            }
            prev = Some(s);
        }
        None
    }
}

/// Comma-separated list of valid keys, for error messages
pub fn expected_keys<S: Status>() -> String {
    S::ALL.iter().map(|s| s.key()).collect::<Vec<_>>().join(", ")
}

// ---------------------------------------------------------------------------
// Checklist (onboarding, offboarding)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChecklistStatus {
    Pending,
    InProgress,
    Completed,
    OnHold,
}

impl Status for ChecklistStatus {
    const ALL: &'static [Self] = &[
        ChecklistStatus::Pending,
        ChecklistStatus::InProgress,
        ChecklistStatus::Completed,
        ChecklistStatus::OnHold,
    ];
    const DOMAIN: &'static str = "checklists";

    fn key(self) -> &'static str {
        match self {
            ChecklistStatus::Pending => "pending",
            ChecklistStatus::InProgress => "in-progress",
            ChecklistStatus::Completed => "completed",
            ChecklistStatus::OnHold => "on-hold",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ChecklistStatus::Pending => "Pending",
            ChecklistStatus::InProgress => "In Progress",
            ChecklistStatus::Completed => "Completed",
            ChecklistStatus::OnHold => "On Hold",
        }
    }

    fn is_completed(self) -> bool {
        self == ChecklistStatus::Completed
    }

    fn is_parked(self) -> bool {
        self == ChecklistStatus::OnHold
    }

    fn default_rules() -> TransitionRules {
        TransitionRules::permissive()
    }
}

// ---------------------------------------------------------------------------
// Task board
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskColumn {
    Todo,
    InProgress,
    Review,
    Done,
}

impl Status for TaskColumn {
    const ALL: &'static [Self] = &[
        TaskColumn::Todo,
        TaskColumn::InProgress,
        TaskColumn::Review,
        TaskColumn::Done,
    ];
    const DOMAIN: &'static str = "tasks";

    fn key(self) -> &'static str {
        match self {
            TaskColumn::Todo => "todo",
            TaskColumn::InProgress => "in-progress",
            TaskColumn::Review => "review",
            TaskColumn::Done => "done",
        }
    }

    fn label(self) -> &'static str {
        match self {
            TaskColumn::Todo => "To Do",
            TaskColumn::InProgress => "In Progress",
            TaskColumn::Review => "Review",
            TaskColumn::Done => "Done",
        }
    }

    fn is_completed(self) -> bool {
        self == TaskColumn::Done
    }

    fn default_rules() -> TransitionRules {
        TransitionRules::permissive()
    }
}

// ---------------------------------------------------------------------------
// Leave requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl Status for LeaveStatus {
    const ALL: &'static [Self] = &[
        LeaveStatus::Pending,
        LeaveStatus::Approved,
        LeaveStatus::Rejected,
    ];
    const DOMAIN: &'static str = "leave";

    fn key(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }

    fn label(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
        }
    }

    fn is_completed(self) -> bool {
        self == LeaveStatus::Approved
    }

    fn is_rejection(self) -> bool {
        self == LeaveStatus::Rejected
    }

    fn default_rules() -> TransitionRules {
        TransitionRules::permissive().with_reason_required(true)
    }
}

// ---------------------------------------------------------------------------
// Applicant pipeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicantStage {
    Applied,
    Screening,
    Interview,
    Offer,
    Hired,
    Rejected,
}

impl Status for ApplicantStage {
    const ALL: &'static [Self] = &[
        ApplicantStage::Applied,
        ApplicantStage::Screening,
        ApplicantStage::Interview,
        ApplicantStage::Offer,
        ApplicantStage::Hired,
        ApplicantStage::Rejected,
    ];
    const DOMAIN: &'static str = "applicants";

    fn key(self) -> &'static str {
        match self {
            ApplicantStage::Applied => "applied",
            ApplicantStage::Screening => "screening",
            ApplicantStage::Interview => "interview",
            ApplicantStage::Offer => "offer",
            ApplicantStage::Hired => "hired",
            ApplicantStage::Rejected => "rejected",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ApplicantStage::Applied => "Applied",
            ApplicantStage::Screening => "Screening",
            ApplicantStage::Interview => "Interview",
            ApplicantStage::Offer => "Offer",
            ApplicantStage::Hired => "Hired",
            ApplicantStage::Rejected => "Rejected",
        }
    }

    fn is_completed(self) -> bool {
        self == ApplicantStage::Hired
    }

    fn is_rejection(self) -> bool {
        self == ApplicantStage::Rejected
    }

    fn default_rules() -> TransitionRules {
        TransitionRules::linear()
    }
}

impl fmt::Display for ChecklistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl fmt::Display for TaskColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl fmt::Display for ApplicantStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn key(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}
