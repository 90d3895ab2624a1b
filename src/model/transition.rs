//! Status transitions.
//!
//! Every status write in the crate goes through [`apply`]. It validates the
//! move against the collection's [`TransitionRules`], keeps `completed_at` in
//! step with the status, and returns a [`Transition`] record carrying enough
//! of the prior state to compensate the change later.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::StageError;
use super::item::{ItemId, StageItem};
use super::status::{Status, TransitionPolicy, TransitionRules};

/// Extra data a caller supplies with a status change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionMeta {
    /// Rejection reason; written into the item's notes
    pub reason: Option<String>,
}

impl TransitionMeta {
    pub fn none() -> Self {
        TransitionMeta::default()
    }

    pub fn with_reason(reason: impl Into<String>) -> Self {
        TransitionMeta {
            reason: Some(reason.into()),
        }
    }

    fn reason(&self) -> Option<&str> {
        self.reason.as_deref().map(str::trim).filter(|r| !r.is_empty())
    }
}

/// A status change that was applied to an item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition<S: Status> {
    pub item_id: ItemId,
    pub from: S,
    pub to: S,
    pub at: DateTime<Utc>,
    /// `completed_at` before the change
    #[serde(skip)]
    pub prior_completed_at: Option<DateTime<Utc>>,
    /// `notes` before the change
    #[serde(skip)]
    pub prior_notes: Option<String>,
}

/// Validate a move without touching any item.
pub fn check<S: Status>(
    rules: &TransitionRules,
    from: S,
    to: S,
    meta: &TransitionMeta,
) -> Result<(), StageError> {
    if from == to {
        return Ok(());
    }

    if to.is_rejection() && rules.rejection_reason_required && meta.reason().is_none() {
        return Err(invalid(from, to, "a rejection reason is required"));
    }

    if rules.policy == TransitionPolicy::Linear {
        if from.is_terminal() {
            return Err(invalid(from, to, "stage is final"));
        }
        if !to.is_rejection() && from.next_stage() != Some(to) {
            return Err(invalid(from, to, "stages advance one step at a time"));
        }
    }

    Ok(())
}

/// Apply a status change to `item`.
///
/// Returns `Ok(None)` when `to` is already the current status; repeating a
/// transition never changes observable state.
pub fn apply<S: Status>(
    item: &mut StageItem<S>,
    to: S,
    meta: TransitionMeta,
    rules: &TransitionRules,
    now: DateTime<Utc>,
) -> Result<Option<Transition<S>>, StageError> {
    let from = item.status();
    check(rules, from, to, &meta)?;
    if from == to {
        return Ok(None);
    }

    let record = Transition {
        item_id: item.id.clone(),
        from,
        to,
        at: now,
        prior_completed_at: item.completed_at(),
        prior_notes: item.notes.clone(),
    };

    let completed_at = if to.is_completed() { Some(now) } else { None };
    item.set_status_raw(to, completed_at);
    if to.is_rejection()
        && let Some(reason) = meta.reason()
    {
        item.notes = Some(reason.to_string());
    }

    tracing::debug!(
        domain = S::DOMAIN,
        item = %record.item_id,
        from = %from,
        to = %to,
        "status transition"
    );
    Ok(Some(record))
}

/// Undo a previously applied transition, restoring status, `completed_at`
/// and notes. Rules are not consulted: this is the compensating action for
/// a change the rules already allowed.
pub(crate) fn revert<S: Status>(item: &mut StageItem<S>, transition: &Transition<S>) {
    item.set_status_raw(transition.from, transition.prior_completed_at);
    item.notes = transition.prior_notes.clone();
    tracing::debug!(
        domain = S::DOMAIN,
        item = %transition.item_id,
        restored = %transition.from,
        "status transition reverted"
    );
}

fn invalid<S: Status>(from: S, to: S, reason: &str) -> StageError {
    StageError::InvalidTransition {
        from: from.key().to_string(),
        to: to.key().to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::status::{ApplicantStage, ChecklistStatus, LeaveStatus};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 10, 30, 0).unwrap()
    }

    #[test]
    fn pending_to_in_progress_has_no_side_effect() {
        let mut item = StageItem::<ChecklistStatus>::new("a", "Orientation");
        let rules = ChecklistStatus::default_rules();
        let t = apply(&mut item, ChecklistStatus::InProgress, TransitionMeta::none(), &rules, now())
            .unwrap()
            .unwrap();
        assert_eq!(t.from, ChecklistStatus::Pending);
        assert_eq!(item.status(), ChecklistStatus::InProgress);
        assert!(item.completed_at().is_none());
        assert!(item.notes.is_none());
    }

    #[test]
    fn completing_sets_timestamp_and_reopening_clears_it() {
        let mut item = StageItem::<ChecklistStatus>::new("a", "Orientation");
        let rules = ChecklistStatus::default_rules();
        apply(&mut item, ChecklistStatus::Completed, TransitionMeta::none(), &rules, now()).unwrap();
        assert_eq!(item.completed_at(), Some(now()));

        apply(&mut item, ChecklistStatus::Pending, TransitionMeta::none(), &rules, now()).unwrap();
        assert!(item.completed_at().is_none());
    }

    #[test]
    fn same_status_is_a_no_op() {
        let mut item = StageItem::<ChecklistStatus>::new("a", "Orientation");
        let rules = ChecklistStatus::default_rules();
        apply(&mut item, ChecklistStatus::Completed, TransitionMeta::none(), &rules, now()).unwrap();
        let before = item.clone();

        let later = now() + chrono::Duration::hours(1);
        let again =
            apply(&mut item, ChecklistStatus::Completed, TransitionMeta::none(), &rules, later).unwrap();
        assert!(again.is_none());
        assert_eq!(item, before);
    }

    #[test]
    fn rejection_without_reason_fails_when_required() {
        let mut item = StageItem::<LeaveStatus>::new(7u32, "Annual leave");
        let rules = LeaveStatus::default_rules();
        let err = apply(&mut item, LeaveStatus::Rejected, TransitionMeta::none(), &rules, now())
            .unwrap_err();
        assert!(matches!(err, StageError::InvalidTransition { .. }));
        assert_eq!(item.status(), LeaveStatus::Pending);

        let blank = apply(
            &mut item,
            LeaveStatus::Rejected,
            TransitionMeta::with_reason("   "),
            &rules,
            now(),
        );
        assert!(blank.is_err());
    }

    #[test]
    fn rejection_reason_lands_in_notes() {
        let mut item = StageItem::<LeaveStatus>::new(7u32, "Annual leave");
        let rules = LeaveStatus::default_rules();
        apply(
            &mut item,
            LeaveStatus::Rejected,
            TransitionMeta::with_reason("Peak season"),
            &rules,
            now(),
        )
        .unwrap();
        assert_eq!(item.status(), LeaveStatus::Rejected);
        assert_eq!(item.notes.as_deref(), Some("Peak season"));
    }

    #[test]
    fn permissive_allows_direct_completion() {
        let mut item = StageItem::<ChecklistStatus>::new("a", "Orientation");
        let rules = ChecklistStatus::default_rules();
        assert!(
            apply(&mut item, ChecklistStatus::Completed, TransitionMeta::none(), &rules, now())
                .is_ok()
        );
    }

    #[test]
    fn linear_allows_only_the_next_stage() {
        let rules = ApplicantStage::default_rules();
        let none = TransitionMeta::none();
        assert!(check(&rules, ApplicantStage::Applied, ApplicantStage::Screening, &none).is_ok());
        assert!(check(&rules, ApplicantStage::Applied, ApplicantStage::Interview, &none).is_err());
        assert!(check(&rules, ApplicantStage::Interview, ApplicantStage::Screening, &none).is_err());
        assert!(check(&rules, ApplicantStage::Hired, ApplicantStage::Rejected, &none).is_err());
        assert!(
            check(
                &rules,
                ApplicantStage::Interview,
                ApplicantStage::Rejected,
                &TransitionMeta::with_reason("No visa sponsorship")
            )
            .is_ok()
        );
    }

    #[test]
    fn rejecting_completed_item_clears_timestamp() {
        let mut item = StageItem::<LeaveStatus>::new(3u32, "Sick leave");
        let rules = LeaveStatus::default_rules();
        apply(&mut item, LeaveStatus::Approved, TransitionMeta::none(), &rules, now()).unwrap();
        assert!(item.completed_at().is_some());
        apply(
            &mut item,
            LeaveStatus::Rejected,
            TransitionMeta::with_reason("Missing certificate"),
            &rules,
            now(),
        )
        .unwrap();
        assert!(item.completed_at().is_none());
    }

    #[test]
    fn revert_restores_prior_state() {
        let mut item = StageItem::<LeaveStatus>::new(3u32, "Sick leave").with_notes("Flu");
        let rules = LeaveStatus::default_rules();
        let t = apply(
            &mut item,
            LeaveStatus::Rejected,
            TransitionMeta::with_reason("Duplicate request"),
            &rules,
            now(),
        )
        .unwrap()
        .unwrap();
        revert(&mut item, &t);
        assert_eq!(item.status(), LeaveStatus::Pending);
        assert_eq!(item.notes.as_deref(), Some("Flu"));
        assert!(item.completed_at().is_none());
    }
}
