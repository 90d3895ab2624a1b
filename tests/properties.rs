//! Property tests for the stage and navigation model.
//!
//! - `completed_at` is set exactly when an item sits in its completed status,
//!   whatever sequence of moves, rollbacks and undos produced that state
//! - completion percentages stay in 0..=100 and are 0 only without progress
//! - repeating a status update changes nothing
//! - expanding a nav node twice is a no-op, and the active path covers every
//!   ancestor of the active leaf and nothing else

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use hrdesk::model::{
    ApplicantStage, ChecklistStatus, KanbanBoard, NavNode, NavigationEvent, NavigationShell,
    NavigationTree, StageCollection, StageItem, Status, Ticket, TransitionMeta,
};
use hrdesk::ops::progress::{percent_complete, progress};

// ============================================================================
// STRATEGIES
// ============================================================================

fn arb_checklist_status() -> impl Strategy<Value = ChecklistStatus> {
    prop::sample::select(ChecklistStatus::ALL.to_vec())
}

fn arb_applicant_stage() -> impl Strategy<Value = ApplicantStage> {
    prop::sample::select(ApplicantStage::ALL.to_vec())
}

/// One user action against a board
#[derive(Debug, Clone)]
enum BoardOp {
    Move { card: usize, to: ApplicantStage, with_reason: bool },
    Advance(usize),
    Confirm(usize),
    Rollback(usize),
    Undo,
}

fn arb_board_op() -> impl Strategy<Value = BoardOp> {
    prop_oneof![
        4 => (0..3usize, arb_applicant_stage(), any::<bool>())
            .prop_map(|(card, to, with_reason)| BoardOp::Move { card, to, with_reason }),
        3 => (0..3usize).prop_map(BoardOp::Advance),
        1 => (0..8usize).prop_map(BoardOp::Confirm),
        1 => (0..8usize).prop_map(BoardOp::Rollback),
        1 => Just(BoardOp::Undo),
    ]
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap()
}

fn assert_completion_tracks_status<S: Status>(items: &[StageItem<S>]) -> Result<(), TestCaseError> {
    for item in items {
        prop_assert_eq!(
            item.completed_at().is_some(),
            item.status().is_completed(),
            "item {} in {:?}",
            item.id,
            item.status()
        );
    }
    Ok(())
}

fn hr_tree() -> NavigationTree {
    NavigationTree::new(vec![
        NavNode::new("dashboard", "Dashboard").with_route("/"),
        NavNode::new("employees", "Employees").with_children(vec![
            NavNode::new("view-all-employees", "All Employees").with_route("/employees"),
            NavNode::new("add-new-employee", "Add Employee").with_route("/employees/new"),
            NavNode::new("onboarding", "Onboarding").with_children(vec![
                NavNode::new("checklist", "Checklist").with_page("onboarding"),
                NavNode::new("buddies", "Buddies").with_route("/employees/buddies"),
            ]),
        ]),
        NavNode::new("attendance", "Attendance").with_route("/attendance"),
        NavNode::new("recruitment", "Recruitment").with_children(vec![
            NavNode::new("pipeline", "Pipeline").with_page("backend-hiring"),
        ]),
    ])
    .unwrap()
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn checklist_completion_tracks_status(
        moves in prop::collection::vec((0..4usize, arb_checklist_status()), 0..40)
    ) {
        let mut c: StageCollection<ChecklistStatus> = StageCollection::new("Docs");
        for i in 0..4 {
            c.add_item(StageItem::new(format!("doc-{}", i), "Item")).unwrap();
        }
        for (step, (idx, to)) in moves.into_iter().enumerate() {
            let now = t0() + Duration::minutes(step as i64);
            c.update_status_at(&format!("doc-{}", idx), to, TransitionMeta::none(), now)
                .unwrap();
            assert_completion_tracks_status(c.items())?;
        }
    }

    #[test]
    fn board_completion_survives_rollback_and_undo(
        ops in prop::collection::vec(arb_board_op(), 0..60)
    ) {
        let mut board: KanbanBoard<ApplicantStage> = KanbanBoard::new("Hiring");
        for i in 0..3 {
            board.add_card(StageItem::new(format!("cand-{}", i), "Applicant")).unwrap();
        }
        let mut tickets: Vec<Ticket> = Vec::new();

        for op in ops {
            // Failures (rule violations, stale tickets) must leave state valid too
            match op {
                BoardOp::Move { card, to, with_reason } => {
                    let meta = if with_reason {
                        TransitionMeta::with_reason("not a fit")
                    } else {
                        TransitionMeta::none()
                    };
                    if let Ok(Some(t)) = board.move_card(&format!("cand-{}", card), to, meta) {
                        tickets.push(t);
                    }
                }
                BoardOp::Advance(card) => {
                    if let Ok(Some(t)) = board.advance(&format!("cand-{}", card)) {
                        tickets.push(t);
                    }
                }
                BoardOp::Confirm(i) => {
                    if let Some(t) = tickets.get(i) {
                        let _ = board.confirm(*t);
                    }
                }
                BoardOp::Rollback(i) => {
                    if let Some(t) = tickets.get(i) {
                        let _ = board.rollback(*t);
                    }
                }
                BoardOp::Undo => {
                    let _ = board.undo();
                }
            }
            assert_completion_tracks_status(board.cards().items())?;
        }
    }

    #[test]
    fn percent_stays_in_range(total in 0..500usize, frac in 0.0f64..=1.0) {
        let completed = ((total as f64) * frac).floor() as usize;
        let p = percent_complete(completed, total);
        prop_assert!(p <= 100);
        if total == 0 || completed == 0 {
            prop_assert_eq!(p, 0);
        }
        if completed == total && total > 0 {
            prop_assert_eq!(p, 100);
        }
    }

    #[test]
    fn progress_counts_match(statuses in prop::collection::vec(arb_checklist_status(), 0..30)) {
        let items: Vec<StageItem<ChecklistStatus>> = statuses
            .iter()
            .enumerate()
            .map(|(i, _)| StageItem::new(format!("i-{}", i), "Item"))
            .collect();
        let mut c: StageCollection<ChecklistStatus> = StageCollection::new("All");
        for item in items {
            c.add_item(item).unwrap();
        }
        for (i, s) in statuses.iter().enumerate() {
            c.update_status(&format!("i-{}", i), *s, TransitionMeta::none()).unwrap();
        }

        let p = progress(c.items());
        prop_assert_eq!(p.total, statuses.len());
        prop_assert_eq!(p.completed, statuses.iter().filter(|s| s.is_completed()).count());
        prop_assert_eq!(p.by_status.values().sum::<usize>(), p.total);
        prop_assert!(p.percent <= 100);
        prop_assert_eq!(p.percent == 0, p.completed == 0);
    }

    #[test]
    fn repeated_update_is_idempotent(first in arb_checklist_status(), to in arb_checklist_status()) {
        let mut c: StageCollection<ChecklistStatus> = StageCollection::new("Docs");
        c.add_item(StageItem::new("doc-1", "Item")).unwrap();
        c.update_status_at("doc-1", first, TransitionMeta::none(), t0()).unwrap();

        c.update_status_at("doc-1", to, TransitionMeta::none(), t0() + Duration::hours(1))
            .unwrap();
        let once = c.get("doc-1").unwrap().clone();

        let again = c
            .update_status_at("doc-1", to, TransitionMeta::none(), t0() + Duration::hours(2))
            .unwrap();
        let twice = c.get("doc-1").unwrap();

        prop_assert!(again.is_none());
        prop_assert_eq!(once.status(), twice.status());
        prop_assert_eq!(once.completed_at(), twice.completed_at());
        prop_assert_eq!(&once.notes, &twice.notes);
    }

    #[test]
    fn toggle_expand_is_its_own_inverse(
        pre in prop::collection::vec(prop::sample::select(vec!["employees", "onboarding", "recruitment"]), 0..4),
        target in prop::sample::select(vec!["employees", "onboarding", "recruitment", "dashboard", "pipeline"]),
    ) {
        let mut shell = NavigationShell::new(hr_tree());
        for id in pre {
            shell.toggle_expand(id).unwrap();
        }
        let before = shell.expanded().clone();
        let first = shell.toggle_expand(target).unwrap();
        let second = shell.toggle_expand(target).unwrap();
        prop_assert_eq!(first, !second);
        prop_assert_eq!(shell.expanded(), &before);
    }

    #[test]
    fn active_path_is_exactly_the_ancestors(
        leaf in prop::sample::select(vec![
            "dashboard", "view-all-employees", "add-new-employee", "checklist", "buddies",
            "attendance", "pipeline",
        ])
    ) {
        let tree = hr_tree();
        let path: Vec<String> = tree
            .path(leaf)
            .unwrap()
            .iter()
            .map(|n| n.id.clone())
            .collect();
        let all: Vec<String> = tree.nodes().iter().map(|n| n.id.clone()).collect();

        let mut shell = NavigationShell::new(tree);
        let mut router: Vec<NavigationEvent> = Vec::new();
        shell.select(leaf, &mut router).unwrap();
        prop_assert_eq!(router.len(), 1);

        for id in &all {
            prop_assert_eq!(
                shell.is_active_path(id),
                path.contains(id),
                "node {} with active leaf {}",
                id,
                leaf
            );
        }
    }
}
