//! Integration tests for the `hd` CLI.
//!
//! Each test initializes a sample desk in a temp directory, runs `hd` as a
//! subprocess, and checks stdout, stderr and the exit status.

use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

fn run_hd(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_hd"))
        .args(args)
        .current_dir(dir)
        .env_remove("HRDESK_LOG")
        .output()
        .expect("failed to run hd");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `hd` expecting success, return stdout.
fn run_hd_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_hd(dir, args);
    if !success {
        panic!(
            "hd {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

fn run_hd_json(dir: &Path, args: &[&str]) -> Value {
    let mut full = args.to_vec();
    full.push("--json");
    let out = run_hd_ok(dir, &full);
    serde_json::from_str(&out).unwrap_or_else(|e| panic!("bad json from {:?}: {}\n{}", args, e, out))
}

fn sample_desk() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let out = run_hd_ok(tmp.path(), &["init", "--name", "Acme People"]);
    assert!(out.contains("Initialized desk: Acme People"));
    tmp
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn test_init_writes_config_and_seed() {
    let tmp = sample_desk();
    assert!(tmp.path().join("hrdesk/desk.toml").exists());
    assert!(tmp.path().join("hrdesk/seed.json").exists());
}

#[test]
fn test_init_refuses_to_overwrite() {
    let tmp = sample_desk();
    let (_, stderr, success) = run_hd(tmp.path(), &["init"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));

    run_hd_ok(tmp.path(), &["init", "--force", "--name", "Renamed"]);
    let toml = std::fs::read_to_string(tmp.path().join("hrdesk/desk.toml")).unwrap();
    assert!(toml.contains("name = \"Renamed\""));
}

#[test]
fn test_no_desk_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_hd(tmp.path(), &["pages"]);
    assert!(!success);
    assert!(stderr.starts_with("error: not an hrdesk desk"));
}

#[test]
fn test_desk_dir_flag() {
    let tmp = sample_desk();
    let elsewhere = TempDir::new().unwrap();
    let dir = tmp.path().to_str().unwrap();
    let out = run_hd_ok(elsewhere.path(), &["-C", dir, "pages"]);
    assert!(out.contains("onboarding"));
}

#[test]
fn test_discovers_desk_from_subdirectory() {
    let tmp = sample_desk();
    let sub = tmp.path().join("reports/2025");
    std::fs::create_dir_all(&sub).unwrap();
    let out = run_hd_ok(&sub, &["pages"]);
    assert!(out.starts_with("Acme People"));
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_nav_collapsed_and_all() {
    let tmp = sample_desk();
    let out = run_hd_ok(tmp.path(), &["nav"]);
    assert!(out.contains("\u{25B8} Employees (employees)"));
    assert!(out.contains("\u{00B7} Dashboard (dashboard)"));
    assert!(!out.contains("onboarding"));

    let out = run_hd_ok(tmp.path(), &["nav", "--all"]);
    assert!(out.contains("\u{25BE} Employees (employees)"));
    assert!(out.contains("  \u{00B7} Onboarding (onboarding)"));
    assert!(out.contains("  \u{00B7} Pipeline (pipeline)"));
}

#[test]
fn test_nav_reads_saved_state() {
    let tmp = sample_desk();
    std::fs::write(
        tmp.path().join("hrdesk/.state.json"),
        r#"{ "active_nav": "onboarding", "expanded": ["employees"] }"#,
    )
    .unwrap();
    let rows = run_hd_json(tmp.path(), &["nav"]);
    let rows = rows.as_array().unwrap();
    let onboarding = rows.iter().find(|r| r["id"] == "onboarding").unwrap();
    assert_eq!(onboarding["depth"], 1);
    assert_eq!(onboarding["active"], true);
    let employees = rows.iter().find(|r| r["id"] == "employees").unwrap();
    assert_eq!(employees["active"], true);
    let attendance = rows.iter().find(|r| r["id"] == "attendance").unwrap();
    assert_eq!(attendance["active"], false);
}

#[test]
fn test_pages_lists_every_page() {
    let tmp = sample_desk();
    let out = run_hd_ok(tmp.path(), &["pages"]);
    assert!(out.contains("onboarding [checklist] Onboarding: Jane Cooper"));
    assert!(out.contains("5/12 (42%)"));
    assert!(out.contains("hr-tasks [tasks] HR Tasks"));
    assert!(out.contains("leave-requests [leave] Leave Requests"));
    assert!(out.contains("backend-hiring [pipeline] Backend Engineer"));

    let pages = run_hd_json(tmp.path(), &["pages"]);
    let keys: Vec<&str> = pages
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["onboarding", "hr-tasks", "leave-requests", "backend-hiring"]);
    assert_eq!(pages[0]["percent"], 42);
}

#[test]
fn test_show_checklist_with_status_filter() {
    let tmp = sample_desk();
    let out = run_hd_ok(tmp.path(), &["show", "onboarding", "--status", "completed"]);
    assert!(out.starts_with("== Onboarding: Jane Cooper (onboarding) =="));
    assert!(out.contains("-- Documentation 1/3 (33%) --"));
    assert!(out.contains("[completed] doc-1 Sign employment contract @Jane Cooper"));
    assert!(!out.contains("doc-2"));
}

#[test]
fn test_show_board_columns_json() {
    let tmp = sample_desk();
    let page = run_hd_json(tmp.path(), &["show", "hr-tasks"]);
    assert_eq!(page["kind"], "tasks");
    let groups = page["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 4);
    assert_eq!(groups[0]["name"], "To Do (1)");
    assert_eq!(groups[1]["items"][0]["id"], "101");
    assert_eq!(groups[3]["items"][0]["completed_at"], "2025-05-01T12:00:00Z");
}

#[test]
fn test_show_pipeline_has_stage_bars() {
    let tmp = sample_desk();
    let out = run_hd_ok(tmp.path(), &["show", "backend-hiring"]);
    assert!(out.contains("-- Interview (1) --"));
    assert!(out.contains("[######----] [interview] cand-1 Sam Lee @Dana Brooks"));
}

#[test]
fn test_show_rejects_unknown_status_and_page() {
    let tmp = sample_desk();
    let (_, stderr, success) = run_hd(tmp.path(), &["show", "leave-requests", "--status", "maybe"]);
    assert!(!success);
    assert!(stderr.contains("unknown status 'maybe' (expected: pending, approved, rejected)"));

    let (_, stderr, success) = run_hd(tmp.path(), &["show", "payroll"]);
    assert!(!success);
    assert!(stderr.contains("page not found: payroll"));
}

#[test]
fn test_progress_checklist() {
    let tmp = sample_desk();
    let progress = run_hd_json(tmp.path(), &["progress", "onboarding"]);
    let cats = progress["categories"].as_array().unwrap();
    assert_eq!(cats.len(), 5);
    assert_eq!(cats[1]["name"], "IT Setup");
    assert_eq!(cats[1]["completed"], 2);
    assert_eq!(cats[1]["percent"], 67);
    assert_eq!(progress["overall"]["completed"], 5);
    assert_eq!(progress["overall"]["total"], 12);

    let out = run_hd_ok(tmp.path(), &["progress", "hr-tasks"]);
    assert!(out.contains("1/4 (25%)"));
}

#[test]
fn test_next_prefers_started_items() {
    let tmp = sample_desk();
    let out = run_hd_ok(tmp.path(), &["next", "onboarding"]);
    assert_eq!(
        out.trim(),
        "[in-progress] doc-2 Submit tax forms @Jane Cooper due:2025-05-09"
    );
    let item = run_hd_json(tmp.path(), &["next", "leave-requests"]);
    assert_eq!(item["id"], "1");
}

#[test]
fn test_overdue_with_fixed_today() {
    let tmp = sample_desk();
    let out = run_hd_ok(tmp.path(), &["overdue", "--today", "2025-06-01"]);
    assert!(out.contains("[onboarding] [in-progress] doc-2"));
    assert!(out.contains("[onboarding] [pending] it-3 VPN access !high"));
    assert!(out.contains("[hr-tasks] [in-progress] 101 Quarterly payroll review"));
    // Due today is not overdue yet
    assert!(!out.contains("102"));

    let out = run_hd_ok(tmp.path(), &["overdue", "--today", "2025-01-01"]);
    assert!(out.contains("nothing overdue as of 2025-01-01"));

    let (_, stderr, success) = run_hd(tmp.path(), &["overdue", "--today", "June 1"]);
    assert!(!success);
    assert!(stderr.contains("invalid --today"));
}

#[test]
fn test_search() {
    let tmp = sample_desk();
    let out = run_hd_ok(tmp.path(), &["search", "Priya"]);
    assert!(out.contains("onboarding team-2 Assign onboarding buddy (assignee)"));
    assert!(out.contains("hr-tasks 103 Plan team offsite (assignee)"));
    assert!(out.contains("leave-requests 1 Annual leave - Priya Patel (title)"));

    let hits = run_hd_json(tmp.path(), &["search", "Priya", "--page", "hr-tasks"]);
    assert_eq!(hits.as_array().unwrap().len(), 1);

    let (_, _, success) = run_hd(tmp.path(), &["search", "(unclosed"]);
    assert!(!success);
}

#[test]
fn test_check_sample_desk_is_clean() {
    let tmp = sample_desk();
    let out = run_hd_ok(tmp.path(), &["check"]);
    assert!(out.contains("\u{2713} desk is valid"));

    let result = run_hd_json(tmp.path(), &["check"]);
    assert_eq!(result["valid"], true);
    assert_eq!(result["warnings"].as_array().unwrap().len(), 0);
}

#[test]
fn test_check_reports_broken_nav() {
    let tmp = sample_desk();
    let path = tmp.path().join("hrdesk/desk.toml");
    let toml = std::fs::read_to_string(&path).unwrap();
    let toml = toml.replace("page = \"hr-tasks\"", "page = \"hr-taks\"");
    std::fs::write(&path, toml).unwrap();

    let (stdout, stderr, success) = run_hd(tmp.path(), &["check"]);
    assert!(!success);
    assert!(stdout.contains("nav tasks points at unknown page: hr-taks"));
    assert!(stdout.contains("page hr-tasks is not reachable from the nav"));
    assert!(stdout.contains("\u{2717} desk has errors"));
    assert!(stderr.contains("1 error(s) found"));
}

#[test]
fn test_bad_seed_names_the_file() {
    let tmp = sample_desk();
    std::fs::write(
        tmp.path().join("hrdesk/seed.json"),
        r#"{ "checklists": [ { "key": "x", "categories": [] } ] }"#,
    )
    .unwrap();
    let (_, stderr, success) = run_hd(tmp.path(), &["pages"]);
    assert!(!success);
    assert!(stderr.contains("seed.json"));
    assert!(stderr.contains("missing field `title`"));
}
