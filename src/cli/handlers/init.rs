use std::fs;

use crate::cli::commands::InitArgs;
use crate::io::config_io::CONFIG_FILE;
use crate::io::desk_io::{self, DESK_DIR};
use crate::io::fs::atomic_write;

const DESK_TOML_TEMPLATE: &str = r##"[desk]
name = "{name}"
seed = "seed.json"

# --- Navigation ---
# Leaves with a `page` open that page; `route` is handed to the router as is.

[[nav]]
id = "dashboard"
label = "Dashboard"
icon = "home"
route = "/"

[[nav]]
id = "employees"
label = "Employees"
icon = "users"

[[nav.children]]
id = "view-all-employees"
label = "All Employees"
route = "/employees"

[[nav.children]]
id = "add-new-employee"
label = "Add Employee"
route = "/employees/new"

[[nav.children]]
id = "onboarding"
label = "Onboarding"
route = "/employees/onboarding"
page = "onboarding"

[[nav]]
id = "attendance"
label = "Attendance"
icon = "clock"
route = "/attendance"

[[nav]]
id = "leave"
label = "Leave"
icon = "calendar"

[[nav.children]]
id = "leave-requests"
label = "Requests"
route = "/leave/requests"
page = "leave-requests"

[[nav]]
id = "tasks"
label = "Tasks"
icon = "check-square"
route = "/tasks"
page = "hr-tasks"

[[nav]]
id = "recruitment"
label = "Recruitment"
icon = "briefcase"

[[nav.children]]
id = "pipeline"
label = "Pipeline"
route = "/recruitment/pipeline"
page = "backend-hiring"

# --- Transition rules ---
# policy: "permissive" (any move) or "linear" (one stage forward, or reject)
#
# [rules.applicants]
# policy = "linear"
# rejection_reason_required = true
#
# [rules.leave]
# rejection_reason_required = true

# --- UI Customization ---
[ui]
# show_key_hints = true
# sidebar_width = 28
#
# [ui.colors]
# background = "#0C001B"
# text = "#A09BFE"
# text_bright = "#FFFFFF"
# highlight = "#FB4196"
# dim = "#5A5580"
# red = "#FF4444"
# yellow = "#FFD700"
# green = "#44FF88"
# cyan = "#44DDFF"
"##;

const SEED_TEMPLATE: &str = r##"{
  "checklists": [
    {
      "key": "onboarding",
      "title": "Onboarding: Jane Cooper",
      "categories": [
        {
          "name": "Documentation",
          "items": [
            { "id": "doc-1", "title": "Sign employment contract", "status": "completed",
              "assignee": "Jane Cooper", "completedAt": "2025-05-02T10:00:00Z" },
            { "id": "doc-2", "title": "Submit tax forms", "status": "in-progress",
              "assignee": "Jane Cooper", "dueDate": "2025-05-09" },
            { "id": "doc-3", "title": "Emergency contact details", "dueDate": "2025-05-09" }
          ]
        },
        {
          "name": "IT Setup",
          "items": [
            { "id": "it-1", "title": "Issue laptop", "status": "completed",
              "assignee": "IT Desk", "completedAt": "2025-05-05T09:30:00Z" },
            { "id": "it-2", "title": "Create email account", "status": "completed",
              "assignee": "IT Desk", "completedAt": "2025-05-05T09:45:00Z" },
            { "id": "it-3", "title": "VPN access", "priority": "high", "dueDate": "2025-05-12" }
          ]
        },
        {
          "name": "Training",
          "items": [
            { "id": "tr-1", "title": "Security awareness course", "dueDate": "2025-05-30" },
            { "id": "tr-2", "title": "Code of conduct", "status": "on-hold",
              "assignee": "HR Ops", "notes": "Waiting for updated handbook" }
          ]
        },
        {
          "name": "Team Introduction",
          "items": [
            { "id": "team-1", "title": "Meet the team", "status": "completed",
              "completedAt": "2025-05-06T14:00:00Z" },
            { "id": "team-2", "title": "Assign onboarding buddy", "assignee": "Priya Patel" }
          ]
        },
        {
          "name": "Compliance",
          "items": [
            { "id": "comp-1", "title": "Background check", "status": "completed",
              "completedAt": "2025-04-28T16:00:00Z" },
            { "id": "comp-2", "title": "Right-to-work verification", "priority": "high" }
          ]
        }
      ]
    }
  ],
  "taskBoards": [
    {
      "key": "hr-tasks",
      "title": "HR Tasks",
      "cards": [
        { "id": 101, "title": "Quarterly payroll review", "status": "in-progress",
          "priority": "high", "assignee": "Marco Rossi", "dueDate": "2025-05-15" },
        { "id": 102, "title": "Update benefits handbook", "priority": "medium",
          "dueDate": "2025-06-01" },
        { "id": 103, "title": "Plan team offsite", "status": "review",
          "assignee": "Priya Patel" },
        { "id": 104, "title": "Renew HRIS licence", "status": "done",
          "completedAt": "2025-05-01T12:00:00Z" }
      ]
    }
  ],
  "leaveBoards": [
    {
      "key": "leave-requests",
      "title": "Leave Requests",
      "cards": [
        { "id": 1, "title": "Annual leave - Priya Patel", "description": "2025-06-10 to 2025-06-14" },
        { "id": 2, "title": "Sick leave - Marco Rossi", "status": "approved",
          "completedAt": "2025-05-07T08:15:00Z" },
        { "id": 3, "title": "Unpaid leave - Alex Kim", "status": "rejected",
          "notes": "Overlaps with audit week" }
      ]
    }
  ],
  "pipelines": [
    {
      "key": "backend-hiring",
      "title": "Backend Engineer",
      "cards": [
        { "id": "cand-1", "title": "Sam Lee", "status": "interview", "assignee": "Dana Brooks" },
        { "id": "cand-2", "title": "Riley Chen", "status": "screening", "assignee": "Dana Brooks" },
        { "id": "cand-3", "title": "Jordan Diaz" },
        { "id": "cand-4", "title": "Morgan Blake", "status": "offer", "assignee": "Dana Brooks" }
      ]
    }
  ]
}
"##;

/// Infer a desk name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + &chars.collect::<String>()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_desk_toml(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    DESK_TOML_TEMPLATE.replace("{name}", &escaped)
}

pub fn cmd_init(args: InitArgs, start: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = match start {
        Some(dir) => std::path::PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let desk_dir = cwd.join(DESK_DIR);

    if desk_dir.join(CONFIG_FILE).exists() && !args.force {
        return Err("desk already exists in ./hrdesk/ (use --force to overwrite)".into());
    }

    if let Some(parent) = cwd.parent()
        && let Ok(parent_root) = desk_io::discover_desk(parent)
    {
        eprintln!(
            "Note: parent desk found at {}/",
            parent_root.join(DESK_DIR).display()
        );
        eprintln!("Creating new desk in ./hrdesk/");
    }

    let name = args.name.unwrap_or_else(|| {
        cwd.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .unwrap_or_else(|| "Untitled".to_string())
    });

    fs::create_dir_all(&desk_dir)?;
    atomic_write(
        &desk_dir.join(CONFIG_FILE),
        render_desk_toml(&name).as_bytes(),
    )?;
    atomic_write(&desk_dir.join("seed.json"), SEED_TEMPLATE.as_bytes())?;
    tracing::info!(dir = %desk_dir.display(), "desk initialized");

    println!("Initialized desk: {}", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config_io::parse_config;
    use crate::io::desk_io::{Seed, build_workspace};
    use crate::model::nav::NavigationTree;
    use crate::ops::check::check;
    use chrono::Utc;

    #[test]
    fn test_infer_name() {
        assert_eq!(infer_name("acme-people-ops"), "Acme People Ops");
        assert_eq!(infer_name("hr"), "Hr");
    }

    #[test]
    fn test_render_escapes_quotes() {
        let toml = render_desk_toml("Acme \"HR\"");
        let config = parse_config(&toml).unwrap();
        assert_eq!(config.desk.name, "Acme \"HR\"");
    }

    #[test]
    fn test_templates_form_a_valid_desk() {
        let config = parse_config(&render_desk_toml("Acme")).unwrap();
        let nav = NavigationTree::new(config.nav.clone()).unwrap();
        let seed: Seed = serde_json::from_str(SEED_TEMPLATE).unwrap();
        let ws = build_workspace(seed, &config.rules, Utc::now()).unwrap();
        assert_eq!(ws.len(), 4);

        let result = check(&nav, &ws);
        assert!(result.valid, "{:?}", result.errors);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn test_onboarding_has_five_categories() {
        let seed: Seed = serde_json::from_str(SEED_TEMPLATE).unwrap();
        assert_eq!(seed.checklists[0].categories.len(), 5);
    }
}
