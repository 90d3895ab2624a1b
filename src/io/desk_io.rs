use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::io::config_io::{CONFIG_FILE, read_config};
use crate::model::board::KanbanBoard;
use crate::model::collection::StageCollection;
use crate::model::config::RulesConfig;
use crate::model::desk::Desk;
use crate::model::error::StageError;
use crate::model::group::StageGroup;
use crate::model::item::{ItemId, StageItem};
use crate::model::nav::NavigationTree;
use crate::model::status::{ApplicantStage, ChecklistStatus, LeaveStatus, Priority, Status, TaskColumn};
use crate::model::workspace::Workspace;

/// Name of the directory that marks a desk root
pub const DESK_DIR: &str = "hrdesk";

/// Error type for desk I/O operations
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error("not an hrdesk desk: no hrdesk/desk.toml found")]
    NotADesk,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse desk.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("{path}: {source}")]
    SeedSchemaError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid seed data: {0}")]
    InvalidSeed(String),
    #[error("invalid navigation tree: {0}")]
    InvalidNav(StageError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Discover the desk by walking up from the given directory, looking for a
/// `hrdesk/desk.toml`.
pub fn discover_desk(start: &Path) -> Result<PathBuf, DeskError> {
    let mut current = start.to_path_buf();
    loop {
        let desk_dir = current.join(DESK_DIR);
        if desk_dir.is_dir() && desk_dir.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(DeskError::NotADesk);
        }
    }
}

/// Load a complete desk from the given root directory.
pub fn load_desk(root: &Path) -> Result<Desk, DeskError> {
    load_desk_at(root, Utc::now())
}

/// Same as [`load_desk`], stamping completed seed items that lack a
/// `completed_at` with `now`.
pub fn load_desk_at(root: &Path, now: DateTime<Utc>) -> Result<Desk, DeskError> {
    let desk_dir = root.join(DESK_DIR);
    if !desk_dir.is_dir() {
        return Err(DeskError::NotADesk);
    }

    let config = read_config(&desk_dir)?;
    let nav = NavigationTree::new(config.nav.clone()).map_err(DeskError::InvalidNav)?;

    let seed_path = desk_dir.join(&config.desk.seed);
    let workspace = if seed_path.exists() {
        let text = fs::read_to_string(&seed_path).map_err(|e| DeskError::ReadError {
            path: seed_path.clone(),
            source: e,
        })?;
        let seed: Seed = serde_json::from_str(&text).map_err(|e| DeskError::SeedSchemaError {
            path: seed_path.clone(),
            source: e,
        })?;
        build_workspace(seed, &config.rules, now)?
    } else {
        tracing::warn!(path = %seed_path.display(), "seed file missing, starting with no pages");
        Workspace::new()
    };

    tracing::debug!(
        root = %root.display(),
        pages = workspace.len(),
        "desk loaded"
    );

    Ok(Desk {
        root: root.to_path_buf(),
        desk_dir,
        config,
        nav,
        workspace,
    })
}

// ---------------------------------------------------------------------------
// Seed schema
// ---------------------------------------------------------------------------

/// Top level of seed.json
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Seed {
    #[serde(default)]
    pub checklists: Vec<SeedChecklist>,
    #[serde(default)]
    pub task_boards: Vec<SeedBoard<TaskColumn>>,
    #[serde(default)]
    pub leave_boards: Vec<SeedBoard<LeaveStatus>>,
    #[serde(default)]
    pub pipelines: Vec<SeedBoard<ApplicantStage>>,
}

#[derive(Debug, Deserialize)]
pub struct SeedChecklist {
    pub key: String,
    pub title: String,
    pub categories: Vec<SeedCategory>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    #[serde(default)]
    pub items: Vec<SeedItem<ChecklistStatus>>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct SeedBoard<S> {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<SeedItem<S>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "S: Deserialize<'de>"))]
pub struct SeedItem<S> {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: Option<S>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl<S: Status> SeedItem<S> {
    fn into_item(self, now: DateTime<Utc>) -> Result<StageItem<S>, DeskError> {
        let status = self.status.unwrap_or_else(S::initial);
        let mut item = StageItem::new(self.id, self.title);
        item.description = self.description;
        item.priority = self.priority;
        item.due_date = self.due_date;
        item.assignee = self.assignee;
        item.notes = self.notes;
        item.restore(status, self.completed_at, now)
            .map_err(DeskError::InvalidSeed)
    }
}

fn seed_error(page: &str, e: StageError) -> DeskError {
    DeskError::InvalidSeed(format!("page {}: {}", page, e))
}

/// Turn parsed seed data into a workspace, applying the configured rules.
pub fn build_workspace(
    seed: Seed,
    rules: &RulesConfig,
    now: DateTime<Utc>,
) -> Result<Workspace, DeskError> {
    let mut workspace = Workspace::new();

    for checklist in seed.checklists {
        let mut group =
            StageGroup::with_rules(checklist.title, rules.for_domain::<ChecklistStatus>());
        for category in checklist.categories {
            group
                .add_category(category.name.clone())
                .map_err(|e| seed_error(&checklist.key, e))?;
            for item in category.items {
                let item = item.into_item(now)?;
                group
                    .add_item(&category.name, item)
                    .map_err(|e| seed_error(&checklist.key, e))?;
            }
        }
        workspace
            .add_checklist(checklist.key.clone(), group)
            .map_err(|e| seed_error(&checklist.key, e))?;
    }

    for board in seed.task_boards {
        let key = board.key.clone();
        let board = build_board(board, rules, now)?;
        workspace
            .add_task_board(key.clone(), board)
            .map_err(|e| seed_error(&key, e))?;
    }
    for board in seed.leave_boards {
        let key = board.key.clone();
        let board = build_board(board, rules, now)?;
        workspace
            .add_leave_board(key.clone(), board)
            .map_err(|e| seed_error(&key, e))?;
    }
    for board in seed.pipelines {
        let key = board.key.clone();
        let board = build_board(board, rules, now)?;
        workspace
            .add_pipeline(key.clone(), board)
            .map_err(|e| seed_error(&key, e))?;
    }

    Ok(workspace)
}

fn build_board<S: Status>(
    seed: SeedBoard<S>,
    rules: &RulesConfig,
    now: DateTime<Utc>,
) -> Result<KanbanBoard<S>, DeskError> {
    let mut cards = StageCollection::with_rules(seed.title.clone(), rules.for_domain::<S>());
    for card in seed.cards {
        let card = card.into_item(now)?;
        cards.add_item(card).map_err(|e| seed_error(&seed.key, e))?;
    }
    Ok(KanbanBoard::from_collection(seed.title, cards))
}
