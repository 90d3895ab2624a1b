use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::fs::atomic_write;

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Active nav leaf
    #[serde(default)]
    pub active_nav: Option<String>,
    /// Expanded nav nodes
    #[serde(default)]
    pub expanded: HashSet<String>,
    /// Which pane had focus ("sidebar" or "page")
    #[serde(default)]
    pub focus: String,
    /// Cursor row per page key
    #[serde(default)]
    pub cursors: HashMap<String, usize>,
}

/// Read .state.json from the desk directory
pub fn read_ui_state(desk_dir: &Path) -> Option<UiState> {
    let path = desk_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable ui state");
            None
        }
    }
}

/// Write .state.json to the desk directory
pub fn write_ui_state(desk_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = desk_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    atomic_write(&path, content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut state = UiState {
            active_nav: Some("add-new-employee".into()),
            focus: "page".into(),
            ..Default::default()
        };
        state.expanded.insert("employees".into());
        state.cursors.insert("onboarding".into(), 4);

        write_ui_state(dir.path(), &state).unwrap();
        let loaded = read_ui_state(dir.path()).unwrap();

        assert_eq!(loaded.active_nav.as_deref(), Some("add-new-employee"));
        assert!(loaded.expanded.contains("employees"));
        assert_eq!(loaded.focus, "page");
        assert_eq!(loaded.cursors.get("onboarding"), Some(&4));
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".state.json"), "not json {{{").unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn serde_defaults_on_empty_object() {
        let state: UiState = serde_json::from_str("{}").unwrap();
        assert!(state.active_nav.is_none());
        assert!(state.expanded.is_empty());
        assert!(state.cursors.is_empty());
    }
}
