use std::fs;
use std::path::Path;

use crate::io::desk_io::DeskError;
use crate::model::config::DeskConfig;

pub const CONFIG_FILE: &str = "desk.toml";

/// Read and parse desk.toml from the desk directory
pub fn read_config(desk_dir: &Path) -> Result<DeskConfig, DeskError> {
    let config_path = desk_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| DeskError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    parse_config(&config_text)
}

pub fn parse_config(text: &str) -> Result<DeskConfig, DeskError> {
    Ok(toml::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[desk]\nname = \"Acme HR\"\n\n[ui]\nsidebar_width = 32\n",
        )
        .unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.desk.name, "Acme HR");
        assert_eq!(config.ui.sidebar_width, 32);
    }

    #[test]
    fn test_missing_config_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = read_config(tmp.path()).unwrap_err();
        assert!(matches!(err, DeskError::ReadError { .. }));
    }

    #[test]
    fn test_bad_policy_is_parse_error() {
        let err = parse_config("[desk]\nname = \"x\"\n[rules.tasks]\npolicy = \"strict\"\n")
            .unwrap_err();
        assert!(matches!(err, DeskError::ConfigParseError(_)));
    }
}
