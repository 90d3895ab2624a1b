use std::path::PathBuf;

use super::config::DeskConfig;
use super::nav::NavigationTree;
use super::workspace::Workspace;

/// A fully loaded desk
#[derive(Debug)]
pub struct Desk {
    /// Root directory of the desk (parent of `hrdesk/`)
    pub root: PathBuf,
    /// Path to the `hrdesk/` directory
    pub desk_dir: PathBuf,
    /// Parsed desk.toml
    pub config: DeskConfig,
    /// Navigation tree built from `config.nav`
    pub nav: NavigationTree,
    /// Page data loaded from the seed file
    pub workspace: Workspace,
}
