use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::nav::NavNode;
use super::status::{Status, TransitionPolicy, TransitionRules};

/// Configuration from desk.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskConfig {
    pub desk: DeskInfo,
    #[serde(default)]
    pub nav: Vec<NavNode>,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskInfo {
    pub name: String,
    /// Seed file, relative to the desk directory
    #[serde(default = "default_seed")]
    pub seed: String,
}

fn default_seed() -> String {
    "seed.json".to_string()
}

/// Per-domain overrides of the status defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub checklists: Option<RuleOverride>,
    #[serde(default)]
    pub tasks: Option<RuleOverride>,
    #[serde(default)]
    pub leave: Option<RuleOverride>,
    #[serde(default)]
    pub applicants: Option<RuleOverride>,
}

impl RulesConfig {
    /// Effective rules for a status domain
    pub fn for_domain<S: Status>(&self) -> TransitionRules {
        let over = match S::DOMAIN {
            "checklists" => self.checklists.as_ref(),
            "tasks" => self.tasks.as_ref(),
            "leave" => self.leave.as_ref(),
            "applicants" => self.applicants.as_ref(),
            _ => None,
        };
        let base = S::default_rules();
        match over {
            Some(o) => o.apply(base),
            None => base,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOverride {
    #[serde(default)]
    pub policy: Option<TransitionPolicy>,
    #[serde(default)]
    pub rejection_reason_required: Option<bool>,
}

impl RuleOverride {
    pub fn apply(&self, mut rules: TransitionRules) -> TransitionRules {
        if let Some(policy) = self.policy {
            rules.policy = policy;
        }
        if let Some(required) = self.rejection_reason_required {
            rules.rejection_reason_required = required;
        }
        rules
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width: u16,
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            sidebar_width: default_sidebar_width(),
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sidebar_width() -> u16 {
    28
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::status::{ApplicantStage, ChecklistStatus, LeaveStatus};

    #[test]
    fn minimal_config_uses_defaults() {
        let config: DeskConfig = toml::from_str("[desk]\nname = \"Acme HR\"\n").unwrap();
        assert_eq!(config.desk.name, "Acme HR");
        assert_eq!(config.desk.seed, "seed.json");
        assert!(config.nav.is_empty());
        assert!(config.ui.show_key_hints);
        assert_eq!(config.ui.sidebar_width, 28);
        assert_eq!(
            config.rules.for_domain::<ApplicantStage>(),
            ApplicantStage::default_rules()
        );
    }

    #[test]
    fn nested_nav_parses() {
        let text = r#"
[desk]
name = "Acme HR"

[[nav]]
id = "employees"
label = "Employees"
icon = "users"

[[nav.children]]
id = "view-all-employees"
label = "All Employees"
route = "/employees"
page = "directory"
"#;
        let config: DeskConfig = toml::from_str(text).unwrap();
        assert_eq!(config.nav.len(), 1);
        assert_eq!(config.nav[0].children[0].page.as_deref(), Some("directory"));
        assert!(!config.nav[0].is_leaf());
    }

    #[test]
    fn rule_overrides_merge_with_defaults() {
        let text = r#"
[desk]
name = "Acme HR"

[rules.leave]
rejection_reason_required = false

[rules.checklists]
policy = "linear"
"#;
        let config: DeskConfig = toml::from_str(text).unwrap();
        let leave = config.rules.for_domain::<LeaveStatus>();
        assert!(!leave.rejection_reason_required);
        assert_eq!(leave.policy, TransitionPolicy::Permissive);

        let checklists = config.rules.for_domain::<ChecklistStatus>();
        assert_eq!(checklists.policy, TransitionPolicy::Linear);
        assert!(!checklists.rejection_reason_required);
    }
}
