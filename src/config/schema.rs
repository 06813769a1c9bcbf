use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rules::Expression;

/// a rule file: named expressions plus evaluation settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleFile {
    /// rules keyed by name, evaluated in name order
    #[serde(default)]
    pub rules: BTreeMap<String, Expression>,
    #[serde(default)]
    pub settings: Settings,
}

impl RuleFile {
    /// look up a rule by name
    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.rules.get(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// stop `run` at the first rule that fails to evaluate
    #[serde(default)]
    pub stop_on_error: bool,
}
