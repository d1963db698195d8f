//! Scripted moderator configuration from TOML (`[moderator]` section)

use serde::{Deserialize, Serialize};

/// Raw moderator configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModeratorConfig {
    /// Decision texts returned in order to the `auto` policy, normally
    /// `{"why": ..., "who": ..., "what": ...}` objects
    pub decisions: Vec<String>,
}
