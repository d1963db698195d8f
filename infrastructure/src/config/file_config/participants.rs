//! Participant configuration from TOML (`[[participants]]` array)
//!
//! ```toml
//! [[participants]]
//! name = "Coder"
//! description = "Writes Rust code"
//! functions = ["run_tests"]
//! replies = ["Here is the patch", "call:run_tests {}"]
//! ```

use roundtable_domain::ParticipantProfile;
use serde::{Deserialize, Serialize};

/// Raw participant entry from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileParticipantConfig {
    pub name: String,
    pub description: String,
    /// Names of the functions this participant can execute
    pub functions: Vec<String>,
    /// Scripted replies, consumed in order
    pub replies: Vec<String>,
}

impl FileParticipantConfig {
    pub fn to_profile(&self) -> ParticipantProfile {
        ParticipantProfile::new(&self.name, &self.description).with_functions(&self.functions)
    }
}
