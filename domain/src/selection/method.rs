//! Speaker selection policies

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy governing who speaks next.
///
/// - `Auto` (default): a reasoning backend picks the speaker and a directive
/// - `Manual`: an operator picks from a numbered list
/// - `Random`: uniform pick from the candidates
/// - `RoundRobin`: next candidate in roster order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerSelectionMethod {
    #[default]
    Auto,
    Manual,
    Random,
    RoundRobin,
}

impl SpeakerSelectionMethod {
    pub const ALL: [SpeakerSelectionMethod; 4] = [
        SpeakerSelectionMethod::Auto,
        SpeakerSelectionMethod::Manual,
        SpeakerSelectionMethod::Random,
        SpeakerSelectionMethod::RoundRobin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeakerSelectionMethod::Auto => "auto",
            SpeakerSelectionMethod::Manual => "manual",
            SpeakerSelectionMethod::Random => "random",
            SpeakerSelectionMethod::RoundRobin => "round_robin",
        }
    }
}

impl fmt::Display for SpeakerSelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SpeakerSelectionMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(SpeakerSelectionMethod::Auto),
            "manual" => Ok(SpeakerSelectionMethod::Manual),
            "random" => Ok(SpeakerSelectionMethod::Random),
            "round_robin" => Ok(SpeakerSelectionMethod::RoundRobin),
            _ => Err(DomainError::InvalidSelectionMethod(s.to_string())),
        }
    }
}
