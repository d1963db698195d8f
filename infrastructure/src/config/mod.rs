//! Configuration file loading for roundtable
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ROUNDTABLE_*` environment variables (e.g. `ROUNDTABLE_CHAT__MAX_ROUND=4`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./roundtable.toml` or `./.roundtable.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/roundtable/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileChatConfig, FileConfig, FileLoggingConfig, FileModeratorConfig, FileParticipantConfig,
};
pub use loader::ConfigLoader;
