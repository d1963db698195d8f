//! Presentation layer for roundtable
//!
//! This crate contains the CLI definition, the terminal operator used for
//! manual speaker selection, live progress output and transcript formatting.

pub mod cli;
pub mod operator;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, MethodArg, OutputFormat};
pub use operator::ConsoleOperator;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::LiveTranscript;
