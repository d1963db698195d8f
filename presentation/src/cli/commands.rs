//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the finished conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full transcript with every recorded message
    Transcript,
    /// Only how and why the chat ended
    Summary,
    /// JSON document with outcome and ledger
    Json,
}

/// Speaker selection policy override
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    Auto,
    Manual,
    Random,
    #[value(alias = "round_robin")]
    RoundRobin,
}

impl MethodArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodArg::Auto => "auto",
            MethodArg::Manual => "manual",
            MethodArg::Random => "random",
            MethodArg::RoundRobin => "round_robin",
        }
    }
}

/// CLI arguments for roundtable
#[derive(Parser, Debug)]
#[command(name = "roundtable")]
#[command(author, version, about = "Group chat orchestrator - participants take turns under a chat manager")]
#[command(long_about = r#"
Roundtable runs a group chat between the participants listed in the
configuration. Each round the chat manager records the last message,
broadcasts it, and picks the next speaker with the configured policy:

  auto         a moderator decides who speaks next (scripted in [moderator])
  manual       you pick the next speaker from a numbered list
  random       a uniformly random participant
  round_robin  roster order

Configuration files are loaded from (in priority order):
1. ROUNDTABLE_* env    e.g. ROUNDTABLE_CHAT__MAX_ROUND=4
2. --config <path>     Explicit config file
3. ./roundtable.toml   Project-level config
4. ~/.config/roundtable/config.toml   Global config

Example:
  roundtable "Write a CSV parser"
  roundtable --method round-robin --max-round 6 "Review the patch"
  roundtable --async --save-transcript chat.json "Plan the release"
"#)]
pub struct Cli {
    /// Opening message of the conversation
    pub message: String,

    /// Participant sending the opening message (defaults to the admin)
    #[arg(short, long, value_name = "NAME")]
    pub sender: Option<String>,

    /// Override the speaker selection policy
    #[arg(short, long, value_enum, value_name = "METHOD")]
    pub method: Option<MethodArg>,

    /// Override the maximum number of rounds
    #[arg(long, value_name = "N")]
    pub max_round: Option<usize>,

    /// Run in suspendable (async) mode: no introduction, directives are not relayed
    #[arg(long = "async")]
    pub run_async: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "transcript")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Do not print messages while the chat runs
    #[arg(short, long)]
    pub quiet: bool,

    /// Save the final ledger as a versioned JSON envelope
    #[arg(long, value_name = "PATH")]
    pub save_transcript: Option<PathBuf>,

    /// Write diagnostic logs to daily files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
