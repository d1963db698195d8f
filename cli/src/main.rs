//! CLI entrypoint for roundtable
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use roundtable_application::{
    ChatParticipant, ChatRoster, ConversationLogger, NoConversationLogger, RunGroupChatUseCase,
    SpeakerSelector, TerminationMarker,
};
use roundtable_domain::{ConfigIssue, Message, Severity};
use roundtable_infrastructure::{
    ConfigLoader, FileConfig, InterruptSignal, JsonlConversationLogger, ScriptedDecisionBackend,
    ScriptedParticipant, SerializableRegistry,
};
use roundtable_presentation::{Cli, ConsoleFormatter, ConsoleOperator, LiveTranscript, OutputFormat};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status after an abort by SIGINT (128 + 2)
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    info!("Starting roundtable");

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    if let Some(method) = cli.method {
        config.chat.speaker_selection_method = method.as_str().to_string();
    }
    if let Some(max_round) = cli.max_round {
        config.chat.max_round = max_round;
    }
    report_issues(&config)?;

    // === Dependency Injection ===
    let interrupt = InterruptSignal::new();
    let participants: Vec<Arc<dyn ChatParticipant>> = config
        .participants
        .iter()
        .map(|p| {
            Arc::new(ScriptedParticipant::from_config(p).with_interrupt(interrupt.clone()))
                as Arc<dyn ChatParticipant>
        })
        .collect();
    let mut chat = ChatRoster::new(participants, config.chat.to_group_chat_config());

    let selector = SpeakerSelector::new()
        .with_backend(Arc::new(ScriptedDecisionBackend::new(
            config.moderator.decisions.iter().cloned(),
        )))
        .with_operator(Arc::new(ConsoleOperator::new()));

    let transcript = config
        .logging
        .conversation_log
        .as_ref()
        .and_then(|path| JsonlConversationLogger::new(path))
        .map(|logger| Arc::new(logger) as Arc<dyn ConversationLogger>);
    let logger: Arc<dyn ConversationLogger> = match (cli.quiet, transcript) {
        (false, Some(transcript)) => Arc::new(LiveTranscript::forwarding_to(transcript)),
        (false, None) => Arc::new(LiveTranscript::new()),
        (true, Some(transcript)) => transcript,
        (true, None) => Arc::new(NoConversationLogger),
    };

    let token = CancellationToken::new();
    let use_case = Arc::new(
        RunGroupChatUseCase::new(selector)
            .with_manager_name(&config.chat.manager_name)
            .with_termination(Arc::new(TerminationMarker::new(
                &config.chat.termination_marker,
            )))
            .with_conversation_logger(logger)
            .with_cancellation(token.clone()),
    );

    // Ctrl+C: the blocking mode hands the current turn to the admin, the
    // suspendable mode cancels the run. A second Ctrl+C before the first one
    // took effect aborts the process.
    let run_async = cli.run_async;
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            let pending = if run_async {
                let pending = token.is_cancelled();
                warn!("Cancelling group chat");
                token.cancel();
                pending
            } else {
                warn!("Interrupting the current speaker");
                interrupt.raise()
            };
            if pending {
                warn!("Interrupted again before the chat could react; aborting");
                token.cancel();
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        }
    });

    // === Run ===
    let sender = cli
        .sender
        .clone()
        .unwrap_or_else(|| config.chat.admin_name.clone());
    let opening = Message::user(cli.message.as_str());

    let (chat, result) = if run_async {
        let result = use_case.run(&mut chat, opening, &sender).await;
        (chat, result)
    } else {
        let use_case = Arc::clone(&use_case);
        tokio::task::spawn_blocking(move || {
            let result = use_case.run_blocking(&mut chat, opening, &sender);
            (chat, result)
        })
        .await?
    };

    let snapshot = chat.snapshot();
    if let Some(path) = &cli.save_transcript {
        SerializableRegistry::with_builtin_types()?.save(path, &snapshot)?;
        info!("Transcript saved to {}", path.display());
    }

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) if e.is_cancelled() => {
            eprintln!("Group chat cancelled after {} message(s)", snapshot.messages.len());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let output = match cli.output {
        OutputFormat::Transcript => ConsoleFormatter::format(&snapshot, &outcome),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(&snapshot, &outcome),
    };

    println!("{}", output);

    Ok(())
}

/// Initialize logging based on verbosity level, plus an optional daily log
/// file under `log_dir`.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(level));

    let (file, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "roundtable.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();

    guard
}

/// Log configuration warnings; refuse to start on errors.
fn report_issues(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| i.severity == Severity::Warning) {
        warn!("{}", issue.message);
    }

    if ConfigIssue::has_errors(&issues) {
        let errors: Vec<&str> = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .map(|i| i.message.as_str())
            .collect();
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}
