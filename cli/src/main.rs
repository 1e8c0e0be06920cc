mod input;

use std::sync::Arc;

use askai::config::BASE_URL_VAR;
use askai::{
    ApiError, ChatBackend, ClientConfig, DeleteOutcome, HttpBackend, Message, Role, SendOutcome, SendState,
    SkipReason, SyncController, SyncError,
};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use input::{HELP, Input, parse_input};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Sync(#[from] SyncError),
    #[error("unknown session: {0}")]
    UnknownSession(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "askai", about = "Ask AI chat sessions from the terminal")]
#[command(after_help = "Reads ASKAI_API_BASE_URL, ASKAI_REQUEST_TIMEOUT_SECS and ASKAI_CONNECT_TIMEOUT_SECS.")]
struct Cli {
    /// Overrides ASKAI_API_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List sessions as JSON.
    Sessions,
    /// Print one session's history as JSON.
    History { session_id: String },
    /// Create a session and print its id.
    New,
    /// Delete a session (refused if it is the only one).
    Delete { session_id: String },
    /// Send one message and print the reply.
    Send { session_id: String, text: String },
    /// Interactive chat on the active session.
    Chat,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = build_config(cli.base_url.as_deref(), |key| std::env::var(key).ok())?;
    let backend: Arc<dyn ChatBackend> = Arc::new(HttpBackend::new(config)?);
    let ctrl = SyncController::new(backend);

    match cli.command {
        Command::Sessions => run_sessions(&ctrl).await,
        Command::History { session_id } => run_history(&ctrl, &session_id).await,
        Command::New => run_new(&ctrl).await,
        Command::Delete { session_id } => run_delete(&ctrl, &session_id).await,
        Command::Send { session_id, text } => run_send(&ctrl, &session_id, &text).await,
        Command::Chat => run_chat(&ctrl).await,
    }
}

/// Client config from the environment, with `--base-url` taking precedence.
fn build_config(base_url: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Result<ClientConfig, ApiError> {
    ClientConfig::from_lookup(|key| match base_url {
        Some(url) if key == BASE_URL_VAR => Some(url.to_owned()),
        _ => env(key),
    })
}

// =============================================================================
// ONE-SHOT COMMANDS
// =============================================================================

async fn run_sessions(ctrl: &SyncController) -> Result<(), CliError> {
    let sessions = ctrl.refresh_session_list().await?;
    println!("{}", serde_json::to_string_pretty(&sessions)?);
    Ok(())
}

async fn run_history(ctrl: &SyncController, session_id: &str) -> Result<(), CliError> {
    select_listed(ctrl, session_id).await?;
    println!("{}", serde_json::to_string_pretty(&ctrl.active_messages())?);
    Ok(())
}

async fn run_new(ctrl: &SyncController) -> Result<(), CliError> {
    let id = ctrl.create_session().await?;
    println!("{id}");
    Ok(())
}

async fn run_delete(ctrl: &SyncController, session_id: &str) -> Result<(), CliError> {
    ctrl.refresh_session_list().await?;
    match ctrl.delete_session(session_id).await? {
        DeleteOutcome::Deleted { .. } => println!("deleted {session_id}"),
        DeleteOutcome::Refused => eprintln!("refused: at least one session must remain"),
    }
    Ok(())
}

async fn run_send(ctrl: &SyncController, session_id: &str, text: &str) -> Result<(), CliError> {
    select_listed(ctrl, session_id).await?;
    match ctrl.send_message(session_id, text).await? {
        SendOutcome::Confirmed(exchange) => println!("{}", exchange.reply.content),
        SendOutcome::Skipped(reason) => eprintln!("not sent: {}", skip_text(reason)),
    }
    Ok(())
}

/// Refresh the list and select `session_id`, failing if it is not listed.
async fn select_listed(ctrl: &SyncController, session_id: &str) -> Result<(), CliError> {
    let sessions = ctrl.refresh_session_list().await?;
    if !sessions.iter().any(|s| s.id == session_id) {
        return Err(CliError::UnknownSession(session_id.to_owned()));
    }
    ctrl.select_session(session_id).await?;
    Ok(())
}

// =============================================================================
// INTERACTIVE CHAT
// =============================================================================

async fn run_chat(ctrl: &SyncController) -> Result<(), CliError> {
    if ctrl.open().await?.is_none() {
        ctrl.create_session().await?;
    }
    print_sessions(ctrl);
    print_transcript(ctrl);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt(ctrl).await?;
    while let Some(line) = lines.next_line().await? {
        match handle_input(ctrl, parse_input(&line)).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("error ({:?}): {e}", e.kind()),
        }
        prompt(ctrl).await?;
    }
    Ok(())
}

/// Apply one line of input. Returns `false` when the loop should stop.
async fn handle_input(ctrl: &SyncController, input: Input) -> Result<bool, SyncError> {
    match input {
        Input::Quit => return Ok(false),
        Input::Help => println!("{HELP}"),
        Input::List => print_sessions(ctrl),
        Input::Unknown(raw) => eprintln!("unknown command {raw:?}; /help lists commands"),
        Input::New => {
            ctrl.create_session().await?;
            print_transcript(ctrl);
        }
        Input::Switch(n) => {
            let target = ctrl.snapshot().sessions.get(n - 1).map(|s| s.id.clone());
            match target {
                Some(id) => {
                    ctrl.select_session(&id).await?;
                    print_transcript(ctrl);
                }
                None => eprintln!("no session #{n}"),
            }
        }
        Input::Delete => {
            let Some(active) = ctrl.active_session_id() else {
                eprintln!("no active session");
                return Ok(true);
            };
            match ctrl.delete_session(&active).await? {
                DeleteOutcome::Deleted { .. } => print_transcript(ctrl),
                DeleteOutcome::Refused => eprintln!("refused: at least one session must remain"),
            }
        }
        Input::Retry => {
            let Some(active) = ctrl.active_session_id() else {
                return Ok(true);
            };
            report_send(ctrl.retry_send(&active).await?);
        }
        Input::Discard => {
            if let Some(text) = ctrl.active_session_id().and_then(|id| ctrl.discard_failed(&id)) {
                println!("discarded: {text}");
            }
        }
        Input::Text(text) => {
            let active = ctrl.active_session_id().unwrap_or_default();
            report_send(ctrl.send_message(&active, &text).await?);
        }
    }
    Ok(true)
}

fn report_send(outcome: SendOutcome) {
    match outcome {
        SendOutcome::Confirmed(exchange) => print_message(&exchange.reply),
        SendOutcome::Skipped(SkipReason::EmptyText) => {}
        SendOutcome::Skipped(reason) => eprintln!("not sent: {}", skip_text(reason)),
    }
}

fn skip_text(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::EmptyText => "message is empty",
        SkipReason::InFlight => "a message is already being sent",
        SkipReason::NoActiveSession => "no active session",
        SkipReason::UnknownSession => "session is not listed",
        SkipReason::NothingToRetry => "nothing to retry",
    }
}

fn print_sessions(ctrl: &SyncController) {
    let snapshot = ctrl.snapshot();
    for (index, session) in snapshot.sessions.iter().enumerate() {
        let marker = if snapshot.active_session_id.as_deref() == Some(session.id.as_str()) { "*" } else { " " };
        println!("{marker} {}. {}", index + 1, session.name);
    }
}

fn print_transcript(ctrl: &SyncController) {
    let Some(name) = ctrl.with_store(|store| store.active_session().map(|s| s.name.clone())) else {
        return;
    };
    println!("--- {name} ---");
    for message in ctrl.active_messages() {
        print_message(&message);
    }
}

fn print_message(message: &Message) {
    let who = match message.role {
        Role::User => "you",
        Role::Assistant => "ai",
    };
    println!("[{who}] {}", message.content);
}

async fn prompt(ctrl: &SyncController) -> Result<(), CliError> {
    let failed = ctrl
        .active_session_id()
        .is_some_and(|id| matches!(ctrl.send_state(&id), SendState::Failed { .. }));
    let marker = if failed { "! " } else { "" };
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{marker}> ").as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
