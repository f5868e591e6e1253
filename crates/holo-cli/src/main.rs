//! holo - chat with the holo assistant from the terminal

mod commands;
mod config;
mod ui;

use anyhow::Context;
use clap::Parser;
use holo_ai::HttpAskClient;
use holo_chat::{ChatController, ChatEvent, Outcome};
use holo_tui::{Theme, widgets::markdown::sanitize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "holo=debug,holo_ai=debug,holo_chat=debug";

/// holo - ask the assistant questions from the terminal
#[derive(Parser, Debug)]
#[command(name = "holo")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Endpoint URL that answers questions
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Ask a single question, print the answer and exit
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable TUI mode (use simple stdin/stdout)
    #[arg(long)]
    no_tui: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,

    /// Color theme
    #[arg(long, value_parser = ["dark", "light"])]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.verbose {
        let rust_log = std::env::var("RUST_LOG").ok();
        tracing_subscriber::fmt()
            .with_env_filter(log_filter(rust_log.as_deref()))
            .with_writer(std::io::stderr)
            .init();
    }

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Merge config with CLI args (CLI takes precedence)
    let cfg = config::Config::load();
    let endpoint = cfg.resolve_endpoint(args.endpoint);
    let use_tui = cfg.resolve_tui(args.no_tui);
    let theme_name = cfg.resolve_theme(args.theme);
    let theme = Theme::by_name(&theme_name).unwrap_or_else(|| {
        eprintln!("Warning: Unknown theme '{}', using dark", theme_name);
        Theme::dark()
    });

    let client = HttpAskClient::new(&endpoint)
        .with_context(|| format!("Invalid endpoint: {}", endpoint))?;
    tracing::info!(endpoint = %client.endpoint(), "starting holo");
    let controller = ChatController::new(Arc::new(client));

    if let Some(question) = args.command {
        return run_command(&controller, &question).await;
    }

    if use_tui {
        return ui::run_tui(controller, endpoint, theme).await;
    }

    run_interactive(&controller, &endpoint).await
}

/// `RUST_LOG` when it parses, otherwise debug output for the holo crates
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Ask once; the answer goes to stdout, the error message to stderr
async fn run_command(controller: &ChatController, question: &str) -> anyhow::Result<()> {
    let outcome = controller.submit(question).await;
    let snapshot = controller.snapshot();

    match outcome {
        Outcome::Answered => {
            if let Some(turn) = snapshot.transcript.last() {
                println!("{}", sanitize(turn.text()));
            }
            Ok(())
        }
        Outcome::Failed(_) | Outcome::Rejected => {
            eprintln!(
                "Error: {}",
                snapshot
                    .error_message()
                    .unwrap_or(holo_chat::error::GENERIC_MESSAGE)
            );
            std::process::exit(1);
        }
    }
}

/// Print what a finished submission produced
fn print_events(receiver: &mut broadcast::Receiver<ChatEvent>) {
    loop {
        match receiver.try_recv() {
            Ok(ChatEvent::TurnAppended { turn }) if !turn.is_user() => {
                println!("{}\n", sanitize(turn.text()));
            }
            Ok(ChatEvent::Failed { message, .. }) => {
                eprintln!("Error: {}\n", message);
            }
            Ok(_) => {}
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event receiver lagged");
            }
            Err(_) => break,
        }
    }
}

async fn run_interactive(controller: &ChatController, endpoint: &str) -> anyhow::Result<()> {
    use std::io::{self, Write};

    let mut receiver = controller.subscribe();

    // Show minimal startup info (only if TTY)
    if io::IsTerminal::is_terminal(&io::stderr()) {
        eprintln!("holo ({})", controller.endpoint_label());
        eprintln!("{}", holo_tui::widgets::WELCOME_TEXT);
        eprintln!();
    }

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        if let Some(result) = commands::execute_command(&input, endpoint) {
            match result {
                commands::CommandResult::Exit => break,
                commands::CommandResult::Message(msg) => println!("{}", msg),
                commands::CommandResult::Unknown(cmd) => {
                    println!("{}", commands::unknown_message(&cmd))
                }
            }
            continue;
        }

        controller.update_draft(input.trim_end_matches(['\r', '\n']));
        controller.submit(&input).await;
        print_events(&mut receiver);
    }

    Ok(())
}
