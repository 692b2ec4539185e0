use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "dormchat")]
#[command(about = "Terminal client for the dormitory-information chatbot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat (the default)
    Chat,
    /// Inspect or clear stored sessions
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },
}

#[derive(Subcommand)]
enum SessionsAction {
    /// List sessions, most recently updated first
    List,
    /// Delete every stored session
    Clear,
}

// Single-threaded cooperative scheduling: suspension points are store I/O
// and the reveal delay, nothing runs in parallel.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => commands::chat::run().await,
        Commands::Sessions { action } => match action {
            SessionsAction::List => commands::sessions::list().await,
            SessionsAction::Clear => commands::sessions::clear().await,
        },
    }
}
