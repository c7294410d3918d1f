//! Telegram auto-responder CLI - main entry point

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use telegram_autoreply::commands;

#[derive(Parser)]
#[command(name = "telegram_autoreply")]
#[command(about = "Telegram DM Auto-responder", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the auto-responder
    AutoAnswer {
        /// Sender id to answer (fallback: responder.target_user_id in config.yml)
        #[arg(short, long, env = "TARGET_USER_ID")]
        target: Option<i64>,

        /// Reply text (fallback: responder.reply_text in config.yml)
        #[arg(short, long, env = "REPLY_TEXT")]
        reply: Option<String>,
    },

    /// Initialize a new session (use only once!)
    InitSession,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("telegram_autoreply=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::AutoAnswer { target, reply } => {
            commands::autoanswer::run(target, reply).await?;
        }
        Commands::InitSession => {
            commands::init_session::run().await?;
        }
    }

    Ok(())
}
