//! Waypost CLI - Database migrations and API key management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! waypost-cli migrate
//!
//! # Show the current webhook API key
//! waypost-cli apikey show
//!
//! # Rotate the webhook API key (invalidates the old one immediately)
//! waypost-cli apikey rotate
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "waypost-cli")]
#[command(author, version, about = "Waypost CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage the webhook API key
    Apikey {
        #[command(subcommand)]
        action: ApiKeyAction,
    },
}

#[derive(Subcommand)]
enum ApiKeyAction {
    /// Print the current key, generating one if none exists
    Show,
    /// Generate a new key, replacing the current one
    Rotate,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Apikey { action } => match action {
            ApiKeyAction::Show => commands::apikey::show().await?,
            ApiKeyAction::Rotate => commands::apikey::rotate().await?,
        },
    }
    Ok(())
}
