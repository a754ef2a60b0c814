mod cli;
mod server;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use flashdeck::config;

#[derive(Parser)]
#[command(name = "flashdeck", version, about = "Spaced-repetition flashcard server with SM-2 scheduling")]
struct Cli {
    /// Config file (defaults to ~/.flashdeck/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the server (MCP over stdio, or JSON API + MCP over HTTP)
    Serve {
        /// Override `server.transport`: "stdio" or "http"
        #[arg(long)]
        transport: Option<String>,
    },
    /// Rate a card 0-5 and reschedule it
    Review {
        deck_id: String,
        card_id: String,
        #[arg(allow_negative_numbers = true)]
        quality: i64,
    },
    /// Show the next due card in a deck
    Next {
        deck_id: String,
        /// Also print the answer
        #[arg(long)]
        answer: bool,
    },
    /// Print card and review counts
    Stats {
        #[arg(long)]
        deck: Option<String>,
    },
    /// Import a deck from a JSON file
    Import { file: PathBuf },
    /// Export a deck as JSON to stdout
    Export { deck_id: String },
    /// Check database health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::FlashdeckConfig::load_from(path)?,
        None => config::FlashdeckConfig::load()?,
    };

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { transport } => {
            if let Some(t) = transport {
                anyhow::ensure!(
                    matches!(t.as_str(), "stdio" | "http"),
                    "unknown transport '{t}', expected 'stdio' or 'http'"
                );
                config.server.transport = t;
            }
            server::serve(config).await?;
        }
        Command::Review {
            deck_id,
            card_id,
            quality,
        } => cli::review::review(&config, &deck_id, &card_id, quality)?,
        Command::Next { deck_id, answer } => cli::review::next(&config, &deck_id, answer)?,
        Command::Stats { deck } => cli::stats::stats(&config, deck.as_deref())?,
        Command::Import { file } => cli::import::import(&config, &file)?,
        Command::Export { deck_id } => cli::export::export(&config, &deck_id)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
    }

    Ok(())
}
