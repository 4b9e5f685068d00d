//! Raincheck CLI - seeding and offline model evaluation.
//!
//! # Usage
//!
//! ```bash
//! # Seed a merchant with 90 days of synthetic sales history
//! raincheck-cli seed --merchant merchant-1
//!
//! # Seed a shorter history
//! raincheck-cli seed --merchant merchant-1 --days 30
//!
//! # Evaluate a freshly trained model on a held-out split
//! raincheck-cli train
//! ```
//!
//! # Commands
//!
//! - `seed` - Generate a weather-correlated synthetic sales history
//! - `train` - Offline training diagnostic (80/20 split, MAE and R²)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "raincheck-cli")]
#[command(author, version, about = "Raincheck CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed a merchant with a synthetic, weather-correlated sales history
    Seed {
        /// Merchant identifier to seed
        #[arg(short, long)]
        merchant: String,

        /// Days of history to generate
        #[arg(short, long, default_value_t = 90)]
        days: u32,
    },
    /// Train on the global sales log and report held-out accuracy
    Train,
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Seed { merchant, days } => commands::seed::run(&merchant, days).await,
        Commands::Train => commands::train::run().await,
    };

    if let Err(err) = result {
        tracing::error!("command failed: {err}");
        std::process::exit(1);
    }
}
