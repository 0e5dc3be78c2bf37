mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::CliConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use x3o3_engine::Mode;

#[derive(Parser)]
#[command(name = "x3o3")]
#[command(about = "X³O³ - rotating tic-tac-toe with five rule variants")]
#[command(version)]
struct Cli {
    /// Preference file location
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a local hot-seat game
    Play {
        /// Rule variant (classic, beginner, normal, expert, luck);
        /// defaults to the last mode played
        #[arg(short, long)]
        mode: Option<Mode>,

        /// Seed the luck-mode RNG for reproducible games
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// List the rule variants
    Modes,
    /// Run a scripted two-player lobby demo, conflict included
    Demo {
        /// Rule variant for the demo game
        #[arg(short, long, default_value = "classic")]
        mode: Mode,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "x3o3={},x3o3_engine={},x3o3_lobby={}",
            log_level, log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = cli.config.unwrap_or_else(CliConfig::default_path);
    let mut config = CliConfig::load(&config_path);

    let result = match cli.command {
        Commands::Play { mode, seed } => {
            let mode = mode.unwrap_or(config.last_mode);
            config.last_mode = mode;
            if let Err(e) = config.save(&config_path) {
                tracing::warn!("could not persist preferences: {}", e);
            }
            commands::play_local(mode, seed)
        }
        Commands::Modes => commands::list_modes(),
        Commands::Demo { mode } => commands::run_demo(mode).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
