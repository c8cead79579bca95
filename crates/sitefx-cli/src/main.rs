use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sitefx_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "sitefx")]
#[command(author, version, about = "Staged loader, scroll effects and particle backdrop for a construction landing page")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use instead of ~/.config/sitefx/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview the landing page in the terminal
    Run,
    /// Run the page headlessly and report its timeline
    Simulate(commands::simulate::SimulateArgs),
    /// Show or initialize the configuration
    Config {
        /// Print the built-in defaults instead of the effective config
        #[arg(long)]
        defaults: bool,
        /// Write the defaults to the config file if it does not exist
        #[arg(long, conflicts_with = "defaults")]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // The terminal preview owns the screen, so it logs to a file
    let log_file = match cli.command {
        Some(Commands::Run) | None => Some(commands::run::open_log(&config)?),
        _ => None,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    match log_file {
        Some(file) => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
            .init(),
        None => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }

    // Handle commands
    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Simulate(args)) => commands::simulate::run(config, args).await,
        Some(Commands::Config { defaults, init }) => {
            commands::config::run(&config, cli.config.as_deref(), defaults, init)
        }
    }
}
