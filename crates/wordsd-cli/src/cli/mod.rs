//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use wordsd_core::config;

use crate::logging;

mod commands;

#[derive(Parser)]
#[command(name = "wordsd")]
#[command(version = "0.1")]
#[command(about = "WordSD interactive fiction player")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Play the story in a full-screen terminal UI (default)
    Play,
    /// Play the story without a screen, printing revealed text to stdout
    Run {
        /// Which option to pick when the story offers a choice (1-based)
        #[arg(long, value_name = "N", default_value_t = 1)]
        choice: usize,

        /// Click through every line instead of holding fast-forward
        #[arg(long = "normal-speed")]
        normal_speed: bool,

        /// Print the recorded back log when the story ends
        #[arg(long)]
        transcript: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // config commands stay side-effect free
    let _log_guard = match cli.command {
        Some(Commands::Config { .. }) => None,
        _ => Some(logging::init().context("init logging")?),
    };

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;

    // default to the interactive player
    let Some(command) = cli.command else {
        return commands::play::run(&config).await;
    };

    match command {
        Commands::Play => commands::play::run(&config).await,
        Commands::Run {
            choice,
            normal_speed,
            transcript,
        } => {
            commands::run::run(
                &config,
                commands::run::RunOptions {
                    choice,
                    normal_speed,
                    transcript,
                },
            )
            .await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
