mod commands;
mod config;
mod terminal;

use clap::{Parser, Subcommand};
use config::CliConfig;
use ember_core::EmberError;
use ember_rounds::RoundError;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Ember - spin the wheel, answer the question")]
#[command(version)]
struct Cli {
    /// Data directory for the saved session and config
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Seed the random source for a reproducible evening
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Do not read prompts aloud
    #[arg(long, global = true)]
    no_narration: bool,

    /// Custom prompt pack (JSON)
    #[arg(long, global = true)]
    prompts: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roster commands
    #[command(subcommand)]
    Players(commands::PlayerCommands),

    /// Show or change the evening's stage
    #[command(subcommand)]
    Stage(commands::StageCommands),

    /// Show recent rounds and round type balance
    History,

    /// Forget all players and history
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Run the game interactively
    Play,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "ember={},ember_core={},ember_rounds={}",
            log_level, log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = CliConfig::load(cli.data_dir).await?;
    config.apply_overrides(cli.seed, cli.no_narration, cli.prompts);

    let app = commands::App::open(config).await?;

    let result = match cli.command {
        Commands::Players(cmd) => commands::handle_player_command(cmd, &app).await,
        Commands::Stage(cmd) => commands::handle_stage_command(cmd, &app).await,
        Commands::History => commands::show_history(&app).await,
        Commands::Reset { force } => commands::reset_session(&app, force).await,
        Commands::Play => commands::play(&app).await,
    };

    if let Err(e) = result {
        match e.downcast_ref::<RoundError>() {
            Some(RoundError::NotEnoughPlayers { have, need }) => {
                eprintln!("Error: Need at least {} players, have {}", need, have);
                eprintln!("Add players with: ember players add <name>...");
            }
            _ => match e.downcast_ref::<EmberError>() {
                Some(EmberError::PlayerNotFound(id)) => {
                    eprintln!("Error: Player {} not found", id);
                    eprintln!("Use 'ember players list' to see who is playing");
                }
                _ => eprintln!("Error: {:#}", e),
            },
        }
        std::process::exit(1);
    }

    Ok(())
}
