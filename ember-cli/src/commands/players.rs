use super::{dialog_error, App};
use anyhow::anyhow;
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::Confirm;
use ember_core::SessionState;

#[derive(Subcommand)]
pub enum PlayerCommands {
    /// Add one or more players
    Add {
        /// Player names
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Remove a player
    Remove {
        /// Player name or id
        player: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// List players with their participation
    List,
}

pub async fn handle_player_command(cmd: PlayerCommands, app: &App) -> anyhow::Result<()> {
    let mut session = app.load_session().await;

    match cmd {
        PlayerCommands::Add { names } => {
            for name in names {
                let player = session.add_player(&name)?;
                println!("Added {}", player.name());
            }
            app.save_session(&session).await?;
        }

        PlayerCommands::Remove { player, force } => {
            let target = session
                .find_player(&player)
                .map(|p| (p.id(), p.name().to_string()))
                .ok_or_else(|| anyhow!("No player matches '{}'", player))?;

            if !force {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Remove {} from the game?", target.1))
                    .default(false)
                    .interact()
                    .map_err(dialog_error)?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            session.remove_player(target.0)?;
            app.save_session(&session).await?;
            println!("Removed {}", target.1);
        }

        PlayerCommands::List => print_players(&session),
    }

    Ok(())
}

pub(crate) fn print_players(session: &SessionState) {
    if session.players().is_empty() {
        println!("No players yet.");
        println!("Add some with: ember players add <name>...");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Rounds played", "Skip tokens", "ID"]);

    for player in session.players() {
        let id = player.id().to_string();
        table.add_row(vec![
            player.name().to_string(),
            player.participation_count().to_string(),
            player.skip_tokens().to_string(),
            id[..8].to_string(),
        ]);
    }

    println!("{}", table);
}
