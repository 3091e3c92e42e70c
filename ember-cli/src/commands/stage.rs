use super::App;
use clap::Subcommand;
use ember_core::Stage;

#[derive(Subcommand)]
pub enum StageCommands {
    /// Show the current stage
    Show,
    /// Move the evening to another stage
    Set {
        /// Stage: 1/2/3, s1/s2/s3, or a name such as "strangers"
        stage: String,
    },
}

pub async fn handle_stage_command(cmd: StageCommands, app: &App) -> anyhow::Result<()> {
    let mut session = app.load_session().await;

    match cmd {
        StageCommands::Show => {
            let stage = session.stage();
            println!("{}", stage.label());
            println!("  {}", stage.description());
        }

        StageCommands::Set { stage } => {
            let stage: Stage = stage.parse()?;
            session.set_stage(stage);
            app.save_session(&session).await?;
            println!("Now playing {}", stage.label());
        }
    }

    Ok(())
}
