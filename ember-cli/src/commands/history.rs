use super::{dialog_error, App};
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::Confirm;
use ember_core::{RoundType, SessionState};

pub async fn show_history(app: &App) -> anyhow::Result<()> {
    let session = app.load_session().await;
    let history = session.history();
    let counts = history.counts();

    if counts.total() == 0 {
        println!("No rounds played yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Round type", "Played", "Share"]);
    for round_type in RoundType::ALL {
        let played = counts.get(round_type);
        let share = f64::from(played) / f64::from(counts.total()) * 100.0;
        table.add_row(vec![
            round_type.label().to_string(),
            played.to_string(),
            format!("{:.0}%", share),
        ]);
    }
    println!("{}", table);

    let recent: Vec<String> = history
        .difficulties()
        .iter()
        .map(|d| d.to_string())
        .collect();
    println!("Recent difficulties (oldest first): {}", recent.join(", "));
    println!("Stage: {}", session.stage().label());

    Ok(())
}

pub async fn reset_session(app: &App, force: bool) -> anyhow::Result<()> {
    if !force {
        let confirmed = Confirm::new()
            .with_prompt("Forget all players and round history?")
            .default(false)
            .interact()
            .map_err(dialog_error)?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    app.save_session(&SessionState::default()).await?;
    println!("Session reset.");
    Ok(())
}
