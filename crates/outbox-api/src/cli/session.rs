//! Session CLI command: list persisted sessions.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use outbox_core::session::SessionRepository;
use outbox_types::session::SessionStatus;

use crate::state::AppState;

/// List persisted sessions with status and timestamps.
///
/// # Examples
///
/// ```bash
/// outbox sessions
/// outbox sessions --json
/// ```
pub async fn list_sessions(state: &AppState, json: bool) -> Result<()> {
    let sessions = state
        .session_repo
        .find_all()
        .await
        .map_err(|e| anyhow::anyhow!("failed to load sessions: {e}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!(
            "  {} No sessions yet. Create one with: {}",
            style("i").blue().bold(),
            style("curl -X POST localhost:3000/api/v1/sessions -d '{\"name\":\"...\"}'").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Session").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Created").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for session in &sessions {
        let status_cell = match session.status {
            SessionStatus::Ready => Cell::new("ready").fg(Color::Green),
            SessionStatus::Initializing => Cell::new("initializing").fg(Color::Yellow),
            SessionStatus::Pending => Cell::new("pending").fg(Color::DarkGrey),
            SessionStatus::Disconnected => Cell::new("disconnected").fg(Color::DarkGrey),
            SessionStatus::Error => Cell::new("error").fg(Color::Red),
        };

        table.add_row(vec![
            Cell::new(&session.session_id).fg(Color::Cyan),
            status_cell,
            Cell::new(session.created_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::new(session.updated_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!("{table}");
    Ok(())
}
