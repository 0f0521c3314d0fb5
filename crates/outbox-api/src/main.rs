//! Outbox CLI and REST API entry point.
//!
//! Binary name: `outbox`
//!
//! Parses CLI arguments, initializes the database and services, then
//! dispatches to a command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::{ArgAction, Parser, Subcommand};

use state::AppState;

#[derive(Parser)]
#[command(name = "outbox", version, about = "Channel session manager and scheduled message dispatcher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v: debug for outbox, -vv: trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Emit JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 3000)]
        port: u16,

        /// Bridge tracing spans to OpenTelemetry (stdout exporter).
        #[arg(long)]
        otel: bool,
    },

    /// List persisted sessions.
    Sessions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,outbox=debug",
        _ => "trace",
    };
    let enable_otel = matches!(cli.command, Commands::Serve { otel: true, .. });
    outbox_observe::tracing_setup::init_tracing(filter, enable_otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let state = AppState::init().await?;

    match cli.command {
        Commands::Serve { host, port, .. } => {
            // Reconcile durable state before accepting requests: reconnect
            // sessions that were ready, re-arm pending scheduled messages.
            state.session_manager.restore_sessions().await;
            state.dispatch_queue.recover_pending().await;

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Outbox API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            axum::serve(listener, http::router::build_router(state)).await?;
            outbox_observe::tracing_setup::shutdown_tracing();
        }

        Commands::Sessions => {
            cli::session::list_sessions(&state, cli.json).await?;
        }
    }

    Ok(())
}
