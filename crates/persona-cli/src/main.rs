//! Persona CLI entry point.
//!
//! Binary name: `persona`
//!
//! Parses CLI arguments, opens the profile database, runs the first-run
//! bootstrap, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,persona_core=debug,persona_infra=debug,persona_cli=debug",
        _ => "trace",
    };

    persona_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "persona", &mut std::io::stdout());
        return Ok(());
    }

    let result = run(cli).await;
    persona_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init().await?;
    tracing::debug!(
        data_dir = %state.data_dir.display(),
        database = %state.config.database_file,
        "application state ready"
    );

    let result = match cli.command {
        Commands::Show => cli::show::show_profile(&state, cli.json).await,
        Commands::Edit(args) => cli::edit::edit_profile(&state, args, cli.json, cli.quiet).await,
        Commands::Completions { .. } => unreachable!("handled before state init"),
    };

    state.store.close().await;
    result
}
