mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;
use output::OrExit;
use tasky_core::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("TASKY_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "tasky", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = CliContext::open(cli.file.as_deref(), AppConfig::load())
        .or_exit("Failed to open the board backend");

    let result = match cli.command {
        Commands::Board(board_cmd) => handlers::board::handle(&ctx, board_cmd.action).await,
        Commands::List(list_cmd) => handlers::list::handle(&ctx, list_cmd.action).await,
        Commands::Task(task_cmd) => handlers::task::handle(&ctx, task_cmd.action).await,
        Commands::Auth(auth_cmd) => handlers::auth::handle(&ctx, auth_cmd.action).await,
        Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {:#}", e);
        output::output_error(&e.to_string());
    }
    Ok(())
}
