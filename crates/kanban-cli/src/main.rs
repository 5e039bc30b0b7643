mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, ServeArgs};
use context::CliContext;
use kanban_core::AppConfig;
use kanban_persistence::JsonFileStore;
use kanban_service::{KanbanOperations, KanbanService, ServiceConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("KANBAN_DEBUG_LOG") {
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
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();
    let config = AppConfig::load();

    match cli.command {
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "kanban", &mut std::io::stdout());
        }
        Commands::Serve(args) => {
            let file = context::resolve_data_file(cli.file, &config)?;
            serve(file, args, &config).await?;
        }
        cmd => {
            if let Err(e) = run(cli.file, cli.as_user, cmd, &config).await {
                output::output_error(&e.to_string());
            }
        }
    }

    Ok(())
}

async fn run(
    file: Option<PathBuf>,
    as_user: Option<uuid::Uuid>,
    cmd: Commands,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let file = context::resolve_data_file(file, config)?;
    let ctx = CliContext::open(&file, as_user, config).await?;

    match cmd {
        Commands::Board(board_cmd) => handlers::board::handle(&ctx, board_cmd.action).await,
        Commands::List(list_cmd) => handlers::list::handle(&ctx, list_cmd.action).await,
        Commands::Card(card_cmd) => handlers::card::handle(&ctx, card_cmd.action).await,
        Commands::Serve(_) | Commands::Completions { .. } => Ok(()),
    }
}

async fn serve(file: PathBuf, args: ServeArgs, config: &AppConfig) -> anyhow::Result<()> {
    let bind = args
        .bind
        .unwrap_or_else(|| config.effective_bind_address().to_string());
    let service = KanbanService::open(JsonFileStore::new(&file), ServiceConfig::from(config)).await?;
    let ops: Arc<dyn KanbanOperations> = Arc::new(service);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!("Serving {} on {}", file.display(), bind);
    kanban_server::serve(listener, ops).await?;
    Ok(())
}
