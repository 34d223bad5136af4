use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use todo_cli::{AppConfig, Session, TerminalPrompt};
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Todo list with login, stored as JSON files")]
struct Cli {
    /// Directory holding users.json and todos.json
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    todo_cli::init_logging();
    let args = Cli::parse();

    let mut config = AppConfig::load().context("cannot load configuration")?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    config
        .ensure_data_dir()
        .with_context(|| format!("cannot create {}", config.data_dir.display()))?;
    info!(data_dir = %config.data_dir.display(), "starting");

    let mut session = Session::from_config(&config);
    session.run(&mut TerminalPrompt, &mut io::stdout().lock())?;
    Ok(())
}
