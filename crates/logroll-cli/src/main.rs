//! Logroll CLI - incremental archiver for rotating text logs.

use clap::Parser;
use logroll_cli::commands;
use logroll_cli::logging::init_logging;
use logroll_cli::{load_config, Cli, Command, Formatter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> logroll_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logging(cli.log_level.as_deref())?;

    let config = load_config(cli.config.as_deref())?;
    let formatter = Formatter::new(!cli.no_color);

    match cli.command {
        None | Some(Command::Run) => {
            commands::execute_run(config, &formatter).await?;
        }
        Some(Command::Once) => {
            commands::execute_once(config, &formatter).await?;
        }
        Some(Command::Scan(args)) => {
            commands::execute_scan(args, config, &formatter)?;
        }
        Some(Command::Show(args)) => {
            commands::execute_show(args, config, &formatter)?;
        }
    }

    Ok(())
}
