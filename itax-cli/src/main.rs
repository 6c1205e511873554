use std::process::ExitCode;

use clap::Parser;

use itax_cli::app;
use itax_cli::cli::Cli;

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match app::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(app::exit_status(&err))
        }
    }
}
