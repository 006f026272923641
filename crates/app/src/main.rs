//! Cost Manager API checker - Main Entry Point
//!
//! Parses the command line, loads settings and runs the checker.
//! Logs go to stderr; stdout carries only the report.

use std::process::ExitCode;

use costcheck::{Command, USAGE, parse_args};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const USAGE_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(cli)) => cli,
        Ok(Command::Help) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {e}\n\n{USAGE}");
            return ExitCode::from(USAGE_ERROR);
        }
    };

    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::from(USAGE_ERROR);
        }
    };

    let mut stdout = std::io::stdout();
    match costcheck::run(&cli, &settings, &mut stdout).await {
        Ok(summary) => ExitCode::from(summary.exit_code()),
        Err(e) => {
            tracing::error!(error = %e, "run aborted");
            ExitCode::from(USAGE_ERROR)
        }
    }
}
