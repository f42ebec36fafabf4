mod api;
mod cli;
mod command_handlers;
mod config;
mod error;
mod output;

use clap::Parser;
use std::io::Write;

use crate::cli::Cli;
use crate::error::CommandError;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(c) => c,
        Err(e) => {
            if matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp
                    | clap::error::ErrorKind::DisplayVersion
                    | clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                e.exit();
            }
            let msg = e.to_string();
            let first_line = msg.lines().next().unwrap_or("parse error");
            let first_line = first_line.trim_start_matches("error: ");
            let err = CommandError::invalid_args(first_line);
            output::write_error(&mut std::io::stdout().lock(), &err);
            std::process::exit(2);
        }
    };

    init_tracing(cli.verbose);
    tracing::debug!(command = cli.command.name(), "dispatching");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let lookup_env = |key: &str| std::env::var(key).ok();
    let code = match command_handlers::dispatch::dispatch(cli, &mut out, &lookup_env) {
        Ok(()) => 0,
        Err(e) => {
            tracing::debug!(code = e.code(), "command failed");
            1
        }
    };
    let _ = out.flush();
    std::process::exit(code);
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let filter = if verbose { "debug" } else { "warn" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
