//! NoteVault CLI - store notes encrypted under a passkey, retrieve them by id
//!
//! This is the command-line interface for NoteVault. It runs the core vault
//! either as an interactive session or as a JSON-lines batch over stdin.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{batch, hash_master, misc, session};
use crate::constants::{DEFAULT_LOG_FILTER, LOG_ENV};
use crate::errors::CliError;
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    init_tracing();
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context();
        match e.downcast_ref::<CliError>() {
            Some(cli_err) => {
                print_error(&ui_ctx, &cli_err.to_string(), cli_err.hint());
                std::process::exit(cli_err.exit_code());
            }
            None => {
                print_error(&ui_ctx, &format!("{:#}", e), None);
                std::process::exit(1);
            }
        }
    }
}

/// Log to stderr, filtered by `NOTEVAULT_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        None | Some(Commands::Session) => session::handle_session(ctx),
        Some(Commands::Batch) => batch::handle_batch(ctx),
        Some(Commands::HashMaster(args)) => hash_master::handle_hash_master(ctx, args),
        Some(Commands::Completions(args)) => misc::handle_completions(args),
    }
}
