//! Feishu Webhook: send messages to a custom bot
//!
//! Entry point for the feishu-webhook application.

use feishu_webhook::config::{Cli, Command, ValidatedConfig, write_default_config};
use feishu_webhook::webhook::Params;
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let message = match &cli.command {
        Command::Init { output } => return handle_init(output),
        Command::Send(message) => message,
    };

    let params = match message.to_params() {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return exit_code::CONFIG_ERROR;
        }
    };

    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    setup_tracing(config.verbose);
    tracing::debug!("{config}");

    run_application(config, params)
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Runs the send with the given configuration and prints the reply.
///
/// Excluded from coverage - requires async runtime and network.
#[cfg(not(tarpaulin_include))]
fn run_application(config: ValidatedConfig, params: Params) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create Tokio runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    match runtime.block_on(run::execute(config, params)) {
        Ok(sent) => {
            println!("{}", String::from_utf8_lossy(&sent.body));
            exit_code::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            if let Some(partial) = e.partial() {
                eprintln!("{}", String::from_utf8_lossy(&partial.body));
            }
            exit_code::runtime_error()
        }
    }
}
