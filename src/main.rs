// phi-redact - PHI Detection and Masking
// Copyright (c) 2025 phi-redact Contributors
// Licensed under the MIT License

use clap::Parser;
use phi_redact::cli::{Cli, Commands, EXIT_FATAL};
use phi_redact::config::{load_config_or_default, LoggingConfig};
use phi_redact::logging::init_logging;
use std::process;

fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging settings come from the configuration when it loads; commands
    // report configuration errors themselves
    let (config_level, logging_config) = match load_config_or_default(cli.config.as_deref()) {
        Ok(config) => (config.application.log_level, config.logging),
        Err(_) => ("warn".to_string(), LoggingConfig::default()),
    };
    let log_level = cli.log_level.clone().unwrap_or(config_level);

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "phi-redact starting");

    let exit_code = match execute_command(&cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e:#}");
            EXIT_FATAL
        }
    };

    // process::exit skips destructors; flush file logs first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    let config = cli.config.as_deref();
    match &cli.command {
        Commands::Redact(args) => args.execute(config),
        Commands::Decrypt(args) => args.execute(config),
        Commands::GenerateKey(args) => args.execute(),
        Commands::ValidateKey(args) => args.execute(),
        Commands::ListPatterns(args) => args.execute(),
        Commands::Hash(args) => args.execute(),
        Commands::ValidateConfig(args) => args.execute(config),
        Commands::Init(args) => args.execute(),
    }
}
