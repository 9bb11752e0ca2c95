//! Command-line interface entry point for GA Analytics

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use ga_analytics::config::Config;
use ga_analytics::info;
use ga_analytics::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| config.logging.level.parse().ok())
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // File logging: CLI flag wins, otherwise config logging.file if set
    let config_log_path = (!config.logging.file.is_empty()).then(|| PathBuf::from(&config.logging.file));
    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            info!("File logging initialized at: {display_path}");
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
            ExitCode::SUCCESS
        }
        Command::Validate { json } => commands::validate::run(&config, json),
        Command::Score {
            assessment,
            write,
            ..
        } => commands::score::run(&assessment, write, &config),
        Command::Report {
            course,
            batch,
            section,
            faculty,
            format,
            output,
        } => commands::report::run(
            commands::report::ReportRequest {
                course,
                batch,
                section,
                faculty,
                format: format.into(),
                output,
            },
            &config,
        ),
    }
}
