mod commands;
pub mod exit_codes;
mod output;

pub use commands::{Cli, Commands, RulesCommands};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use output::OutputMode;

/// run the command and return the process exit code
///
/// commands with a specific failure code exit on their own; anything that
/// propagates up here is a general error.
pub fn run(cli: Cli) -> i32 {
    let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);
    let result = commands::execute(cli);

    if let Err(e) = &result {
        commands::report_error(output_mode, exit_codes::ERROR, e);
    }
    exit_code_for(&result)
}

fn exit_code_for(result: &Result<()>) -> i32 {
    match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(_) => exit_codes::ERROR,
    }
}

/// install the stderr log subscriber
///
/// RUST_LOG wins over the verbosity flag
pub fn init_logging(verbose: u8) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level_for(verbose))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "rulecheck=debug",
        _ => "rulecheck=trace",
    }
}
