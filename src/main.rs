//! # glyphfix - Unicode look-alike converter
//!
//! Replaces look-alike characters (U+02F8, U+2024, U+2044, ...) inside the text of
//! selected HTML elements with their ASCII counterparts.
//!
//! ## Features
//! - Convert files, directory trees, or stdin; in place or to stdout
//! - Configurable character map and target selector
//! - Bounded history of past conversions

mod cli;
mod core;
mod run;

use clap::{CommandFactory, Parser};
use dotenv::dotenv;

use cli::{Args, Commands, HistorySubcommand, MapSubcommand};

/// Main application entry point. Errors are printed with their `Display` message
/// and the process exits with status 1.
fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    let args = Args::parse();
    run::init_logger(&args);

    if let Err(e) = dispatch(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn dispatch(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    match &args.command {
        Commands::Convert(convert) => {
            let settings = core::settings::load()?.with_env_overrides();
            let total = run::run_convert(convert, &settings, args.quiet)?;
            log::debug!(
                "Conversion finished: {} character(s), matched={}",
                total.count,
                total.matched
            );
            Ok(())
        }
        Commands::Map { subcommand } => match subcommand {
            MapSubcommand::List => core::cli::run_map_list(),
            MapSubcommand::Set {
                source,
                replacement,
            } => core::cli::run_map_set(source, replacement),
            MapSubcommand::Remove { source } => core::cli::run_map_remove(source),
            MapSubcommand::Reset => core::cli::run_map_reset(),
        },
        Commands::Selector { selector } => core::cli::run_selector(selector.as_deref()),
        Commands::History { subcommand } => match subcommand {
            HistorySubcommand::List { limit } => core::cli::run_history_list(*limit),
            HistorySubcommand::Clear => core::cli::run_history_clear(),
        },
        Commands::Config => core::cli::run_config(),
        Commands::Completions { shell } => {
            let mut cmd = Args::command();
            cli::generate(*shell, &mut cmd, core::app::NAME, &mut std::io::stdout());
            Ok(())
        }
    }
}
