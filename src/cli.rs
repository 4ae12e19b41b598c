//! CLI definitions: argument parsing, subcommands, and help text.

use std::path::PathBuf;

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use clap_complete::Shell;

pub use clap_complete::generate;

use crate::core::walk::DEFAULT_INCLUDE;

const AFTER_HELP: &str = "\
EXAMPLES:
  glyphfix convert page.html              Print page.html with look-alikes replaced
  glyphfix convert -i site/               Rewrite every .html file under site/ in place
  glyphfix convert -s 'article p' -       Read HTML from stdin, convert only <p> in <article>
  glyphfix convert --text notes.txt       Treat input as plain text
  glyphfix map set U+FF0E .               Map fullwidth full stop to '.'
  glyphfix selector main                  Convert only inside <main> by default
  glyphfix history list -l 10             Show the last 10 conversions
  glyphfix completions bash               Generate bash completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Replace Unicode look-alike characters in HTML text with their ASCII counterparts",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert look-alike characters in HTML files, directories, or stdin
    Convert(ConvertArgs),
    /// Show or edit the character map
    Map {
        #[command(subcommand)]
        subcommand: MapSubcommand,
    },
    /// Show or set the default target selector
    Selector {
        /// New CSS selector (omit to print the current one)
        selector: Option<String>,
    },
    /// Manage conversion history
    History {
        #[command(subcommand)]
        subcommand: HistorySubcommand,
    },
    /// Show config paths and current settings
    Config,
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ConvertArgs {
    /// Files or directories to convert ('-' or nothing reads stdin)
    pub paths: Vec<PathBuf>,

    /// CSS selector for the elements to convert (default: configured selector)
    #[arg(short = 's', long)]
    pub selector: Option<String>,

    /// Parse input as an HTML fragment instead of a full document
    #[arg(long, conflicts_with = "text")]
    pub fragment: bool,

    /// Treat input as plain text (no HTML parsing, selector ignored)
    #[arg(long)]
    pub text: bool,

    /// Rewrite files in place instead of printing to stdout
    #[arg(short = 'i', long)]
    pub in_place: bool,

    /// Report counts without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// File-name glob applied inside directories
    #[arg(long, default_value = DEFAULT_INCLUDE)]
    pub include: String,

    /// Do not record this conversion in history
    #[arg(long)]
    pub no_history: bool,
}

impl ConvertArgs {
    /// True when input comes from stdin (no paths, or a single '-').
    pub fn reads_stdin(&self) -> bool {
        match self.paths.as_slice() {
            [] => true,
            [only] => only.as_os_str() == "-",
            _ => false,
        }
    }

    /// True when '-' appears alongside other paths; stdin can only be the sole input.
    pub fn mixes_stdin(&self) -> bool {
        self.paths.len() > 1 && self.paths.iter().any(|p| p.as_os_str() == "-")
    }
}

#[derive(Subcommand)]
pub enum MapSubcommand {
    /// List map entries
    List,
    /// Add or replace an entry (characters may be given as U+XXXX)
    Set {
        source: String,
        replacement: String,
    },
    /// Remove an entry
    Remove { source: String },
    /// Restore the built-in map
    Reset,
}

#[derive(Subcommand)]
pub enum HistorySubcommand {
    /// List recorded conversions
    List {
        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Delete all recorded conversions
    Clear,
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }
}
