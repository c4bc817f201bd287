//! Command-line interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "slidegrid",
    version,
    about = "Grid-based slide editor: replay editing sessions and export pages to PDF"
)]
pub struct Cli {
    /// Editor configuration file (JSON).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay a JSON session script and print the resulting layout.
    Run {
        /// Script with a `commands` array.
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Directory for exported PDFs (overrides the config).
        #[arg(long, value_name = "DIR")]
        export_dir: Option<PathBuf>,

        /// Print the full layout as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// List the block templates available for dropping.
    Templates,
    /// List the page formats.
    Formats,
    /// List canvas input bindings.
    Shortcuts,
}

impl Cli {
    /// Default log filter for the verbosity flag.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
