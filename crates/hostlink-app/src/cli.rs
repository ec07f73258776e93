use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Hostlink: drive the surface/host bridge and window chrome from the command line.
#[derive(Parser, Debug)]
#[command(name = "hostlink", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter override, e.g. `hostlink=debug`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a JSON-lines pointer/delivery trace and print every posted envelope.
    Replay {
        /// Trace file, one JSON step per line.
        trace: PathBuf,
    },
    /// Show how a resolution payload is classified.
    Classify {
        /// The raw JSON result as the host would send it.
        json: String,
    },
    /// Print the effective configuration.
    Config,
}

pub fn parse() -> Args {
    Args::parse()
}
