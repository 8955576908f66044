//! Command-line interface for the `flap` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    ConfigCommand, LayoutArg, PreviewCommand, RunCommand, TitlesCommand,
};

/// flap - a rotating split-flap title board
///
/// Cycles through a list of short titles, flipping each one onto the
/// terminal as rows of split-flap cells.
#[derive(Debug, Parser)]
#[command(name = "flap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the rotating display
    Run(RunCommand),

    /// Show the rows and font sizes for one title
    Preview(PreviewCommand),

    /// Manage the title list
    #[command(subcommand)]
    Titles(TitlesCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
