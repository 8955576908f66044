//! CLI subcommand definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::rows::LayoutMode;

/// Run command arguments.
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Container width in pixels (defaults to the configured width)
    #[arg(short, long, value_name = "PX")]
    pub width: Option<f64>,

    /// Stop after this many rotations
    #[arg(short, long, value_name = "N")]
    pub ticks: Option<u64>,

    /// Row layout (defaults to the configured layout)
    #[arg(short, long, value_enum)]
    pub layout: Option<LayoutArg>,

    /// Jump straight to each title instead of animating the flaps
    #[arg(long)]
    pub no_animate: bool,
}

/// Preview command arguments.
#[derive(Debug, Args)]
pub struct PreviewCommand {
    /// The title to lay out
    pub title: String,

    /// Container width in pixels (defaults to the configured width)
    #[arg(short, long, value_name = "PX")]
    pub width: Option<f64>,

    /// Row layout (defaults to the configured layout)
    #[arg(short, long, value_enum)]
    pub layout: Option<LayoutArg>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Title catalog commands.
#[derive(Debug, Subcommand)]
pub enum TitlesCommand {
    /// Show the titles the display rotates through
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Replace the stored titles
    Set {
        /// Titles in display order
        #[arg(required = true, value_name = "TITLE")]
        titles: Vec<String>,
    },

    /// Forget stored titles and go back to the defaults
    Reset,

    /// Show the built-in titles
    Defaults,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Layout argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    /// One row per word
    PerWord,
    /// Whole title on one row
    WholeTitle,
}

impl From<LayoutArg> for LayoutMode {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::PerWord => Self::PerWord,
            LayoutArg::WholeTitle => Self::WholeTitle,
        }
    }
}
