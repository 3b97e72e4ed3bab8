use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

/// Color output control
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal capability
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser, Debug)]
#[command(name = "release-validator")]
#[command(author, version, about = "Validate release directories before they are shared")]
#[command(long_about = "Scans finished downloads and shared directories for content that \
    should not be shared, such as sample files and forbidden extras.\n\n\
    Exit codes:\n  \
    0 - Content accepted / no errors found\n  \
    1 - Content rejected / errors found\n  \
    2 - Configuration or runtime error")]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorChoice,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip loading configuration file
    #[arg(long, global = true, conflicts_with = "config")]
    pub no_config: bool,

    /// Output format [possible values: text, json]
    #[arg(short, long, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Skip content the share reports as excluded
    #[arg(long, global = true)]
    pub ignore_excluded: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a finished bundle, as when a download completes
    Bundle(BundleArgs),

    /// Validate a directory about to be added to the share
    NewDir(NewDirArgs),

    /// Scan configured share roots (all roots when no ids are given)
    Roots(RootsArgs),

    /// Scan every path of every shared folder
    Share,

    /// List registered validators and whether they are enabled
    Validators,
}

#[derive(Parser, Debug)]
pub struct BundleArgs {
    /// Bundle target path
    pub path: PathBuf,

    /// Treat the bundle as a single-file bundle
    #[arg(long)]
    pub file: bool,
}

#[derive(Parser, Debug)]
pub struct NewDirArgs {
    /// Directory being added to the share
    pub path: PathBuf,
}

#[derive(Parser, Debug)]
pub struct RootsArgs {
    /// Share root ids to scan
    pub ids: Vec<String>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
