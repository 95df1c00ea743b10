//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "cordova-reset",
    about = "Remove and re-add every Cordova platform and plugin declared in package.json",
    version
)]
pub struct Cli {
    /// Subcommand; `reset` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Project directory (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Manifest path, relative to the project directory
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Recovery snapshot path, relative to the project directory
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Build tool executable
    #[arg(long, global = true)]
    pub tool: Option<String>,

    /// Print the commands that would run without running them
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Remove and re-add all platforms and plugins
    Reset,
    /// Print version information
    Version,
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}
