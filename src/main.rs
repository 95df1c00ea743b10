//! `cordova-reset` binary entry point.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use cordova_reset::cli::{Cli, Command};
use cordova_reset::{commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    match args.command.unwrap_or(Command::Reset) {
        Command::Reset => {
            logging::init_subscriber(args.verbose, "reset");
            let log = Arc::new(logging::Logger::new("reset"));
            commands::reset::run(&args.global, &log)
        }
        Command::Version => {
            commands::version::run();
            Ok(())
        }
        Command::Completions { shell } => {
            commands::completions::run(shell);
            Ok(())
        }
    }
}
