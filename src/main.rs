//! phasmowatch command line entry point

use std::process::ExitCode;

use clap::Parser;
use phasmowatch::config::{Args, WatchConfig};
use phasmowatch::{watcher, Error, PlatformError};
use tracing::error;

fn main() -> ExitCode {
    phasmowatch::init_logging();
    let args = Args::parse();

    let result = WatchConfig::try_from(args).and_then(|config| watcher::run(&config));

    match result {
        Ok(()) => {
            println!("\nExiting PHASMOWATCH. Goodbye.");
            ExitCode::SUCCESS
        }
        Err(Error::Platform(PlatformError::ProcessNotFound(name))) => {
            error!(process = %name, "Target process is not running");
            eprintln!("Error: {} is not running. Start the game first, or pass --wait.", name);
            ExitCode::from(2)
        }
        Err(e) => {
            error!(error = %e, "Fatal error");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
