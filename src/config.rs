//! Command line configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::{Error, Result};

/// Executable the tool watches by default
pub const DEFAULT_PROCESS: &str = "Phasmophobia.exe";

/// Pointer file looked up in the working directory by default
pub const DEFAULT_POINTER_FILE: &str = "pointers.xml";

/// Command line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "phasmowatch")]
#[command(about = "Shows the current Phasmophobia ghost and its evidence by reading game memory")]
#[command(version)]
pub struct Args {
    /// Target process name
    #[arg(short, long, default_value = DEFAULT_PROCESS)]
    pub process: String,

    /// Pointer file: Cheat Engine table (.CT/.xml) or JSON
    #[arg(short = 'f', long, default_value = DEFAULT_POINTER_FILE)]
    pub pointers: PathBuf,

    /// Seconds between reads
    #[arg(short, long, default_value = "30")]
    pub interval: u64,

    /// Read once and exit
    #[arg(long, conflicts_with = "cycles")]
    pub once: bool,

    /// Stop after this many refreshes
    #[arg(long)]
    pub cycles: Option<u64>,

    /// Wait for the game to start (and restart) instead of exiting
    #[arg(short, long)]
    pub wait: bool,

    /// Disable ANSI colors
    #[arg(long)]
    pub no_color: bool,

    /// Do not clear the screen between refreshes
    #[arg(long)]
    pub no_clear: bool,
}

/// Settings for one watch session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Target process name
    pub process_name: String,
    /// Pointer file to load
    pub pointer_file: PathBuf,
    /// Delay between refreshes
    pub interval: Duration,
    /// Stop after this many refreshes; `None` runs until interrupted
    pub cycles: Option<u64>,
    /// Keep waiting when the process is missing
    pub wait: bool,
    /// ANSI colors
    pub color: bool,
    /// Clear the screen before each frame
    pub clear: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            process_name: DEFAULT_PROCESS.to_string(),
            pointer_file: PathBuf::from(DEFAULT_POINTER_FILE),
            interval: Duration::from_secs(30),
            cycles: None,
            wait: false,
            color: true,
            clear: true,
        }
    }
}

impl TryFrom<Args> for WatchConfig {
    type Error = Error;

    fn try_from(args: Args) -> Result<Self> {
        if args.process.trim().is_empty() {
            return Err(Error::Config("process name must not be empty".to_string()));
        }

        if args.cycles == Some(0) {
            return Err(Error::Config("--cycles must be at least 1".to_string()));
        }

        // A zero interval would spin the CPU against the target
        if args.interval == 0 && args.cycles.is_none() && !args.once {
            return Err(Error::Config(
                "--interval 0 needs --once or --cycles".to_string(),
            ));
        }

        Ok(Self {
            process_name: args.process,
            pointer_file: args.pointers,
            interval: Duration::from_secs(args.interval),
            cycles: if args.once { Some(1) } else { args.cycles },
            wait: args.wait,
            color: !args.no_color,
            clear: !args.no_clear,
        })
    }
}
