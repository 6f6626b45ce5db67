//! phasmowatch: reads the active ghost type out of a running Phasmophobia
//! process and shows which evidence it leaves.
//!
//! # Architecture
//!
//! - **Platform Layer**: finds the game process and reads its memory
//! - **Pointer**: loads pointer paths and walks them to the ghost identifier
//! - **Ghost**: the static identifier to ghost/evidence table
//! - **Display**: console rendering of the current reading
//! - **Watcher**: the poll, look up, render, sleep loop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod display;
pub mod ghost;
pub mod platform;
pub mod pointer;
pub mod watcher;

// Re-export commonly used types
pub use ghost::{lookup, Evidence, GhostRecord};
pub use platform::{MemoryReader, Platform, PlatformError};
pub use pointer::{PointerPath, Reading};

/// Result type used throughout the library
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type for phasmowatch
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Platform-specific error
    #[error("Platform error: {0}")]
    Platform(#[from] platform::PlatformError),

    /// A link in a pointer chain does not point into readable memory
    #[error("Invalid pointer at 0x{address:X} (link {link} of {path}): {reason}")]
    InvalidPointer {
        /// Address that could not be dereferenced
        address: usize,
        /// Index of the failing link; 0 is the module-relative base
        link: usize,
        /// The path being resolved, as `Module+0xOFF`
        path: String,
        /// Why the dereference failed
        reason: String,
    },

    /// Identifier has no entry in the ghost table
    #[error("Unrecognized ghost identifier: {0}")]
    UnknownGhost(i32),

    /// Pointer file or command line problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging for the tool
///
/// Logs go to stderr so they never interleave with the console display.
/// `RUST_LOG` overrides the default `phasmowatch=info` filter.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("phasmowatch=info"))
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
