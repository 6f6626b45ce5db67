//! The polling loop: attach, read, look up, render, sleep
//!
//! Process-not-found is fatal unless the session waits for the game.
//! Unreadable pointers and unknown identifiers only affect the current frame.

use std::io::Write;
use std::thread;

use tracing::{debug, info, warn};

use crate::config::WatchConfig;
use crate::display::Console;
use crate::ghost::{self, GhostRecord};
use crate::platform::{self, Platform, PlatformError};
use crate::pointer::{self, PointerPath, Reading};
use crate::{Error, Result, VERSION};

/// Result of one poll
#[derive(Debug)]
pub enum Outcome {
    /// Identifier read and found in the table
    Ghost {
        /// The raw read
        reading: Reading,
        /// Matching table entry
        ghost: &'static GhostRecord,
    },
    /// Identifier read but not in the table
    Unrecognized {
        /// The raw read
        reading: Reading,
    },
    /// Nothing could be read this cycle
    NoData(Error),
}

/// Read the identifier through `paths` and look it up
pub fn poll<P: Platform + ?Sized>(platform: &P, paths: &[PointerPath]) -> Outcome {
    let reading = match pointer::read_identifier(platform, paths) {
        Ok(reading) => reading,
        Err(e) => return Outcome::NoData(e),
    };

    match ghost::lookup(reading.value) {
        Ok(ghost) => Outcome::Ghost { reading, ghost },
        Err(_) => Outcome::Unrecognized { reading },
    }
}

/// Render a poll outcome as the body of a frame
pub fn render(console: &Console, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Ghost { reading, ghost } => console.reading_frame(reading, Some(*ghost)),
        Outcome::Unrecognized { reading } => console.reading_frame(reading, None),
        Outcome::NoData(e) => {
            let mut out = console.error_line("No data: pointers could not be read.");
            out.push_str(&console.error_line(&e.to_string()));
            out
        }
    }
}

/// Title shown at the top of every frame
pub fn title() -> String {
    format!("PHASMOWATCH  v{}", VERSION)
}

/// A watch session over some way of attaching to the game
pub struct Watcher<'a, P, A> {
    config: &'a WatchConfig,
    paths: &'a [PointerPath],
    console: Console,
    attach: A,
    target: Option<P>,
    last_value: Option<i32>,
}

impl<'a, P, A> Watcher<'a, P, A>
where
    P: Platform,
    A: FnMut(&str) -> std::result::Result<P, PlatformError>,
{
    /// Create a session; nothing is attached until the first cycle
    pub fn new(config: &'a WatchConfig, paths: &'a [PointerPath], attach: A) -> Self {
        Self {
            config,
            paths,
            console: Console::new(config.color, config.clear),
            attach,
            target: None,
            last_value: None,
        }
    }

    /// Make sure a live target is attached.
    ///
    /// Returns `Ok(false)` when the game is missing and the session waits.
    fn ensure_attached(&mut self) -> Result<bool> {
        if let Some(target) = &self.target {
            if target.is_alive() {
                return Ok(true);
            }
            info!(pid = target.pid(), "Target process exited");
            // Releases the process handle
            self.target = None;
            self.last_value = None;
        }

        match (self.attach)(&self.config.process_name) {
            Ok(target) => {
                info!(process = %self.config.process_name, pid = target.pid(), "Attached");
                self.target = Some(target);
                Ok(true)
            }
            Err(PlatformError::ProcessNotFound(_)) if self.config.wait => {
                debug!(process = %self.config.process_name, "Waiting for process");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn note_outcome(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Ghost { reading, ghost } if self.last_value != Some(reading.value) => {
                info!(
                    ghost = ghost.name,
                    id = reading.value,
                    hits = reading.hits,
                    total = reading.total,
                    "Ghost identified"
                );
                self.last_value = Some(reading.value);
            }
            Outcome::Unrecognized { reading } if self.last_value != Some(reading.value) => {
                warn!(id = reading.value, "Unrecognized ghost identifier");
                self.last_value = Some(reading.value);
            }
            Outcome::NoData(e) => debug!(error = %e, "No data this cycle"),
            _ => {}
        }
    }

    /// Run one attach-read-render cycle and return the frame
    pub fn cycle(&mut self) -> Result<String> {
        let mut frame = String::new();
        frame.push_str(self.console.clear());
        frame.push_str(&self.console.header(&title()));

        if !self.ensure_attached()? {
            frame.push_str(&self.console.error_line(&format!(
                "Game not running... waiting for {}",
                self.config.process_name
            )));
            return Ok(frame);
        }

        let outcome = match &self.target {
            Some(target) => poll(target, self.paths),
            None => {
                let name = self.config.process_name.clone();
                return Err(PlatformError::ProcessNotFound(name).into());
            }
        };
        self.note_outcome(&outcome);

        frame.push_str(&render(&self.console, &outcome));
        frame.push('\n');
        frame.push_str(&self.console.refresh_line(self.config.interval));
        Ok(frame)
    }

    /// Refresh until the cycle budget runs out or a fatal error occurs
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let mut done = 0u64;

        loop {
            let frame = self.cycle()?;
            out.write_all(frame.as_bytes())?;
            out.flush()?;

            done += 1;
            if self.config.cycles.map_or(false, |max| done >= max) {
                return Ok(());
            }

            thread::sleep(self.config.interval);
        }
    }
}

/// Load the pointer file and watch the real game process
pub fn run(config: &WatchConfig) -> Result<()> {
    let paths = pointer::load_pointer_file(&config.pointer_file)?;

    let mut watcher = Watcher::new(config, &paths, platform::attach_by_name);
    let stdout = std::io::stdout();
    watcher.run(&mut stdout.lock())
}
