//! Console output
//!
//! Everything renders into a `String` first so the watcher can emit a whole
//! frame at once and tests can inspect it.

use std::fmt::Write as _;
use std::time::Duration;

use crate::ghost::{Evidence, GhostRecord, GHOSTS};
use crate::pointer::Reading;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[91m";
const GREEN: &str = "\x1b[92m";
const MAGENTA: &str = "\x1b[95m";
const CYAN: &str = "\x1b[96m";

/// Erase the screen and home the cursor
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const WIDTH: usize = 40;
const GHOST_COLUMNS: usize = 3;
const GHOST_CELL: usize = 12;
const EVIDENCE_COLUMNS: usize = 2;
const EVIDENCE_CELL: usize = 23;

/// Renders frames, with or without ANSI colors
#[derive(Debug, Clone, Copy)]
pub struct Console {
    color: bool,
    clear: bool,
}

impl Console {
    /// Create a console renderer
    pub fn new(color: bool, clear: bool) -> Self {
        Self { color, clear }
    }

    fn paint(&self, style: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", style, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn rule(&self, ch: char) -> String {
        self.paint(MAGENTA, &ch.to_string().repeat(WIDTH))
    }

    /// Screen clear sequence, empty when clearing is off
    pub fn clear(&self) -> &'static str {
        if self.clear {
            CLEAR_SCREEN
        } else {
            ""
        }
    }

    /// Title banner
    pub fn header(&self, title: &str) -> String {
        let bar = self.rule('=');
        let title = self.paint(&format!("{}{}", BOLD, CYAN), &format!("{:^WIDTH$}", title));
        format!("{}\n{}\n{}\n\n", bar, title, bar)
    }

    /// `Value: 7 at 0x1F2E3D40 2/3 hits`
    pub fn value_line(&self, reading: &Reading) -> String {
        format!(
            "{} {} at 0x{:X} {}/{} hits\n",
            self.paint(&format!("{}{}", BOLD, CYAN), "Value:"),
            reading.value,
            reading.address,
            reading.hits,
            reading.total
        )
    }

    /// Name of the identified ghost, or an unrecognized notice
    pub fn ghost_line(&self, ghost: Option<&GhostRecord>, value: i32) -> String {
        match ghost {
            Some(ghost) => format!(
                "{} {}\n\n",
                self.paint(&format!("{}{}", BOLD, CYAN), "Ghost:"),
                self.paint(&format!("{}{}", BOLD, GREEN), ghost.name)
            ),
            None => format!(
                "{} {}\n\n",
                self.paint(&format!("{}{}", BOLD, CYAN), "Ghost:"),
                self.paint(RED, &format!("unrecognized ghost (id {})", value))
            ),
        }
    }

    /// Every ghost in rows of three, the current one highlighted
    pub fn ghost_chart(&self, current: Option<&GhostRecord>) -> String {
        let mut out = String::new();

        for row in GHOSTS.chunks(GHOST_COLUMNS) {
            let cells: Vec<String> = row
                .iter()
                .map(|ghost| {
                    let cell = format!("{:<GHOST_CELL$}", ghost.name);
                    if current.map_or(false, |c| c.id == ghost.id) {
                        self.paint(&format!("{}{}", BOLD, GREEN), &cell)
                    } else {
                        cell
                    }
                })
                .collect();
            let _ = writeln!(out, "{}", cells.join("  ").trim_end());
        }

        let _ = writeln!(out, "{}\n", self.rule('-'));
        out
    }

    /// Every evidence in two columns, the ghost's evidences highlighted
    pub fn evidence_chart(&self, current: Option<&GhostRecord>) -> String {
        let mut out = String::new();

        for row in Evidence::ALL.chunks(EVIDENCE_COLUMNS) {
            let cells: Vec<String> = row
                .iter()
                .map(|&evidence| {
                    let hidden = current.map_or(false, |g| g.hidden == Some(evidence));
                    let label = if hidden {
                        format!("{} (hidden)", evidence)
                    } else {
                        evidence.to_string()
                    };
                    let cell = format!("{:<EVIDENCE_CELL$}", label);

                    if current.map_or(false, |g| g.shows(evidence)) {
                        self.paint(&format!("{}{}", BOLD, GREEN), &cell)
                    } else {
                        cell
                    }
                })
                .collect();
            let _ = writeln!(out, "{}", cells.join("  ").trim_end());
        }

        let _ = writeln!(out, "{}", self.rule('-'));
        out
    }

    /// A complete frame for a successful read
    pub fn reading_frame(&self, reading: &Reading, ghost: Option<&GhostRecord>) -> String {
        let mut out = String::new();
        out.push_str(&self.value_line(reading));
        out.push_str(&self.ghost_line(ghost, reading.value));
        out.push_str(&self.ghost_chart(ghost));
        out.push_str(&self.evidence_chart(ghost));
        out
    }

    /// A red status line, for "no data" and attach problems
    pub fn error_line(&self, message: &str) -> String {
        format!("{}\n", self.paint(RED, message))
    }

    /// Countdown hint printed after each frame
    pub fn refresh_line(&self, interval: Duration) -> String {
        format!(
            "{}\n",
            self.paint(
                CYAN,
                &format!("Refreshing in {}s... (press Ctrl+C to quit)", interval.as_secs())
            )
        )
    }
}
