//! Ghost types and their evidence
//!
//! The game stores the active ghost as an index into its ghost type enum.
//! [`GHOSTS`] mirrors that enum in order.

use std::fmt;

use crate::{Error, Result};
use Evidence::*;

/// A category of in-game clue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Evidence {
    /// EMF reader hits level 5
    EmfLevel5,
    /// Spirit box response
    SpiritBox,
    /// Writing in the ghost book
    GhostWriting,
    /// Ultraviolet fingerprints or footprints
    Fingerprints,
    /// Room temperature below zero
    FreezingTemperatures,
    /// Orb visible on the video camera
    GhostOrb,
    /// Silhouette in the D.O.T.S projector
    DotsProjector,
}

impl Evidence {
    /// Every evidence, in chart order
    pub const ALL: [Evidence; 7] = [
        Evidence::EmfLevel5,
        Evidence::SpiritBox,
        Evidence::GhostWriting,
        Evidence::Fingerprints,
        Evidence::FreezingTemperatures,
        Evidence::GhostOrb,
        Evidence::DotsProjector,
    ];

    /// Name as shown in the in-game journal
    pub fn label(self) -> &'static str {
        match self {
            Evidence::EmfLevel5 => "EMF Level 5",
            Evidence::SpiritBox => "Spirit Box",
            Evidence::GhostWriting => "Ghost Writing",
            Evidence::Fingerprints => "Fingerprints",
            Evidence::FreezingTemperatures => "Freezing Temperatures",
            Evidence::GhostOrb => "Ghost Orb",
            Evidence::DotsProjector => "D.O.T.S Projector",
        }
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// One entry of the ghost table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostRecord {
    /// Value the game stores for this ghost
    pub id: i32,
    /// Display name
    pub name: &'static str,
    /// The three evidences the ghost can leave
    pub evidence: [Evidence; 3],
    /// Evidence always present on top of the three (The Mimic's orbs)
    pub hidden: Option<Evidence>,
}

impl GhostRecord {
    const fn new(id: i32, name: &'static str, evidence: [Evidence; 3]) -> Self {
        Self {
            id,
            name,
            evidence,
            hidden: None,
        }
    }

    /// Whether this ghost shows `evidence`, hidden evidence included
    pub fn shows(&self, evidence: Evidence) -> bool {
        self.evidence.contains(&evidence) || self.hidden == Some(evidence)
    }
}

impl fmt::Display for GhostRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name)
    }
}

/// Every ghost, indexed by identifier
pub static GHOSTS: [GhostRecord; 24] = [
    GhostRecord::new(0, "Spirit", [EmfLevel5, SpiritBox, GhostWriting]),
    GhostRecord::new(1, "Wraith", [EmfLevel5, SpiritBox, DotsProjector]),
    GhostRecord::new(2, "Phantom", [SpiritBox, DotsProjector, Fingerprints]),
    GhostRecord::new(3, "Poltergeist", [SpiritBox, GhostWriting, Fingerprints]),
    GhostRecord::new(4, "Banshee", [DotsProjector, Fingerprints, GhostOrb]),
    GhostRecord::new(5, "Jinn", [EmfLevel5, FreezingTemperatures, Fingerprints]),
    GhostRecord::new(6, "Mare", [GhostOrb, SpiritBox, GhostWriting]),
    GhostRecord::new(7, "Revenant", [FreezingTemperatures, GhostWriting, GhostOrb]),
    GhostRecord::new(8, "Shade", [EmfLevel5, FreezingTemperatures, GhostWriting]),
    GhostRecord::new(9, "Demon", [FreezingTemperatures, Fingerprints, GhostWriting]),
    GhostRecord::new(10, "Yurei", [FreezingTemperatures, DotsProjector, GhostOrb]),
    GhostRecord::new(11, "Oni", [EmfLevel5, DotsProjector, FreezingTemperatures]),
    GhostRecord::new(12, "Yokai", [SpiritBox, GhostOrb, DotsProjector]),
    GhostRecord::new(13, "Hantu", [FreezingTemperatures, Fingerprints, GhostOrb]),
    GhostRecord::new(14, "Goryo", [EmfLevel5, DotsProjector, Fingerprints]),
    GhostRecord::new(15, "Myling", [EmfLevel5, Fingerprints, GhostWriting]),
    GhostRecord::new(16, "Onryo", [SpiritBox, FreezingTemperatures, GhostOrb]),
    GhostRecord::new(17, "The Twins", [EmfLevel5, SpiritBox, FreezingTemperatures]),
    GhostRecord::new(18, "Raiju", [EmfLevel5, DotsProjector, GhostOrb]),
    GhostRecord::new(19, "Obake", [EmfLevel5, Fingerprints, GhostOrb]),
    GhostRecord {
        hidden: Some(GhostOrb),
        ..GhostRecord::new(20, "The Mimic", [SpiritBox, Fingerprints, FreezingTemperatures])
    },
    GhostRecord::new(21, "Moroi", [SpiritBox, GhostWriting, FreezingTemperatures]),
    GhostRecord::new(22, "Deogen", [SpiritBox, GhostWriting, DotsProjector]),
    GhostRecord::new(23, "Thaye", [GhostOrb, GhostWriting, DotsProjector]),
];

/// Look up the ghost for an identifier read from memory
pub fn lookup(id: i32) -> Result<&'static GhostRecord> {
    usize::try_from(id)
        .ok()
        .and_then(|index| GHOSTS.get(index))
        .ok_or(Error::UnknownGhost(id))
}

/// Find a ghost by display name (case-insensitive)
pub fn by_name(name: &str) -> Option<&'static GhostRecord> {
    GHOSTS.iter().find(|g| g.name.eq_ignore_ascii_case(name))
}
