//! Experience/level ledger.
//!
//! Level is always derived from cumulative experience via a flat 100-XP
//! curve capped at level 10. The only path that sets experience to anything
//! other than an accumulated total is the debug level override, which snaps
//! experience to the exact level floor so the derivation stays consistent.

use crate::constants::{EVOLUTION_LEVELS, MAX_LEVEL, XP_PER_LEVEL};
use serde::{Deserialize, Serialize};

/// Derives the level for a cumulative experience total.
pub fn level_for_experience(experience: u64) -> u32 {
    ((experience / XP_PER_LEVEL) as u32 + 1).min(MAX_LEVEL)
}

/// Cumulative experience required to sit exactly at the floor of `level`.
pub fn experience_floor_for_level(level: u32) -> u64 {
    (level.clamp(1, MAX_LEVEL) as u64 - 1) * XP_PER_LEVEL
}

/// Direction for the debug level override.
#[cfg(any(test, feature = "debug-tools"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelShift {
    Up,
    Down,
}

/// Cumulative progression state for the live character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionLedger {
    experience: u64,
    level: u32,
    evolution_ready: bool,
}

impl Default for ProgressionLedger {
    fn default() -> Self {
        Self {
            experience: 0,
            level: 1,
            evolution_ready: false,
        }
    }
}

impl ProgressionLedger {
    pub fn experience(&self) -> u64 {
        self.experience
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// True after a level-up crossed an evolution threshold (5 or 10).
    /// Cleared only by [`clear_evolution_ready`](Self::clear_evolution_ready).
    pub fn evolution_ready(&self) -> bool {
        self.evolution_ready
    }

    pub fn clear_evolution_ready(&mut self) {
        self.evolution_ready = false;
    }

    /// Accumulates experience and recomputes the level. Returns the new level.
    pub fn add_experience(&mut self, amount: u64) -> u32 {
        let level_before = self.level;
        self.experience += amount;
        self.level = level_for_experience(self.experience);
        for threshold in EVOLUTION_LEVELS {
            if level_before < threshold && self.level >= threshold {
                self.evolution_ready = true;
            }
        }
        self.level
    }

    /// Replaces the ledger with a saved experience total (character switch).
    /// Level is re-derived rather than trusted from the snapshot.
    pub(crate) fn restore(&mut self, experience: u64) {
        self.experience = experience;
        self.level = level_for_experience(experience);
        self.evolution_ready = false;
    }

    /// Debug/demo override: step the level by one within [1, 10], resetting
    /// experience to the new level's floor.
    #[cfg(any(test, feature = "debug-tools"))]
    pub fn force_level_change(&mut self, shift: LevelShift) {
        let new_level = match shift {
            LevelShift::Up => (self.level + 1).min(MAX_LEVEL),
            LevelShift::Down => (self.level - 1).max(1),
        };
        self.level = new_level;
        self.experience = experience_floor_for_level(new_level);
        self.evolution_ready = false;
    }
}
