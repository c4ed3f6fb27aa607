//! Character classes and per-class save slots.

use crate::inventory::{Equipment, SkillId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The finite set of playable character archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Merchant,
}

impl CharacterClass {
    /// All classes in display order.
    pub const ALL: [CharacterClass; 3] = [
        CharacterClass::Warrior,
        CharacterClass::Mage,
        CharacterClass::Merchant,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Merchant => "Merchant",
        }
    }
}

/// Per-class snapshot of progression, equipment, and skills.
///
/// At most one slot is live at a time; switching the selected class writes
/// the live state back into its slot before loading the target slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub experience: u64,
    pub level: u32,
    pub equipment: Equipment,
    pub unlocked_skills: HashSet<SkillId>,
    pub equipped_skills: Vec<SkillId>,
}

impl Default for CharacterSnapshot {
    fn default() -> Self {
        Self {
            experience: 0,
            level: 1,
            equipment: Equipment::default(),
            unlocked_skills: HashSet::new(),
            equipped_skills: Vec::new(),
        }
    }
}
