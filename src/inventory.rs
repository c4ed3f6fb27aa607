//! Owned items, equipped slots, and skill loadout.

use crate::constants::MAX_EQUIPPED_SKILLS;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Catalog identifier for an equipment item. Items live in the remote
/// catalog; the core only tracks ownership by id.
pub type ItemId = String;

/// Catalog identifier for a skill.
pub type SkillId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 3] = [
        EquipmentSlot::Weapon,
        EquipmentSlot::Armor,
        EquipmentSlot::Accessory,
    ];
}

/// The three equipped slots. Empty slots hold `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<ItemId>,
    pub armor: Option<ItemId>,
    pub accessory: Option<ItemId>,
}

impl Equipment {
    pub fn get(&self, slot: EquipmentSlot) -> &Option<ItemId> {
        match slot {
            EquipmentSlot::Weapon => &self.weapon,
            EquipmentSlot::Armor => &self.armor,
            EquipmentSlot::Accessory => &self.accessory,
        }
    }

    pub fn set(&mut self, slot: EquipmentSlot, item: Option<ItemId>) {
        match slot {
            EquipmentSlot::Weapon => self.weapon = item,
            EquipmentSlot::Armor => self.armor = item,
            EquipmentSlot::Accessory => self.accessory = item,
        }
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &ItemId> {
        [&self.weapon, &self.armor, &self.accessory]
            .into_iter()
            .filter_map(|item| item.as_ref())
    }
}

/// Owned-item multiset plus the live equipment and skill loadout.
///
/// Owned items are profile-wide; the equipment and skill loadout are
/// per-character and get swapped through save slots on class switch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryState {
    owned_items: Vec<ItemId>,
    pub equipment: Equipment,
    pub(crate) unlocked_skills: HashSet<SkillId>,
    pub(crate) equipped_skills: Vec<SkillId>,
}

impl InventoryState {
    /// Adds an item to the owned multiset. Duplicates are allowed.
    pub fn add_item(&mut self, item: ItemId) {
        self.owned_items.push(item);
    }

    pub fn owned_items(&self) -> &[ItemId] {
        &self.owned_items
    }

    pub fn owned_count(&self, item: &str) -> usize {
        self.owned_items.iter().filter(|i| i.as_str() == item).count()
    }

    /// Equips an owned item into a slot, replacing any previous occupant.
    /// Returns false without mutating if the item is not owned.
    pub fn equip(&mut self, slot: EquipmentSlot, item: ItemId) -> bool {
        if self.owned_count(&item) == 0 {
            return false;
        }
        self.equipment.set(slot, Some(item));
        true
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) {
        self.equipment.set(slot, None);
    }

    /// Marks a skill unlocked. Returns true if it was newly unlocked.
    pub fn unlock_skill(&mut self, skill: SkillId) -> bool {
        self.unlocked_skills.insert(skill)
    }

    pub fn is_skill_unlocked(&self, skill: &str) -> bool {
        self.unlocked_skills.contains(skill)
    }

    pub fn unlocked_skills(&self) -> &HashSet<SkillId> {
        &self.unlocked_skills
    }

    pub fn equipped_skills(&self) -> &[SkillId] {
        &self.equipped_skills
    }

    /// Equips an unlocked skill into the next free slot (max 3).
    /// Returns false if locked, already equipped, or the loadout is full.
    pub fn equip_skill(&mut self, skill: &str) -> bool {
        if !self.unlocked_skills.contains(skill)
            || self.equipped_skills.iter().any(|s| s == skill)
            || self.equipped_skills.len() >= MAX_EQUIPPED_SKILLS
        {
            return false;
        }
        self.equipped_skills.push(skill.to_string());
        true
    }

    /// Removes a skill from the loadout. Returns false if it was not equipped.
    pub fn unequip_skill(&mut self, skill: &str) -> bool {
        let before = self.equipped_skills.len();
        self.equipped_skills.retain(|s| s != skill);
        self.equipped_skills.len() != before
    }
}
