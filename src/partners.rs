//! Partner collection: individually-leveled instances of partner templates.
//!
//! Instances are identified by a v4 uuid minted at acquisition. Merge and
//! evolve consume instances; the selected-partner reference is never left
//! dangling after a consuming operation.

use crate::constants::{
    MAX_LIMIT_BREAK, PARTNER_BASE_MAX_LEVEL, PARTNER_LEVELS_PER_LIMIT_BREAK, PARTNER_XP_PER_LEVEL,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog identifier for a partner template.
pub type PartnerTemplateId = String;

/// Partner rarity, used to price fragment conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    SuperRare,
    UltraRare,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Rare,
        Rarity::SuperRare,
        Rarity::UltraRare,
    ];
}

/// An owned copy of a partner template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerInstance {
    pub id: Uuid,
    pub template_id: PartnerTemplateId,
    pub custom_name: Option<String>,
    pub level: u32,
    pub experience: u64,
    pub limit_break: u32,
    pub acquired_at: i64,
}

impl PartnerInstance {
    fn new(template_id: PartnerTemplateId, acquired_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            template_id,
            custom_name: None,
            level: 1,
            experience: 0,
            limit_break: 0,
            acquired_at,
        }
    }

    /// Level cap: 10 base, +10 per limit break.
    pub fn max_level(&self) -> u32 {
        PARTNER_BASE_MAX_LEVEL + self.limit_break * PARTNER_LEVELS_PER_LIMIT_BREAK
    }
}

/// All owned partner instances plus the current selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartnerCollection {
    partners: Vec<PartnerInstance>,
    selected: Option<Uuid>,
}

impl PartnerCollection {
    pub fn partners(&self) -> &[PartnerInstance] {
        &self.partners
    }

    pub fn len(&self) -> usize {
        self.partners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&PartnerInstance> {
        self.partners.iter().find(|p| p.id == id)
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    /// Selects an owned instance. Returns false for an unknown id.
    pub fn select(&mut self, id: Uuid) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.selected = Some(id);
        true
    }

    /// Mints a new level-1 instance and returns its id.
    pub fn add(&mut self, template_id: PartnerTemplateId, acquired_at: i64) -> Uuid {
        let instance = PartnerInstance::new(template_id, acquired_at);
        let id = instance.id;
        self.partners.push(instance);
        id
    }

    /// Renames an instance. Returns false for an unknown id.
    pub fn rename(&mut self, id: Uuid, name: Option<String>) -> bool {
        match self.partners.iter_mut().find(|p| p.id == id) {
            Some(partner) => {
                partner.custom_name = name;
                true
            }
            None => false,
        }
    }

    /// Grants partner XP and processes level-ups against the instance's
    /// limit-break cap. Returns false for an unknown id.
    pub fn add_experience(&mut self, id: Uuid, amount: u64) -> bool {
        let Some(partner) = self.partners.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        partner.experience += amount;
        let max_level = partner.max_level();
        while partner.level < max_level
            && partner.experience >= partner.level as u64 * PARTNER_XP_PER_LEVEL
        {
            partner.experience -= partner.level as u64 * PARTNER_XP_PER_LEVEL;
            partner.level += 1;
        }
        true
    }

    /// Feeds material instances into a base instance: adds levels and limit
    /// breaks (clamped), removes the materials, keeps the base's identity.
    /// No-op if the base does not exist.
    pub fn merge(
        &mut self,
        base_id: Uuid,
        material_ids: &[Uuid],
        added_level: u32,
        added_limit_break: u32,
    ) {
        if self.get(base_id).is_none() {
            return;
        }
        self.remove_all(material_ids.iter().filter(|&&m| m != base_id).copied());

        if let Some(partner) = self.partners.iter_mut().find(|p| p.id == base_id) {
            partner.limit_break = (partner.limit_break + added_limit_break).min(MAX_LIMIT_BREAK);
            let max_level = partner.max_level();
            partner.level = (partner.level + added_level).min(max_level);
        }
    }

    /// Consumes the base and all materials and creates a fresh level-1
    /// instance of the new template. If the selection pointed at any
    /// consumed instance it is repointed to the new one. Returns the new
    /// instance id, or `None` (no-op) if the base does not exist.
    pub fn evolve(
        &mut self,
        base_id: Uuid,
        material_ids: &[Uuid],
        new_template_id: PartnerTemplateId,
        acquired_at: i64,
    ) -> Option<Uuid> {
        self.get(base_id)?;

        let selection_consumed = self.selected.is_some_and(|sel| {
            sel == base_id || material_ids.contains(&sel)
        });
        self.remove_all(
            material_ids
                .iter()
                .copied()
                .chain(std::iter::once(base_id)),
        );

        let new_id = self.add(new_template_id, acquired_at);
        if selection_consumed {
            self.selected = Some(new_id);
        }
        Some(new_id)
    }

    /// Removes the given instances, clearing the selection if it pointed at
    /// one of them. Returns how many instances were actually removed.
    pub fn remove_all(&mut self, ids: impl IntoIterator<Item = Uuid>) -> usize {
        let before = self.partners.len();
        for id in ids {
            self.partners.retain(|p| p.id != id);
            if self.selected == Some(id) {
                self.selected = None;
            }
        }
        before - self.partners.len()
    }
}
