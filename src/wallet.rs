//! Resource economy: fungible reward counters.
//!
//! Four independent counters with all-or-nothing consumption. Partner
//! fragments auto-convert to partner tickets at [`FRAGMENTS_PER_TICKET`].

use crate::constants::FRAGMENTS_PER_TICKET;
use serde::{Deserialize, Serialize};

/// The four fungible counters owned by the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    SkillPoints,
    EquipmentTickets,
    PartnerTickets,
    PartnerFragments,
}

impl Currency {
    /// All currencies in display order.
    pub const ALL: [Currency; 4] = [
        Currency::SkillPoints,
        Currency::EquipmentTickets,
        Currency::PartnerTickets,
        Currency::PartnerFragments,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Currency::SkillPoints => "Skill Points",
            Currency::EquipmentTickets => "Equipment Tickets",
            Currency::PartnerTickets => "Partner Tickets",
            Currency::PartnerFragments => "Partner Fragments",
        }
    }
}

/// Player resource balances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceWallet {
    skill_points: u32,
    equipment_tickets: u32,
    partner_tickets: u32,
    partner_fragments: u32,
}

impl ResourceWallet {
    pub fn balance(&self, currency: Currency) -> u32 {
        match currency {
            Currency::SkillPoints => self.skill_points,
            Currency::EquipmentTickets => self.equipment_tickets,
            Currency::PartnerTickets => self.partner_tickets,
            Currency::PartnerFragments => self.partner_fragments,
        }
    }

    /// Unconditional grant. Fragment grants roll over into partner tickets.
    pub fn add(&mut self, currency: Currency, amount: u32) {
        match currency {
            Currency::SkillPoints => self.skill_points += amount,
            Currency::EquipmentTickets => self.equipment_tickets += amount,
            Currency::PartnerTickets => self.partner_tickets += amount,
            Currency::PartnerFragments => self.add_fragments(amount),
        }
    }

    /// Spends `amount` iff the balance covers it. Returns false and leaves
    /// the balance untouched on insufficient funds; never partial.
    pub fn consume(&mut self, currency: Currency, amount: u32) -> bool {
        let balance = match currency {
            Currency::SkillPoints => &mut self.skill_points,
            Currency::EquipmentTickets => &mut self.equipment_tickets,
            Currency::PartnerTickets => &mut self.partner_tickets,
            Currency::PartnerFragments => &mut self.partner_fragments,
        };
        if *balance < amount {
            return false;
        }
        *balance -= amount;
        true
    }

    /// Every 5 fragments mint one partner ticket; remainder stays as fragments.
    fn add_fragments(&mut self, amount: u32) {
        let total = self.partner_fragments + amount;
        self.partner_tickets += total / FRAGMENTS_PER_TICKET;
        self.partner_fragments = total % FRAGMENTS_PER_TICKET;
    }
}
