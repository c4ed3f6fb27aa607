//! The player profile: one caller-owned state object composing the
//! progression ledger, wallet, engagement record, badges, inventory, and
//! partner collection.
//!
//! All cross-component flows live here: character switching (save slots +
//! the one-time welcome bonus), the login bonus pipeline, daily quiz and
//! goal grants, lesson completion, badge side rewards, and the consuming
//! partner operations that touch the wallet.
//!
//! Date-sensitive operations take `today` explicitly so hosts and tests can
//! drive simulated calendars; only unlock timestamps use the wall clock.

use crate::badges::{BadgeId, BadgeInputs, BadgeSet};
use crate::character::{CharacterClass, CharacterSnapshot};
use crate::config::RewardConfig;
use crate::constants::{
    DAILY_GOAL_EQUIPMENT_TICKETS, DAILY_GOAL_SKILL_POINTS, DAILY_GOAL_XP_THRESHOLD,
    LOGIN_BONUS_BASE_XP, LOGIN_BONUS_XP_CAP, LOGIN_BONUS_XP_STEP,
    STREAK_EQUIPMENT_TICKET_INTERVAL, STREAK_PARTNER_TICKET_INTERVAL, WELCOME_EQUIPMENT_TICKETS,
    WELCOME_PARTNER_TICKETS,
};
use crate::engagement::EngagementRecord;
use crate::inventory::{InventoryState, ItemId, SkillId};
use crate::partners::{PartnerCollection, PartnerTemplateId, Rarity};
use crate::progression::ProgressionLedger;
use crate::wallet::{Currency, ResourceWallet};
use chrono::{NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Catalog identifier for a lesson.
pub type LessonId = String;

/// Summary of a granted login bonus, for the host to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginBonus {
    pub bonus_xp: u64,
    pub streak: u32,
    pub equipment_tickets_granted: u32,
    pub partner_tickets_granted: u32,
}

/// Rewards granted by a daily goal claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalReward {
    pub skill_points: u32,
    pub equipment_tickets: u32,
}

/// Login bonus XP: 10 on day 1, +5 per consecutive day, capped at 50.
pub fn login_bonus_xp(streak: u32) -> u64 {
    (LOGIN_BONUS_BASE_XP + (streak as u64 - 1) * LOGIN_BONUS_XP_STEP).min(LOGIN_BONUS_XP_CAP)
}

/// Full serializable state for one player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub ledger: ProgressionLedger,
    pub wallet: ResourceWallet,
    pub engagement: EngagementRecord,
    pub badges: BadgeSet,
    pub inventory: InventoryState,
    pub partners: PartnerCollection,
    save_slots: HashMap<CharacterClass, CharacterSnapshot>,
    selected_class: Option<CharacterClass>,
    unlocked_classes: HashSet<CharacterClass>,
    welcome_bonus_granted: bool,
    completed_lessons: HashSet<LessonId>,
}

impl PlayerProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_class(&self) -> Option<CharacterClass> {
        self.selected_class
    }

    pub fn unlocked_classes(&self) -> &HashSet<CharacterClass> {
        &self.unlocked_classes
    }

    pub fn lessons_completed(&self) -> u32 {
        self.completed_lessons.len() as u32
    }

    pub fn is_lesson_completed(&self, lesson: &str) -> bool {
        self.completed_lessons.contains(lesson)
    }

    // =========================================================================
    // Progression
    // =========================================================================

    /// Adds earned experience and logs it against `today`'s learning entry.
    /// Does not re-evaluate badges; flows that can change badge eligibility
    /// call [`evaluate_badges`](Self::evaluate_badges) afterwards.
    pub fn add_experience(&mut self, amount: u64, today: NaiveDate) {
        self.ledger.add_experience(amount);
        self.engagement.log_learning(today, amount);
    }

    /// Snapshots the live character into its save slot, then loads the
    /// target class's slot (or a fresh default). The first selection ever
    /// also grants the one-time welcome ticket bonus.
    pub fn select_character(&mut self, class: CharacterClass) {
        if let Some(current) = self.selected_class {
            let snapshot = self.snapshot_live();
            self.save_slots.insert(current, snapshot);
        }

        let snapshot = self.save_slots.get(&class).cloned().unwrap_or_default();
        self.load_snapshot(snapshot);
        self.unlocked_classes.insert(class);
        self.selected_class = Some(class);

        if !self.welcome_bonus_granted {
            self.welcome_bonus_granted = true;
            self.wallet
                .add(Currency::EquipmentTickets, WELCOME_EQUIPMENT_TICKETS);
            self.wallet
                .add(Currency::PartnerTickets, WELCOME_PARTNER_TICKETS);
        }
    }

    pub fn saved_snapshot(&self, class: CharacterClass) -> Option<&CharacterSnapshot> {
        self.save_slots.get(&class)
    }

    fn snapshot_live(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            experience: self.ledger.experience(),
            level: self.ledger.level(),
            equipment: self.inventory.equipment.clone(),
            unlocked_skills: self.inventory.unlocked_skills.clone(),
            equipped_skills: self.inventory.equipped_skills.clone(),
        }
    }

    fn load_snapshot(&mut self, snapshot: CharacterSnapshot) {
        self.ledger.restore(snapshot.experience);
        self.inventory.equipment = snapshot.equipment;
        self.inventory.unlocked_skills = snapshot.unlocked_skills;
        self.inventory.equipped_skills = snapshot.equipped_skills;
    }

    /// Debug/demo level override; re-evaluates badges since level is a
    /// badge input.
    #[cfg(any(test, feature = "debug-tools"))]
    pub fn force_level_change(
        &mut self,
        shift: crate::progression::LevelShift,
        config: &RewardConfig,
    ) -> Vec<BadgeId> {
        self.ledger.force_level_change(shift);
        self.evaluate_badges(config)
    }

    // =========================================================================
    // Engagement flows
    // =========================================================================

    /// Grants the daily login bonus, at most once per calendar day.
    ///
    /// Returns `None` if today's bonus was already granted. Otherwise
    /// updates the streak, grants the streak-scaled XP, issues milestone
    /// tickets (every 3rd day: 1 equipment ticket; every 7th day: 1 partner
    /// ticket; both on days that are multiples of both), re-evaluates
    /// badges, and returns the grant summary.
    pub fn check_and_grant_login_bonus(
        &mut self,
        today: NaiveDate,
        config: &RewardConfig,
    ) -> Option<LoginBonus> {
        if !self.engagement.can_grant_login_bonus(today) {
            return None;
        }
        let streak = self.engagement.record_login(today);
        let bonus_xp = login_bonus_xp(streak);
        self.add_experience(bonus_xp, today);

        let mut equipment_tickets_granted = 0;
        let mut partner_tickets_granted = 0;
        if streak % STREAK_EQUIPMENT_TICKET_INTERVAL == 0 {
            self.wallet.add(Currency::EquipmentTickets, 1);
            equipment_tickets_granted = 1;
        }
        if streak % STREAK_PARTNER_TICKET_INTERVAL == 0 {
            self.wallet.add(Currency::PartnerTickets, 1);
            partner_tickets_granted = 1;
        }

        self.evaluate_badges(config);

        Some(LoginBonus {
            bonus_xp,
            streak,
            equipment_tickets_granted,
            partner_tickets_granted,
        })
    }

    /// Grants the daily quiz reward (XP plus equipment tickets), at most
    /// once per calendar day. Returns whether the grant occurred.
    pub fn mark_daily_quiz_complete(
        &mut self,
        today: NaiveDate,
        xp_gain: u64,
        ticket_gain: u32,
        config: &RewardConfig,
    ) -> bool {
        if !self.engagement.try_mark_quiz_complete(today) {
            return false;
        }
        self.add_experience(xp_gain, today);
        self.wallet.add(Currency::EquipmentTickets, ticket_gain);
        self.evaluate_badges(config);
        true
    }

    /// Pure availability query for the daily goal claim: true iff the goal
    /// reward is unclaimed today and today's logged XP meets the threshold.
    pub fn is_goal_reward_available(&self, today: NaiveDate) -> bool {
        !self.engagement.is_goal_claimed(today)
            && self.engagement.experience_on(today) >= DAILY_GOAL_XP_THRESHOLD
    }

    /// Claims today's goal reward. Re-validates availability before
    /// committing; returns `None` if already claimed or below the threshold.
    pub fn claim_daily_goal_reward(&mut self, today: NaiveDate) -> Option<GoalReward> {
        if !self.is_goal_reward_available(today) {
            return None;
        }
        self.engagement.mark_goal_claimed(today);
        self.wallet
            .add(Currency::SkillPoints, DAILY_GOAL_SKILL_POINTS);
        self.wallet
            .add(Currency::EquipmentTickets, DAILY_GOAL_EQUIPMENT_TICKETS);
        Some(GoalReward {
            skill_points: DAILY_GOAL_SKILL_POINTS,
            equipment_tickets: DAILY_GOAL_EQUIPMENT_TICKETS,
        })
    }

    /// Records a lesson completion (idempotent per lesson), grants its XP on
    /// first completion, and re-evaluates badges. Returns whether this was
    /// the first completion.
    pub fn complete_lesson(
        &mut self,
        lesson: LessonId,
        xp_gain: u64,
        today: NaiveDate,
        config: &RewardConfig,
    ) -> bool {
        if !self.completed_lessons.insert(lesson) {
            return false;
        }
        self.add_experience(xp_gain, today);
        self.evaluate_badges(config);
        true
    }

    // =========================================================================
    // Badges
    // =========================================================================

    /// Runs the badge table against the current state and applies one-time
    /// side rewards for badges unlocked by this call. Returns newly
    /// unlocked ids only.
    pub fn evaluate_badges(&mut self, config: &RewardConfig) -> Vec<BadgeId> {
        let inputs = BadgeInputs {
            login_streak: self.engagement.login_streak(),
            level: self.ledger.level(),
            lessons_completed: self.lessons_completed(),
        };
        let newly_unlocked =
            self.badges
                .evaluate(&inputs, &config.badges, Utc::now().timestamp());
        for id in &newly_unlocked {
            if let Some(def) = config.badge_def(*id) {
                if def.partner_ticket_reward > 0 {
                    self.wallet
                        .add(Currency::PartnerTickets, def.partner_ticket_reward);
                }
            }
        }
        newly_unlocked
    }

    // =========================================================================
    // Wallet-coupled operations
    // =========================================================================

    /// Spends skill points to unlock a skill. Returns false (nothing
    /// charged) if the skill is already unlocked or the balance is short.
    pub fn unlock_skill(&mut self, skill: SkillId, cost: u32) -> bool {
        if self.inventory.is_skill_unlocked(&skill) {
            return false;
        }
        if !self.wallet.consume(Currency::SkillPoints, cost) {
            return false;
        }
        self.inventory.unlock_skill(skill)
    }

    /// Spends one equipment ticket to draw uniformly from the catalog pool.
    /// The drawn item joins the owned multiset (duplicates allowed). Returns
    /// `None` (no ticket spent) on an empty pool or insufficient tickets.
    pub fn draw_equipment<R: Rng>(&mut self, pool: &[ItemId], rng: &mut R) -> Option<ItemId> {
        let item = pool.choose(rng)?.clone();
        if !self.wallet.consume(Currency::EquipmentTickets, 1) {
            return None;
        }
        self.inventory.add_item(item.clone());
        Some(item)
    }

    // =========================================================================
    // Partners
    // =========================================================================

    /// Acquires a new partner instance, stamped with the current time.
    pub fn add_partner(&mut self, template_id: PartnerTemplateId) -> Uuid {
        self.partners.add(template_id, Utc::now().timestamp())
    }

    pub fn merge_partners(
        &mut self,
        base_id: Uuid,
        material_ids: &[Uuid],
        added_level: u32,
        added_limit_break: u32,
    ) {
        self.partners
            .merge(base_id, material_ids, added_level, added_limit_break);
    }

    pub fn evolve_partner(
        &mut self,
        base_id: Uuid,
        material_ids: &[Uuid],
        new_template_id: PartnerTemplateId,
    ) -> Option<Uuid> {
        self.partners
            .evolve(base_id, material_ids, new_template_id, Utc::now().timestamp())
    }

    /// Converts partner instances into fragments priced by rarity, applying
    /// the fragment-to-ticket overflow. Unknown instance ids are skipped.
    /// Returns the number of fragments credited.
    pub fn convert_partners_to_fragments(
        &mut self,
        materials: &[(Uuid, Rarity)],
        config: &RewardConfig,
    ) -> u32 {
        let mut total_fragments = 0;
        for (id, rarity) in materials {
            if self.partners.get(*id).is_none() {
                continue;
            }
            self.partners.remove_all([*id]);
            total_fragments += config.fragment_value(*rarity);
        }
        if total_fragments > 0 {
            self.wallet.add(Currency::PartnerFragments, total_fragments);
        }
        total_fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::LevelShift;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_login_bonus_xp_curve() {
        assert_eq!(login_bonus_xp(1), 10);
        assert_eq!(login_bonus_xp(2), 15);
        assert_eq!(login_bonus_xp(9), 50);
        // Capped
        assert_eq!(login_bonus_xp(10), 50);
        assert_eq!(login_bonus_xp(100), 50);
    }

    #[test]
    fn test_add_experience_feeds_learning_log() {
        let mut profile = PlayerProfile::new();
        profile.add_experience(30, day(1));
        profile.add_experience(25, day(1));
        assert_eq!(profile.ledger.experience(), 55);
        assert_eq!(profile.engagement.experience_on(day(1)), 55);
    }

    #[test]
    fn test_welcome_bonus_only_on_first_selection() {
        let mut profile = PlayerProfile::new();
        profile.select_character(CharacterClass::Warrior);
        assert_eq!(profile.wallet.balance(Currency::EquipmentTickets), 20);
        assert_eq!(profile.wallet.balance(Currency::PartnerTickets), 20);

        profile.select_character(CharacterClass::Mage);
        profile.select_character(CharacterClass::Warrior);
        assert_eq!(profile.wallet.balance(Currency::EquipmentTickets), 20);
        assert_eq!(profile.wallet.balance(Currency::PartnerTickets), 20);
    }

    #[test]
    fn test_select_character_unlocks_class() {
        let mut profile = PlayerProfile::new();
        assert!(profile.unlocked_classes().is_empty());
        profile.select_character(CharacterClass::Mage);
        assert!(profile.unlocked_classes().contains(&CharacterClass::Mage));
        assert_eq!(profile.selected_class(), Some(CharacterClass::Mage));
    }

    #[test]
    fn test_character_switch_round_trip() {
        let mut profile = PlayerProfile::new();
        profile.select_character(CharacterClass::Warrior);
        profile.add_experience(150, day(1));
        assert_eq!(profile.ledger.level(), 2);

        profile.select_character(CharacterClass::Mage);
        assert_eq!(profile.ledger.experience(), 0);
        assert_eq!(profile.ledger.level(), 1);

        profile.select_character(CharacterClass::Warrior);
        assert_eq!(profile.ledger.experience(), 150);
        assert_eq!(profile.ledger.level(), 2);
    }

    #[test]
    fn test_character_switch_swaps_skills_and_equipment() {
        let mut profile = PlayerProfile::new();
        profile.select_character(CharacterClass::Warrior);
        profile.inventory.add_item("iron_sword".to_string());
        profile
            .inventory
            .equip(crate::inventory::EquipmentSlot::Weapon, "iron_sword".to_string());
        profile.inventory.unlock_skill("cleave".to_string());
        profile.inventory.equip_skill("cleave");

        profile.select_character(CharacterClass::Mage);
        assert!(profile.inventory.equipment.weapon.is_none());
        assert!(!profile.inventory.is_skill_unlocked("cleave"));
        // Owned items are profile-wide, not per character.
        assert_eq!(profile.inventory.owned_count("iron_sword"), 1);

        profile.select_character(CharacterClass::Warrior);
        assert_eq!(
            profile.inventory.equipment.weapon.as_deref(),
            Some("iron_sword")
        );
        assert_eq!(profile.inventory.equipped_skills(), ["cleave".to_string()]);
    }

    #[test]
    fn test_daily_quiz_grant_once_per_day() {
        use crate::constants::DAILY_QUIZ_DEFAULT_TICKETS;
        let config = RewardConfig::default();
        let mut profile = PlayerProfile::new();
        assert!(profile.mark_daily_quiz_complete(day(1), 20, DAILY_QUIZ_DEFAULT_TICKETS, &config));
        assert!(!profile.mark_daily_quiz_complete(day(1), 20, DAILY_QUIZ_DEFAULT_TICKETS, &config));
        assert_eq!(profile.ledger.experience(), 20);
        assert_eq!(profile.wallet.balance(Currency::EquipmentTickets), 1);

        assert!(profile.mark_daily_quiz_complete(day(2), 20, 1, &config));
        assert_eq!(profile.ledger.experience(), 40);
    }

    #[test]
    fn test_goal_reward_requires_threshold() {
        let mut profile = PlayerProfile::new();
        profile.add_experience(49, day(1));
        assert!(!profile.is_goal_reward_available(day(1)));
        assert!(profile.claim_daily_goal_reward(day(1)).is_none());

        profile.add_experience(1, day(1));
        assert!(profile.is_goal_reward_available(day(1)));
        let reward = profile.claim_daily_goal_reward(day(1)).unwrap();
        assert_eq!(reward.skill_points, 5);
        assert_eq!(reward.equipment_tickets, 1);
        assert_eq!(profile.wallet.balance(Currency::SkillPoints), 5);
    }

    #[test]
    fn test_goal_reward_claimed_once_per_day() {
        let mut profile = PlayerProfile::new();
        profile.add_experience(100, day(1));
        assert!(profile.claim_daily_goal_reward(day(1)).is_some());
        assert!(!profile.is_goal_reward_available(day(1)));
        assert!(profile.claim_daily_goal_reward(day(1)).is_none());
        assert_eq!(profile.wallet.balance(Currency::SkillPoints), 5);

        // Next day needs fresh XP.
        assert!(profile.claim_daily_goal_reward(day(2)).is_none());
        profile.add_experience(60, day(2));
        assert!(profile.claim_daily_goal_reward(day(2)).is_some());
    }

    #[test]
    fn test_availability_query_has_no_side_effects() {
        let mut profile = PlayerProfile::new();
        profile.add_experience(80, day(1));
        let before = profile.clone();
        assert!(profile.is_goal_reward_available(day(1)));
        assert_eq!(profile, before);
    }

    #[test]
    fn test_complete_lesson_idempotent() {
        let config = RewardConfig::default();
        let mut profile = PlayerProfile::new();
        assert!(profile.complete_lesson("intro".to_string(), 30, day(1), &config));
        assert!(!profile.complete_lesson("intro".to_string(), 30, day(1), &config));
        assert_eq!(profile.ledger.experience(), 30);
        assert_eq!(profile.lessons_completed(), 1);
        assert!(profile.badges.is_earned(BadgeId::FirstLesson));
    }

    #[test]
    fn test_unlock_skill_charges_points() {
        let mut profile = PlayerProfile::new();
        profile.wallet.add(Currency::SkillPoints, 4);
        assert!(!profile.unlock_skill("fireball".to_string(), 5));
        assert_eq!(profile.wallet.balance(Currency::SkillPoints), 4);

        profile.wallet.add(Currency::SkillPoints, 1);
        assert!(profile.unlock_skill("fireball".to_string(), 5));
        assert_eq!(profile.wallet.balance(Currency::SkillPoints), 0);
        assert!(profile.inventory.is_skill_unlocked("fireball"));

        // Re-unlocking charges nothing.
        profile.wallet.add(Currency::SkillPoints, 5);
        assert!(!profile.unlock_skill("fireball".to_string(), 5));
        assert_eq!(profile.wallet.balance(Currency::SkillPoints), 5);
    }

    #[test]
    fn test_draw_equipment_consumes_ticket() {
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
        let mut profile = PlayerProfile::new();
        let pool: Vec<ItemId> = vec!["sword".to_string(), "staff".to_string()];

        // No tickets yet.
        assert!(profile.draw_equipment(&pool, &mut rng).is_none());
        assert!(profile.inventory.owned_items().is_empty());

        profile.wallet.add(Currency::EquipmentTickets, 1);
        let drawn = profile.draw_equipment(&pool, &mut rng).unwrap();
        assert!(pool.contains(&drawn));
        assert_eq!(profile.wallet.balance(Currency::EquipmentTickets), 0);
        assert_eq!(profile.inventory.owned_count(&drawn), 1);
    }

    #[test]
    fn test_draw_equipment_empty_pool_spends_nothing() {
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
        let mut profile = PlayerProfile::new();
        profile.wallet.add(Currency::EquipmentTickets, 1);
        assert!(profile.draw_equipment(&[], &mut rng).is_none());
        assert_eq!(profile.wallet.balance(Currency::EquipmentTickets), 1);
    }

    #[test]
    fn test_convert_partners_to_fragments() {
        let config = RewardConfig::default();
        let mut profile = PlayerProfile::new();
        let a = profile.add_partner("slime".to_string());
        let b = profile.add_partner("drake".to_string());
        profile.partners.select(a);

        // common=1 + superRare=5 -> 6 fragments -> 1 ticket + 1 fragment
        let credited = profile.convert_partners_to_fragments(
            &[(a, Rarity::Common), (b, Rarity::SuperRare)],
            &config,
        );
        assert_eq!(credited, 6);
        assert_eq!(profile.wallet.balance(Currency::PartnerTickets), 1);
        assert_eq!(profile.wallet.balance(Currency::PartnerFragments), 1);
        assert!(profile.partners.is_empty());
        assert_eq!(profile.partners.selected(), None);
    }

    #[test]
    fn test_convert_skips_unknown_instances() {
        let config = RewardConfig::default();
        let mut profile = PlayerProfile::new();
        let credited =
            profile.convert_partners_to_fragments(&[(Uuid::new_v4(), Rarity::UltraRare)], &config);
        assert_eq!(credited, 0);
        assert_eq!(profile.wallet.balance(Currency::PartnerFragments), 0);
    }

    #[test]
    fn test_force_level_change_reevaluates_badges() {
        let config = RewardConfig::default();
        let mut profile = PlayerProfile::new();
        let newly = profile.force_level_change(LevelShift::Up, &config);
        assert_eq!(profile.ledger.level(), 2);
        assert!(newly.contains(&BadgeId::Level2));
    }
}
