//! Badge evaluation.
//!
//! Badges unlock by crossing thresholds in tracked metrics and are never
//! revoked. The threshold table is configuration ([`crate::config`]), not
//! logic; evaluation is a pure function of (state, table) plus the unlock
//! timestamp. Re-evaluation is the caller's obligation: every mutation that
//! can change an input must invoke the evaluator afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for each badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeId {
    FirstLogin,
    Streak3,
    Streak7,
    Level2,
    Level3,
    FirstLesson,
    Lessons5,
    AllLessons,
}

impl BadgeId {
    /// All badges in display order.
    pub const ALL: [BadgeId; 8] = [
        BadgeId::FirstLogin,
        BadgeId::Streak3,
        BadgeId::Streak7,
        BadgeId::Level2,
        BadgeId::Level3,
        BadgeId::FirstLesson,
        BadgeId::Lessons5,
        BadgeId::AllLessons,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BadgeId::FirstLogin => "First Steps",
            BadgeId::Streak3 => "Three In A Row",
            BadgeId::Streak7 => "Week Warrior",
            BadgeId::Level2 => "Apprentice",
            BadgeId::Level3 => "Journeyman",
            BadgeId::FirstLesson => "First Lesson",
            BadgeId::Lessons5 => "Diligent Student",
            BadgeId::AllLessons => "Completionist",
        }
    }
}

/// The metric a badge threshold is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeMetric {
    LoginStreak,
    Level,
    LessonsCompleted,
}

/// One row of the badge threshold table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeDef {
    pub id: BadgeId,
    pub metric: BadgeMetric,
    pub threshold: u32,
    /// Partner tickets granted once, at the moment of first unlock.
    #[serde(default)]
    pub partner_ticket_reward: u32,
}

/// The metric values evaluation runs against.
#[derive(Debug, Clone, Copy, Default)]
pub struct BadgeInputs {
    pub login_streak: u32,
    pub level: u32,
    pub lessons_completed: u32,
}

/// Record of an unlocked badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnedBadge {
    pub unlocked_at: i64,
}

/// Earned badges, unique per id, permanent once unlocked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeSet {
    earned: HashMap<BadgeId, EarnedBadge>,
}

impl BadgeSet {
    pub fn is_earned(&self, id: BadgeId) -> bool {
        self.earned.contains_key(&id)
    }

    pub fn earned_count(&self) -> usize {
        self.earned.len()
    }

    pub fn unlocked_at(&self, id: BadgeId) -> Option<i64> {
        self.earned.get(&id).map(|e| e.unlocked_at)
    }

    /// Checks every table row against the inputs and unlocks the ones whose
    /// threshold is met. Returns only the newly unlocked ids; already-earned
    /// badges are skipped, so a back-to-back call with unchanged inputs
    /// returns an empty vec.
    pub fn evaluate(&mut self, inputs: &BadgeInputs, table: &[BadgeDef], now: i64) -> Vec<BadgeId> {
        let mut newly_unlocked = Vec::new();
        for def in table {
            if self.is_earned(def.id) {
                continue;
            }
            let value = match def.metric {
                BadgeMetric::LoginStreak => inputs.login_streak,
                BadgeMetric::Level => inputs.level,
                BadgeMetric::LessonsCompleted => inputs.lessons_completed,
            };
            if value >= def.threshold {
                self.earned.insert(def.id, EarnedBadge { unlocked_at: now });
                newly_unlocked.push(def.id);
            }
        }
        newly_unlocked
    }
}
