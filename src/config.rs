//! Reward configuration: badge thresholds, badge side rewards, and
//! rarity-to-fragment values.
//!
//! Loaded once at startup (defaults or JSON) and validated for completeness
//! so the evaluator and fragment conversion stay pure table lookups.

use crate::badges::{BadgeDef, BadgeId, BadgeMetric};
use crate::constants::DEFAULT_LESSON_CATALOG_SIZE;
use crate::partners::Rarity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid reward config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("badge {0:?} is missing from the badge table")]
    MissingBadge(BadgeId),
    #[error("badge {0:?} appears more than once in the badge table")]
    DuplicateBadge(BadgeId),
    #[error("badge {0:?} has a zero threshold")]
    ZeroThreshold(BadgeId),
    #[error("no fragment value configured for rarity {0:?}")]
    MissingFragmentValue(Rarity),
    #[error("lesson catalog size must be non-zero")]
    EmptyLessonCatalog,
}

/// Read-only reward tables consumed by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardConfig {
    pub badges: Vec<BadgeDef>,
    pub fragment_values: HashMap<Rarity, u32>,
    pub total_lessons: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        let total_lessons = DEFAULT_LESSON_CATALOG_SIZE;
        let badges = vec![
            BadgeDef {
                id: BadgeId::FirstLogin,
                metric: BadgeMetric::LoginStreak,
                threshold: 1,
                partner_ticket_reward: 0,
            },
            BadgeDef {
                id: BadgeId::Streak3,
                metric: BadgeMetric::LoginStreak,
                threshold: 3,
                partner_ticket_reward: 0,
            },
            BadgeDef {
                id: BadgeId::Streak7,
                metric: BadgeMetric::LoginStreak,
                threshold: 7,
                partner_ticket_reward: 1,
            },
            BadgeDef {
                id: BadgeId::Level2,
                metric: BadgeMetric::Level,
                threshold: 2,
                partner_ticket_reward: 0,
            },
            BadgeDef {
                id: BadgeId::Level3,
                metric: BadgeMetric::Level,
                threshold: 3,
                partner_ticket_reward: 0,
            },
            BadgeDef {
                id: BadgeId::FirstLesson,
                metric: BadgeMetric::LessonsCompleted,
                threshold: 1,
                partner_ticket_reward: 0,
            },
            BadgeDef {
                id: BadgeId::Lessons5,
                metric: BadgeMetric::LessonsCompleted,
                threshold: 5,
                partner_ticket_reward: 0,
            },
            BadgeDef {
                id: BadgeId::AllLessons,
                metric: BadgeMetric::LessonsCompleted,
                threshold: total_lessons,
                partner_ticket_reward: 2,
            },
        ];
        let fragment_values = HashMap::from([
            (Rarity::Common, 1),
            (Rarity::Rare, 2),
            (Rarity::SuperRare, 5),
            (Rarity::UltraRare, 10),
        ]);
        Self {
            badges,
            fragment_values,
            total_lessons,
        }
    }
}

impl RewardConfig {
    /// Parses and validates a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RewardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the tables for completeness: every badge id exactly once with
    /// a non-zero threshold, a fragment value for every rarity, and a
    /// non-empty lesson catalog.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for id in BadgeId::ALL {
            let count = self.badges.iter().filter(|d| d.id == id).count();
            if count == 0 {
                return Err(ConfigError::MissingBadge(id));
            }
            if count > 1 {
                return Err(ConfigError::DuplicateBadge(id));
            }
        }
        for def in &self.badges {
            if def.threshold == 0 {
                return Err(ConfigError::ZeroThreshold(def.id));
            }
        }
        for rarity in Rarity::ALL {
            if !self.fragment_values.contains_key(&rarity) {
                return Err(ConfigError::MissingFragmentValue(rarity));
            }
        }
        if self.total_lessons == 0 {
            return Err(ConfigError::EmptyLessonCatalog);
        }
        Ok(())
    }

    /// Fragment value for a rarity. Validation guarantees the entry exists.
    pub fn fragment_value(&self, rarity: Rarity) -> u32 {
        self.fragment_values.get(&rarity).copied().unwrap_or(0)
    }

    pub fn badge_def(&self, id: BadgeId) -> Option<&BadgeDef> {
        self.badges.iter().find(|d| d.id == id)
    }
}
