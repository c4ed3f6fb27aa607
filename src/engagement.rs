//! Engagement tracking: login streaks and the three daily grants.
//!
//! All date logic works on calendar days (`NaiveDate`, no time-of-day).
//! Each of the three daily grants (login bonus, quiz completion, goal claim)
//! fires at most once per calendar day; the guards live here, not in the UI.

use crate::constants::LEARNING_LOG_RETENTION_DAYS;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the daily learning log. Same-day XP accumulates into a single
/// entry per date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLearningEntry {
    pub date: NaiveDate,
    pub experience: u64,
}

/// Login/daily-activity record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementRecord {
    last_login_date: Option<NaiveDate>,
    login_streak: u32,
    daily_learning_log: Vec<DailyLearningEntry>,
    last_daily_quiz_date: Option<NaiveDate>,
    last_goal_claim_date: Option<NaiveDate>,
}

impl EngagementRecord {
    pub fn login_streak(&self) -> u32 {
        self.login_streak
    }

    pub fn last_login_date(&self) -> Option<NaiveDate> {
        self.last_login_date
    }

    pub fn learning_log(&self) -> &[DailyLearningEntry] {
        &self.daily_learning_log
    }

    /// XP logged on a specific date.
    pub fn experience_on(&self, date: NaiveDate) -> u64 {
        self.daily_learning_log
            .iter()
            .find(|e| e.date == date)
            .map_or(0, |e| e.experience)
    }

    /// Accumulates earned XP into the log entry for `date`, then drops
    /// entries older than the retention window.
    pub fn log_learning(&mut self, date: NaiveDate, experience: u64) {
        if let Some(entry) = self.daily_learning_log.iter_mut().find(|e| e.date == date) {
            entry.experience += experience;
        } else {
            self.daily_learning_log
                .push(DailyLearningEntry { date, experience });
        }
        self.daily_learning_log
            .retain(|e| date.signed_duration_since(e.date).num_days() < LEARNING_LOG_RETENTION_DAYS);
    }

    /// True if no login bonus has been granted for `today` yet.
    pub fn can_grant_login_bonus(&self, today: NaiveDate) -> bool {
        self.last_login_date != Some(today)
    }

    /// Records a login for `today` and returns the resulting streak.
    /// A login exactly one day after the last continues the streak; anything
    /// else (first login, or a gap) resets it to 1. Callers must check
    /// [`can_grant_login_bonus`](Self::can_grant_login_bonus) first.
    pub fn record_login(&mut self, today: NaiveDate) -> u32 {
        let consecutive = self
            .last_login_date
            .is_some_and(|last| today.signed_duration_since(last).num_days() == 1);
        self.login_streak = if consecutive { self.login_streak + 1 } else { 1 };
        self.last_login_date = Some(today);
        self.login_streak
    }

    /// Marks the daily quiz complete for `today`. Returns false (no state
    /// change) if it was already completed today.
    pub fn try_mark_quiz_complete(&mut self, today: NaiveDate) -> bool {
        if self.last_daily_quiz_date == Some(today) {
            return false;
        }
        self.last_daily_quiz_date = Some(today);
        true
    }

    pub fn is_goal_claimed(&self, today: NaiveDate) -> bool {
        self.last_goal_claim_date == Some(today)
    }

    pub fn mark_goal_claimed(&mut self, today: NaiveDate) {
        self.last_goal_claim_date = Some(today);
    }
}
