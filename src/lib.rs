//! Questline - Learning-Platform Progression Engine
//!
//! A single-threaded gamification core for a learning platform: experience
//! and levels, a ticket/fragment reward economy, login streaks with daily
//! grants, threshold badges, per-character save slots, and a partner
//! collection. All state hangs off a caller-owned [`profile::PlayerProfile`];
//! persistence is pluggable through [`save_manager::PersistenceAdapter`].

pub mod badges;
pub mod build_info;
pub mod character;
pub mod config;
pub mod constants;
pub mod engagement;
pub mod inventory;
pub mod partners;
pub mod profile;
pub mod progression;
pub mod save_manager;
pub mod wallet;

pub use config::RewardConfig;
pub use profile::PlayerProfile;
