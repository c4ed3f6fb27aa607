// XP and leveling
pub const XP_PER_LEVEL: u64 = 100;
pub const MAX_LEVEL: u32 = 10;
pub const EVOLUTION_LEVELS: [u32; 2] = [5, 10];

// Login bonus: 10 XP on day 1, +5 per consecutive day, capped at 50
pub const LOGIN_BONUS_BASE_XP: u64 = 10;
pub const LOGIN_BONUS_XP_STEP: u64 = 5;
pub const LOGIN_BONUS_XP_CAP: u64 = 50;

// Streak milestone tickets
pub const STREAK_EQUIPMENT_TICKET_INTERVAL: u32 = 3;
pub const STREAK_PARTNER_TICKET_INTERVAL: u32 = 7;

// Fragment economy
pub const FRAGMENTS_PER_TICKET: u32 = 5;

// One-time onboarding bonus on the first character selection
pub const WELCOME_EQUIPMENT_TICKETS: u32 = 20;
pub const WELCOME_PARTNER_TICKETS: u32 = 20;

// Daily goal claim
pub const DAILY_GOAL_XP_THRESHOLD: u64 = 50;
pub const DAILY_GOAL_SKILL_POINTS: u32 = 5;
pub const DAILY_GOAL_EQUIPMENT_TICKETS: u32 = 1;

// Daily quiz
pub const DAILY_QUIZ_DEFAULT_TICKETS: u32 = 1;

// Daily learning log retention (rolling window, in days)
pub const LEARNING_LOG_RETENTION_DAYS: i64 = 90;

// Skills
pub const MAX_EQUIPPED_SKILLS: usize = 3;

// Partners
pub const MAX_LIMIT_BREAK: u32 = 5;
pub const PARTNER_XP_PER_LEVEL: u64 = 100;
pub const PARTNER_BASE_MAX_LEVEL: u32 = 10;
pub const PARTNER_LEVELS_PER_LIMIT_BREAK: u32 = 10;

// Default lesson catalog size (overridable via RewardConfig)
pub const DEFAULT_LESSON_CATALOG_SIZE: u32 = 30;

// Save file version magic
pub const SAVE_VERSION_MAGIC: u64 = 0x514C_5F53_4156_4501;
