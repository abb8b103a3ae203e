//! Commander progression: experience, levels, stats, achievements

pub mod achievements;
pub mod commander;
pub mod experience;
pub mod stats;

pub use achievements::{catalog, check_achievements, Achievement, AchievementId, Category, Metric, Requirement};
pub use commander::{Commander, Registration, Stat, Stats};
pub use experience::{add_experience, experience_needed, ExperienceGain, XpRecord, XpSource};
pub use stats::allocate_stat;
