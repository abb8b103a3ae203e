//! Experience accrual and leveling

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::army::Army;
use crate::core::types::CommanderKey;
use crate::progression::achievements::{check_achievements, AchievementId};
use crate::progression::commander::Commander;

/// Stat points granted per level gained
pub const STAT_POINTS_PER_LEVEL: u32 = 3;

/// Experience required to advance past `level`: floor(100 * 1.7^(level-1))
pub fn experience_needed(level: u32) -> u64 {
    let exponent = level.saturating_sub(1) as i32;
    (100.0 * 1.7_f64.powi(exponent)).floor() as u64
}

/// What an experience award was for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XpSource {
    DuelVictory,
    DuelDefeat,
    WarVictory,
    WarParticipation,
}

impl fmt::Display for XpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            XpSource::DuelVictory => "duel_victory",
            XpSource::DuelDefeat => "duel_defeat",
            XpSource::WarVictory => "war_victory",
            XpSource::WarParticipation => "war_participation",
        };
        write!(f, "{label}")
    }
}

/// Append-only experience history row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpRecord {
    pub commander: CommanderKey,
    pub amount: u64,
    pub source: XpSource,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceGain {
    pub levels_gained: u32,
    pub record: XpRecord,
    /// Achievements unlocked by the resulting level-ups
    pub achievements: Vec<AchievementId>,
}

impl ExperienceGain {
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

/// Credit experience, rolling over as many levels as it pays for
///
/// The caller persists `record` to the XP history in the same transaction.
pub fn add_experience(
    commander: &mut Commander,
    army: &Army,
    amount: u64,
    source: XpSource,
    now: DateTime<Utc>,
) -> ExperienceGain {
    commander.experience += amount;

    let mut levels_gained = 0;
    let mut achievements = Vec::new();

    while commander.experience >= commander.experience_needed {
        commander.experience -= commander.experience_needed;
        commander.level += 1;
        commander.stat_points += STAT_POINTS_PER_LEVEL;
        commander.experience_needed = experience_needed(commander.level);
        levels_gained += 1;

        achievements.extend(check_achievements(commander, army));
    }

    if levels_gained > 0 {
        tracing::info!(
            commander = %commander.key,
            level = commander.level,
            levels_gained,
            "Commander leveled up"
        );
    }

    ExperienceGain {
        levels_gained,
        record: XpRecord {
            commander: commander.key,
            amount,
            source,
            at: now,
        },
        achievements,
    }
}
