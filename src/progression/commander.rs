//! Commander - a player's persistent character within a guild

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::config::GameConfig;
use crate::core::types::CommanderKey;
use crate::progression::achievements::AchievementId;
use crate::progression::experience::experience_needed;

/// Starting value of every base stat
pub const BASE_STAT: u32 = 5;

/// The six base stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Strength,
    Agility,
    Intelligence,
    Vitality,
    Charisma,
    Luck,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Strength,
        Stat::Agility,
        Stat::Intelligence,
        Stat::Vitality,
        Stat::Charisma,
        Stat::Luck,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stat::Strength => "strength",
            Stat::Agility => "agility",
            Stat::Intelligence => "intelligence",
            Stat::Vitality => "vitality",
            Stat::Charisma => "charisma",
            Stat::Luck => "luck",
        }
    }

    /// Accepts full names and the usual three-letter abbreviations
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "strength" | "str" => Some(Stat::Strength),
            "agility" | "agi" => Some(Stat::Agility),
            "intelligence" | "int" => Some(Stat::Intelligence),
            "vitality" | "vit" => Some(Stat::Vitality),
            "charisma" | "cha" => Some(Stat::Charisma),
            "luck" | "lck" => Some(Stat::Luck),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub strength: u32,
    pub agility: u32,
    pub intelligence: u32,
    pub vitality: u32,
    pub charisma: u32,
    pub luck: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            strength: BASE_STAT,
            agility: BASE_STAT,
            intelligence: BASE_STAT,
            vitality: BASE_STAT,
            charisma: BASE_STAT,
            luck: BASE_STAT,
        }
    }
}

impl Stats {
    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Agility => self.agility,
            Stat::Intelligence => self.intelligence,
            Stat::Vitality => self.vitality,
            Stat::Charisma => self.charisma,
            Stat::Luck => self.luck,
        }
    }

    pub fn get_mut(&mut self, stat: Stat) -> &mut u32 {
        match stat {
            Stat::Strength => &mut self.strength,
            Stat::Agility => &mut self.agility,
            Stat::Intelligence => &mut self.intelligence,
            Stat::Vitality => &mut self.vitality,
            Stat::Charisma => &mut self.charisma,
            Stat::Luck => &mut self.luck,
        }
    }
}

/// Identity fields chosen at registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub character_name: String,
    pub army_name: String,
    pub title: Option<String>,
    pub faction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commander {
    pub key: CommanderKey,
    pub name: String,
    pub army_name: String,
    pub title: String,
    pub faction: String,

    pub level: u32,
    pub experience: u64,
    pub experience_needed: u64,
    pub stats: Stats,
    /// Unspent stat points
    pub stat_points: u32,

    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub kills: u32,
    pub deaths: u32,
    pub war_wins: u32,
    /// Consecutive duel wins, reset by a loss
    pub win_streak: u32,
    pub total_damage: u64,
    /// Lifetime recruits gained
    pub total_recruited: u64,

    pub prestige: u32,
    pub achievements: BTreeSet<AchievementId>,

    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub last_duel: Option<DateTime<Utc>>,
}

impl Commander {
    pub fn new(key: CommanderKey, registration: Registration, config: &GameConfig, now: DateTime<Utc>) -> Self {
        Self {
            key,
            name: registration.character_name,
            army_name: registration.army_name,
            title: registration.title.unwrap_or_else(|| "Commander".to_string()),
            faction: registration.faction.unwrap_or_else(|| "Independent".to_string()),
            level: 1,
            experience: 0,
            experience_needed: experience_needed(1),
            stats: Stats::default(),
            stat_points: config.starting_stat_points,
            wins: 0,
            losses: 0,
            draws: 0,
            kills: 0,
            deaths: 0,
            war_wins: 0,
            win_streak: 0,
            total_damage: 0,
            total_recruited: 0,
            prestige: 0,
            achievements: BTreeSet::new(),
            created_at: now,
            last_active: now,
            last_duel: None,
        }
    }

    /// "Title Name", as shown in narratives
    pub fn display_name(&self) -> String {
        format!("{} {}", self.title, self.name)
    }

    /// Duel win bookkeeping
    pub fn record_win(&mut self) {
        self.wins += 1;
        self.kills += 1;
        self.win_streak += 1;
    }

    /// Duel loss bookkeeping
    pub fn record_loss(&mut self) {
        self.losses += 1;
        self.deaths += 1;
        self.win_streak = 0;
    }

    pub fn record_draw(&mut self) {
        self.draws += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> Registration {
        Registration {
            character_name: "Aldric".into(),
            army_name: "Iron Vanguard".into(),
            title: None,
            faction: None,
        }
    }

    #[test]
    fn test_new_commander_defaults() {
        let c = Commander::new(CommanderKey::new(1, 1), registration(), &GameConfig::default(), Utc::now());
        assert_eq!(c.level, 1);
        assert_eq!(c.experience_needed, 100);
        assert_eq!(c.stats, Stats::default());
        assert_eq!(c.stat_points, 5);
        assert_eq!(c.title, "Commander");
        assert_eq!(c.faction, "Independent");
        assert_eq!(c.display_name(), "Commander Aldric");
    }

    #[test]
    fn test_stat_parse() {
        assert_eq!(Stat::parse("STR"), Some(Stat::Strength));
        assert_eq!(Stat::parse("luck"), Some(Stat::Luck));
        assert_eq!(Stat::parse("wisdom"), None);
        for stat in Stat::ALL {
            assert_eq!(Stat::parse(stat.name()), Some(stat));
        }
    }

    #[test]
    fn test_loss_resets_streak() {
        let mut c = Commander::new(CommanderKey::new(1, 1), registration(), &GameConfig::default(), Utc::now());
        c.record_win();
        c.record_win();
        assert_eq!(c.win_streak, 2);
        c.record_loss();
        assert_eq!(c.win_streak, 0);
        assert_eq!(c.wins, 2);
        assert_eq!(c.deaths, 1);
    }
}
