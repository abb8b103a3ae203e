//! Achievement catalog and evaluation
//!
//! Requirements are typed (metric, threshold) pairs checked as a
//! conjunction against the commander and their army. Awarding is
//! idempotent: an earned achievement is never evaluated again.

use serde::{Deserialize, Serialize};

use crate::army::Army;
use crate::progression::commander::Commander;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AchievementId {
    FirstBlood,
    BattleHardened,
    WarVeteran,
    ArmyBuilder,
    KnightCommander,
    MasterStrategist,
    Undefeated,
    RecruitmentKing,
    FortressBuilder,
    HeroOfTheRealm,
}

/// Quantity a requirement is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Wins,
    Soldiers,
    Knights,
    WarWins,
    WinStreak,
    TotalRecruits,
    Fortifications,
    Level,
}

impl Metric {
    pub fn value(&self, commander: &Commander, army: &Army) -> u64 {
        match self {
            Metric::Wins => commander.wins as u64,
            Metric::Soldiers => army.current_soldiers as u64,
            Metric::Knights => army.knights as u64,
            Metric::WarWins => commander.war_wins as u64,
            Metric::WinStreak => commander.win_streak as u64,
            Metric::TotalRecruits => commander.total_recruited,
            Metric::Fortifications => army.fortifications as u64,
            Metric::Level => commander.level as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub metric: Metric,
    pub threshold: u64,
}

impl Requirement {
    pub const fn new(metric: Metric, threshold: u64) -> Self {
        Self { metric, threshold }
    }

    pub fn is_met(&self, commander: &Commander, army: &Army) -> bool {
        self.metric.value(commander, army) >= self.threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Combat,
    Army,
    War,
    Defense,
    Progression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub requirements: &'static [Requirement],
    /// Prestige credited on award
    pub reward: u32,
    pub category: Category,
}

impl Achievement {
    pub fn is_met(&self, commander: &Commander, army: &Army) -> bool {
        self.requirements.iter().all(|r| r.is_met(commander, army))
    }
}

static CATALOG: [Achievement; 10] = [
    Achievement {
        id: AchievementId::FirstBlood,
        name: "First Blood",
        description: "Win your first duel",
        requirements: &[Requirement::new(Metric::Wins, 1)],
        reward: 100,
        category: Category::Combat,
    },
    Achievement {
        id: AchievementId::BattleHardened,
        name: "Battle-Hardened",
        description: "Win 10 duels",
        requirements: &[Requirement::new(Metric::Wins, 10)],
        reward: 500,
        category: Category::Combat,
    },
    Achievement {
        id: AchievementId::WarVeteran,
        name: "War Veteran",
        description: "Win 50 duels",
        requirements: &[Requirement::new(Metric::Wins, 50)],
        reward: 2000,
        category: Category::Combat,
    },
    Achievement {
        id: AchievementId::ArmyBuilder,
        name: "Army Builder",
        description: "Reach 1000 soldiers",
        requirements: &[Requirement::new(Metric::Soldiers, 1000)],
        reward: 800,
        category: Category::Army,
    },
    Achievement {
        id: AchievementId::KnightCommander,
        name: "Knight Commander",
        description: "Have 50 knights",
        requirements: &[Requirement::new(Metric::Knights, 50)],
        reward: 1500,
        category: Category::Army,
    },
    Achievement {
        id: AchievementId::MasterStrategist,
        name: "Master Strategist",
        description: "Win 5 wars",
        requirements: &[Requirement::new(Metric::WarWins, 5)],
        reward: 3000,
        category: Category::War,
    },
    Achievement {
        id: AchievementId::Undefeated,
        name: "Undefeated",
        description: "Win 10 duels without loss",
        requirements: &[Requirement::new(Metric::WinStreak, 10)],
        reward: 2500,
        category: Category::Combat,
    },
    Achievement {
        id: AchievementId::RecruitmentKing,
        name: "Recruitment King",
        description: "Recruit 5000 total soldiers",
        requirements: &[Requirement::new(Metric::TotalRecruits, 5000)],
        reward: 1200,
        category: Category::Army,
    },
    Achievement {
        id: AchievementId::FortressBuilder,
        name: "Fortress Builder",
        description: "Build 100 fortifications",
        requirements: &[Requirement::new(Metric::Fortifications, 100)],
        reward: 1800,
        category: Category::Defense,
    },
    Achievement {
        id: AchievementId::HeroOfTheRealm,
        name: "Hero of the Realm",
        description: "Reach level 50",
        requirements: &[Requirement::new(Metric::Level, 50)],
        reward: 5000,
        category: Category::Progression,
    },
];

/// The full static catalog
pub fn catalog() -> &'static [Achievement] {
    &CATALOG
}

impl AchievementId {
    pub fn info(&self) -> &'static Achievement {
        // CATALOG lists every id exactly once, in declaration order
        &CATALOG[*self as usize]
    }
}

/// Award every unearned achievement whose requirements are all met
///
/// The id is inserted and the reward credited together, so a second call
/// with unchanged state awards nothing.
pub fn check_achievements(commander: &mut Commander, army: &Army) -> Vec<AchievementId> {
    let mut awarded = Vec::new();

    for achievement in catalog() {
        if commander.achievements.contains(&achievement.id) {
            continue;
        }
        if achievement.is_met(commander, army) {
            commander.achievements.insert(achievement.id);
            commander.prestige = commander.prestige.saturating_add(achievement.reward);
            awarded.push(achievement.id);
            tracing::info!(
                commander = %commander.key,
                achievement = achievement.name,
                reward = achievement.reward,
                "Achievement earned"
            );
        }
    }

    awarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;
    use crate::core::types::CommanderKey;
    use crate::progression::commander::Registration;
    use chrono::Utc;

    fn setup() -> (Commander, Army) {
        let key = CommanderKey::new(1, 1);
        let config = GameConfig::default();
        let commander = Commander::new(
            key,
            Registration {
                character_name: "Mara".into(),
                army_name: "Grey Company".into(),
                title: None,
                faction: None,
            },
            &config,
            Utc::now(),
        );
        (commander, Army::new(key, &config, Utc::now()))
    }

    #[test]
    fn test_catalog_ids_match_positions() {
        for (i, achievement) in catalog().iter().enumerate() {
            assert_eq!(achievement.id as usize, i);
            assert_eq!(achievement.id.info().name, achievement.name);
        }
    }

    #[test]
    fn test_fresh_commander_earns_nothing() {
        let (mut commander, army) = setup();
        assert!(check_achievements(&mut commander, &army).is_empty());
        assert_eq!(commander.prestige, 0);
    }

    #[test]
    fn test_first_blood_awarded_once() {
        let (mut commander, army) = setup();
        commander.wins = 1;

        let first = check_achievements(&mut commander, &army);
        assert_eq!(first, vec![AchievementId::FirstBlood]);
        assert_eq!(commander.prestige, 100);

        let second = check_achievements(&mut commander, &army);
        assert!(second.is_empty());
        assert_eq!(commander.prestige, 100);
    }

    #[test]
    fn test_army_metrics_read_from_army() {
        let (mut commander, mut army) = setup();
        army.knights = 50;
        army.fortifications = 100;
        let awarded = check_achievements(&mut commander, &army);
        assert!(awarded.contains(&AchievementId::KnightCommander));
        assert!(awarded.contains(&AchievementId::FortressBuilder));
        assert_eq!(commander.prestige, 1500 + 1800);
    }

    #[test]
    fn test_streak_and_war_wins_tracked() {
        let (mut commander, army) = setup();
        commander.win_streak = 10;
        commander.wins = 10;
        commander.war_wins = 5;
        let awarded = check_achievements(&mut commander, &army);
        assert!(awarded.contains(&AchievementId::Undefeated));
        assert!(awarded.contains(&AchievementId::MasterStrategist));
        assert!(awarded.contains(&AchievementId::BattleHardened));
        assert!(!awarded.contains(&AchievementId::WarVeteran));
    }
}
