//! Static catalog rows seeded into the store
//!
//! Seeding only fills in missing rows. A row that already exists, even
//! one edited by an operator, is left as it is.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::progression::{catalog as achievement_catalog, Category, Requirement};
use crate::tables::{Formation, FormationModifiers, SiegeEngine};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationRow {
    pub name: String,
    pub description: String,
    pub modifiers: FormationModifiers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiegeEngineRow {
    pub name: String,
    pub cost: u32,
    pub attack_power: u32,
    pub defense_bonus: u32,
    pub siege_bonus: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementRow {
    pub name: String,
    pub description: String,
    pub requirements: Vec<Requirement>,
    pub reward: u32,
    pub category: Category,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub formations: BTreeMap<String, FormationRow>,
    pub siege_engines: BTreeMap<String, SiegeEngineRow>,
    pub achievements: BTreeMap<String, AchievementRow>,
}

/// Rows inserted by one seeding pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub formations: usize,
    pub siege_engines: usize,
    pub achievements: usize,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.formations + self.siege_engines + self.achievements
    }
}

fn insert_missing<T>(table: &mut BTreeMap<String, T>, name: &str, row: impl FnOnce() -> T) -> usize {
    if table.contains_key(name) {
        return 0;
    }
    table.insert(name.to_string(), row());
    1
}

impl Catalog {
    /// Insert every default row that is not present yet
    pub fn seed_defaults(&mut self) -> SeedReport {
        let mut report = SeedReport::default();

        for formation in Formation::ALL {
            report.formations += insert_missing(&mut self.formations, formation.name(), || FormationRow {
                name: formation.name().to_string(),
                description: formation.description().to_string(),
                modifiers: formation.modifiers(),
            });
        }

        for engine in SiegeEngine::ALL {
            let stats = engine.stats();
            report.siege_engines += insert_missing(&mut self.siege_engines, stats.name, || SiegeEngineRow {
                name: stats.name.to_string(),
                cost: stats.cost,
                attack_power: stats.attack_power,
                defense_bonus: stats.defense_bonus,
                siege_bonus: stats.siege_bonus,
                description: stats.description.to_string(),
            });
        }

        for achievement in achievement_catalog() {
            report.achievements += insert_missing(&mut self.achievements, achievement.name, || AchievementRow {
                name: achievement.name.to_string(),
                description: achievement.description.to_string(),
                requirements: achievement.requirements.to_vec(),
                reward: achievement.reward,
                category: achievement.category,
            });
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_idempotent() {
        let mut catalog = Catalog::default();
        let first = catalog.seed_defaults();
        assert_eq!(first.formations, Formation::ALL.len());
        assert_eq!(first.siege_engines, SiegeEngine::ALL.len());
        assert_eq!(first.achievements, 10);

        let second = catalog.seed_defaults();
        assert_eq!(second.total(), 0);
    }

    #[test]
    fn test_seed_never_overwrites() {
        let mut catalog = Catalog::default();
        catalog.seed_defaults();
        if let Some(row) = catalog.siege_engines.get_mut("Trebuchet") {
            row.cost = 1;
        }
        catalog.siege_engines.remove("Mantlet");

        let report = catalog.seed_defaults();
        assert_eq!(report.siege_engines, 1);
        assert_eq!(catalog.siege_engines["Trebuchet"].cost, 1);
        assert!(catalog.siege_engines.contains_key("Mantlet"));
    }
}
