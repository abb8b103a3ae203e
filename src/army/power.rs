//! Army power - the combat-strength figure used by duels, wars and status

use serde::{Deserialize, Serialize};

use crate::army::model::{Army, ARCHER_WEIGHT, CAVALRY_WEIGHT, GAUGE_MAX, KNIGHT_WEIGHT, SIEGE_WEIGHT};
use crate::core::config::GameConfig;

/// Per-category power after the specialization bonus, plus the scalars
/// applied on top
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmyPower {
    pub infantry: f64,
    pub knights: f64,
    pub archers: f64,
    pub cavalry: f64,
    pub siege: f64,
    pub morale_multiplier: f64,
    pub formation_bonus: f64,
    pub total: u64,
}

impl ArmyPower {
    /// Sum of category power before morale and formation scaling
    pub fn base(&self) -> f64 {
        self.infantry + self.knights + self.archers + self.cavalry + self.siege
    }
}

/// `floor + morale/100 * span`; 0.5..=1.0 with default tuning
pub fn morale_multiplier(morale: u32, config: &GameConfig) -> f64 {
    config.power_morale_floor + morale.min(GAUGE_MAX) as f64 / 100.0 * config.power_morale_span
}

pub fn calculate_army_power(army: &Army, config: &GameConfig) -> ArmyPower {
    let bonus = army.army_type.bonuses();

    // knights fight as heavy infantry
    let infantry = army.current_soldiers as f64 * bonus.infantry;
    let knights = (army.knights as u64 * KNIGHT_WEIGHT) as f64 * bonus.infantry;
    let archers = (army.archers as u64 * ARCHER_WEIGHT) as f64 * bonus.archers;
    let cavalry = (army.cavalry as u64 * CAVALRY_WEIGHT) as f64 * bonus.cavalry;
    let siege = (army.siege as u64 * SIEGE_WEIGHT) as f64 * bonus.siege;

    let morale_multiplier = morale_multiplier(army.morale, config);
    let formation_bonus = army.formation.power_bonus();
    let total = ((infantry + knights + archers + cavalry + siege) * morale_multiplier * formation_bonus).max(0.0) as u64;

    ArmyPower {
        infantry,
        knights,
        archers,
        cavalry,
        siege,
        morale_multiplier,
        formation_bonus,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CommanderKey;
    use crate::tables::{ArmyType, Formation};
    use chrono::Utc;

    fn army() -> Army {
        Army::new(CommanderKey::new(1, 1), &GameConfig::default(), Utc::now())
    }

    #[test]
    fn test_empty_army_has_no_power() {
        let p = calculate_army_power(&army(), &GameConfig::default());
        assert_eq!(p.total, 0);
        assert_eq!(p.morale_multiplier, 1.0);
    }

    #[test]
    fn test_balanced_line_power() {
        let mut a = army();
        a.current_soldiers = 400;
        a.knights = 10;
        let p = calculate_army_power(&a, &GameConfig::default());
        // (400 + 100) * 1.1 * 1.0 * 0.975 = 536.25
        assert_eq!(p.total, 536);
        assert!((p.knights - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_morale_halves_at_zero() {
        let config = GameConfig::default();
        assert_eq!(morale_multiplier(0, &config), 0.5);
        assert_eq!(morale_multiplier(50, &config), 0.75);
        assert_eq!(morale_multiplier(100, &config), 1.0);
    }

    #[test]
    fn test_specialization_shifts_weight() {
        let config = GameConfig::default();
        let mut a = army();
        a.cavalry = 100;
        a.formation = Formation::Line;

        a.army_type = ArmyType::CavalryHeavy;
        let heavy = calculate_army_power(&a, &config).total;
        a.army_type = ArmyType::Defensive;
        let defensive = calculate_army_power(&a, &config).total;
        assert!(heavy > defensive);
    }
}
