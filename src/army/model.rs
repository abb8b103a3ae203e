//! Army - a commander's military resource pool

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::config::GameConfig;
use crate::core::types::CommanderKey;
use crate::tables::{ArmyType, Formation};

/// Upper bound of both morale and supplies
pub const GAUGE_MAX: u32 = 100;

/// Penalties never push morale below this
pub const MORALE_PENALTY_FLOOR: u32 = 1;

/// Effective-size weights: a knight counts as ten soldiers, and so on
pub const KNIGHT_WEIGHT: u64 = 10;
pub const ARCHER_WEIGHT: u64 = 3;
pub const CAVALRY_WEIGHT: u64 = 8;
pub const SIEGE_WEIGHT: u64 = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Army {
    pub key: CommanderKey,
    pub army_type: ArmyType,
    pub formation: Formation,

    /// Trained infantry
    pub current_soldiers: u32,
    /// Untrained recruits awaiting training
    pub current_recruits: u32,
    pub max_soldiers: u32,
    pub max_recruits: u32,

    /// Cumulative specialist totals (not capacity-bounded)
    pub knights: u32,
    pub archers: u32,
    pub cavalry: u32,
    pub siege: u32,

    pub tactical_points: u32,
    /// 0..=100
    pub morale: u32,
    /// 0..=100
    pub supplies: u32,
    pub fortifications: u32,

    pub weekly_recruitment_used: u32,
    /// When the weekly recruitment counter clears
    pub recruitment_reset_at: Option<DateTime<Utc>>,

    pub daily_actions_used: u32,
    /// When the daily action counter clears
    pub daily_reset_at: Option<DateTime<Utc>>,

    /// Supply consumption has been charged up to this instant
    pub last_supply_check: DateTime<Utc>,
}

impl Army {
    pub fn new(key: CommanderKey, config: &GameConfig, now: DateTime<Utc>) -> Self {
        Self {
            key,
            army_type: ArmyType::Balanced,
            formation: Formation::Line,
            current_soldiers: 0,
            current_recruits: 0,
            max_soldiers: config.starting_max_soldiers,
            max_recruits: config.starting_max_recruits,
            knights: 0,
            archers: 0,
            cavalry: 0,
            siege: 0,
            tactical_points: config.starting_tactical_points,
            morale: GAUGE_MAX,
            supplies: GAUGE_MAX,
            fortifications: 0,
            weekly_recruitment_used: 0,
            recruitment_reset_at: None,
            daily_actions_used: 0,
            daily_reset_at: None,
            last_supply_check: now,
        }
    }

    /// Soldiers plus specialists weighted by their upkeep
    pub fn effective_size(&self) -> u64 {
        self.current_soldiers as u64
            + self.knights as u64 * KNIGHT_WEIGHT
            + self.archers as u64 * ARCHER_WEIGHT
            + self.cavalry as u64 * CAVALRY_WEIGHT
            + self.siege as u64 * SIEGE_WEIGHT
    }

    /// Headcount of every trained unit
    pub fn total_units(&self) -> u64 {
        self.current_soldiers as u64
            + self.knights as u64
            + self.archers as u64
            + self.cavalry as u64
            + self.siege as u64
    }

    pub fn raise_morale(&mut self, amount: u32) {
        self.morale = self.morale.saturating_add(amount).min(GAUGE_MAX);
    }

    /// Morale loss, floored at 1
    pub fn lower_morale(&mut self, amount: u32) {
        self.morale = self.morale.saturating_sub(amount).max(MORALE_PENALTY_FLOOR);
    }

    pub fn spend_supplies(&mut self, amount: u32) {
        self.supplies = self.supplies.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn army() -> Army {
        Army::new(CommanderKey::new(1, 1), &GameConfig::default(), Utc::now())
    }

    #[test]
    fn test_new_army_defaults() {
        let a = army();
        assert_eq!(a.army_type, ArmyType::Balanced);
        assert_eq!(a.formation, Formation::Line);
        assert_eq!((a.max_soldiers, a.max_recruits), (500, 1000));
        assert_eq!((a.morale, a.supplies, a.tactical_points), (100, 100, 5));
    }

    #[test]
    fn test_effective_size_weights() {
        let mut a = army();
        a.current_soldiers = 100;
        a.knights = 1;
        a.archers = 2;
        a.cavalry = 3;
        a.siege = 4;
        assert_eq!(a.effective_size(), 100 + 10 + 6 + 24 + 60);
        assert_eq!(a.total_units(), 110);
    }

    #[test]
    fn test_morale_bounds() {
        let mut a = army();
        a.raise_morale(50);
        assert_eq!(a.morale, 100);
        a.lower_morale(250);
        assert_eq!(a.morale, 1);
    }
}
