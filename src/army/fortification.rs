//! Fortification building

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::army::model::Army;
use crate::core::config::GameConfig;
use crate::core::error::{Rejection, Result};
use crate::core::types::CommanderKey;

/// Append-only fortification history row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FortificationRecord {
    pub commander: CommanderKey,
    pub added: u32,
    pub level_after: u32,
    pub supply_cost: u32,
    pub at: DateTime<Utc>,
}

pub fn build_fortification(
    army: &mut Army,
    config: &GameConfig,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> Result<FortificationRecord> {
    if army.supplies < config.fortification_cost {
        return Err(Rejection::InsufficientSupplies {
            need: config.fortification_cost,
            have: army.supplies,
        }
        .into());
    }

    let added = rng.gen_range(config.fortification_bonus_min..=config.fortification_bonus_max);
    army.spend_supplies(config.fortification_cost);
    army.fortifications += added;

    Ok(FortificationRecord {
        commander: army.key,
        added,
        level_after: army.fortifications,
        supply_cost: config.fortification_cost,
        at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_build_adds_bounded_bonus() {
        let config = GameConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut army = Army::new(CommanderKey::new(1, 1), &config, Utc::now());

        let record = build_fortification(&mut army, &config, &mut rng, Utc::now()).unwrap();
        assert!((3..=7).contains(&record.added));
        assert_eq!(army.fortifications, record.added);
        assert_eq!(army.supplies, 80);
    }

    #[test]
    fn test_build_needs_supplies() {
        let config = GameConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut army = Army::new(CommanderKey::new(1, 1), &config, Utc::now());
        army.supplies = 19;

        assert!(build_fortification(&mut army, &config, &mut rng, Utc::now()).is_err());
        assert_eq!(army.fortifications, 0);
        assert_eq!(army.supplies, 19);
    }
}
